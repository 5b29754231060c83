pub mod callback;
pub mod clients;
pub mod guard;
pub mod profiles;
pub mod refresh;
pub mod session;
