pub mod client;
pub mod guard;
pub mod otp;
pub mod profile;
pub mod session;
