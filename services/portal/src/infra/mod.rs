pub mod gotrue;
pub mod postgrest;
pub mod supabase;
pub mod throttle;
