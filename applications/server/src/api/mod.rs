/// API route modules
pub mod root;
pub mod server_info;
pub mod users;
