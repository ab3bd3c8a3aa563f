pub mod handlers;
pub mod infrastructure;
pub mod server;
