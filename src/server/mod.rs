// Server module entry point
// Listener setup and per-connection serving for the demo binary

pub mod connection;
pub mod listener;

pub use connection::handle_connection;
pub use listener::create_reusable_listener;
