//! HTTP handlers
//!
//! The webhook endpoint plus liveness and status endpoints

pub mod handlers;
pub mod webhook;

pub use handlers::{root, status};
pub use webhook::handle_webhook;
