//! HTTP server module.
//!
//! Plain HTTP only; TLS terminates at the load balancer in front of the
//! service. The server drains connections gracefully on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
