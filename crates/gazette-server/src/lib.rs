//! The Gazette HTTP server.
//!
//! Wires the pieces together: an [`App`] context built once at startup
//! (configuration, article store, session layer), route handlers composing
//! the field extraction pipeline, server-rendered pages, and a hyper-based
//! accept loop with graceful shutdown.

pub mod app;
pub mod config;
pub mod handlers;
pub mod pages;
pub mod server;
pub mod session;
pub mod shutdown;

pub use app::App;
pub use config::ServerConfig;
pub use server::{Server, ServerError};
pub use shutdown::ShutdownSignal;
