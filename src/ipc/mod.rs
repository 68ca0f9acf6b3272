//! IPC module: backend commands over a Unix socket

mod client;
mod frame;
mod protocol;
mod server;

pub use client::IpcBackend;
pub use protocol::{Request, Response};
pub use server::Server;
