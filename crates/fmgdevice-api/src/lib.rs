// fmgdevice-api: Async Rust client for the FortiManager JSON-RPC API

pub mod auth;
pub mod client;
pub mod error;
pub mod jsonrpc;
pub mod system;
pub mod transport;
mod workspace;

pub use auth::{AuthStrategy, Credentials};
pub use client::FmgClient;
pub use error::Error;
pub use jsonrpc::Method;
pub use system::SystemStatus;
pub use transport::{TlsMode, TransportConfig};
