//! JSON-RPC API Layer
//!
//! Thin translation between JSON-RPC 2.0 calls and the walk-in queue engine.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
