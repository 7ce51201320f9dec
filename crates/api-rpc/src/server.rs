//! JSON-RPC Server
//!
//! Serves the queue methods over HTTP JSON-RPC 2.0 on a TCP address.

use crate::handler::RpcHandler;
use crate::types::{AddRequest, RemoveRequest, UpdateStatusRequest};
use frontdesk_core::application::WalkInQueueService;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 4000;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<WalkInQueueService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Build the method table without binding a socket
    pub fn into_module(self) -> Result<RpcModule<()>, String> {
        build_module(self.handler)
    }

    /// Bind and start serving; the returned handle stops the server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let module = build_module(self.handler)?;

        info!("JSON-RPC server started successfully");

        Ok(server.start(module))
    }
}

fn build_module(handler: Arc<RpcHandler>) -> Result<RpcModule<()>, String> {
    let mut module = RpcModule::new(());

    let h = handler.clone();
    module
        .register_async_method("queue.add.v1", move |params, _, _| {
            let handler = h.clone();
            async move {
                let req: AddRequest = params.parse()?;
                handler.add(req).await
            }
        })
        .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module
        .register_async_method("queue.list.v1", move |_, _, _| {
            let handler = h.clone();
            async move { handler.list().await }
        })
        .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module
        .register_async_method("queue.update_status.v1", move |params, _, _| {
            let handler = h.clone();
            async move {
                let req: UpdateStatusRequest = params.parse()?;
                handler.update_status(req).await
            }
        })
        .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module
        .register_async_method("queue.remove.v1", move |params, _, _| {
            let handler = h.clone();
            async move {
                let req: RemoveRequest = params.parse()?;
                handler.remove(req).await
            }
        })
        .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module
        .register_async_method("queue.clear.v1", move |_, _, _| {
            let handler = h.clone();
            async move { handler.clear().await }
        })
        .map_err(|e| e.to_string())?;

    let h = handler;
    module
        .register_async_method("queue.stats.v1", move |_, _, _| {
            let handler = h.clone();
            async move { handler.stats().await }
        })
        .map_err(|e| e.to_string())?;

    Ok(module)
}
