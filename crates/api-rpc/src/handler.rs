//! RPC Method Handlers
//!
//! Each method validates its parameters, calls the queue service, and maps
//! the result onto the wire types.

use crate::error::to_rpc_error;
use crate::types::{
    AddRequest, ClearResponse, ListResponse, QueueEntryDto, RemoveRequest, RemoveResponse,
    StatsResponse, UpdateStatusRequest, UpdateStatusResponse,
};
use frontdesk_core::application::{self, WalkInQueueService};
use frontdesk_core::domain::QueueStatus;
use frontdesk_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<WalkInQueueService>,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<WalkInQueueService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }

    /// queue.add.v1
    pub async fn add(&self, params: AddRequest) -> Result<QueueEntryDto, ErrorObjectOwned> {
        let req = application::AddRequest::new(params.patient_name, params.doctor_name);
        let entry = self.service.add(req).await.map_err(to_rpc_error)?;
        Ok(entry.into())
    }

    /// queue.list.v1
    pub async fn list(&self) -> Result<ListResponse, ErrorObjectOwned> {
        let entries = self.service.list_ordered().await.map_err(to_rpc_error)?;
        Ok(ListResponse {
            entries: entries.into_iter().map(QueueEntryDto::from).collect(),
        })
    }

    /// queue.update_status.v1
    pub async fn update_status(
        &self,
        params: UpdateStatusRequest,
    ) -> Result<UpdateStatusResponse, ErrorObjectOwned> {
        let status: QueueStatus = params
            .status
            .parse()
            .map_err(|e| to_rpc_error(AppError::Domain(e)))?;

        let outcome = self
            .service
            .update_status(&params.id, status)
            .await
            .map_err(to_rpc_error)?;

        Ok(UpdateStatusResponse {
            message: outcome.message().to_string(),
        })
    }

    /// queue.remove.v1
    pub async fn remove(&self, params: RemoveRequest) -> Result<RemoveResponse, ErrorObjectOwned> {
        let removed = self.service.remove(&params.id).await.map_err(to_rpc_error)?;
        Ok(RemoveResponse {
            id: removed.id,
            removed: true,
        })
    }

    /// queue.clear.v1
    pub async fn clear(&self) -> Result<ClearResponse, ErrorObjectOwned> {
        let removed = self.service.clear_all().await.map_err(to_rpc_error)?;
        Ok(ClearResponse { removed })
    }

    /// queue.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let stats = self.service.stats().await.map_err(to_rpc_error)?;
        Ok(StatsResponse {
            waiting: stats.waiting,
            in_consultation: stats.in_consultation,
            completed: stats.completed,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}
