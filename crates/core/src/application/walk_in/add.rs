// Add-to-queue Use Case

use super::constants::MAX_NAME_LEN;
use crate::domain::{QueueEntry, QueueStatus};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, QueueRepositoryTransaction, TimeProvider};
use serde::{Deserialize, Serialize};

/// Add request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddRequest {
    pub patient_name: String,
    pub doctor_name: String,
}

impl AddRequest {
    pub fn new(patient_name: impl Into<String>, doctor_name: impl Into<String>) -> Self {
        Self {
            patient_name: patient_name.into(),
            doctor_name: doctor_name.into(),
        }
    }
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "{} too long (max {} characters)",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}

pub(crate) fn validate_request(req: &AddRequest) -> Result<()> {
    validate_name("patient_name", &req.patient_name)?;
    validate_name("doctor_name", &req.doctor_name)
}

/// Append a waiting entry behind the current last waiting position.
///
/// Must run inside the engine's write section; the position read and the
/// insert are only safe together.
pub async fn execute(
    tx: &mut dyn QueueRepositoryTransaction,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: AddRequest,
) -> Result<QueueEntry> {
    validate_request(&req)?;

    let last = tx.max_position(Some(QueueStatus::Waiting)).await?;

    let entry = QueueEntry::new(
        id_provider.generate_id(),
        time_provider.now_millis(),
        req.patient_name.trim(),
        req.doctor_name.trim(),
        last + 1,
    );

    tx.insert(&entry).await?;

    Ok(entry)
}
