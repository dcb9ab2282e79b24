use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{BillId, BillRecord};

/// Remote persistence for bills. Implementations may fail with any transport
/// or server error; callers pass those upward without retrying.
#[async_trait]
pub trait BillStore: Send + Sync {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError>;
    async fn create(&self, upload: ReceiptUpload) -> Result<StoredReceipt, StoreError>;
    async fn update(&self, update: BillUpdate) -> Result<BillRecord, StoreError>;
}

/// Receipt file sent ahead of the bill itself, on behalf of `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptUpload {
    pub file: Vec<u8>,
    pub file_name: String,
    pub email: String,
}

/// Store acknowledgement for an uploaded receipt. `key` identifies the bill
/// the form submission will later complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReceipt {
    pub file_url: String,
    pub key: BillId,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Serialized bill data written under `selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillUpdate {
    pub data: String,
    pub selector: Option<BillId>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("bill store request failed: {0}")]
    Transport(String),
    #[error("bill store responded with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },
    #[error("bill store returned an unreadable payload: {0}")]
    Payload(String),
    #[error("bill update needs a selector")]
    MissingSelector,
    #[error("bill store unavailable: {0}")]
    Unavailable(String),
}
