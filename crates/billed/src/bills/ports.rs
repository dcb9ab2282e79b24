//! Capabilities the bill workflows need from the surrounding UI.

use serde::Serialize;
use tracing::warn;

use super::domain::{BillRecord, Route};
use super::format::FormatError;

/// User-facing blocking message (a browser `alert`, a terminal line, ...).
pub trait UserAlert: Send + Sync {
    fn alert(&self, message: &str);
}

/// The receipt file picker of the new-bill form.
pub trait FileInput: Send + Sync {
    /// Drops the current selection so no file remains attached.
    fn clear(&self);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Receipt preview dialog of the bill list.
pub trait Modal: Send + Sync {
    fn show(&self, preview: ReceiptPreview);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPreview {
    pub file_url: String,
    pub file_name: Option<String>,
    pub image_width: u32,
}

/// Receives per-record formatting failures. Not shown to the user.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, error: &FormatError, record: &BillRecord);
}

/// Default sink: one `warn` event per failure, carrying the offending record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, error: &FormatError, record: &BillRecord) {
        warn!(%error, bill_id = %record.id, ?record, "display formatting failed for bill");
    }
}
