use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use super::domain::{DisplayBill, Route};
use super::ports::{Modal, Navigator, ReceiptPreview};
use super::repository::{newest_first, BillRepository};
use super::store::BillStore;

/// What the bill list renders: rows, or an empty table plus the failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BillsView {
    pub rows: Vec<DisplayBill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Employee bill list page.
pub struct BillsPage<S> {
    repository: BillRepository<S>,
    navigator: Arc<dyn Navigator>,
    modal: Arc<dyn Modal>,
}

impl<S> BillsPage<S>
where
    S: BillStore + 'static,
{
    pub fn new(
        repository: BillRepository<S>,
        navigator: Arc<dyn Navigator>,
        modal: Arc<dyn Modal>,
    ) -> Self {
        Self {
            repository,
            navigator,
            modal,
        }
    }

    pub async fn load(&self) -> BillsView {
        match self.repository.list_bills().await {
            Ok(bills) => {
                let mut rows: Vec<DisplayBill> = bills.collect();
                newest_first(&mut rows);
                BillsView { rows, error: None }
            }
            Err(err) => {
                error!(error = %err, "unable to load bills");
                BillsView {
                    rows: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub fn navigate_to_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    /// Open the receipt of `bill`, sized to half of the modal width.
    /// Returns `false` when the bill has no receipt attached.
    pub fn preview_receipt(&self, bill: &DisplayBill, modal_width: u32) -> bool {
        let Some(file_url) = bill.file_url.clone() else {
            debug!(bill_id = %bill.id, "bill has no receipt to preview");
            return false;
        };

        self.modal.show(ReceiptPreview {
            file_url,
            file_name: bill.file_name.clone(),
            image_width: modal_width / 2,
        });
        true
    }
}
