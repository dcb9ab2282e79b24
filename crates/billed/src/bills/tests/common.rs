use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::bills::domain::{BillId, BillRecord, BillStatus, Route, Session};
use crate::bills::format::{BillFormatter, FormatError, FrenchFormatter};
use crate::bills::ports::{
    DiagnosticSink, FileInput, Modal, Navigator, ReceiptPreview, UserAlert,
};
use crate::bills::store::{BillStore, BillUpdate, ReceiptUpload, StoreError, StoredReceipt};
use crate::bills::submission::NewBillPorts;

pub(super) fn record(id: &str, date: &str, status: BillStatus) -> BillRecord {
    BillRecord {
        id: BillId(id.to_string()),
        email: "a@a".to_string(),
        expense_type: "Transports".to_string(),
        name: format!("bill {id}"),
        date: date.to_string(),
        amount: 100.0,
        status,
        commentary: Some("séminaire billed".to_string()),
        file_url: Some(format!("https://test.storage.tld/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
        vat: Some("20".to_string()),
        pct: Some(20.0),
        comment_admin: None,
    }
}

pub(super) fn fixture_bills() -> Vec<BillRecord> {
    vec![
        record("BeKy5Mo4jkmdfPGYpTxZ", "2002-02-02", BillStatus::Accepted),
        record("47qAXb6fIm2zOKkLzMro", "2004-04-04", BillStatus::Pending),
        record("UIUZtnPQvnbFnB0ozvJh", "2003-03-03", BillStatus::Refused),
    ]
}

pub(super) fn session() -> Session {
    Session::employee("employee@test.tld")
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) bills: Vec<BillRecord>,
    pub(super) fail_list: bool,
    pub(super) fail_create: bool,
    pub(super) fail_update: bool,
    pub(super) receipt: Option<StoredReceipt>,
    pub(super) uploads: Mutex<Vec<ReceiptUpload>>,
    pub(super) updates: Mutex<Vec<BillUpdate>>,
}

impl MemoryStore {
    pub(super) fn with_bills(bills: Vec<BillRecord>) -> Self {
        Self {
            bills,
            ..Self::default()
        }
    }

    pub(super) fn with_receipt(file_url: &str, key: &str, file_name: Option<&str>) -> Self {
        Self {
            receipt: Some(StoredReceipt {
                file_url: file_url.to_string(),
                key: BillId(key.to_string()),
                file_name: file_name.map(str::to_string),
            }),
            ..Self::default()
        }
    }

    pub(super) fn uploads(&self) -> Vec<ReceiptUpload> {
        self.uploads.lock().expect("uploads mutex").clone()
    }

    pub(super) fn updates(&self) -> Vec<BillUpdate> {
        self.updates.lock().expect("updates mutex").clone()
    }
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        if self.fail_list {
            return Err(StoreError::Transport("Erreur 404".to_string()));
        }
        Ok(self.bills.clone())
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<StoredReceipt, StoreError> {
        self.uploads.lock().expect("uploads mutex").push(upload);
        if self.fail_create {
            return Err(StoreError::Status {
                status: 500,
                message: Some("Erreur 500".to_string()),
            });
        }
        Ok(self.receipt.clone().unwrap_or_else(|| StoredReceipt {
            file_url: "https://localhost:3456/images/test.jpg".to_string(),
            key: BillId("1234".to_string()),
            file_name: None,
        }))
    }

    async fn update(&self, update: BillUpdate) -> Result<BillRecord, StoreError> {
        self.updates.lock().expect("updates mutex").push(update.clone());
        if self.fail_update {
            return Err(StoreError::Unavailable("Erreur 500".to_string()));
        }
        let mut value: serde_json::Value =
            serde_json::from_str(&update.data).expect("update carries json");
        let id = update
            .selector
            .unwrap_or_else(|| BillId("generated".to_string()));
        value["id"] = serde_json::Value::String(id.0);
        Ok(serde_json::from_value(value).expect("update decodes as bill"))
    }
}

#[derive(Default)]
pub(super) struct RecordingDiagnostics {
    entries: Mutex<Vec<(FormatError, BillRecord)>>,
}

impl RecordingDiagnostics {
    pub(super) fn entries(&self) -> Vec<(FormatError, BillRecord)> {
        self.entries.lock().expect("diagnostics mutex").clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report(&self, error: &FormatError, record: &BillRecord) {
        self.entries
            .lock()
            .expect("diagnostics mutex")
            .push((error.clone(), record.clone()));
    }
}

/// Formatter whose date formatting always fails; statuses use the French labels.
pub(super) struct BrokenDateFormatter;

impl BillFormatter for BrokenDateFormatter {
    fn format_date(&self, raw: &str) -> Result<String, FormatError> {
        Err(FormatError::InvalidDate(raw.to_string()))
    }

    fn format_status(&self, status: &BillStatus) -> Result<String, FormatError> {
        FrenchFormatter.format_status(status)
    }
}

#[derive(Default)]
pub(super) struct RecordingAlert {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlert {
    pub(super) fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("alert mutex").clone()
    }
}

impl UserAlert for RecordingAlert {
    fn alert(&self, message: &str) {
        self.messages
            .lock()
            .expect("alert mutex")
            .push(message.to_string());
    }
}

pub(super) struct FakeFileInput {
    value: Mutex<String>,
}

impl FakeFileInput {
    pub(super) fn holding(value: &str) -> Self {
        Self {
            value: Mutex::new(value.to_string()),
        }
    }

    pub(super) fn value(&self) -> String {
        self.value.lock().expect("file input mutex").clone()
    }
}

impl FileInput for FakeFileInput {
    fn clear(&self) {
        self.value.lock().expect("file input mutex").clear();
    }
}

#[derive(Default)]
pub(super) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(super) fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("navigator mutex").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().expect("navigator mutex").push(route);
    }
}

#[derive(Default)]
pub(super) struct RecordingModal {
    shown: Mutex<Vec<ReceiptPreview>>,
}

impl RecordingModal {
    pub(super) fn shown(&self) -> Vec<ReceiptPreview> {
        self.shown.lock().expect("modal mutex").clone()
    }
}

impl Modal for RecordingModal {
    fn show(&self, preview: ReceiptPreview) {
        self.shown.lock().expect("modal mutex").push(preview);
    }
}

pub(super) struct Ui {
    pub(super) alert: Arc<RecordingAlert>,
    pub(super) file_input: Arc<FakeFileInput>,
    pub(super) navigator: Arc<RecordingNavigator>,
}

impl Ui {
    pub(super) fn new(selected: &str) -> Self {
        Self {
            alert: Arc::new(RecordingAlert::default()),
            file_input: Arc::new(FakeFileInput::holding(selected)),
            navigator: Arc::new(RecordingNavigator::default()),
        }
    }

    pub(super) fn ports(&self) -> NewBillPorts {
        NewBillPorts {
            alert: self.alert.clone(),
            file_input: self.file_input.clone(),
            navigator: self.navigator.clone(),
        }
    }
}
