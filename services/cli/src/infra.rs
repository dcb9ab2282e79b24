use async_trait::async_trait;
use billed::bills::{
    BillId, BillRecord, BillStore, BillUpdate, BillsView, FileInput, Modal, Navigator,
    ReceiptPreview, ReceiptUpload, Route, StoreError, StoredReceipt, UserAlert,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

/// Terminal rendition of the bill pages' UI capabilities.
#[derive(Default)]
pub(crate) struct TerminalScreen {
    selected: Mutex<Option<PathBuf>>,
}

impl TerminalScreen {
    pub(crate) fn with_selection(path: PathBuf) -> Self {
        Self {
            selected: Mutex::new(Some(path)),
        }
    }
}

impl UserAlert for TerminalScreen {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

impl FileInput for TerminalScreen {
    fn clear(&self) {
        let previous = self.selected.lock().expect("selection mutex poisoned").take();
        debug!(?previous, "receipt selection cleared");
    }
}

impl Navigator for TerminalScreen {
    fn navigate(&self, route: Route) {
        info!(route = route.path(), "navigate");
    }
}

impl Modal for TerminalScreen {
    fn show(&self, preview: ReceiptPreview) {
        println!("Justificatif: {}", preview.file_url);
        if let Some(name) = preview.file_name {
            println!("  fichier {name} (affiché sur {}px)", preview.image_width);
        }
    }
}

/// Bill store kept in process memory, keyed like the remote API.
#[derive(Default)]
pub(crate) struct InMemoryBillStore {
    records: Mutex<BTreeMap<BillId, BillRecord>>,
    receipts: Mutex<BTreeMap<BillId, ReceiptUpload>>,
    sequence: AtomicU64,
}

impl InMemoryBillStore {
    pub(crate) fn seeded(records: Vec<BillRecord>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records.lock().expect("store mutex poisoned");
            for record in records {
                guard.insert(record.id.clone(), record);
            }
        }
        store
    }

    fn next_key(&self) -> BillId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        BillId(format!("bill-{id:06}"))
    }

    pub(crate) fn receipt_count(&self) -> usize {
        self.receipts.lock().expect("store mutex poisoned").len()
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<StoredReceipt, StoreError> {
        let key = self.next_key();
        let stored = StoredReceipt {
            file_url: format!("memory://receipts/{}/{}", key, upload.file_name),
            key: key.clone(),
            file_name: Some(upload.file_name.clone()),
        };
        self.receipts
            .lock()
            .expect("store mutex poisoned")
            .insert(key, upload);
        Ok(stored)
    }

    async fn update(&self, update: BillUpdate) -> Result<BillRecord, StoreError> {
        let mut data: serde_json::Value = serde_json::from_str(&update.data)
            .map_err(|err| StoreError::Payload(err.to_string()))?;
        let fields = data
            .as_object_mut()
            .ok_or_else(|| StoreError::Payload("bill data must be a JSON object".to_string()))?;
        let key = update.selector.unwrap_or_else(|| self.next_key());
        fields.insert("id".to_string(), serde_json::Value::String(key.0.clone()));
        let record: BillRecord =
            serde_json::from_value(data).map_err(|err| StoreError::Payload(err.to_string()))?;

        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(key, record.clone());
        Ok(record)
    }
}

pub(crate) fn render_bills(view: &BillsView) {
    if let Some(error) = &view.error {
        println!("Erreur: {error}");
    }
    println!(
        "{:<22} {:<24} {:<12} {:>10}  {}",
        "Type", "Nom", "Date", "Montant", "Statut"
    );
    for row in &view.rows {
        println!(
            "{:<22} {:<24} {:<12} {:>8} €  {}",
            row.expense_type, row.name, row.date, row.amount, row.status
        );
    }
    println!("{} note(s) de frais", view.rows.len());
}
