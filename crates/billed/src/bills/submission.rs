use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::domain::{BillId, BillRecord, BillStatus, NewBill, Route, Session};
use super::ports::{FileInput, Navigator, UserAlert};
use super::store::{BillStore, BillUpdate, ReceiptUpload, StoreError};

pub const INVALID_FILE_MESSAGE: &str =
    "Veuillez sélectionner un fichier valide avec une extension.";

const ALLOWED_RECEIPT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const DEFAULT_VAT_PCT: i64 = 20;

/// Where the current submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    FileSelected,
    FileValidated,
    Uploading,
    Uploaded,
    Submitting,
    Done,
}

/// File picked in the receipt input. `path` may carry a browser fake path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub content: Vec<u8>,
}

impl SelectedFile {
    pub fn new(path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['\\', '/'])
            .next()
            .unwrap_or(self.path.as_str())
    }
}

/// Receipt held between selection and form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub file: Vec<u8>,
    pub file_name: String,
    pub file_url: Option<String>,
    pub bill_id: Option<BillId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    Rejected,
    Uploaded(PendingUpload),
}

/// Raw values of the new-bill form, as typed by the employee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewBillEvent {
    FileSelected(SelectedFile),
    FormSubmitted(NewBillForm),
}

/// UI capabilities the new-bill form hands to the submitter.
#[derive(Clone)]
pub struct NewBillPorts {
    pub alert: Arc<dyn UserAlert>,
    pub file_input: Arc<dyn FileInput>,
    pub navigator: Arc<dyn Navigator>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unable to serialize bill: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Drives one new-bill form: receipt validation and upload, then submission.
pub struct NewBillSubmitter<S> {
    store: Arc<S>,
    session: Session,
    ports: NewBillPorts,
    state: SubmissionState,
    pending: Option<PendingUpload>,
}

impl<S> NewBillSubmitter<S>
where
    S: BillStore + 'static,
{
    pub fn new(store: Arc<S>, session: Session, ports: NewBillPorts) -> Self {
        Self {
            store,
            session,
            ports,
            state: SubmissionState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn pending_upload(&self) -> Option<&PendingUpload> {
        self.pending.as_ref()
    }

    pub fn file_url(&self) -> Option<&str> {
        self.pending.as_ref()?.file_url.as_deref()
    }

    pub fn bill_id(&self) -> Option<&BillId> {
        self.pending.as_ref()?.bill_id.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.pending.as_ref().map(|pending| pending.file_name.as_str())
    }

    /// Validate the receipt extension and upload it to the store.
    ///
    /// A rejected file is reported to the user and cleared from the input;
    /// the store is not contacted. Store failures are returned as-is.
    pub async fn handle_file_selection(
        &mut self,
        file: SelectedFile,
    ) -> Result<FileSelection, SubmitError> {
        self.state = SubmissionState::FileSelected;
        let file_name = file.file_name().to_string();

        if !has_allowed_extension(&file_name) {
            warn!(file_name = %file_name, "receipt rejected: unsupported extension");
            self.ports.alert.alert(INVALID_FILE_MESSAGE);
            self.ports.file_input.clear();
            self.state = SubmissionState::Idle;
            return Ok(FileSelection::Rejected);
        }

        self.state = SubmissionState::FileValidated;
        let mut pending = PendingUpload {
            file: file.content,
            file_name,
            file_url: None,
            bill_id: None,
        };
        self.pending = Some(pending.clone());

        self.state = SubmissionState::Uploading;
        let upload = ReceiptUpload {
            file: pending.file.clone(),
            file_name: pending.file_name.clone(),
            email: self.session.email.clone(),
        };
        let stored = match self.store.create(upload).await {
            Ok(stored) => stored,
            Err(err) => {
                error!(error = %err, file_name = %pending.file_name, "receipt upload failed");
                self.state = SubmissionState::FileSelected;
                return Err(err.into());
            }
        };

        info!(bill_id = %stored.key, file_url = %stored.file_url, "receipt uploaded");
        pending.file_url = Some(stored.file_url);
        pending.bill_id = Some(stored.key);
        if let Some(file_name) = stored.file_name {
            pending.file_name = file_name;
        }
        self.pending = Some(pending.clone());
        self.state = SubmissionState::Uploaded;

        Ok(FileSelection::Uploaded(pending))
    }

    /// Persist the bill described by `form` and return to the bill list.
    ///
    /// Navigation happens once the update settles, whatever its outcome; the
    /// update result is then returned to the caller.
    pub async fn handle_submit(&mut self, form: NewBillForm) -> Result<BillRecord, SubmitError> {
        let bill = self.assemble(form);
        let data = serde_json::to_string(&bill)?;
        let selector = self.pending.as_ref().and_then(|pending| pending.bill_id.clone());

        self.state = SubmissionState::Submitting;
        let result = self.store.update(BillUpdate { data, selector }).await;
        self.pending = None;
        self.ports.navigator.navigate(Route::Bills);

        match result {
            Ok(record) => {
                info!(bill_id = %record.id, "bill submitted");
                self.state = SubmissionState::Done;
                Ok(record)
            }
            Err(err) => {
                error!(error = %err, "bill submission failed");
                self.state = SubmissionState::Idle;
                Err(err.into())
            }
        }
    }

    pub async fn dispatch(&mut self, event: NewBillEvent) -> Result<(), SubmitError> {
        match event {
            NewBillEvent::FileSelected(file) => self.handle_file_selection(file).await.map(|_| ()),
            NewBillEvent::FormSubmitted(form) => self.handle_submit(form).await.map(|_| ()),
        }
    }

    /// Process form events one at a time until the sender side closes.
    pub async fn run(&mut self, mut events: mpsc::Receiver<NewBillEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(err) = self.dispatch(event).await {
                error!(error = %err, "new bill event failed");
            }
        }
    }

    /// An amount without leading digits is sent as `null`; a missing or zero
    /// `pct` becomes the default rate.
    fn assemble(&self, form: NewBillForm) -> NewBill {
        let amount = parse_leading_integer(&form.amount);
        let pct = parse_leading_integer(&form.pct)
            .filter(|pct| *pct != 0)
            .unwrap_or(DEFAULT_VAT_PCT);
        let (file_url, file_name) = match &self.pending {
            Some(pending) => (
                pending.file_url.clone().unwrap_or_default(),
                pending.file_name.clone(),
            ),
            None => (String::new(), String::new()),
        };

        NewBill {
            email: self.session.email.clone(),
            expense_type: form.expense_type,
            name: form.name,
            amount,
            date: form.date,
            vat: form.vat,
            pct,
            commentary: form.commentary,
            file_url,
            file_name,
            status: BillStatus::Pending,
            comment_admin: String::new(),
        }
    }
}

/// Case-insensitive `.jpg`, `.jpeg` or `.png` suffix.
pub fn has_allowed_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => ALLOWED_RECEIPT_EXTENSIONS
            .iter()
            .any(|allowed| extension.eq_ignore_ascii_case(allowed)),
        _ => false,
    }
}

/// Leading integer of `raw` (`"12.50"` is 12, `" 7 €"` is 7), if any digits.
fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
