//! Employee expense bills: listing previously submitted bills and submitting a
//! new one with a receipt attachment.
//!
//! Both workflows talk to the remote store through [`BillStore`] and to the
//! surrounding UI through the capability traits in [`ports`], so they can be
//! exercised without a browser or a live API.

pub mod domain;
pub mod format;
pub mod http_store;
pub mod page;
pub mod ports;
pub mod repository;
pub mod store;
pub mod submission;


pub use domain::{
    BillId, BillRecord, BillStatus, DisplayBill, NewBill, Route, Session, UserType,
};
pub use format::{BillFormatter, FormatError, FrenchFormatter};
pub use http_store::HttpBillStore;
pub use page::{BillsPage, BillsView};
pub use ports::{
    DiagnosticSink, FileInput, Modal, Navigator, ReceiptPreview, TracingDiagnostics, UserAlert,
};
pub use repository::{newest_first, BillRepository, DisplayBills};
pub use store::{BillStore, BillUpdate, ReceiptUpload, StoreError, StoredReceipt};
pub use submission::{
    has_allowed_extension, FileSelection, NewBillEvent, NewBillForm, NewBillPorts,
    NewBillSubmitter, PendingUpload, SelectedFile, SubmissionState, SubmitError,
    INVALID_FILE_MESSAGE,
};
