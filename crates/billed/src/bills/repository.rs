use std::sync::Arc;

use tracing::debug;

use super::domain::{BillRecord, DisplayBill};
use super::format::{BillFormatter, FormatError, FrenchFormatter};
use super::ports::{DiagnosticSink, TracingDiagnostics};
use super::store::{BillStore, StoreError};

/// Read side of the bill list: fetches stored bills and shapes them for display.
pub struct BillRepository<S> {
    store: Arc<S>,
    formatter: Arc<dyn BillFormatter>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<S> BillRepository<S>
where
    S: BillStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_collaborators(store, Arc::new(FrenchFormatter), Arc::new(TracingDiagnostics))
    }

    pub fn with_collaborators(
        store: Arc<S>,
        formatter: Arc<dyn BillFormatter>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            store,
            formatter,
            diagnostics,
        }
    }

    /// Fetch every bill from the store. Records are formatted lazily as the
    /// returned iterator is consumed, in store order.
    pub async fn list_bills(&self) -> Result<DisplayBills, StoreError> {
        let records = self.store.list().await?;
        debug!(count = records.len(), "fetched bills from store");

        Ok(DisplayBills {
            records: records.into_iter(),
            formatter: Arc::clone(&self.formatter),
            diagnostics: Arc::clone(&self.diagnostics),
        })
    }
}

/// One-shot sequence of display-ready bills.
pub struct DisplayBills {
    records: std::vec::IntoIter<BillRecord>,
    formatter: Arc<dyn BillFormatter>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl DisplayBills {
    fn normalize(&self, record: BillRecord) -> DisplayBill {
        let date = self.or_raw(
            self.formatter.format_date(&record.date),
            &record,
            &record.date,
        );
        let status = self.or_raw(
            self.formatter.format_status(&record.status),
            &record,
            record.status.as_str(),
        );
        DisplayBill::from_record(record, date, status)
    }

    fn or_raw(
        &self,
        formatted: Result<String, FormatError>,
        record: &BillRecord,
        raw: &str,
    ) -> String {
        formatted.unwrap_or_else(|error| {
            self.diagnostics.report(&error, record);
            raw.to_string()
        })
    }
}

impl Iterator for DisplayBills {
    type Item = DisplayBill;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(self.normalize(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for DisplayBills {}

/// Newest bills first, comparing the stored date strings.
///
/// The comparison is lexicographic, which orders ISO `YYYY-MM-DD` dates
/// chronologically. Malformed dates are compared the same way and may land out
/// of true chronological order.
pub fn newest_first(bills: &mut [DisplayBill]) {
    bills.sort_by(|a, b| b.raw_date.cmp(&a.raw_date));
}
