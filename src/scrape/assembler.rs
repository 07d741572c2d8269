//! Dataset assembler
//!
//! Accumulates raw record batches from every region and route visited in a
//! scrape run, then commits them as one flat dataset: coerce every row to
//! its declared type and atomically replace the persisted table. Batches
//! are threaded through explicitly; there is no process-wide accumulator.

use crate::records::RawBusRecord;
use crate::storage::Storage;
use crate::{BusgridError, Result};

/// Accumulates one scrape run's records ahead of the dataset replace.
#[derive(Debug, Default)]
pub struct DatasetAssembler {
    raw: Vec<RawBusRecord>,
}

impl DatasetAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one page's extracted batch.
    pub fn push_batch(&mut self, batch: Vec<RawBusRecord>) {
        self.raw.extend(batch);
    }

    /// Number of records accumulated so far.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The accumulated raw records.
    pub fn raw_records(&self) -> &[RawBusRecord] {
        &self.raw
    }

    /// Coerces every accumulated record and replaces the persisted dataset.
    ///
    /// Coercion failure for any row aborts the whole commit: a type mismatch
    /// at this point means the extraction changed shape, and a partially
    /// typed dataset must never replace a good one. The storage replace
    /// itself is transactional.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of rows loaded into the new dataset
    /// * `Err(BusgridError)` - Coercion or storage failure; the previous
    ///   dataset is left in place
    pub fn commit<S: Storage + ?Sized>(self, storage: &mut S) -> Result<usize> {
        let rows = self
            .raw
            .iter()
            .map(RawBusRecord::coerce)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(BusgridError::from)?;

        storage.replace_dataset(&rows)?;
        tracing::info!("Committed {} rows to the dataset", rows.len());
        Ok(rows.len())
    }
}
