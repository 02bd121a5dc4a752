use crate::error::{FetchError, Result};
use crate::models::RawDataset;
use crate::normalize::CleanReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub term: Option<String>,
    pub subjects_fetched: usize,
    /// Rows extracted from results tables.
    pub rows_fetched: usize,
    /// Rows refused by the extractor for having the wrong number of cells.
    pub rows_rejected: usize,
    /// Rows read back from the raw CSV by the cleaning pass.
    pub rows_read: usize,
    pub rows_normalized: usize,
    pub skipped_unparseable_credits: usize,
    pub skipped_zero_credits: usize,
    pub skipped_negative_credits: usize,
    pub malformed_rows: usize,
    /// Where the harvest stopped, if it did not finish.
    pub aborted_at: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn start(term: Option<&str>) -> Self {
        Self {
            term: term.map(str::to_string),
            subjects_fetched: 0,
            rows_fetched: 0,
            rows_rejected: 0,
            rows_read: 0,
            rows_normalized: 0,
            skipped_unparseable_credits: 0,
            skipped_zero_credits: 0,
            skipped_negative_credits: 0,
            malformed_rows: 0,
            aborted_at: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_fetch(&mut self, dataset: &RawDataset) {
        self.subjects_fetched += dataset.subjects_fetched;
        self.rows_fetched += dataset.records.len();
        self.rows_rejected += dataset.rejected.len();
    }

    /// Counts what a failed harvest collected and notes where it stopped.
    pub fn record_abort(&mut self, failure: &FetchError) {
        self.record_fetch(&failure.partial);
        self.aborted_at = Some(
            failure
                .failed_subject
                .clone()
                .unwrap_or_else(|| "term selection".to_string()),
        );
    }

    pub fn record_clean(&mut self, report: &CleanReport) {
        self.rows_read += report.rows_read;
        self.rows_normalized += report.kept;
        self.skipped_unparseable_credits += report.skipped_unparseable_credits;
        self.skipped_zero_credits += report.skipped_zero_credits;
        self.skipped_negative_credits += report.skipped_negative_credits;
        self.malformed_rows += report.malformed.len();
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn rows_skipped(&self) -> usize {
        self.skipped_unparseable_credits + self.skipped_zero_credits + self.skipped_negative_credits
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(term) = &self.term {
            writeln!(f, "Term:               {}", term)?;
        }
        writeln!(f, "Subjects fetched:   {}", self.subjects_fetched)?;
        writeln!(f, "Rows fetched:       {}", self.rows_fetched)?;
        writeln!(f, "Rows rejected:      {}", self.rows_rejected)?;
        writeln!(f, "Rows read:          {}", self.rows_read)?;
        writeln!(f, "Rows normalized:    {}", self.rows_normalized)?;
        writeln!(f, "Rows skipped:       {}", self.rows_skipped())?;
        writeln!(f, "  unparseable credits: {}", self.skipped_unparseable_credits)?;
        writeln!(f, "  zero credits:        {}", self.skipped_zero_credits)?;
        writeln!(f, "  negative credits:    {}", self.skipped_negative_credits)?;
        write!(f, "Malformed rows:     {}", self.malformed_rows)?;
        if let Some(at) = &self.aborted_at {
            write!(f, "\nAborted at:         {}", at)?;
        }
        Ok(())
    }
}
