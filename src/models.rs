use crate::error::{InvalidTerm, MalformedRecordError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Column names of the raw timetable table, in rendered order.
pub const RAW_FIELDS: [&str; 13] = [
    "crn",
    "course",
    "title",
    "schedule_type",
    "modality",
    "cr_hrs",
    "capacity",
    "instructor",
    "days",
    "start_time",
    "end_time",
    "location",
    "exam",
];

/// Column names of the cleaned output.
pub const CANONICAL_FIELDS: [&str; 12] = [
    "crn",
    "dept",
    "course_id",
    "instructor",
    "title",
    "modality",
    "credits",
    "capacity",
    "days",
    "start_time",
    "end_time",
    "location",
];

/// Sentinel used by the timetable for sections without fixed meeting times.
pub const ARRANGED: &str = "(ARR)";

/// One row of the timetable exactly as rendered.
///
/// Field order matters: it is the raw CSV column order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RawCourseRecord {
    /// Course reference number, the per-section identifier.
    pub crn: String,
    /// Department and number joined by a dash (e.g., "CS-3114").
    pub course: String,
    pub title: String,
    /// Lecture, Lab, Independent Study, ...
    pub schedule_type: String,
    /// Delivery mode as free text (e.g., "Face-to-Face Instruction").
    pub modality: String,
    /// Credit hours as text; not always numeric.
    pub cr_hrs: String,
    pub capacity: String,
    pub instructor: String,
    /// Meeting days, or "(ARR)" for arranged sections.
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub exam: String,
}

impl RawCourseRecord {
    /// Builds a record from one table row's cells, left to right.
    ///
    /// The row must have exactly one cell per raw field. Short or long rows
    /// are rejected instead of being truncated or padded.
    pub fn from_cells(cells: Vec<String>) -> Result<Self, MalformedRecordError> {
        let cells: [String; 13] =
            cells
                .try_into()
                .map_err(|rest: Vec<String>| MalformedRecordError::Arity {
                    expected: RAW_FIELDS.len(),
                    found: rest.len(),
                })?;
        let [
            crn,
            course,
            title,
            schedule_type,
            modality,
            cr_hrs,
            capacity,
            instructor,
            days,
            start_time,
            end_time,
            location,
            exam,
        ] = cells;

        Ok(Self {
            crn,
            course,
            title,
            schedule_type,
            modality,
            cr_hrs,
            capacity,
            instructor,
            days,
            start_time,
            end_time,
            location,
            exam,
        })
    }
}

/// A cleaned, analysis-ready course section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CanonicalCourseRecord {
    pub crn: String,
    /// Department code, the part of `course` before the first dash.
    pub dept: String,
    /// `course` with dashes replaced by spaces (e.g., "CS 3114").
    pub course_id: String,
    pub instructor: String,
    pub title: String,
    /// One of F2F, Hybrid, OnlineSync, OnlineAsync, or the raw text when unrecognized.
    pub modality: String,
    /// The raw credit-hours text; only rows with a positive integer get here.
    pub credits: String,
    pub capacity: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

/// Rows extracted for one subject.
#[derive(Debug, Clone, Default)]
pub struct SubjectRows {
    pub subject: String,
    pub records: Vec<RawCourseRecord>,
    pub rejected: Vec<MalformedRecordError>,
}

/// A row the extractor refused, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub subject: String,
    pub error: MalformedRecordError,
}

/// Everything collected by a harvest, in subject iteration order.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub records: Vec<RawCourseRecord>,
    pub rejected: Vec<RejectedRow>,
    pub subjects_fetched: usize,
}

impl RawDataset {
    /// Appends one subject's rows after everything collected so far.
    pub fn push(&mut self, rows: SubjectRows) {
        let SubjectRows {
            subject,
            records,
            rejected,
        } = rows;
        self.records.extend(records);
        self.rejected.extend(rejected.into_iter().map(|error| RejectedRow {
            subject: subject.clone(),
            error,
        }));
        self.subjects_fetched += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// An academic term in the timetable's `YYYYMM` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub year: u16,
    /// Starting month: 01 spring, 06 and 07 summer sessions, 09 fall, 12 winter.
    pub month: u8,
}

impl Term {
    pub fn new(year: u16, month: u8) -> Self {
        Self { year, month }
    }

    /// Formats the term as the code the term control expects.
    ///
    /// Example: `Term::new(2024, 9).format()` returns `"202409"`.
    pub fn format(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    /// Human-readable name, e.g. "Fall 2024".
    pub fn describe(&self) -> String {
        let season = match self.month {
            1 => "Spring",
            6 => "Summer I",
            7 => "Summer II",
            9 => "Fall",
            12 => "Winter",
            _ => "Term",
        };
        format!("{} {}", season, self.year)
    }
}

impl FromStr for Term {
    type Err = InvalidTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidTerm(s.to_string()));
        }

        let year = s[..4].parse::<u16>().map_err(|_| InvalidTerm(s.to_string()))?;
        let month = s[4..].parse::<u8>().map_err(|_| InvalidTerm(s.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(InvalidTerm(s.to_string()));
        }

        Ok(Term::new(year, month))
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Where the timetable form lives and what its controls are called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormLayout {
    pub base_url: String,
    /// `name` of the term `<select>`.
    pub term_control: String,
    /// `name` of the subject `<select>`.
    pub subject_control: String,
    /// `name` of the submit button.
    pub submit_control: String,
    /// CSS class of the results table.
    pub table_class: String,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self {
            base_url: "https://apps.es.vt.edu/ssb/HZSKVTSC.P_ProcRequest".to_string(),
            term_control: "TERMYEAR".to_string(),
            subject_control: "subj_code".to_string(),
            submit_control: "BTN_PRESSED".to_string(),
            table_class: "dataentrytable".to_string(),
        }
    }
}

impl FormLayout {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn select_selector(name: &str) -> String {
        format!("select[name=\"{}\"]", name)
    }

    /// Present once the form has been (re)rendered after a submission.
    ///
    /// A subject without sections renders only the form, so the subject
    /// control counts too. This relies on `Session::click` returning after the
    /// response page is loaded.
    pub(crate) fn results_ready_selector(&self) -> String {
        format!(
            "table.{}, {}",
            self.table_class,
            Self::select_selector(&self.subject_control)
        )
    }
}

/// Randomized pause between subjects so the host is not hammered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Minimum sleep duration in milliseconds between subjects.
    pub min_delay_ms: u64,
    /// Maximum sleep duration in milliseconds between subjects.
    pub max_delay_ms: u64,
    pub enabled: bool,
}

impl Default for DelayConfig {
    /// 500ms - 1500ms, enabled.
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 1500,
            enabled: true,
        }
    }
}

impl DelayConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Bounds for waiting on a page to show an expected element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReadyConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReadyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
        }
    }
}
