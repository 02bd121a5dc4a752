use crate::models::RawDataset;
use std::time::Duration;
use thiserror::Error;

/// A page control could not be located or driven. Fatal to a harvest run.
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Request to the timetable site failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not find control `{0}` on the page")]
    ControlNotFound(String),

    #[error("Control `{control}` has no option with value `{value}`")]
    OptionNotFound { control: String, value: String },

    #[error("Page did not show `{selector}` within {timeout:?}")]
    NotReady { selector: String, timeout: Duration },

    #[error("No page has been loaded in this session yet")]
    NoPage,

    #[error("A term must be selected before fetching subjects")]
    TermNotSelected,

    #[error("The session has already been closed")]
    SessionClosed,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// A single row that cannot be turned into a record. Skipped, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecordError {
    #[error("row has {found} cells, expected {expected}")]
    Arity { expected: usize, found: usize },

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("course `{0}` has no `-` between department and number")]
    CourseWithoutSeparator(String),
}

/// `fetch_all` aborted partway. `partial` holds every subject collected
/// before the failure.
#[derive(Error, Debug)]
#[error("harvest aborted at subject {}: {source}", .failed_subject.as_deref().unwrap_or("<term selection>"))]
pub struct FetchError {
    pub failed_subject: Option<String>,
    #[source]
    pub source: NavigationError,
    pub partial: RawDataset,
}

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Fetch(#[from] Box<FetchError>),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = HarvestError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid term code `{0}`, expected six digits YYYYMM")]
pub struct InvalidTerm(pub String);
