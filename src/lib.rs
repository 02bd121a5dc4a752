// Declare all our modules
mod client;
pub mod dataset;
mod error;
mod models;
pub mod normalize;
pub mod parsers;
mod session;
mod subjects;
mod summary;

// Publicly export the parts of our library that users will need
pub use client::{SessionState, TimetableClient};
pub use error::{FetchError, HarvestError, InvalidTerm, MalformedRecordError, NavigationError, Result};
pub use models::*;
pub use normalize::{
    CleanReport, Cleaned, Normalized, SkipReason, classify, clean, course_id, department,
    normalize, standardize_modality,
};
pub use session::{HttpSession, Session};
pub use subjects::{SUBJECT_CODES, default_subjects, normalize_subjects};
pub use summary::RunSummary;
