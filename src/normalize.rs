use crate::error::MalformedRecordError;
use crate::models::{ARRANGED, CanonicalCourseRecord, RawCourseRecord};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Long-form modality text and its short code.
const MODALITIES: [(&str, &str); 5] = [
    ("Face-to-Face Instruction", "F2F"),
    ("Hybrid (F2F & Online Instruc.)", "Hybrid"),
    ("Online with Synchronous Mtgs.", "OnlineSync"),
    ("Online: Asynchronous", "OnlineAsync"),
    // The site leaves modality blank for in-person sections.
    ("", "F2F"),
];

/// Why a well-formed row was left out of the cleaned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// `cr_hrs` is not an integer ("N/A", "1-3", ...).
    UnparseableCredits,
    ZeroCredits,
    NegativeCredits,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Kept(CanonicalCourseRecord),
    Skipped(SkipReason),
}

impl Normalized {
    pub fn into_record(self) -> Option<CanonicalCourseRecord> {
        match self {
            Normalized::Kept(record) => Some(record),
            Normalized::Skipped(_) => None,
        }
    }
}

/// Maps a modality to its short code. Unknown values pass through unchanged.
pub fn standardize_modality(modality: &str) -> Cow<'_, str> {
    MODALITIES
        .iter()
        .find(|(long, _)| *long == modality)
        .map(|(_, short)| Cow::Borrowed(*short))
        .unwrap_or(Cow::Borrowed(modality))
}

/// Department code of a course such as "CS-3114".
pub fn department(course: &str) -> Option<&str> {
    course.split_once('-').map(|(dept, _)| dept)
}

/// "CS-3114" -> "CS 3114".
pub fn course_id(course: &str) -> String {
    course.replace('-', " ")
}

fn credit_gate(cr_hrs: &str) -> Option<SkipReason> {
    match cr_hrs.trim().parse::<i64>() {
        Err(_) => Some(SkipReason::UnparseableCredits),
        Ok(0) => Some(SkipReason::ZeroCredits),
        Ok(n) if n < 0 => Some(SkipReason::NegativeCredits),
        Ok(_) => None,
    }
}

/// Turns one raw row into its canonical form, or says why it was skipped.
///
/// The credit check runs first and is the only filter; a skipped row is not
/// inspected further. Rows that pass it must carry a `course` of the form
/// `DEPT-NUMBER`.
pub fn classify(raw: &RawCourseRecord) -> Result<Normalized, MalformedRecordError> {
    if let Some(reason) = credit_gate(&raw.cr_hrs) {
        return Ok(Normalized::Skipped(reason));
    }

    if raw.course.is_empty() {
        return Err(MalformedRecordError::MissingField("course"));
    }
    let dept = department(&raw.course)
        .ok_or_else(|| MalformedRecordError::CourseWithoutSeparator(raw.course.clone()))?;

    if !MODALITIES.iter().any(|(long, _)| *long == raw.modality) {
        debug!(crn = %raw.crn, modality = %raw.modality, "modality passed through");
    }

    let (start_time, end_time) = if raw.days == ARRANGED {
        (ARRANGED.to_string(), ARRANGED.to_string())
    } else {
        (raw.start_time.clone(), raw.end_time.clone())
    };

    Ok(Normalized::Kept(CanonicalCourseRecord {
        crn: raw.crn.clone(),
        dept: dept.to_string(),
        course_id: course_id(&raw.course),
        instructor: raw.instructor.clone(),
        title: raw.title.clone(),
        modality: standardize_modality(&raw.modality).into_owned(),
        credits: raw.cr_hrs.clone(),
        capacity: raw.capacity.clone(),
        days: raw.days.clone(),
        start_time,
        end_time,
        location: raw.location.clone(),
    }))
}

/// `Ok(None)` for rows filtered out by their credits.
pub fn normalize(
    raw: &RawCourseRecord,
) -> Result<Option<CanonicalCourseRecord>, MalformedRecordError> {
    classify(raw).map(Normalized::into_record)
}

/// A row that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based position among the input rows.
    pub row: usize,
    pub error: MalformedRecordError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub rows_read: usize,
    pub kept: usize,
    pub skipped_unparseable_credits: usize,
    pub skipped_zero_credits: usize,
    pub skipped_negative_credits: usize,
    pub malformed: Vec<MalformedRow>,
}

impl CleanReport {
    pub fn skipped(&self) -> usize {
        self.skipped_unparseable_credits + self.skipped_zero_credits + self.skipped_negative_credits
    }

    fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::UnparseableCredits => self.skipped_unparseable_credits += 1,
            SkipReason::ZeroCredits => self.skipped_zero_credits += 1,
            SkipReason::NegativeCredits => self.skipped_negative_credits += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cleaned {
    pub records: Vec<CanonicalCourseRecord>,
    pub report: CleanReport,
}

/// Normalizes a batch in order. Malformed rows are reported and skipped;
/// nothing here aborts the batch.
pub fn clean<I>(rows: I) -> Cleaned
where
    I: IntoIterator<Item = Result<RawCourseRecord, MalformedRecordError>>,
{
    let mut cleaned = Cleaned::default();

    for (i, row) in rows.into_iter().enumerate() {
        let row_number = i + 1;
        cleaned.report.rows_read += 1;

        match row.and_then(|raw| classify(&raw)) {
            Ok(Normalized::Kept(record)) => {
                cleaned.records.push(record);
                cleaned.report.kept += 1;
            }
            Ok(Normalized::Skipped(reason)) => {
                debug!(row = row_number, ?reason, "row skipped");
                cleaned.report.count_skip(reason);
            }
            Err(error) => {
                warn!(row = row_number, %error, "malformed row");
                cleaned.report.malformed.push(MalformedRow {
                    row: row_number,
                    error,
                });
            }
        }
    }

    cleaned
}
