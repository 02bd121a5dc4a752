// tests/normalize_test.rs

use timetable_harvest::{
    MalformedRecordError, Normalized, RawCourseRecord, SkipReason, classify, clean, course_id,
    department, normalize, standardize_modality,
};

fn raw(course: &str, cr_hrs: &str, days: &str) -> RawCourseRecord {
    RawCourseRecord {
        crn: "83534".to_string(),
        course: course.to_string(),
        title: "Data Structures and Algorithms".to_string(),
        schedule_type: "L".to_string(),
        modality: "Face-to-Face Instruction".to_string(),
        cr_hrs: cr_hrs.to_string(),
        capacity: "120".to_string(),
        instructor: "Shaffer".to_string(),
        days: days.to_string(),
        start_time: "9:30AM".to_string(),
        end_time: "10:45AM".to_string(),
        location: "MCB 100".to_string(),
        exam: "13T".to_string(),
    }
}

#[test]
fn test_credit_hours_gate_rows() {
    assert!(normalize(&raw("CS-3114", "3", "T R")).unwrap().is_some());
    assert!(normalize(&raw("CS-3114", " 4 ", "T R")).unwrap().is_some());
    assert!(normalize(&raw("CS-3114", "0", "T R")).unwrap().is_none());
    assert!(normalize(&raw("CS-3114", "N/A", "T R")).unwrap().is_none());
    assert!(normalize(&raw("CS-3114", "", "T R")).unwrap().is_none());

    assert_eq!(
        classify(&raw("CS-3114", "0", "T R")),
        Ok(Normalized::Skipped(SkipReason::ZeroCredits))
    );
    assert_eq!(
        classify(&raw("CS-3114", "1-3", "T R")),
        Ok(Normalized::Skipped(SkipReason::UnparseableCredits))
    );
    assert_eq!(
        classify(&raw("CS-3114", "-2", "T R")),
        Ok(Normalized::Skipped(SkipReason::NegativeCredits))
    );
}

#[test]
fn test_credits_keep_their_raw_text() {
    let record = normalize(&raw("CS-3114", " 3", "T R")).unwrap().unwrap();
    assert_eq!(record.credits, " 3");
}

#[test]
fn test_modality_table() {
    assert_eq!(standardize_modality("Face-to-Face Instruction"), "F2F");
    assert_eq!(standardize_modality("Hybrid (F2F & Online Instruc.)"), "Hybrid");
    assert_eq!(standardize_modality("Online with Synchronous Mtgs."), "OnlineSync");
    assert_eq!(standardize_modality("Online: Asynchronous"), "OnlineAsync");
    assert_eq!(standardize_modality(""), "F2F");
    assert_eq!(standardize_modality("Something New"), "Something New");
}

#[test]
fn test_department_and_course_id() {
    assert_eq!(department("CS-3114"), Some("CS"));
    assert_eq!(course_id("CS-3114"), "CS 3114");
    assert_eq!(department("ECE-2500-LAB"), Some("ECE"));
    assert_eq!(course_id("ECE-2500-LAB"), "ECE 2500 LAB");
    assert_eq!(department("CS3114"), None);
}

#[test]
fn test_projection() {
    let record = normalize(&raw("CS-3114", "3", "T R")).unwrap().unwrap();

    assert_eq!(record.crn, "83534");
    assert_eq!(record.dept, "CS");
    assert_eq!(record.course_id, "CS 3114");
    assert_eq!(record.instructor, "Shaffer");
    assert_eq!(record.title, "Data Structures and Algorithms");
    assert_eq!(record.modality, "F2F");
    assert_eq!(record.capacity, "120");
    assert_eq!(record.days, "T R");
    assert_eq!(record.start_time, "9:30AM");
    assert_eq!(record.end_time, "10:45AM");
    assert_eq!(record.location, "MCB 100");
}

#[test]
fn test_arranged_sections_get_arranged_times() {
    let mut input = raw("CS-4994", "3", "(ARR)");
    input.start_time = "9:00AM".to_string();
    input.end_time = "9:50AM".to_string();

    let record = normalize(&input).unwrap().unwrap();
    assert_eq!(record.days, "(ARR)");
    assert_eq!(record.start_time, "(ARR)");
    assert_eq!(record.end_time, "(ARR)");
}

#[test]
fn test_normalization_is_deterministic() {
    let input = raw("CS-3114", "3", "(ARR)");
    assert_eq!(normalize(&input), normalize(&input));
}

#[test]
fn test_malformed_course_is_an_error() {
    assert_eq!(
        normalize(&raw("", "3", "M")),
        Err(MalformedRecordError::MissingField("course"))
    );
    assert_eq!(
        normalize(&raw("CS3114", "3", "M")),
        Err(MalformedRecordError::CourseWithoutSeparator("CS3114".to_string()))
    );
    // Filtered rows are not inspected further.
    assert_eq!(normalize(&raw("CS3114", "0", "M")), Ok(None));
}

#[test]
fn test_clean_keeps_order_and_counts() {
    let rows = vec![
        Ok(raw("CS-1114", "3", "M W F")),
        Ok(raw("CS-1115", "0", "M W F")),
        Err(MalformedRecordError::Arity {
            expected: 13,
            found: 2,
        }),
        Ok(raw("CS1116", "3", "M W F")),
        Ok(raw("CS-1117", "N/A", "M W F")),
        Ok(raw("CS-1118", "4", "(ARR)")),
    ];

    let cleaned = clean(rows);
    let ids: Vec<&str> = cleaned.records.iter().map(|r| r.course_id.as_str()).collect();
    assert_eq!(ids, ["CS 1114", "CS 1118"]);

    let report = &cleaned.report;
    assert_eq!(report.rows_read, 6);
    assert_eq!(report.kept, 2);
    assert_eq!(report.skipped_zero_credits, 1);
    assert_eq!(report.skipped_unparseable_credits, 1);
    assert_eq!(report.skipped(), 2);
    assert_eq!(report.malformed.len(), 2);
    assert_eq!(report.malformed[0].row, 3);
    assert_eq!(report.malformed[1].row, 4);
    assert_eq!(
        report.malformed[1].error,
        MalformedRecordError::CourseWithoutSeparator("CS1116".to_string())
    );
}
