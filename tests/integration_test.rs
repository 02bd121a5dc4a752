// tests/integration_test.rs

use dotenvy::from_path;
use std::env;
use std::path::PathBuf;
use timetable_harvest::{DelayConfig, Result, TimetableClient, clean};

/// Harvests one subject from the live timetable and cleans it.
///
/// Skipped unless a term is configured:
/// TIMETABLE_TERM="202409" cargo test --test integration_test -- --nocapture
#[tokio::test]
async fn test_live_harvest_of_one_subject() -> Result<()> {
    let env_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env");
    from_path(&env_path).ok();

    let Ok(term) = env::var("TIMETABLE_TERM") else {
        println!("⚠️ TIMETABLE_TERM not set; skipping live harvest");
        return Ok(());
    };
    let subject = env::var("TIMETABLE_SUBJECT").unwrap_or_else(|_| "CS".to_string());

    let client = TimetableClient::new()?.with_delay(DelayConfig::disabled());
    let dataset = client.fetch_all(&term, [subject.as_str()]).await?;
    println!(
        "Fetched {} rows ({} rejected) for {} in {}",
        dataset.records.len(),
        dataset.rejected.len(),
        subject,
        term
    );

    for record in &dataset.records {
        assert!(
            record.course.starts_with(&format!("{}-", subject)),
            "unexpected course {}",
            record.course
        );
    }

    let cleaned = clean(dataset.records.into_iter().map(Ok));
    println!("✅ {} rows survived cleaning", cleaned.records.len());
    Ok(())
}
