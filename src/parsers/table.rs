use crate::error::{MalformedRecordError, NavigationError};
use crate::models::RawCourseRecord;
use crate::parsers::css;
use scraper::{ElementRef, Html};
use tracing::warn;

/// Rows pulled out of one results page.
#[derive(Debug, Default, Clone)]
pub struct ExtractedRows {
    pub records: Vec<RawCourseRecord>,
    pub rejected: Vec<MalformedRecordError>,
}

/// Parses the results table of a rendered timetable page.
///
/// The table is the first `<table>` carrying `table_class`; a page without one
/// has no results. Header and spacer rows carry attributes on their `<tr>` and
/// are skipped, as are rows without any `<td>`. Rows whose cell count does not
/// match the raw schema end up in `rejected`.
pub fn extract_rows(html: &str, table_class: &str) -> Result<ExtractedRows, NavigationError> {
    let document = Html::parse_document(html);
    let table_selector = css(&format!("table.{}", table_class))?;
    let row_selector = css("tr")?;
    let cell_selector = css("td")?;

    let mut extracted = ExtractedRows::default();
    let Some(table) = document.select(&table_selector).next() else {
        return Ok(extracted);
    };

    for row in table.select(&row_selector) {
        if row.value().attrs().next().is_some() {
            continue;
        }

        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }

        let first_cell = cells[0].clone();
        match RawCourseRecord::from_cells(cells) {
            Ok(record) => extracted.records.push(record),
            Err(error) => {
                warn!(%error, first_cell = %first_cell, "rejecting timetable row");
                extracted.rejected.push(error);
            }
        }
    }

    Ok(extracted)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .trim()
        .replace("\r\n", " ")
        .replace('\n', " ")
}
