// tests/common/mod.rs
#![allow(dead_code)]

/// The timetable form as the host renders it before and after a search.
pub const FORM: &str = r#"
<form method="post" action="HZSKVTSC.P_ProcRequest">
  <select name="TERMYEAR">
    <option value="202401">Spring 2024</option>
    <option value="202409">Fall 2024</option>
  </select>
  <select name="subj_code">
    <option value="%">All Subjects</option>
    <option value="CS">CS - Computer Science</option>
    <option value="MATH">MATH - Mathematics</option>
  </select>
  <input type="submit" name="BTN_PRESSED" value="FIND class sections">
</form>
"#;

pub fn form_page() -> String {
    format!("<html><body>{}</body></html>", FORM)
}

/// A 13-cell row for `crn` in `course`.
pub fn row(crn: &str, course: &str) -> Vec<String> {
    [
        crn,
        course,
        "Intro to Things",
        "L",
        "Face-to-Face Instruction",
        "3",
        "40",
        "Staff",
        "M W F",
        "9:05AM",
        "9:55AM",
        "MCB 100",
        "13T",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// A results page: the form again, then the data table with a header row
/// and the given body rows.
pub fn results_page(rows: &[Vec<String>]) -> String {
    let mut table = String::from(
        r#"<table class="dataentrytable"><tr class="header"><td>CRN</td><td>Course</td></tr>"#,
    );
    for cells in rows {
        table.push_str("<tr>");
        for cell in cells {
            table.push_str(&format!("<td>{}</td>", cell));
        }
        table.push_str("</tr>");
    }
    table.push_str("</table>");
    format!("<html><body>{}{}</body></html>", FORM, table)
}
