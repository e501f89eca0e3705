use crate::model::ResultData;
use crate::scoring::{classify_result, compute_percentage, is_subject_pass};

const SHEET_WIDTH: usize = 62;

/// Render a result as a plain-text statement of marks.
///
/// This is the textual counterpart of the printed marksheet: university
/// header, student block, one row per subject with its pass/fail verdict,
/// totals, percentage (rounded to one decimal here, at the presentation
/// edge) and the overall status.
pub fn render_marksheet(result: &ResultData) -> String {
    let student = &result.student;
    let percentage = compute_percentage(&result.subjects);
    let status = classify_result(percentage, &result.subjects);
    let total_max: f64 = result.subjects.iter().map(|s| s.max_marks).sum();
    let total_obtained: f64 = result.subjects.iter().map(|s| s.marks_obtained).sum();

    let mut sheet = String::new();
    let rule = "=".repeat(SHEET_WIDTH);
    let thin_rule = "-".repeat(SHEET_WIDTH);

    sheet.push_str(&rule);
    sheet.push('\n');
    sheet.push_str(&center(&student.university_name.to_uppercase()));
    sheet.push_str(&center(&format!("Statement of Marks - {}", student.course_name)));
    sheet.push_str(&center(&format!(
        "Semester {} | Academic Year {}",
        student.semester, student.academic_year
    )));
    sheet.push_str(&rule);
    sheet.push('\n');

    sheet.push_str(&format!("Name: {}\n", student.name));
    if !student.roll_number.trim().is_empty() {
        sheet.push_str(&format!("Roll Number: {}\n", student.roll_number));
    }
    if !student.registration_number.trim().is_empty() {
        sheet.push_str(&format!("Registration Number: {}\n", student.registration_number));
    }
    sheet.push_str(&format!("Generated: {}\n", result.created_at));
    sheet.push_str(&thin_rule);
    sheet.push('\n');

    sheet.push_str(&format!(
        "{:<32} {:>8} {:>10} {:>8}\n",
        "Subject", "Max", "Obtained", "Result"
    ));
    sheet.push_str(&thin_rule);
    sheet.push('\n');
    for subject in &result.subjects {
        let verdict = if is_subject_pass(subject) { "Pass" } else { "Fail" };
        sheet.push_str(&format!(
            "{:<32} {:>8} {:>10} {:>8}\n",
            subject.name, subject.max_marks, subject.marks_obtained, verdict
        ));
    }
    sheet.push_str(&thin_rule);
    sheet.push('\n');

    sheet.push_str(&format!(
        "{:<32} {:>8} {:>10}\n",
        "Total", total_max, total_obtained
    ));
    sheet.push_str(&format!("Percentage: {:.1}%\n", percentage));
    sheet.push_str(&format!("Result: {}\n", status));
    sheet.push_str(&rule);
    sheet.push('\n');
    sheet
}

/// Convert the saved history to CSV, one row per result with its
/// recomputed percentage and status.
pub fn history_to_csv(results: &[ResultData]) -> String {
    let mut csv_content = String::new();
    csv_content.push_str("Student,Course,Semester,Created,Percentage,Status\n");

    for result in results {
        let percentage = compute_percentage(&result.subjects);
        let status = classify_result(percentage, &result.subjects);
        let fields = [
            result.student.name.clone(),
            result.student.course_name.clone(),
            result.student.semester.to_string(),
            result.created_at.clone(),
            format!("{:.1}", percentage),
            status.to_string(),
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
        csv_content.push_str(&row.join(","));
        csv_content.push('\n');
    }

    csv_content
}

fn center(text: &str) -> String {
    // Pad by character count, not byte length, so non-ASCII names center.
    let width = text.chars().count();
    if width >= SHEET_WIDTH {
        return format!("{}\n", text);
    }
    let pad = (SHEET_WIDTH - width) / 2;
    format!("{}{}\n", " ".repeat(pad), text)
}

// Escape commas, quotes and newlines the CSV way.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let escaped = value.replace("\"", "\"\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StudentInfo, Subject};

    fn named_subject(name: &str, max: f64, obtained: f64) -> Subject {
        let mut s = Subject::blank();
        s.name = name.to_string();
        s.max_marks = max;
        s.marks_obtained = obtained;
        s
    }

    fn sample_result() -> ResultData {
        ResultData::generate(
            StudentInfo {
                name: "John Doe".to_string(),
                roll_number: "2024001".to_string(),
                registration_number: String::new(),
                university_name: "State University".to_string(),
                course_name: "B.Tech CSE".to_string(),
                semester: 3,
                academic_year: "2024-25".to_string(),
            },
            &[
                named_subject("Mathematics", 100.0, 50.0),
                named_subject("Physics", 100.0, 100.0),
            ],
        )
    }

    #[test]
    fn marksheet_carries_the_derived_values() {
        let sheet = render_marksheet(&sample_result());
        assert!(sheet.contains("STATE UNIVERSITY"));
        assert!(sheet.contains("Statement of Marks - B.Tech CSE"));
        assert!(sheet.contains("John Doe"));
        assert!(sheet.contains("Mathematics"));
        assert!(sheet.contains("Percentage: 75.0%"));
        assert!(sheet.contains("Result: Distinction"));
    }

    #[test]
    fn marksheet_marks_failed_subjects() {
        let mut result = sample_result();
        result.subjects.push(named_subject("Chemistry", 100.0, 10.0));
        let sheet = render_marksheet(&result);
        assert!(sheet.contains("Result: Fail"));
        let chemistry_row = sheet
            .lines()
            .find(|l| l.starts_with("Chemistry"))
            .unwrap();
        assert!(chemistry_row.ends_with("Fail"));
    }

    #[test]
    fn marksheet_centers_non_ascii_headers() {
        let mut result = sample_result();
        result.student.university_name = "Université d'État".to_string();
        let sheet = render_marksheet(&result);

        let line = sheet
            .lines()
            .find(|l| l.contains("UNIVERSITÉ"))
            .unwrap();
        let header = "UNIVERSITÉ D'ÉTAT";
        let expected_pad = (SHEET_WIDTH - header.chars().count()) / 2;
        let leading = line.chars().take_while(|c| *c == ' ').count();
        assert_eq!(leading, expected_pad);
        assert_eq!(line.trim_start(), header);
    }

    #[test]
    fn marksheet_skips_blank_optional_fields() {
        let sheet = render_marksheet(&sample_result());
        assert!(sheet.contains("Roll Number: 2024001"));
        assert!(!sheet.contains("Registration Number:"));
    }

    #[test]
    fn csv_has_one_row_per_result_and_escapes_commas() {
        let mut result = sample_result();
        result.student.course_name = "B.Tech, CSE".to_string();
        let csv = history_to_csv(&[result]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Student,Course,Semester,Created,Percentage,Status"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"B.Tech, CSE\""));
        assert!(row.contains("75.0"));
        assert!(row.contains("Distinction"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_of_empty_history_is_just_the_header() {
        let csv = history_to_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
    }
}
