#![cfg(not(tarpaulin_include))]

use std::env;
use std::io::{self, Write};

use uniresult::model::{ResultData, StudentInfo, Subject};
use uniresult::report::{history_to_csv, render_marksheet};
use uniresult::scoring;
use uniresult::store::{DEFAULT_HISTORY_FILE, ResultStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let history = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string());

    let mut store = ResultStore::open(&history);
    let mut current: Option<ResultData> = None;
    let mut status = String::from("ok");

    println!("UniResult - result sheet generator");
    println!("Commands: new, show, save, list, view <n>, delete <n>, csv, q");

    loop {
        print!("({}) > ", status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command).is_err() {
            break;
        }
        let command = command.trim();
        status = String::from("ok");

        if command == "q" {
            break;
        } else if command == "new" {
            match enter_result()? {
                Some(result) => {
                    println!("{}", render_marksheet(&result));
                    current = Some(result);
                }
                None => status = String::from("invalid form"),
            }
        } else if command == "show" {
            match &current {
                Some(result) => println!("{}", render_marksheet(result)),
                None => status = String::from("no result, run 'new' first"),
            }
        } else if command == "save" {
            match &current {
                Some(result) => {
                    store.save(result)?;
                    println!("Saved to history.");
                }
                None => status = String::from("no result, run 'new' first"),
            }
        } else if command == "list" {
            let results = store.list_saved();
            if results.is_empty() {
                println!("No saved results.");
            }
            for (i, r) in results.iter().enumerate() {
                let pct = scoring::compute_percentage(&r.subjects);
                let overall = scoring::classify_result(pct, &r.subjects);
                println!(
                    "{:>3}. {} - {} Sem {} - {:.1}% {} ({})",
                    i + 1,
                    r.student.name,
                    r.student.course_name,
                    r.student.semester,
                    pct,
                    overall,
                    r.created_at
                );
            }
        } else if let Some(n) = command.strip_prefix("view ") {
            match nth_result(&store, n) {
                Some(result) => println!("{}", render_marksheet(&result)),
                None => status = String::from("no such entry"),
            }
        } else if let Some(n) = command.strip_prefix("delete ") {
            match nth_result(&store, n) {
                Some(result) => {
                    store.delete(&result.id)?;
                    println!("Deleted {}.", result.student.name);
                }
                None => status = String::from("no such entry"),
            }
        } else if command == "csv" {
            print!("{}", history_to_csv(&store.list_saved()));
        } else if !command.is_empty() {
            status = String::from("unknown command");
        }
    }

    Ok(())
}

fn nth_result(store: &ResultStore, n: &str) -> Option<ResultData> {
    let index: usize = n.trim().parse().ok()?;
    store.list_saved().into_iter().nth(index.checked_sub(1)?)
}

/// Walk through the entry form on the terminal and take a snapshot.
fn enter_result() -> io::Result<Option<ResultData>> {
    let student = StudentInfo {
        name: prompt("Student name")?,
        roll_number: prompt("Roll number")?,
        registration_number: prompt("Registration number")?,
        university_name: prompt("University / college")?,
        course_name: prompt("Course name")?,
        semester: prompt("Semester (1-8)")?.trim().parse().unwrap_or(1).clamp(1, 8),
        academic_year: prompt("Academic year")?,
    };

    let mut subjects: Vec<Subject> = Vec::new();
    println!("Enter subjects; leave the name empty to finish.");
    loop {
        let name = prompt("Subject name")?;
        if name.trim().is_empty() {
            break;
        }
        let max_marks = parse_max_marks(&prompt("  Max marks")?);
        let marks_obtained = parse_marks_obtained(&prompt("  Marks obtained")?, max_marks);

        let mut subject = Subject::blank();
        subject.name = name;
        subject.max_marks = max_marks;
        subject.marks_obtained = marks_obtained;
        subjects.push(subject);
    }

    if !scoring::is_form_valid(&student, &subjects) {
        return Ok(None);
    }
    Ok(Some(ResultData::generate(student, &subjects)))
}

// Entered maximums default to 100 and stay at least 1.
fn parse_max_marks(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(100.0).max(1.0)
}

// Clamp obtained marks into [0, max] at the point of entry.
fn parse_marks_obtained(input: &str, max_marks: f64) -> f64 {
    input.trim().parse::<f64>().unwrap_or(0.0).clamp(0.0, max_marks)
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_marks_entry_defaults_and_stays_positive() {
        assert_eq!(parse_max_marks("50"), 50.0);
        assert_eq!(parse_max_marks(" 75.5 "), 75.5);
        assert_eq!(parse_max_marks("not a number"), 100.0);
        assert_eq!(parse_max_marks(""), 100.0);
        assert_eq!(parse_max_marks("0"), 1.0);
    }

    #[test]
    fn obtained_marks_entry_clamps_into_range() {
        assert_eq!(parse_marks_obtained("42.5", 100.0), 42.5);
        assert_eq!(parse_marks_obtained("120", 100.0), 100.0);
        assert_eq!(parse_marks_obtained("-3", 100.0), 0.0);
        assert_eq!(parse_marks_obtained("garbage", 100.0), 0.0);
    }
}
