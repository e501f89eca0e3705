use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One graded course component with a maximum and obtained mark.
///
/// Field names follow the JSON wire format shared with the remote service
/// (`maxMarks`, `marksObtained`). Callers clamp `marks_obtained >= 0` and
/// `max_marks >= 1` at the point of entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub max_marks: f64,
    pub marks_obtained: f64,
}

impl Subject {
    /// Blank-subject factory: fresh id, empty name, 100 max marks, 0 obtained.
    pub fn blank() -> Self {
        Subject {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            max_marks: 100.0,
            marks_obtained: 0.0,
        }
    }

    /// A subject counts toward a generated result only when it has been
    /// named and has a positive maximum.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.max_marks > 0.0
    }
}

/// Student details entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub name: String,
    pub roll_number: String,
    pub registration_number: String,
    pub university_name: String,
    pub course_name: String,
    /// Semester 1 through 8.
    pub semester: u8,
    pub academic_year: String,
}

/// An immutable snapshot of one student's full mark sheet at generation time.
///
/// Subsequent edits to the form do not change a snapshot that has already
/// been generated; a new one must be produced. The subject order is the
/// display order on the marksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultData {
    pub id: String,
    pub student: StudentInfo,
    pub subjects: Vec<Subject>,
    pub created_at: String,
}

impl ResultData {
    /// Take a snapshot of the current form: fresh id, current timestamp,
    /// and only the valid subjects (blank rows are dropped).
    pub fn generate(student: StudentInfo, subjects: &[Subject]) -> Self {
        ResultData {
            id: Uuid::new_v4().to_string(),
            student,
            subjects: subjects.iter().filter(|s| s.is_valid()).cloned().collect(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Overall classification of a result.
///
/// Always derived from the subjects, never stored inside a [`ResultData`],
/// so an edited subject list can never carry a stale status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Distinction,
    #[serde(rename = "First Class")]
    FirstClass,
    #[serde(rename = "Second Class")]
    SecondClass,
    Pass,
    Fail,
}

impl ResultStatus {
    /// Human-readable label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            ResultStatus::Distinction => "Distinction",
            ResultStatus::FirstClass => "First Class",
            ResultStatus::SecondClass => "Second Class",
            ResultStatus::Pass => "Pass",
            ResultStatus::Fail => "Fail",
        }
    }

    /// Display text color class for this status.
    pub fn color_class(&self) -> &'static str {
        match self {
            ResultStatus::Distinction => "text-amber-500",
            ResultStatus::FirstClass => "text-emerald-500",
            ResultStatus::SecondClass => "text-blue-500",
            ResultStatus::Pass => "text-green-600",
            ResultStatus::Fail => "text-red-500",
        }
    }

    /// Display background/border class for this status.
    pub fn bg_class(&self) -> &'static str {
        match self {
            ResultStatus::Distinction => "bg-amber-50 border-amber-200",
            ResultStatus::FirstClass => "bg-emerald-50 border-emerald-200",
            ResultStatus::SecondClass => "bg-blue-50 border-blue-200",
            ResultStatus::Pass => "bg-green-50 border-green-200",
            ResultStatus::Fail => "bg-red-50 border-red-200",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
