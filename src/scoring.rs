use crate::model::{ResultStatus, StudentInfo, Subject};

// Grading policy constants. The values are load-bearing for classification;
// do not change them without confirming the institutional policy.
/// Minimum fraction of a subject's maximum needed to pass that subject.
pub const SUBJECT_PASS_FRACTION: f64 = 0.4;
/// Lowest aggregate percentage classified as Distinction.
pub const DISTINCTION_MIN: f64 = 75.0;
/// Lowest aggregate percentage classified as First Class.
pub const FIRST_CLASS_MIN: f64 = 60.0;
/// Lowest aggregate percentage classified as Second Class.
pub const SECOND_CLASS_MIN: f64 = 50.0;

/// Number of blank subject rows on a fresh entry form.
pub const DEFAULT_SUBJECT_COUNT: usize = 5;

/// Aggregate percentage across all subjects.
///
/// Returns exactly `0.0` when the summed maximum is zero (no subjects, or
/// all maximums zero) rather than dividing by zero. No rounding is applied;
/// formatting is a presentation concern.
pub fn compute_percentage(subjects: &[Subject]) -> f64 {
    let total_max: f64 = subjects.iter().map(|s| s.max_marks).sum();
    let total_obtained: f64 = subjects.iter().map(|s| s.marks_obtained).sum();
    if total_max == 0.0 {
        return 0.0;
    }
    (total_obtained / total_max) * 100.0
}

/// Whether a single subject meets the pass cutoff.
///
/// Must stay numerically identical to the fail override in
/// [`classify_result`]: same cutoff expression, `>=` here against `<` there.
pub fn is_subject_pass(subject: &Subject) -> bool {
    subject.marks_obtained >= subject.max_marks * SUBJECT_PASS_FRACTION
}

/// Classify an aggregate percentage into a [`ResultStatus`].
///
/// Any single subject under the pass cutoff forces `Fail` regardless of the
/// aggregate. Otherwise the bands apply with inclusive lower bounds:
/// 75 Distinction, 60 First Class, 50 Second Class, below that Pass.
pub fn classify_result(percentage: f64, subjects: &[Subject]) -> ResultStatus {
    let has_failed = subjects
        .iter()
        .any(|s| s.marks_obtained < s.max_marks * SUBJECT_PASS_FRACTION);
    if has_failed {
        return ResultStatus::Fail;
    }
    if percentage >= DISTINCTION_MIN {
        ResultStatus::Distinction
    } else if percentage >= FIRST_CLASS_MIN {
        ResultStatus::FirstClass
    } else if percentage >= SECOND_CLASS_MIN {
        ResultStatus::SecondClass
    } else {
        ResultStatus::Pass
    }
}

/// The initial subject list for a fresh entry form.
pub fn default_subjects() -> Vec<Subject> {
    (0..DEFAULT_SUBJECT_COUNT).map(|_| Subject::blank()).collect()
}

/// The subjects that would make it into a generated snapshot.
pub fn valid_subjects(subjects: &[Subject]) -> Vec<Subject> {
    subjects.iter().filter(|s| s.is_valid()).cloned().collect()
}

/// Form-validity check run before a result can be generated.
///
/// Requires the student's name, university, course and academic year to be
/// non-blank, at least one valid subject, and no named subject with obtained
/// marks above its maximum.
pub fn is_form_valid(student: &StudentInfo, subjects: &[Subject]) -> bool {
    !student.name.trim().is_empty()
        && !student.university_name.trim().is_empty()
        && !student.course_name.trim().is_empty()
        && !student.academic_year.trim().is_empty()
        && subjects.iter().any(|s| s.is_valid())
        && subjects
            .iter()
            .all(|s| s.name.trim().is_empty() || s.marks_obtained <= s.max_marks)
}
