//! Display formatting for grades and semesters.

/// Semester codes and their display labels.
const SEMESTER_LABELS: [(&str, &str); 3] = [("fall", "Güz"), ("spring", "Bahar"), ("summer", "Yaz")];

/// Combine a letter grade and a numeric score into one display string.
///
/// ```
/// use kampus_core::display::format_grade;
///
/// assert_eq!(format_grade(Some("AA"), Some(92.5)), "AA (92.50)");
/// assert_eq!(format_grade(Some("BB"), None), "BB");
/// assert_eq!(format_grade(None, None), "-");
/// ```
pub fn format_grade(grade: Option<&str>, score: Option<f64>) -> String {
    match (grade, score) {
        (Some(grade), Some(score)) => format!("{} ({:.2})", grade, score),
        (Some(grade), None) => grade.to_string(),
        (None, Some(score)) => format!("{:.2}", score),
        (None, None) => "-".to_string(),
    }
}

/// Label for a semester code; unknown codes are returned unchanged.
pub fn semester_label(code: &str) -> &str {
    SEMESTER_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}
