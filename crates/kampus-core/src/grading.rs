//! Letter grade scale and GPA aggregation.
//!
//! The grading scale is the eight-step letter scale used across the school:
//!
//! | Grade | Points |
//! |-------|--------|
//! | AA | 4.0 |
//! | BA | 3.5 |
//! | BB | 3.0 |
//! | CB | 2.5 |
//! | CC | 2.0 |
//! | DC | 1.5 |
//! | DD | 1.0 |
//! | FF | 0.0 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LetterGrade {
    AA,
    BA,
    BB,
    CB,
    CC,
    DC,
    DD,
    FF,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 8] = [
        LetterGrade::AA,
        LetterGrade::BA,
        LetterGrade::BB,
        LetterGrade::CB,
        LetterGrade::CC,
        LetterGrade::DC,
        LetterGrade::DD,
        LetterGrade::FF,
    ];

    pub fn points(self) -> f64 {
        match self {
            LetterGrade::AA => 4.0,
            LetterGrade::BA => 3.5,
            LetterGrade::BB => 3.0,
            LetterGrade::CB => 2.5,
            LetterGrade::CC => 2.0,
            LetterGrade::DC => 1.5,
            LetterGrade::DD => 1.0,
            LetterGrade::FF => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LetterGrade::AA => "AA",
            LetterGrade::BA => "BA",
            LetterGrade::BB => "BB",
            LetterGrade::CB => "CB",
            LetterGrade::CC => "CC",
            LetterGrade::DC => "DC",
            LetterGrade::DD => "DD",
            LetterGrade::FF => "FF",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LetterGrade::ALL
            .into_iter()
            .find(|grade| grade.as_str() == s)
            .ok_or_else(|| format!("Unrecognized letter grade: {}", s))
    }
}

/// A record that can take part in a GPA calculation.
///
/// Enrollment read models implement this so the aggregation does not depend
/// on how the record was loaded.
pub trait GradeRecord {
    /// Raw stored grade, if any. Values outside the letter scale are ignored.
    fn grade(&self) -> Option<&str>;
    fn is_completed(&self) -> bool;
    fn credits(&self) -> f64;
}

/// Credit-weighted grade point average over completed, letter-graded records.
///
/// Returns `0.0` when no record qualifies.
pub fn calculate_gpa<'a, I, R>(records: I) -> f64
where
    I: IntoIterator<Item = &'a R>,
    R: GradeRecord + 'a,
{
    let mut weighted_points = 0.0;
    let mut total_credits = 0.0;

    for record in records {
        if !record.is_completed() {
            continue;
        }
        let Some(grade) = record.grade().and_then(|g| g.parse::<LetterGrade>().ok()) else {
            continue;
        };
        let credits = record.credits();
        weighted_points += grade.points() * credits;
        total_credits += credits;
    }

    if total_credits > 0.0 {
        weighted_points / total_credits
    } else {
        0.0
    }
}

/// Sum of credits that count toward the GPA.
pub fn completed_credits<'a, I, R>(records: I) -> f64
where
    I: IntoIterator<Item = &'a R>,
    R: GradeRecord + 'a,
{
    records
        .into_iter()
        .filter(|r| r.is_completed() && r.grade().is_some_and(|g| g.parse::<LetterGrade>().is_ok()))
        .map(GradeRecord::credits)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        grade: Option<&'static str>,
        completed: bool,
        credits: f64,
    }

    impl GradeRecord for Row {
        fn grade(&self) -> Option<&str> {
            self.grade
        }

        fn is_completed(&self) -> bool {
            self.completed
        }

        fn credits(&self) -> f64 {
            self.credits
        }
    }

    fn row(grade: Option<&'static str>, completed: bool, credits: f64) -> Row {
        Row {
            grade,
            completed,
            credits,
        }
    }

    #[test]
    fn test_points_scale_steps_by_half() {
        let points: Vec<f64> = LetterGrade::ALL.iter().map(|g| g.points()).collect();
        assert_eq!(points, vec![4.0, 3.5, 3.0, 2.5, 2.0, 1.5, 1.0, 0.0]);
    }

    #[test]
    fn test_parse_letter_grade() {
        assert_eq!("CB".parse::<LetterGrade>(), Ok(LetterGrade::CB));
        assert!("A+".parse::<LetterGrade>().is_err());
        assert!("aa".parse::<LetterGrade>().is_err());
    }

    #[test]
    fn test_empty_gpa_is_zero() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(calculate_gpa(&rows), 0.0);
    }

    #[test]
    fn test_only_unqualified_records_is_zero() {
        let rows = vec![
            row(Some("AA"), false, 4.0),
            row(Some("XX"), true, 3.0),
            row(None, true, 2.0),
        ];
        assert_eq!(calculate_gpa(&rows), 0.0);
        assert_eq!(completed_credits(&rows), 0.0);
    }

    #[test]
    fn test_single_aa() {
        let rows = vec![row(Some("AA"), true, 4.0)];
        assert_eq!(calculate_gpa(&rows), 4.0);
    }

    #[test]
    fn test_weighted_mix() {
        let rows = vec![
            row(Some("AA"), true, 4.0),
            row(Some("CC"), true, 2.0),
            row(Some("FF"), false, 5.0),
        ];
        let gpa = calculate_gpa(&rows);
        assert!((gpa - 20.0 / 6.0).abs() < 1e-9);
        assert_eq!(completed_credits(&rows), 6.0);
    }

    #[test]
    fn test_ff_counts_toward_credits() {
        let rows = vec![row(Some("AA"), true, 3.0), row(Some("FF"), true, 3.0)];
        assert_eq!(calculate_gpa(&rows), 2.0);
    }
}
