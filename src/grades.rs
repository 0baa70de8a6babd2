use std::fmt;

use crate::models::Course;

/// Display tier of a single numeric grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeTier {
    Empty,
    Poor,
    Average,
    Good,
}

/// Tier the list view uses for a student's course-count badge. It is the tier
/// of a fixed grade of 100, not derived from any real grade.
pub const COURSE_COUNT_TIER: GradeTier = GradeTier::Good;

impl GradeTier {
    pub fn for_grade(grade: f64) -> Self {
        if grade == 0.0 {
            GradeTier::Empty
        } else if grade >= 80.0 {
            GradeTier::Good
        } else if grade >= 60.0 {
            GradeTier::Average
        } else {
            GradeTier::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeTier::Empty => "empty",
            GradeTier::Poor => "poor",
            GradeTier::Average => "average",
            GradeTier::Good => "good",
        }
    }
}

impl fmt::Display for GradeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean of the three grades, or `None` when any of them is zero
/// (the course then shows as "No grades").
pub fn course_average(course: &Course) -> Option<f64> {
    let grades = [course.first_grade, course.second_grade, course.final_grade];
    if grades.iter().any(|g| *g == 0.0) {
        return None;
    }
    Some(grades.iter().sum::<f64>() / 3.0)
}

/// Parses a grade typed into a form field.
///
/// Takes the longest leading decimal number of the trimmed input, so `"85.5pts"`
/// reads as 85.5. Anything without a leading number becomes 0.
pub fn parse_grade(input: &str) -> f64 {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
