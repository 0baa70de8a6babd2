//! Plain-text rendering of the console's two screens and its open dialogs.

use std::fmt;

use crate::console::{
    ConsoleState, CourseField, CourseForm, Dialog, FormMode, StudentField, StudentForm, View,
};
use crate::grades::{COURSE_COUNT_TIER, GradeTier, course_average};
use crate::models::Course;

/// The current screen plus whichever dialogs are open on top of it.
pub struct Screen<'a>(pub &'a ConsoleState);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        match state.view {
            View::Students => write_students(state, f)?,
            View::StudentDetail => write_detail(state, f)?,
        }
        if let Some(dialog) = &state.student_dialog {
            write_student_dialog(dialog, f)?;
        }
        if state.view == View::StudentDetail {
            if let Some(dialog) = &state.course_dialog {
                write_course_dialog(dialog, f)?;
            }
        }
        Ok(())
    }
}

pub fn render(state: &ConsoleState) -> String {
    Screen(state).to_string()
}

fn badge(tier: GradeTier, text: &str) -> String {
    format!("[{} {}]", tier, text)
}

fn grade_badge(grade: f64) -> String {
    let text = if grade == 0.0 {
        "Not graded".to_string()
    } else {
        grade.to_string()
    };
    badge(GradeTier::for_grade(grade), &text)
}

fn average_badge(course: &Course) -> String {
    match course_average(course) {
        Some(avg) => badge(GradeTier::for_grade(avg), &format!("{}%", avg)),
        None => badge(GradeTier::Empty, "No grades"),
    }
}

fn write_students(state: &ConsoleState, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Student Management System")?;
    writeln!(f, "Manage students and their academic courses")?;
    writeln!(f)?;
    if !state.search_query.is_empty() {
        writeln!(f, "Search: {}", state.search_query)?;
    }
    writeln!(f, "All Students ({})", state.students.len())?;

    for row in state.student_rows() {
        let student = row.student;
        let username = student.username.as_deref().unwrap_or("");
        writeln!(
            f,
            "  {:>4}  {} (@{})  {}  {}  {}",
            student.id,
            student.full_name(),
            username,
            student.email,
            student.phone,
            badge(COURSE_COUNT_TIER, &format!("{} courses", row.course_count)),
        )?;
    }
    Ok(())
}

fn write_detail(state: &ConsoleState, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "<- Back to Students")?;
    let Some(student) = &state.selected_student else {
        return writeln!(f, "Student not available.");
    };

    let courses = state.detail_courses();
    let username = student.username.as_deref().unwrap_or("");
    writeln!(f, "{}", student.full_name())?;
    writeln!(f, "@{} • {}", username, student.email)?;
    writeln!(f)?;
    writeln!(f, "Student Information")?;
    writeln!(f, "  Phone: {}", student.phone)?;
    writeln!(f, "  Country: {}", student.country)?;
    writeln!(f, "  City: {}", student.city)?;
    writeln!(f, "  Total Courses: {}", courses.len())?;
    writeln!(f)?;
    writeln!(f, "Enrolled Courses ({})", courses.len())?;

    if courses.is_empty() {
        writeln!(f, "  No courses enrolled yet")?;
        return writeln!(f, "  Use \"enroll\" to add the first course");
    }

    for course in courses {
        writeln!(
            f,
            "  {:>4}  {}  first {}  second {}  final {}  total {}",
            course.id,
            course.name,
            grade_badge(course.first_grade),
            grade_badge(course.second_grade),
            grade_badge(course.final_grade),
            average_badge(course),
        )?;
    }
    Ok(())
}

fn write_student_dialog(dialog: &Dialog<StudentForm>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (title, hint) = match dialog.mode {
        FormMode::Create => (
            "Add New Student",
            "Fill in the student details to create a new profile",
        ),
        FormMode::Edit(_) => ("Edit Student", "Update student information below"),
    };
    writeln!(f)?;
    writeln!(f, "== {} ==", title)?;
    writeln!(f, "{}", hint)?;
    for field in StudentField::ALL {
        writeln!(f, "  {}: {}", field, dialog.form.field(field))?;
    }
    Ok(())
}

fn write_course_dialog(dialog: &Dialog<CourseForm>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (title, hint) = match dialog.mode {
        FormMode::Create => ("Enroll New Course", "Add a new course for this student"),
        FormMode::Edit(_) => (
            "Edit Course & Grades",
            "Update course information and grades",
        ),
    };
    writeln!(f)?;
    writeln!(f, "== {} ==", title)?;
    writeln!(f, "{}", hint)?;
    for field in CourseField::ALL {
        writeln!(f, "  {}: {}", field, dialog.form.field(field))?;
    }
    Ok(())
}
