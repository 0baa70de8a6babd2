use std::fmt;
use std::str::FromStr;

use crate::grades::parse_grade;
use crate::models::{Course, CourseRequest, Student, StudentRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Students,
    StudentDetail,
}

/// Whether an open dialog creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog<F> {
    pub mode: FormMode,
    pub form: F,
}

impl<F: Default> Dialog<F> {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            form: F::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    FirstName,
    LastName,
    Email,
    Phone,
    Country,
    City,
}

impl StudentField {
    pub const ALL: [StudentField; 6] = [
        StudentField::FirstName,
        StudentField::LastName,
        StudentField::Email,
        StudentField::Phone,
        StudentField::Country,
        StudentField::City,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StudentField::FirstName => "first_name",
            StudentField::LastName => "last_name",
            StudentField::Email => "email",
            StudentField::Phone => "phone",
            StudentField::Country => "country",
            StudentField::City => "city",
        }
    }
}

impl FromStr for StudentField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StudentField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or(())
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bound fields of the add/edit student dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub city: String,
}

impl StudentForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            country: student.country.clone(),
            city: student.city.clone(),
        }
    }

    pub fn field(&self, field: StudentField) -> &str {
        match field {
            StudentField::FirstName => &self.first_name,
            StudentField::LastName => &self.last_name,
            StudentField::Email => &self.email,
            StudentField::Phone => &self.phone,
            StudentField::Country => &self.country,
            StudentField::City => &self.city,
        }
    }

    pub fn set(&mut self, field: StudentField, value: String) {
        let slot = match field {
            StudentField::FirstName => &mut self.first_name,
            StudentField::LastName => &mut self.last_name,
            StudentField::Email => &mut self.email,
            StudentField::Phone => &mut self.phone,
            StudentField::Country => &mut self.country,
            StudentField::City => &mut self.city,
        };
        *slot = value;
    }

    pub fn to_request(&self) -> StudentRequest {
        StudentRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    Name,
    FirstGrade,
    SecondGrade,
    FinalGrade,
}

impl CourseField {
    pub const ALL: [CourseField; 4] = [
        CourseField::Name,
        CourseField::FirstGrade,
        CourseField::SecondGrade,
        CourseField::FinalGrade,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CourseField::Name => "name",
            CourseField::FirstGrade => "first_grade",
            CourseField::SecondGrade => "second_grade",
            CourseField::FinalGrade => "final_grade",
        }
    }
}

impl FromStr for CourseField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CourseField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or(())
    }
}

impl fmt::Display for CourseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bound fields of the enroll/edit course dialog. Grades stay as typed text
/// until the dialog is saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseForm {
    pub name: String,
    pub first_grade: String,
    pub second_grade: String,
    pub final_grade: String,
}

impl CourseForm {
    pub fn from_course(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            first_grade: course.first_grade.to_string(),
            second_grade: course.second_grade.to_string(),
            final_grade: course.final_grade.to_string(),
        }
    }

    pub fn field(&self, field: CourseField) -> &str {
        match field {
            CourseField::Name => &self.name,
            CourseField::FirstGrade => &self.first_grade,
            CourseField::SecondGrade => &self.second_grade,
            CourseField::FinalGrade => &self.final_grade,
        }
    }

    pub fn set(&mut self, field: CourseField, value: String) {
        let slot = match field {
            CourseField::Name => &mut self.name,
            CourseField::FirstGrade => &mut self.first_grade,
            CourseField::SecondGrade => &mut self.second_grade,
            CourseField::FinalGrade => &mut self.final_grade,
        };
        *slot = value;
    }

    pub fn to_request(&self, user_id: i64) -> CourseRequest {
        CourseRequest {
            name: self.name.clone(),
            first_grade: parse_grade(&self.first_grade),
            second_grade: parse_grade(&self.second_grade),
            final_grade: parse_grade(&self.final_grade),
            user_id,
        }
    }
}

/// A list-view row: a student and how many cached courses point at it.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow<'a> {
    pub student: &'a Student,
    pub course_count: usize,
}

/// Everything the console shows. Collections are caches of the last fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsoleState {
    pub view: View,
    pub selected_student: Option<Student>,
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub search_query: String,
    pub student_dialog: Option<Dialog<StudentForm>>,
    pub course_dialog: Option<Dialog<CourseForm>>,
    pub alert: Option<String>,
}

impl ConsoleState {
    pub fn student(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn student_rows(&self) -> Vec<StudentRow<'_>> {
        self.students
            .iter()
            .map(|student| StudentRow {
                student,
                course_count: self
                    .courses
                    .iter()
                    .filter(|c| c.user_id == student.id)
                    .count(),
            })
            .collect()
    }

    /// Cached courses belonging to the selected student, in cache order.
    pub fn detail_courses(&self) -> Vec<&Course> {
        match &self.selected_student {
            Some(student) => self
                .courses
                .iter()
                .filter(|c| c.user_id == student.id)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn detail_course(&self, id: i64) -> Option<&Course> {
        self.detail_courses().into_iter().find(|c| c.id == id)
    }
}
