pub mod state;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::api::RecordsApi;
use crate::error::ApiError;
use crate::models::Student;

pub use state::{
    ConsoleState, CourseField, CourseForm, Dialog, FormMode, StudentField, StudentForm,
    StudentRow, View,
};

pub const SAVE_STUDENT_FAILED: &str = "Failed to save student. Please try again.";
pub const DELETE_STUDENT_FAILED: &str = "Failed to delete user. Please try again.";
pub const SAVE_COURSE_FAILED: &str = "Failed to save course. Please try again.";
pub const DELETE_COURSE_FAILED: &str = "Failed to delete course. Please try again.";
pub const RESET_DEMO_FAILED: &str = "Failed to reset demo data. Please try again.";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("No student with id {0} in the current list")]
    UnknownStudent(i64),

    #[error("No course with id {0} for the selected student")]
    UnknownCourse(i64),

    #[error("No student is selected")]
    NoStudentSelected,

    #[error("No dialog is open")]
    NoDialogOpen,

    #[error("Not available on the {0:?} view")]
    WrongView(View),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// View controller for the student console.
///
/// State lives in a `watch` channel: every mutation notifies subscribers, and
/// readers get a consistent snapshot. Reads reset the affected cache on
/// failure; mutations only run their cleanup when the request succeeded.
pub struct Console {
    api: Arc<dyn RecordsApi>,
    state: watch::Sender<ConsoleState>,
}

impl Console {
    pub fn new(api: Arc<dyn RecordsApi>) -> Self {
        let (state, _) = watch::channel(ConsoleState::default());
        Self { api, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConsoleState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ConsoleState {
        self.state.borrow().clone()
    }

    fn read<R>(&self, f: impl FnOnce(&ConsoleState) -> R) -> R {
        f(&self.state.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut ConsoleState)) {
        self.state.send_modify(f);
    }

    /// Student add/edit/delete only exist on the list view.
    fn require_students_view(&self) -> Result<(), ConsoleError> {
        match self.read(|s| s.view) {
            View::Students => Ok(()),
            other => Err(ConsoleError::WrongView(other)),
        }
    }

    fn alert(&self, message: &str) {
        let message = message.to_string();
        self.update(|s| s.alert = Some(message));
    }

    /// Returns and clears the pending alert, if any.
    pub fn take_alert(&self) -> Option<String> {
        let mut taken = None;
        self.state.send_if_modified(|s| {
            taken = s.alert.take();
            taken.is_some()
        });
        taken
    }

    /// Initial load: the student list and every course (for the per-student counts).
    pub async fn start(&self) {
        tokio::join!(self.load_users(), self.load_courses());
    }

    // Reads

    pub async fn load_users(&self) {
        let query = self.read(|s| s.search_query.clone());
        let search = (!query.is_empty()).then_some(query.as_str());

        match self.api.list_students(search).await {
            Ok(students) => {
                info!("loaded {} students", students.len());
                self.update(|s| s.students = students);
            }
            Err(e) => {
                error!("Error loading users: {}", e);
                self.update(|s| s.students.clear());
            }
        }
    }

    pub async fn load_courses(&self) {
        match self.api.list_courses().await {
            Ok(courses) => {
                info!("loaded {} courses", courses.len());
                self.update(|s| s.courses = courses);
            }
            Err(e) => {
                error!("Error loading courses: {}", e);
                self.update(|s| s.courses.clear());
            }
        }
    }

    pub async fn load_user_by_id(&self, id: i64) {
        match self.api.get_student(id).await {
            Ok(student) => self.update(|s| s.selected_student = Some(student)),
            Err(e) => {
                if e.is_not_found() {
                    warn!("User {} no longer exists: {}", id, e);
                } else {
                    error!("Error loading user {}: {}", id, e);
                }
                self.update(|s| s.selected_student = None);
            }
        }
    }

    pub async fn get_student_courses(&self, student_id: i64) {
        match self.api.list_student_courses(student_id).await {
            Ok(courses) => self.update(|s| s.courses = courses),
            Err(e) => {
                error!("Error loading courses for user {}: {}", student_id, e);
                self.update(|s| s.courses.clear());
            }
        }
    }

    // Search

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|s| s.search_query = query);
    }

    pub async fn search(&self, query: impl Into<String>) {
        self.set_search_query(query);
        self.load_users().await;
    }

    pub async fn clear_search(&self) {
        self.set_search_query(String::new());
        self.load_users().await;
    }

    // Students

    pub fn open_new_student(&self) -> Result<(), ConsoleError> {
        self.require_students_view()?;
        self.update(|s| s.student_dialog = Some(Dialog::create()));
        Ok(())
    }

    pub fn open_edit_student(&self, id: i64) -> Result<(), ConsoleError> {
        self.require_students_view()?;
        let form = self
            .read(|s| s.student(id).map(StudentForm::from_student))
            .ok_or(ConsoleError::UnknownStudent(id))?;
        self.update(|s| {
            s.student_dialog = Some(Dialog {
                mode: FormMode::Edit(id),
                form,
            })
        });
        Ok(())
    }

    pub fn set_student_field(
        &self,
        field: StudentField,
        value: impl Into<String>,
    ) -> Result<(), ConsoleError> {
        let value = value.into();
        let mut applied = false;
        self.state.send_if_modified(|s| match s.student_dialog.as_mut() {
            Some(dialog) => {
                dialog.form.set(field, value);
                applied = true;
                true
            }
            None => false,
        });
        if applied { Ok(()) } else { Err(ConsoleError::NoDialogOpen) }
    }

    pub fn cancel_student_dialog(&self) {
        self.update(|s| s.student_dialog = None);
    }

    pub async fn save_student(&self) -> Result<(), ConsoleError> {
        let dialog = self
            .read(|s| s.student_dialog.clone())
            .ok_or(ConsoleError::NoDialogOpen)?;
        let req = dialog.form.to_request();

        let result = match dialog.mode {
            FormMode::Create => self.api.create_student(&req).await,
            FormMode::Edit(id) => self.api.update_student(id, &req).await,
        };

        match result {
            Ok(student) => {
                info!("saved student {} ({})", student.id, student.full_name());
                self.update(|s| s.student_dialog = None);
                self.load_users().await;
                Ok(())
            }
            Err(e) => {
                error!("Error saving student: {}", e);
                self.alert(SAVE_STUDENT_FAILED);
                Err(e.into())
            }
        }
    }

    /// Deletes a student, then reloads the list whether or not the delete succeeded.
    pub async fn delete_student(&self, id: i64) -> Result<(), ConsoleError> {
        self.require_students_view()?;
        let result = self.api.delete_student(id).await;
        if let Err(e) = &result {
            error!("Error deleting user {}: {}", id, e);
            self.alert(DELETE_STUDENT_FAILED);
        }
        self.load_users().await;
        result.map_err(ConsoleError::from)
    }

    // Navigation

    pub async fn view_student_detail(&self, student: Student) {
        let id = student.id;
        self.update(|s| {
            s.selected_student = Some(student);
            s.view = View::StudentDetail;
            s.student_dialog = None;
        });
        self.enter_student_detail(id).await;
    }

    /// Opens the detail view for a student from the current list.
    pub async fn view_student(&self, id: i64) -> Result<(), ConsoleError> {
        let student = self
            .read(|s| s.student(id).cloned())
            .ok_or(ConsoleError::UnknownStudent(id))?;
        self.view_student_detail(student).await;
        Ok(())
    }

    async fn enter_student_detail(&self, id: i64) {
        tokio::join!(self.load_user_by_id(id), self.get_student_courses(id));
    }

    pub fn back_to_students(&self) {
        self.update(|s| {
            s.view = View::Students;
            s.selected_student = None;
            s.course_dialog = None;
        });
    }

    // Courses

    pub fn open_enroll_course(&self) -> Result<(), ConsoleError> {
        if self.read(|s| s.selected_student.is_none()) {
            return Err(ConsoleError::NoStudentSelected);
        }
        self.update(|s| s.course_dialog = Some(Dialog::create()));
        Ok(())
    }

    pub fn open_edit_course(&self, id: i64) -> Result<(), ConsoleError> {
        let form = self
            .read(|s| s.detail_course(id).map(CourseForm::from_course))
            .ok_or(ConsoleError::UnknownCourse(id))?;
        self.update(|s| {
            s.course_dialog = Some(Dialog {
                mode: FormMode::Edit(id),
                form,
            })
        });
        Ok(())
    }

    pub fn set_course_field(
        &self,
        field: CourseField,
        value: impl Into<String>,
    ) -> Result<(), ConsoleError> {
        let value = value.into();
        let mut applied = false;
        self.state.send_if_modified(|s| match s.course_dialog.as_mut() {
            Some(dialog) => {
                dialog.form.set(field, value);
                applied = true;
                true
            }
            None => false,
        });
        if applied { Ok(()) } else { Err(ConsoleError::NoDialogOpen) }
    }

    pub fn cancel_course_dialog(&self) {
        self.update(|s| s.course_dialog = None);
    }

    /// Saves the course dialog for the selected student. Does nothing when no
    /// student is selected.
    pub async fn save_course(&self) -> Result<(), ConsoleError> {
        let Some(student_id) = self.read(|s| s.selected_student.as_ref().map(|st| st.id)) else {
            return Ok(());
        };
        let dialog = self
            .read(|s| s.course_dialog.clone())
            .ok_or(ConsoleError::NoDialogOpen)?;
        let req = dialog.form.to_request(student_id);

        let result = match dialog.mode {
            FormMode::Create => self.api.create_course(&req).await,
            FormMode::Edit(id) => self.api.update_course(id, &req).await,
        };

        match result {
            Ok(course) => {
                info!("saved course {} for user {}", course.id, course.user_id);
                self.update(|s| s.course_dialog = None);
                self.load_courses().await;
                Ok(())
            }
            Err(e) => {
                error!("Error saving course: {}", e);
                self.alert(SAVE_COURSE_FAILED);
                Err(e.into())
            }
        }
    }

    /// Deletes a course, then reloads courses whether or not the delete succeeded.
    pub async fn delete_course(&self, id: i64) -> Result<(), ConsoleError> {
        let result = self.api.delete_course(id).await;
        if let Err(e) = &result {
            error!("Error deleting course {}: {}", id, e);
            self.alert(DELETE_COURSE_FAILED);
        }
        self.load_courses().await;
        result.map_err(ConsoleError::from)
    }

    pub async fn reset_demo_data(&self) -> Result<(), ConsoleError> {
        match self.api.reset_demo_data().await {
            Ok(summary) => {
                info!(
                    "{} ({} users, {} courses)",
                    summary.message, summary.users, summary.courses
                );
                self.start().await;
                Ok(())
            }
            Err(e) => {
                error!("Error resetting demo data: {}", e);
                self.alert(RESET_DEMO_FAILED);
                Err(e.into())
            }
        }
    }
}
