pub mod dto;
pub mod http;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Course, CourseRequest, Student, StudentRequest};

pub use dto::DemoDataSummary;
pub use http::HttpRecordsApi;

/// The REST surface the console consumes. One method per endpoint.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// `GET /users`, with `?search=` only when `search` is non-empty.
    async fn list_students(&self, search: Option<&str>) -> Result<Vec<Student>, ApiError>;
    async fn get_student(&self, id: i64) -> Result<Student, ApiError>;
    async fn create_student(&self, req: &StudentRequest) -> Result<Student, ApiError>;
    async fn update_student(&self, id: i64, req: &StudentRequest) -> Result<Student, ApiError>;
    async fn delete_student(&self, id: i64) -> Result<(), ApiError>;

    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;
    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<Course>, ApiError>;
    async fn create_course(&self, req: &CourseRequest) -> Result<Course, ApiError>;
    async fn update_course(&self, id: i64, req: &CourseRequest) -> Result<Course, ApiError>;
    async fn delete_course(&self, id: i64) -> Result<(), ApiError>;

    /// Restores the backend's bundled demo data set.
    async fn reset_demo_data(&self) -> Result<DemoDataSummary, ApiError>;
}
