pub mod course;
pub mod student;

pub use course::{Course, CourseRequest};
pub use student::{Student, StudentRequest};
