use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub first_grade: f64,
    pub second_grade: f64,
    pub final_grade: f64,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRequest {
    pub name: String,
    pub first_grade: f64,
    pub second_grade: f64,
    pub final_grade: f64,
    pub user_id: i64,
}
