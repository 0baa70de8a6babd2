use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoDataSummary {
    pub message: String,
    pub users: usize,
    pub courses: usize,
}
