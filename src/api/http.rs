use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{DemoDataSummary, RecordsApi};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Course, CourseRequest, Student, StudentRequest};

pub struct HttpRecordsApi {
    client: Client,
    base_url: Url,
}

impl HttpRecordsApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join drops the last path segment unless it ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    fn request_json<B: Serialize>(&self, method: Method, url: Url, body: &B) -> RequestBuilder {
        self.request(method, url).json(body)
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        warn!("backend returned {} for {}: {}", status, url, body);
        Err(ApiError::Status { status, body })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;

        // The backend reports a missing record as a 200 with an error object.
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return Err(ApiError::NotFound(message.to_string()));
        }

        Ok(serde_json::from_value(value)?)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        Self::read_json(response).await
    }

    async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordsApi for HttpRecordsApi {
    async fn list_students(&self, search: Option<&str>) -> Result<Vec<Student>, ApiError> {
        let mut url = self.endpoint("users")?;
        if let Some(query) = search.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("search", query);
        }
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn get_student(&self, id: i64) -> Result<Student, ApiError> {
        let url = self.endpoint(&format!("users/{}", id))?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn create_student(&self, req: &StudentRequest) -> Result<Student, ApiError> {
        let url = self.endpoint("users")?;
        Self::send_json(self.request_json(Method::POST, url, req)).await
    }

    async fn update_student(&self, id: i64, req: &StudentRequest) -> Result<Student, ApiError> {
        let url = self.endpoint(&format!("users/{}", id))?;
        Self::send_json(self.request_json(Method::PUT, url, req)).await
    }

    async fn delete_student(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("users/{}", id))?;
        Self::send_empty(self.request(Method::DELETE, url)).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let url = self.endpoint("courses")?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<Course>, ApiError> {
        let url = self.endpoint(&format!("courses/{}", student_id))?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn create_course(&self, req: &CourseRequest) -> Result<Course, ApiError> {
        let url = self.endpoint("courses")?;
        Self::send_json(self.request_json(Method::POST, url, req)).await
    }

    async fn update_course(&self, id: i64, req: &CourseRequest) -> Result<Course, ApiError> {
        let url = self.endpoint(&format!("courses/{}", id))?;
        Self::send_json(self.request_json(Method::PUT, url, req)).await
    }

    async fn delete_course(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("courses/{}", id))?;
        Self::send_empty(self.request(Method::DELETE, url)).await
    }

    async fn reset_demo_data(&self) -> Result<DemoDataSummary, ApiError> {
        let url = self.endpoint("reset-demo-data")?;
        Self::send_json(self.request(Method::POST, url)).await
    }
}
