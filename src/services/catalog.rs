use crate::config::CatalogSettings;
use crate::models::RawClass;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the course catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Catalog client disabled: no API key configured")]
    Disabled,
}

/// Course catalog API client
///
/// Fetches one raw class record (with all of its sections) per enrollment code
/// for the configured quarter.
pub struct CatalogClient {
    base_url: String,
    api_key: Option<String>,
    api_key_header: String,
    quarter: String,
    client: Client,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let api_key = settings
            .api_key
            .as_ref()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if api_key.is_none() {
            tracing::warn!("No catalog API key configured; serving cached course data only");
        }

        Ok(Self {
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            api_key,
            api_key_header: settings.api_key_header.clone(),
            quarter: settings.quarter.clone(),
            client,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn quarter(&self) -> &str {
        &self.quarter
    }

    fn class_url(&self, enroll_code: &str) -> String {
        format!(
            "{}/academics/curriculums/v3/classes/{}/{}?includeClassSections=true",
            self.base_url, self.quarter, enroll_code
        )
    }

    /// Fetch the raw class record for one enrollment code
    pub async fn fetch_class(&self, enroll_code: &str) -> Result<RawClass, CatalogError> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::Disabled)?;
        let url = self.class_url(enroll_code);

        tracing::debug!("Fetching class from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header(self.api_key_header.as_str(), api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(CatalogError::NotFound(format!("Class not found: {}", enroll_code)));
            }
            status if !status.is_success() => {
                return Err(CatalogError::ApiError(format!(
                    "Failed to fetch class {}: {}",
                    enroll_code, status
                )));
            }
            _ => {}
        }

        let json: Value = response.json().await?;

        // A record without a course id is useless downstream
        if !json.get("courseId").is_some_and(Value::is_string) {
            return Err(CatalogError::InvalidResponse(format!(
                "Missing courseId for class {}",
                enroll_code
            )));
        }

        serde_json::from_value(json)
            .map_err(|e| CatalogError::InvalidResponse(format!("Failed to parse class {}: {}", enroll_code, e)))
    }
}
