use crate::config::SheetsSettings;
use crate::errors::{AppError, ResultExt};
use crate::sheets_models::ValueRange;
use std::time::Duration;

/// Client for the Google Sheets v4 `values.get` endpoint (API-key auth).
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    spreadsheet_id: String,
    range: String,
}

impl SheetsClient {
    pub fn new(
        base_url: String,
        api_key: String,
        spreadsheet_id: String,
        range: String,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create Sheets client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
            spreadsheet_id,
            range,
        })
    }

    /// Builds a client from settings; `None` unless both key and sheet id are set.
    pub fn from_settings(settings: &SheetsSettings) -> Result<Option<Self>, AppError> {
        match (&settings.api_key, &settings.spreadsheet_id) {
            (Some(key), Some(id)) => Self::new(
                settings.base_url.clone(),
                key.clone(),
                id.clone(),
                settings.range.clone(),
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    fn values_url(&self) -> Result<url::Url, AppError> {
        let mut url = url::Url::parse(&self.base_url).map_err(|e| {
            AppError::InternalError(format!("Invalid Sheets base URL {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| AppError::InternalError("Sheets base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&self.range);
        url.query_pairs_mut().append_pair("key", &self.api_key);

        Ok(url)
    }

    /// Fetches the configured range. A sheet without data yields an empty grid.
    pub async fn fetch_values(&self) -> Result<ValueRange, AppError> {
        let url = self.values_url()?;
        tracing::info!("Fetching Google Sheets range {}", self.range);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Google Sheets request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Google Sheets returned {}: {}",
                status, error_text
            )));
        }

        let grid: ValueRange = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Google Sheets response: {}", e))
        })?;

        tracing::debug!("Google Sheets returned {} rows", grid.values.len());
        Ok(grid)
    }
}
