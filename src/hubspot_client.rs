use crate::config::HubspotSettings;
use crate::errors::{AppError, ResultExt};
use crate::hubspot_models::{ContactSearchRequest, ContactSearchResponse};
use crate::models::DateRange;
use serde_json::Value;
use std::time::Duration;

/// Client for the HubSpot CRM v3 contacts search API.
#[derive(Clone)]
pub struct HubspotClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_limit: u32,
    max_pages: u32,
}

impl HubspotClient {
    /// Creates a new `HubspotClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - HubSpot API root (e.g. `https://api.hubapi.com`).
    /// * `api_key` - Private app access token.
    /// * `page_limit` - Contacts per search page (HubSpot caps this at 100).
    /// * `max_pages` - Maximum pages followed per refresh.
    pub fn new(
        base_url: String,
        api_key: String,
        page_limit: u32,
        max_pages: u32,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create HubSpot client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            page_limit,
            max_pages,
        })
    }

    /// Builds a client from settings; `None` when no API key is configured.
    pub fn from_settings(settings: &HubspotSettings) -> Result<Option<Self>, AppError> {
        settings
            .api_key
            .as_ref()
            .map(|key| {
                Self::new(
                    settings.base_url.clone(),
                    key.clone(),
                    settings.page_limit,
                    settings.max_pages,
                )
            })
            .transpose()
    }

    /// Fetches raw contacts created within `range`, following pagination.
    ///
    /// # Arguments
    ///
    /// * `range` - Inclusive day range, sent as a `createdate BETWEEN` filter.
    ///
    /// # Returns
    ///
    /// * `Result<Vec<Value>, AppError>` - Raw contact objects, undecoded.
    pub async fn search_contacts(&self, range: &DateRange) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/crm/v3/objects/contacts/search", self.base_url);
        let mut request = ContactSearchRequest::created_between(
            range.start_instant().timestamp_millis(),
            range.end_instant().timestamp_millis(),
            self.page_limit,
        );

        let mut contacts = Vec::new();
        for page in 1..=self.max_pages {
            let body = self
                .search_page(&url, &request)
                .await
                .with_context(|| format!("HubSpot search page {}", page))?;

            tracing::debug!("HubSpot page {} returned {} contacts", page, body.results.len());
            let next = body.next_after().map(str::to_string);
            contacts.extend(body.results);

            match next {
                Some(after) => request.after = Some(after),
                None => {
                    tracing::info!(
                        "Fetched {} HubSpot contacts for {} → {}",
                        contacts.len(),
                        range.start,
                        range.end
                    );
                    return Ok(contacts);
                }
            }
        }

        tracing::warn!(
            "HubSpot pagination stopped at {} pages ({} contacts); results are truncated",
            self.max_pages,
            contacts.len()
        );
        Ok(contacts)
    }

    async fn search_page(
        &self,
        url: &str,
        request: &ContactSearchRequest,
    ) -> Result<ContactSearchResponse, AppError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "HubSpot returned {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse HubSpot response: {}", e))
        })
    }
}
