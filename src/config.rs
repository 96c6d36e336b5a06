use crate::models::LeadSource;
use std::time::Duration;

pub const DEFAULT_HUBSPOT_BASE_URL: &str = "https://api.hubapi.com";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const DEFAULT_SHEETS_RANGE: &str = "A:Z";

#[derive(Debug, Clone)]
pub struct HubspotSettings {
    pub api_key: Option<String>,
    pub portal_id: Option<String>,
    pub base_url: String,
    pub page_limit: u32,
    pub max_pages: u32,
}

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub api_key: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub range: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub hubspot: HubspotSettings,
    pub sheets: SheetsSettings,
    pub fetch_timeout_secs: u64,
    /// Serve deterministic sample data for sources without credentials.
    pub sample_data_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            hubspot: HubspotSettings {
                api_key: None,
                portal_id: None,
                base_url: DEFAULT_HUBSPOT_BASE_URL.to_string(),
                page_limit: 100,
                max_pages: 20,
            },
            sheets: SheetsSettings {
                api_key: None,
                spreadsheet_id: None,
                range: DEFAULT_SHEETS_RANGE.to_string(),
                base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            },
            fetch_timeout_secs: 15,
            sample_data_fallback: false,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn base_url(name: &str, value: Option<String>, default: &str) -> anyhow::Result<String> {
    let raw = non_empty(value).unwrap_or_else(|| default.to_string());
    let parsed = url::Url::parse(&raw)
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn number<T: std::str::FromStr>(name: &str, value: Option<String>, default: T) -> anyhow::Result<T> {
    match non_empty(value) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_limit: u32 = number("HUBSPOT_PAGE_LIMIT", var("HUBSPOT_PAGE_LIMIT"), 100)?;
        if !(1..=100).contains(&page_limit) {
            anyhow::bail!("HUBSPOT_PAGE_LIMIT must be between 1 and 100");
        }

        let max_pages: u32 = number("HUBSPOT_MAX_PAGES", var("HUBSPOT_MAX_PAGES"), 20)?;
        if max_pages == 0 {
            anyhow::bail!("HUBSPOT_MAX_PAGES must be at least 1");
        }

        let fetch_timeout_secs: u64 =
            number("SOURCE_FETCH_TIMEOUT_SECS", var("SOURCE_FETCH_TIMEOUT_SECS"), 15)?;
        if fetch_timeout_secs == 0 {
            anyhow::bail!("SOURCE_FETCH_TIMEOUT_SECS must be at least 1");
        }

        let sample_data_fallback = match non_empty(var("SAMPLE_DATA_FALLBACK")) {
            None => false,
            Some(flag) => match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => anyhow::bail!("SAMPLE_DATA_FALLBACK must be true or false, got '{}'", flag),
            },
        };

        let config = Self {
            port: number("PORT", var("PORT"), 3000)
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            hubspot: HubspotSettings {
                api_key: non_empty(var("HUBSPOT_API_KEY")),
                portal_id: non_empty(var("HUBSPOT_PORTAL_ID")),
                base_url: base_url(
                    "HUBSPOT_BASE_URL",
                    var("HUBSPOT_BASE_URL"),
                    DEFAULT_HUBSPOT_BASE_URL,
                )?,
                page_limit,
                max_pages,
            },
            sheets: SheetsSettings {
                api_key: non_empty(var("GOOGLE_SHEETS_API_KEY")),
                spreadsheet_id: non_empty(var("GOOGLE_SHEETS_SPREADSHEET_ID")),
                range: non_empty(var("GOOGLE_SHEETS_RANGE"))
                    .unwrap_or_else(|| DEFAULT_SHEETS_RANGE.to_string()),
                base_url: base_url(
                    "GOOGLE_SHEETS_BASE_URL",
                    var("GOOGLE_SHEETS_BASE_URL"),
                    DEFAULT_SHEETS_BASE_URL,
                )?,
            },
            fetch_timeout_secs,
            sample_data_fallback,
        };

        // Log what was loaded, never the keys themselves
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "HubSpot: {} ({})",
            if config.hubspot_configured() { "configured" } else { "missing credentials" },
            config.hubspot.base_url
        );
        tracing::debug!(
            "Google Sheets: {} ({})",
            if config.sheets_configured() { "configured" } else { "missing credentials" },
            config.sheets.base_url
        );
        tracing::debug!("Sample data fallback: {}", config.sample_data_fallback);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    pub fn hubspot_configured(&self) -> bool {
        self.hubspot.api_key.is_some()
    }

    pub fn sheets_configured(&self) -> bool {
        self.sheets.api_key.is_some() && self.sheets.spreadsheet_id.is_some()
    }

    pub fn source_configured(&self, source: LeadSource) -> bool {
        match source {
            LeadSource::Hubspot => self.hubspot_configured(),
            LeadSource::GoogleSheets => self.sheets_configured(),
        }
    }

    /// Names of the variables a refresh would still need.
    ///
    /// Empty when every source has credentials or sample fallback is on.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        if self.sample_data_fallback {
            return Vec::new();
        }

        let mut missing = Vec::new();
        if self.hubspot.api_key.is_none() {
            missing.push("HUBSPOT_API_KEY");
        }
        if self.sheets.api_key.is_none() {
            missing.push("GOOGLE_SHEETS_API_KEY");
        }
        if self.sheets.spreadsheet_id.is_none() {
            missing.push("GOOGLE_SHEETS_SPREADSHEET_ID");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_settings().is_empty()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.hubspot.base_url, DEFAULT_HUBSPOT_BASE_URL);
        assert_eq!(config.hubspot.page_limit, 100);
        assert_eq!(config.sheets.range, "A:Z");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
        assert!(!config.sample_data_fallback);
        assert!(!config.is_complete());
        assert_eq!(
            config.missing_settings(),
            vec!["HUBSPOT_API_KEY", "GOOGLE_SHEETS_API_KEY", "GOOGLE_SHEETS_SPREADSHEET_ID"]
        );
    }

    #[test]
    fn test_blank_values_count_as_absent() {
        let config = load(&[
            ("HUBSPOT_API_KEY", "   "),
            ("GOOGLE_SHEETS_API_KEY", "key"),
            ("GOOGLE_SHEETS_SPREADSHEET_ID", "sheet-1"),
        ])
        .unwrap();

        assert!(!config.hubspot_configured());
        assert!(config.sheets_configured());
        assert_eq!(config.missing_settings(), vec!["HUBSPOT_API_KEY"]);
    }

    #[test]
    fn test_sample_fallback_completes_config() {
        let config = load(&[("SAMPLE_DATA_FALLBACK", "true")]).unwrap();
        assert!(config.is_complete());
        assert!(!config.source_configured(LeadSource::Hubspot));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(load(&[("PORT", "not-a-port")]).is_err());
        assert!(load(&[("HUBSPOT_BASE_URL", "ftp://example.com")]).is_err());
        assert!(load(&[("GOOGLE_SHEETS_BASE_URL", "nope")]).is_err());
        assert!(load(&[("HUBSPOT_PAGE_LIMIT", "500")]).is_err());
        assert!(load(&[("SOURCE_FETCH_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("SAMPLE_DATA_FALLBACK", "maybe")]).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = load(&[("HUBSPOT_BASE_URL", "http://localhost:9000/")]).unwrap();
        assert_eq!(config.hubspot.base_url, "http://localhost:9000");
    }
}
