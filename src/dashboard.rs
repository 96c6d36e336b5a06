//! Reporting facade: one refresh runs both source fetches concurrently,
//! normalizes and aggregates the results, and publishes a new view.

use crate::circuit_breaker::{create_source_circuit_breaker, SourceBreaker};
use crate::config::Config;
use crate::date_filter::filter_by_range;
use crate::errors::AppError;
use crate::hubspot_client::HubspotClient;
use crate::models::{DateRange, Lead, LeadSource};
use crate::normalizer::{normalize_hubspot_contacts, normalize_sheet};
use crate::sample_data;
use crate::sheets_client::SheetsClient;
use crate::stats::{compute_stats, OwnerShare, SourceShare, Stats};
use crate::trend::{bin_by_day, DailyBins, TrendSeries};
use chrono::{DateTime, Utc};
use failsafe::CircuitBreaker;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

// ============ View Model ============

/// Where a source's leads came from in a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    Live,
    Sample,
}

/// Per-source outcome shown next to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: LeadSource,
    pub label: &'static str,
    pub mode: DataMode,
    pub leads: usize,
    /// Set when the fetch failed; the source then contributes no leads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Normalized, range-filtered leads from one source.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: LeadSource,
    pub mode: DataMode,
    pub leads: Vec<Lead>,
    pub error: Option<String>,
}

impl SourceBatch {
    pub fn live(source: LeadSource, leads: Vec<Lead>) -> Self {
        Self {
            source,
            mode: DataMode::Live,
            leads,
            error: None,
        }
    }

    pub fn sample(source: LeadSource, leads: Vec<Lead>) -> Self {
        Self {
            source,
            mode: DataMode::Sample,
            leads,
            error: None,
        }
    }

    /// Empty contribution for a source whose fetch failed.
    pub fn failed(source: LeadSource, error: &AppError) -> Self {
        tracing::error!("Fetching {} leads failed: {}", source.label(), error);
        Self {
            source,
            mode: DataMode::Live,
            leads: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    fn report(&self) -> SourceReport {
        SourceReport {
            source: self.source,
            label: self.source.label(),
            mode: self.mode,
            leads: self.leads.len(),
            error: self.error.clone(),
        }
    }
}

/// Everything the dashboard renders for one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Monotonic refresh counter; newer views replace older ones only.
    pub generation: u64,
    pub refresh_id: Uuid,
    pub range: DateRange,
    pub last_updated: DateTime<Utc>,
    pub stats: Stats,
    pub contacted_percentage: u32,
    pub owner_table: Vec<OwnerShare>,
    pub source_distribution: Vec<SourceShare>,
    pub daily_bins: DailyBins,
    pub trend: TrendSeries,
    pub sources: Vec<SourceReport>,
    pub leads: Vec<Lead>,
}

impl DashboardView {
    /// Builds the view from both sources' batches.
    pub fn assemble(
        generation: u64,
        range: DateRange,
        hubspot: SourceBatch,
        sheets: SourceBatch,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let stats = compute_stats(&hubspot.leads, &sheets.leads);
        let sources = vec![hubspot.report(), sheets.report()];

        let mut leads = hubspot.leads;
        leads.extend(sheets.leads);

        let daily_bins = bin_by_day(&leads, &range);

        Self {
            generation,
            refresh_id: Uuid::new_v4(),
            range,
            last_updated,
            contacted_percentage: stats.contacted_percentage(),
            owner_table: stats.owner_table(),
            source_distribution: stats.source_distribution(),
            trend: daily_bins.series(),
            daily_bins,
            stats,
            sources,
            leads,
        }
    }
}

/// Result of a refresh request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// A view was computed. `published` is false when a newer refresh had
    /// already been published and this one was discarded.
    Refreshed {
        published: bool,
        view: Arc<DashboardView>,
    },
    /// Nothing was fetched; `missing` lists the absent settings.
    ConfigurationIncomplete { missing: Vec<&'static str> },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub source: LeadSource,
    pub label: &'static str,
    pub configured: bool,
    /// `None` when the source can't be refreshed at all.
    pub mode: Option<DataMode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigStatus {
    pub complete: bool,
    pub missing: Vec<&'static str>,
    pub sample_data_fallback: bool,
    /// HubSpot portal the CRM leads belong to, for linking back to records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hubspot_portal_id: Option<String>,
    pub sources: Vec<SourceStatus>,
}

// ============ Reporting Service ============

/// Releases the in-flight slot on drop, including unwinds.
struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ReportingService {
    config: Config,
    hubspot: Option<HubspotClient>,
    sheets: Option<SheetsClient>,
    hubspot_breaker: SourceBreaker,
    sheets_breaker: SourceBreaker,
    generation: AtomicU64,
    published: RwLock<Option<Arc<DashboardView>>>,
    in_flight: AtomicUsize,
}

impl ReportingService {
    /// Creates the service; clients are built only for sources with credentials.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let hubspot = HubspotClient::from_settings(&config.hubspot)?;
        let sheets = SheetsClient::from_settings(&config.sheets)?;

        Ok(Self {
            config,
            hubspot,
            sheets,
            hubspot_breaker: create_source_circuit_breaker(),
            sheets_breaker: create_source_circuit_breaker(),
            generation: AtomicU64::new(0),
            published: RwLock::new(None),
            in_flight: AtomicUsize::new(0),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one refresh over `range` and publishes the result.
    ///
    /// Source failures never fail the refresh; they surface in the view's
    /// `sources` reports with an empty contribution.
    pub async fn refresh(&self, range: DateRange) -> RefreshOutcome {
        let missing = self.config.missing_settings();
        if !missing.is_empty() {
            tracing::warn!("Refresh skipped, configuration incomplete: {:?}", missing);
            return RefreshOutcome::ConfigurationIncomplete { missing };
        }

        let _guard = InFlightGuard::enter(&self.in_flight);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            "Refresh {} started for {} → {}",
            generation,
            range.start,
            range.end
        );

        let (hubspot, sheets) = tokio::join!(self.load_hubspot(&range), self.load_sheets(&range));

        let view = Arc::new(DashboardView::assemble(
            generation,
            range,
            hubspot,
            sheets,
            Utc::now(),
        ));

        tracing::info!(
            "Refresh {} finished: {} leads, {} uncontacted",
            generation,
            view.stats.total,
            view.stats.uncontacted
        );

        let published = self.publish(Arc::clone(&view)).await;
        RefreshOutcome::Refreshed { published, view }
    }

    /// Most recently published view.
    pub async fn latest(&self) -> Option<Arc<DashboardView>> {
        self.published.read().await.clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn config_status(&self) -> ConfigStatus {
        let sources = LeadSource::ALL
            .into_iter()
            .map(|source| {
                let configured = self.config.source_configured(source);
                let mode = if configured {
                    Some(DataMode::Live)
                } else if self.config.sample_data_fallback {
                    Some(DataMode::Sample)
                } else {
                    None
                };
                SourceStatus {
                    source,
                    label: source.label(),
                    configured,
                    mode,
                }
            })
            .collect();

        let missing = self.config.missing_settings();
        ConfigStatus {
            complete: missing.is_empty(),
            missing,
            sample_data_fallback: self.config.sample_data_fallback,
            hubspot_portal_id: self.config.hubspot.portal_id.clone(),
            sources,
        }
    }

    async fn load_hubspot(&self, range: &DateRange) -> SourceBatch {
        let source = LeadSource::Hubspot;
        let Some(client) = &self.hubspot else {
            let raw = sample_data::hubspot_contacts(range);
            return SourceBatch::sample(
                source,
                filter_by_range(normalize_hubspot_contacts(&raw), range),
            );
        };

        match self
            .guarded_fetch(source, &self.hubspot_breaker, client.search_contacts(range))
            .await
        {
            Ok(raw) => SourceBatch::live(
                source,
                filter_by_range(normalize_hubspot_contacts(&raw), range),
            ),
            Err(e) => SourceBatch::failed(source, &e),
        }
    }

    async fn load_sheets(&self, range: &DateRange) -> SourceBatch {
        let source = LeadSource::GoogleSheets;
        let Some(client) = &self.sheets else {
            let grid = sample_data::sheet_grid(range);
            return SourceBatch::sample(source, normalize_sheet(&grid, Some(range)));
        };

        match self
            .guarded_fetch(source, &self.sheets_breaker, client.fetch_values())
            .await
        {
            Ok(grid) => SourceBatch::live(source, normalize_sheet(&grid, Some(range))),
            Err(e) => SourceBatch::failed(source, &e),
        }
    }

    /// Runs `fetch` under the source's timeout and circuit breaker.
    async fn guarded_fetch<T, F>(
        &self,
        source: LeadSource,
        breaker: &SourceBreaker,
        fetch: F,
    ) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        if !breaker.is_call_permitted() {
            return Err(AppError::ExternalApiError(format!(
                "{} circuit open, fetch skipped",
                source.label()
            )));
        }

        let timeout = self.config.fetch_timeout();
        let outcome = match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "{} did not respond within {}s",
                source.label(),
                timeout.as_secs()
            ))),
        };

        match breaker.call(move || outcome) {
            Ok(value) => Ok(value),
            Err(failsafe::Error::Inner(e)) => Err(e),
            Err(failsafe::Error::Rejected) => Err(AppError::ExternalApiError(format!(
                "{} circuit open, fetch discarded",
                source.label()
            ))),
        }
    }

    /// Stores `view` unless a newer generation is already published.
    async fn publish(&self, view: Arc<DashboardView>) -> bool {
        let mut slot = self.published.write().await;

        if let Some(current) = slot.as_ref() {
            if current.generation > view.generation {
                tracing::info!(
                    "Discarding refresh {}: refresh {} is already published",
                    view.generation,
                    current.generation
                );
                return false;
            }
        }

        *slot = Some(view);
        true
    }
}
