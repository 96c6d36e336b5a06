use crate::errors::AppError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};

// ============ Lead Model ============

/// Display name used for owners whose identifier is not a plain string.
pub const UNNAMED_OWNER: &str = "Sin nombre";

/// System a lead was pulled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// HubSpot CRM contacts.
    Hubspot,
    /// Google Sheets lead-capture spreadsheet.
    GoogleSheets,
}

impl LeadSource {
    /// Both sources in reporting order.
    pub const ALL: [LeadSource; 2] = [LeadSource::Hubspot, LeadSource::GoogleSheets];

    /// Human readable name shown in the dashboard.
    pub const fn label(self) -> &'static str {
        match self {
            LeadSource::Hubspot => "HubSpot",
            LeadSource::GoogleSheets => "Google Sheets",
        }
    }

    /// Prefix used to namespace lead ids per source.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            LeadSource::Hubspot => "hubspot",
            LeadSource::GoogleSheets => "sheets",
        }
    }
}

/// Salesperson responsible for a lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Owner given as a plain string (CRM owner id or spreadsheet advisor name).
    Named(String),
    /// Owner present in the source but not as a plain string.
    Unnamed,
}

impl Owner {
    /// Name used when grouping and displaying leads by owner.
    pub fn display_name(&self) -> &str {
        match self {
            Owner::Named(name) => name,
            Owner::Unnamed => UNNAMED_OWNER,
        }
    }
}

impl Serialize for Owner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

/// Canonical lead shared by every source.
///
/// Built once by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    /// Source-namespaced identifier (e.g. `hubspot-501`, `sheets-12`).
    pub id: String,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Whether the lead counts as contacted under its source's rule.
    pub is_contacted: bool,
    /// Assigned salesperson; `None` means unassigned.
    pub owner: Option<Owner>,
    /// Provenance tag.
    pub source: LeadSource,
    /// CRM lead status (`hs_lead_status`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Lead {
    /// ISO calendar day (`YYYY-MM-DD`) of the creation timestamp.
    pub fn day_key(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    /// Owner name used for grouping, if the lead is assigned.
    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().map(Owner::display_name)
    }
}

// ============ Date Range ============

/// Inclusive range of calendar days.
///
/// Covers `start 00:00:00` through the last instant of `end`, both UTC.
/// Callers guarantee `start <= end`; an inverted range simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whole calendar month, from the 1st to its last day.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };

        Some(Self {
            start,
            end: next_month.pred_opt()?,
        })
    }

    /// Month containing `today`; the dashboard's default range.
    pub fn current_month(today: NaiveDate) -> Self {
        Self::month(today.year(), today.month()).unwrap_or(Self {
            start: today,
            end: today,
        })
    }

    /// First instant covered by the range.
    pub fn start_instant(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::MIN))
    }

    /// Last instant covered by the range.
    pub fn end_instant(&self) -> DateTime<Utc> {
        let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
        Utc.from_utc_datetime(&self.end.and_time(last))
    }

    /// Timestamp-precision inclusive membership test.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_instant() && instant <= self.end_instant()
    }

    /// Number of calendar days covered (0 for an inverted range).
    pub fn day_count(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }
}

// ============ Request/Response Models ============

/// Longest range a refresh may cover, in days (one leap year).
pub const MAX_RANGE_DAYS: usize = 366;

/// Body of `POST /api/v1/dashboard/refresh`.
///
/// Either an explicit `start`/`end` pair, a `year`/`month` pair, or nothing
/// (current month).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl RefreshRequest {
    /// Resolves the request into a validated date range.
    ///
    /// # Arguments
    ///
    /// * `today` - Reference day used when no range is given.
    ///
    /// # Returns
    ///
    /// * `Result<DateRange, AppError>` - The range, or `BadRequest` for partial,
    ///   mixed, inverted or oversized input.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, AppError> {
        let explicit = self.start.is_some() || self.end.is_some();
        let monthly = self.year.is_some() || self.month.is_some();
        if explicit && monthly {
            return Err(AppError::BadRequest(
                "use either start/end or year/month, not both".to_string(),
            ));
        }

        match (self.start, self.end, self.year, self.month) {
            (Some(start), Some(end), _, _) => {
                if start > end {
                    return Err(AppError::BadRequest(format!(
                        "start ({}) must not be after end ({})",
                        start, end
                    )));
                }
                let range = DateRange::new(start, end);
                if range.day_count() > MAX_RANGE_DAYS {
                    return Err(AppError::BadRequest(format!(
                        "range spans {} days; the maximum is {}",
                        range.day_count(),
                        MAX_RANGE_DAYS
                    )));
                }
                Ok(range)
            }
            (Some(_), None, _, _) | (None, Some(_), _, _) => Err(AppError::BadRequest(
                "start and end must be provided together".to_string(),
            )),
            (None, None, Some(year), Some(month)) => DateRange::month(year, month)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("invalid month {}/{}", month, year))
                }),
            (None, None, Some(_), None) | (None, None, None, Some(_)) => Err(
                AppError::BadRequest("year and month must be provided together".to_string()),
            ),
            (None, None, None, None) => Ok(DateRange::current_month(today)),
        }
    }
}
