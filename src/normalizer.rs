//! Conversion of raw HubSpot contacts and Google Sheets rows into [`Lead`]s.
//!
//! Each source has its own contacted rule; both are explicit business proxies
//! ("someone on the sales team owns this lead"), not outreach history.

use crate::date_filter::filter_by_range;
use crate::hubspot_models::HubspotContact;
use crate::models::{DateRange, Lead, LeadSource, Owner};
use crate::sheets_models::ValueRange;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Header terms identifying the creation-date column.
///
/// Matching is a case-insensitive substring test; terms are Spanish/English only.
pub const DATE_COLUMN_TERMS: &[&str] = &["fecha", "date"];

/// Header terms identifying the owner (advisor) column.
pub const OWNER_COLUMN_TERMS: &[&str] = &["asesor", "vendedor", "propietario"];

/// Status assigned to CRM leads that carry no `hs_lead_status`.
pub const DEFAULT_CRM_STATUS: &str = "new";

// ============ HubSpot ============

/// Business rule: a CRM lead counts as contacted once sales ops has assigned it
/// an owner. Present means non-null and, for strings, non-blank.
pub fn contacted_by_assignment(owner_id: &Value) -> bool {
    crm_owner(owner_id).is_some()
}

fn crm_owner(owner_id: &Value) -> Option<Owner> {
    match owner_id {
        Value::Null => None,
        Value::String(id) => {
            let id = id.trim();
            if id.is_empty() {
                None
            } else {
                Some(Owner::Named(id.to_string()))
            }
        }
        _ => Some(Owner::Unnamed),
    }
}

/// Parses a HubSpot `createdate` value.
///
/// Accepts epoch milliseconds (numeric string or JSON number) and RFC 3339,
/// which is what the v3 search endpoint returns.
pub fn parse_crm_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(millis) = raw.parse::<i64>() {
                return Utc.timestamp_millis_opt(millis).single();
            }
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn crm_id(id: &Value) -> Option<String> {
    match id {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Normalizes one raw HubSpot contact.
///
/// Returns `None` for records that cannot be decoded or carry no usable
/// id or creation date.
pub fn normalize_hubspot_contact(raw: &Value) -> Option<Lead> {
    let contact: HubspotContact = match serde_json::from_value(raw.clone()) {
        Ok(contact) => contact,
        Err(e) => {
            tracing::debug!("Skipping malformed HubSpot contact: {}", e);
            return None;
        }
    };

    let Some(id) = crm_id(&contact.id) else {
        tracing::debug!("Skipping HubSpot contact without id");
        return None;
    };

    let Some(created_at) = parse_crm_timestamp(&contact.properties.createdate) else {
        tracing::debug!("Skipping HubSpot contact {} without valid createdate", id);
        return None;
    };

    let owner_id = &contact.properties.hubspot_owner_id;
    let status = contact
        .properties
        .hs_lead_status
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CRM_STATUS.to_string());

    Some(Lead {
        id: format!("{}-{}", LeadSource::Hubspot.id_prefix(), id),
        created_at,
        is_contacted: contacted_by_assignment(owner_id),
        owner: crm_owner(owner_id),
        source: LeadSource::Hubspot,
        status: Some(status),
    })
}

/// Normalizes a batch of raw HubSpot contacts, dropping malformed ones.
pub fn normalize_hubspot_contacts(raw: &[Value]) -> Vec<Lead> {
    let leads: Vec<Lead> = raw.iter().filter_map(normalize_hubspot_contact).collect();

    if leads.len() < raw.len() {
        tracing::warn!(
            "Dropped {} of {} HubSpot contacts during normalization",
            raw.len() - leads.len(),
            raw.len()
        );
    }

    leads
}

// ============ Google Sheets ============

/// Index of the leftmost header containing any of `terms`.
///
/// Column position decides, not term order: `["Date", "Fecha de nacimiento"]`
/// resolves to the first column.
pub fn find_column(headers: &[String], terms: &[&str]) -> Option<usize> {
    headers.iter().map(|h| h.to_lowercase()).position(|header| {
        terms.iter().any(|term| header.contains(term))
    })
}

/// Column roles discovered from a spreadsheet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetColumns {
    pub date: usize,
    pub owner: Option<usize>,
}

impl SheetColumns {
    /// Returns `None` when no date column exists; the sheet is then unusable.
    pub fn discover(headers: &[String]) -> Option<Self> {
        Some(Self {
            date: find_column(headers, DATE_COLUMN_TERMS)?,
            owner: find_column(headers, OWNER_COLUMN_TERMS),
        })
    }
}

/// Business rule: a spreadsheet lead counts as contacted when its advisor
/// cell holds a non-blank name.
pub fn contacted_by_owner_cell(cell: Option<&str>) -> bool {
    cell.is_some_and(|value| !value.trim().is_empty())
}

fn day_first_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
            .expect("static day-first date pattern")
    })
}

fn parse_standard_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_day_first(value: &str) -> Option<DateTime<Utc>> {
    let caps = day_first_pattern().captures(value)?;
    let number = |i: usize| -> Option<u32> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let date = NaiveDate::from_ymd_opt(caps[3].parse().ok()?, number(2)?, number(1)?)?;
    let time = NaiveTime::from_hms_opt(number(4)?, number(5)?, number(6)?)?;

    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Parses a spreadsheet date cell.
///
/// Standard formats (RFC 3339, ISO 8601, RFC 2822) are tried first, then
/// `DD/MM/YYYY` with an optional `HH:MM[:SS]` suffix. Impossible calendar
/// dates (e.g. `31/02/2024`) are rejected rather than rolled over.
/// Ambiguous slash dates are always day-first: `05/03/2024` is 5 March, never 3 May.
pub fn parse_sheet_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    parse_standard_datetime(value).or_else(|| parse_day_first(value))
}

/// Normalizes a Google Sheets grid.
///
/// Rows outside `range` are rejected here rather than in a later pass. A
/// sheet without a recognizable date column yields no leads at all; bad
/// rows are dropped one by one.
pub fn normalize_sheet(grid: &ValueRange, range: Option<&DateRange>) -> Vec<Lead> {
    if grid.values.len() < 2 {
        return Vec::new();
    }

    let Some(headers) = grid.header() else {
        return Vec::new();
    };

    let Some(columns) = SheetColumns::discover(headers) else {
        tracing::error!(
            "No date column found in Google Sheets header {:?}; ignoring {} rows",
            headers,
            grid.values.len() - 1
        );
        return Vec::new();
    };

    let mut leads = Vec::new();
    let mut invalid_dates = 0usize;

    for (index, row) in grid.data_rows() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let Some(raw_date) = row
            .get(columns.date)
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
        else {
            continue;
        };

        let Some(created_at) = parse_sheet_date(raw_date) else {
            invalid_dates += 1;
            tracing::warn!("Invalid date format in sheet row {}: {}", index + 1, raw_date);
            continue;
        };

        let owner_cell = columns
            .owner
            .and_then(|column| row.get(column))
            .map(String::as_str);

        leads.push(Lead {
            id: format!("{}-{}", LeadSource::GoogleSheets.id_prefix(), index),
            created_at,
            is_contacted: contacted_by_owner_cell(owner_cell),
            owner: owner_cell
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| Owner::Named(name.to_string())),
            source: LeadSource::GoogleSheets,
            status: None,
        });
    }

    let leads = match range {
        Some(range) => filter_by_range(leads, range),
        None => leads,
    };

    tracing::debug!(
        "Normalized {} Google Sheets leads ({} rows with invalid dates)",
        leads.len(),
        invalid_dates
    );

    leads
}
