//! Deterministic demo records for sources without credentials.
//!
//! Records are raw source payloads, so they go through the same normalizers
//! as live data. Output depends only on the requested range.

use crate::models::DateRange;
use crate::sheets_models::ValueRange;
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use serde_json::{json, Value};

const SAMPLE_CONTACTS: usize = 15;
const SAMPLE_ROWS: usize = 20;

const SAMPLE_ADVISORS: [&str; 5] = ["Leslye", "Juan Pablo", "Edgar", "Karla", "Monica"];
const SAMPLE_NAMES: [&str; 6] = ["Ana", "Luis", "Sofía", "Diego", "Valeria", "Mateo"];

fn spread_day(range: &DateRange, index: usize, stride: usize) -> Option<chrono::NaiveDate> {
    let days = range.day_count();
    if days == 0 {
        return None;
    }
    let offset = (index * stride) % days;
    range.start.checked_add_signed(Duration::days(offset as i64))
}

/// Raw HubSpot contacts spread across `range`; about 60% carry an owner.
pub fn hubspot_contacts(range: &DateRange) -> Vec<Value> {
    (0..SAMPLE_CONTACTS)
        .filter_map(|i| {
            let day = spread_day(range, i, 7)?;
            let time = NaiveTime::from_hms_opt(8 + (i % 10) as u32, (i * 7 % 60) as u32, 0)?;
            let created = Utc.from_utc_datetime(&day.and_time(time));

            let owner = if i % 5 < 3 {
                json!(format!("owner-{}", i % 3 + 1))
            } else {
                Value::Null
            };
            let status = if i % 4 == 0 { "QUALIFIED" } else { "NEW" };

            Some(json!({
                "id": format!("sample-{}", i + 1),
                "properties": {
                    "createdate": created.timestamp_millis().to_string(),
                    "hs_lead_status": status,
                    "hubspot_owner_id": owner,
                }
            }))
        })
        .collect()
}

/// Spreadsheet grid with a Spanish header and `DD/MM/YYYY` dates across
/// `range`; about 70% of rows name an advisor.
pub fn sheet_grid(range: &DateRange) -> ValueRange {
    let header = ["Fecha", "Nombre", "Teléfono", "Asesor"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = (0..SAMPLE_ROWS)
        .filter_map(|i| {
            let day = spread_day(range, i, 3)?;
            let advisor = if i % 10 < 7 {
                SAMPLE_ADVISORS[i % SAMPLE_ADVISORS.len()]
            } else {
                ""
            };

            Some(vec![
                day.format("%d/%m/%Y").to_string(),
                SAMPLE_NAMES[i % SAMPLE_NAMES.len()].to_string(),
                format!("+52 55 1000 {:04}", i),
                advisor.to_string(),
            ])
        })
        .collect();

    ValueRange::from_rows(header, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{normalize_hubspot_contacts, normalize_sheet};
    use chrono::NaiveDate;

    fn march() -> DateRange {
        DateRange::month(2024, 3).unwrap()
    }

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(hubspot_contacts(&march()), hubspot_contacts(&march()));
        assert_eq!(sheet_grid(&march()).values, sheet_grid(&march()).values);
    }

    #[test]
    fn test_sample_normalizes_inside_range() {
        let range = march();

        let crm = normalize_hubspot_contacts(&hubspot_contacts(&range));
        assert_eq!(crm.len(), SAMPLE_CONTACTS);
        assert!(crm.iter().all(|lead| range.contains(lead.created_at)));
        assert_eq!(crm.iter().filter(|lead| lead.is_contacted).count(), 9);

        let sheet = normalize_sheet(&sheet_grid(&range), Some(&range));
        assert_eq!(sheet.len(), SAMPLE_ROWS);
        assert_eq!(sheet.iter().filter(|lead| lead.is_contacted).count(), 14);
    }

    #[test]
    fn test_single_day_range() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let range = DateRange::new(day, day);

        let sheet = normalize_sheet(&sheet_grid(&range), Some(&range));
        assert_eq!(sheet.len(), SAMPLE_ROWS);
        assert!(sheet.iter().all(|lead| lead.day_key() == "2024-03-09"));
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        assert!(hubspot_contacts(&range).is_empty());
        assert_eq!(sheet_grid(&range).values.len(), 1);
    }
}
