/// Normalization tests for both lead sources
/// Covers the documented spreadsheet and CRM examples plus edge cases
use chrono::{NaiveDate, TimeZone, Utc};
use rust_leads_api::models::{DateRange, LeadSource, Owner};
use rust_leads_api::normalizer::{normalize_hubspot_contacts, normalize_sheet};
use rust_leads_api::sheets_models::ValueRange;
use serde_json::json;

fn grid(rows: &[&[&str]]) -> ValueRange {
    ValueRange {
        range: None,
        major_dimension: None,
        values: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    }
}

#[test]
fn test_sheet_row_with_advisor_is_contacted() {
    let leads = normalize_sheet(&grid(&[&["Fecha", "Asesor"], &["15/03/2024", "Juan"]]), None);

    assert_eq!(leads.len(), 1);
    let lead = &leads[0];
    assert_eq!(lead.created_at, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
    assert!(lead.is_contacted);
    assert_eq!(lead.owner, Some(Owner::Named("Juan".to_string())));
    assert_eq!(lead.source, LeadSource::GoogleSheets);
    assert_eq!(lead.id, "sheets-1");
}

#[test]
fn test_sheet_without_date_column_yields_no_leads() {
    let leads = normalize_sheet(
        &grid(&[&["Nombre", "Telefono"], &["Ana", "5512345678"]]),
        None,
    );
    assert!(leads.is_empty());
}

#[test]
fn test_sheet_with_only_header_yields_no_leads() {
    assert!(normalize_sheet(&grid(&[&["Fecha", "Asesor"]]), None).is_empty());
    assert!(normalize_sheet(&grid(&[]), None).is_empty());
}

#[test]
fn test_sheet_drops_bad_rows_individually() {
    let leads = normalize_sheet(
        &grid(&[
            &["Nombre", "Fecha de registro", "Vendedor"],
            &["Ana", "01/03/2024", "  "],
            &[],
            &["", "", ""],
            &["Luis", "", "Karla"],
            &["Sofía", "no es fecha", "Edgar"],
            &["Diego", "2024-03-02", " Monica "],
            &["Mateo", "03/03/2024 18:45"],
        ]),
        None,
    );

    let ids: Vec<&str> = leads.iter().map(|lead| lead.id.as_str()).collect();
    assert_eq!(ids, vec!["sheets-1", "sheets-6", "sheets-7"]);

    assert!(!leads[0].is_contacted);
    assert_eq!(leads[0].owner, None);
    assert_eq!(leads[1].owner, Some(Owner::Named("Monica".to_string())));
    assert!(!leads[2].is_contacted);
    assert_eq!(
        leads[2].created_at,
        Utc.with_ymd_and_hms(2024, 3, 3, 18, 45, 0).unwrap()
    );
}

#[test]
fn test_sheet_without_owner_column_is_never_contacted() {
    let leads = normalize_sheet(&grid(&[&["Date", "Name"], &["2024-03-01", "Ana"]]), None);
    assert_eq!(leads.len(), 1);
    assert!(!leads[0].is_contacted);
}

#[test]
fn test_sheet_rows_outside_range_are_rejected() {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    );
    let leads = normalize_sheet(
        &grid(&[
            &["Fecha", "Asesor"],
            &["29/02/2024", "Juan"],
            &["01/03/2024", "Juan"],
            &["31/03/2024 23:59", "Juan"],
            &["01/04/2024", "Juan"],
        ]),
        Some(&range),
    );
    assert_eq!(leads.len(), 2);
}

#[test]
fn test_crm_owner_assignment_drives_contacted() {
    let leads = normalize_hubspot_contacts(&[
        json!({"id": "1", "properties": {"createdate": "1710496800000", "hubspot_owner_id": ""}}),
        json!({"id": "2", "properties": {"createdate": "1710496800000", "hubspot_owner_id": "88112"}}),
    ]);

    assert_eq!(leads.len(), 2);
    assert!(!leads[0].is_contacted);
    assert_eq!(leads[0].owner, None);
    assert!(leads[1].is_contacted);
    assert_eq!(leads[1].owner, Some(Owner::Named("88112".to_string())));
    assert_eq!(leads[1].id, "hubspot-2");
}

#[test]
fn test_crm_malformed_records_are_dropped() {
    let leads = normalize_hubspot_contacts(&[
        json!("not an object"),
        json!({"id": "3", "properties": {"createdate": "yesterday"}}),
        json!({"id": "4", "properties": {}}),
        json!({"properties": {"createdate": "1710496800000"}}),
        json!({"id": "5", "properties": {"createdate": "1710496800000", "hs_lead_status": "OPEN"}}),
    ]);

    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].id, "hubspot-5");
    assert_eq!(leads[0].status.as_deref(), Some("OPEN"));
}

#[test]
fn test_sheet_uses_leftmost_date_column() {
    let leads = normalize_sheet(
        &grid(&[
            &["Date", "Nombre", "Fecha de nacimiento"],
            &["15/03/2024", "Ana", "01/01/1990"],
        ]),
        None,
    );

    assert_eq!(leads.len(), 1);
    assert_eq!(
        leads[0].created_at,
        Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
    );
}
