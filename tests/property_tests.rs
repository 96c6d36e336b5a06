/// Property-based tests using proptest
/// Tests aggregation, binning and filtering invariants for arbitrary lead lists
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_leads_api::date_filter::filter_by_range;
use rust_leads_api::models::{DateRange, Lead, LeadSource, Owner};
use rust_leads_api::normalizer::parse_sheet_date;
use rust_leads_api::stats::{compute_stats, contacted_percentage};
use rust_leads_api::trend::bin_by_day;

fn owner_strategy() -> impl Strategy<Value = Option<Owner>> {
    prop_oneof![
        Just(None),
        Just(Some(Owner::Unnamed)),
        prop::sample::select(vec!["Leslye", "Juan Pablo", "Edgar", "Karla", "Monica"])
            .prop_map(|name| Some(Owner::Named(name.to_string()))),
    ]
}

/// Leads created anywhere in 2024 (minute precision).
fn lead_strategy(source: LeadSource) -> impl Strategy<Value = Lead> {
    (0i64..366 * 24 * 60, owner_strategy(), any::<bool>()).prop_map(
        move |(minutes, owner, contacted)| Lead {
            id: format!("{}-{}", source.id_prefix(), minutes),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
            is_contacted: contacted,
            owner,
            source,
            status: None,
        },
    )
}

fn range_strategy() -> impl Strategy<Value = DateRange> {
    (0i64..366, 0i64..60).prop_map(|(offset, length)| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset);
        DateRange::new(start, start + Duration::days(length))
    })
}

// Property: statistics are exact counts over both sources
proptest! {
    #[test]
    fn totals_are_sums_of_source_lengths(
        hubspot in prop::collection::vec(lead_strategy(LeadSource::Hubspot), 0..40),
        sheets in prop::collection::vec(lead_strategy(LeadSource::GoogleSheets), 0..40)
    ) {
        let stats = compute_stats(&hubspot, &sheets);
        let uncontacted = hubspot.iter().chain(&sheets).filter(|l| !l.is_contacted).count();

        prop_assert_eq!(stats.total, hubspot.len() + sheets.len());
        prop_assert_eq!(stats.uncontacted, uncontacted);
        prop_assert_eq!(stats.hubspot.total + stats.google_sheets.total, stats.total);
    }

    #[test]
    fn owner_map_excludes_unassigned_leads(
        hubspot in prop::collection::vec(lead_strategy(LeadSource::Hubspot), 0..40),
        sheets in prop::collection::vec(lead_strategy(LeadSource::GoogleSheets), 0..40)
    ) {
        let stats = compute_stats(&hubspot, &sheets);
        let assigned = hubspot.iter().chain(&sheets).filter(|l| l.owner.is_some()).count();
        let counted: usize = stats.by_owner.values().sum();

        prop_assert_eq!(counted, assigned);
        prop_assert!(counted <= hubspot.len() + sheets.len());
        prop_assert!(stats.by_owner.keys().all(|k| !k.trim().is_empty()));
    }

    #[test]
    fn owner_table_shares_never_exceed_total(
        sheets in prop::collection::vec(lead_strategy(LeadSource::GoogleSheets), 0..40)
    ) {
        let table = compute_stats(&[], &sheets).owner_table();
        let share: f64 = table.iter().map(|row| row.percentage).sum();
        prop_assert!(share <= 100.0 + 0.05 * table.len() as f64);
        prop_assert!(table.windows(2).all(|w| w[0].leads >= w[1].leads));
    }

    #[test]
    fn contacted_percentage_is_bounded(total in 0usize..10_000, uncontacted in 0usize..10_000) {
        let uncontacted = uncontacted.min(total);
        let pct = contacted_percentage(total, uncontacted);
        prop_assert!(pct <= 100);
        if total == 0 {
            prop_assert_eq!(pct, 0);
        }
    }
}

// Property: trend bins cover the range exactly
proptest! {
    #[test]
    fn one_bin_per_calendar_day(
        leads in prop::collection::vec(lead_strategy(LeadSource::Hubspot), 0..60),
        range in range_strategy()
    ) {
        let bins = bin_by_day(&leads, &range);
        let in_range = leads.iter().filter(|l| range.contains(l.created_at)).count();

        prop_assert_eq!(bins.len(), range.day_count());
        prop_assert_eq!(bins.total_leads(), in_range);
        prop_assert!(bins.iter().all(|(_, bin)| bin.contacted <= bin.total));
    }

    #[test]
    fn filter_keeps_exactly_in_range_leads(
        leads in prop::collection::vec(lead_strategy(LeadSource::GoogleSheets), 0..60),
        range in range_strategy()
    ) {
        let expected = leads.iter().filter(|l| range.contains(l.created_at)).count();
        let once = filter_by_range(leads, &range);
        prop_assert_eq!(once.len(), expected);

        let twice = filter_by_range(once.clone(), &range);
        prop_assert_eq!(once, twice);
    }
}

// Property: date parsing never panics and rejects impossible days
proptest! {
    #[test]
    fn sheet_date_parsing_never_panics(value in "\\PC*") {
        let _ = parse_sheet_date(&value);
    }

    #[test]
    fn day_first_dates_round_trip(day in 1u32..=31, month in 1u32..=12, year in 2000i32..2100) {
        let raw = format!("{:02}/{:02}/{}", day, month, year);
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => {
                let parsed = parse_sheet_date(&raw);
                prop_assert_eq!(parsed.map(|dt| dt.date_naive()), Some(date));
            }
            None => prop_assert!(parse_sheet_date(&raw).is_none()),
        }
    }
}
