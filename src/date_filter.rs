use crate::models::{DateRange, Lead};

/// Keeps leads created within `range` (inclusive, full timestamp precision).
///
/// Safe to apply to lists the provider already filtered at request time:
/// a lead inside the range is never dropped.
pub fn filter_by_range(leads: Vec<Lead>, range: &DateRange) -> Vec<Lead> {
    let before = leads.len();
    let kept: Vec<Lead> = leads
        .into_iter()
        .filter(|lead| range.contains(lead.created_at))
        .collect();

    if kept.len() < before {
        tracing::debug!(
            "Date filter {} → {} dropped {} of {} leads",
            range.start,
            range.end,
            before - kept.len(),
            before
        );
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadSource;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn lead(id: &str, y: i32, m: u32, d: u32, h: u32) -> Lead {
        Lead {
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            is_contacted: false,
            owner: None,
            source: LeadSource::Hubspot,
            status: None,
        }
    }

    fn march() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
    }

    #[test]
    fn test_keeps_boundary_days() {
        let leads = vec![
            lead("a", 2024, 2, 29, 23),
            lead("b", 2024, 3, 1, 0),
            lead("c", 2024, 3, 31, 23),
            lead("d", 2024, 4, 1, 0),
        ];

        let kept: Vec<String> = filter_by_range(leads, &march())
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(kept, vec!["b", "c"]);
    }

    #[test]
    fn test_refiltering_is_stable() {
        let leads = vec![lead("a", 2024, 3, 5, 12), lead("b", 2024, 3, 20, 8)];
        let once = filter_by_range(leads, &march());
        let twice = filter_by_range(once.clone(), &march());
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
    }
}
