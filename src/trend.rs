use crate::models::{DateRange, Lead};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Leads created on one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub total: usize,
    pub contacted: usize,
}

/// Per-day lead counts keyed by `YYYY-MM-DD`, one bin for every day of the
/// range (zero-filled), in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DailyBins(BTreeMap<String, DayCount>);

/// Chart-ready series derived from [`DailyBins`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub total: Vec<usize>,
    pub contacted: Vec<usize>,
}

/// Every calendar day in `range`, inclusive. Empty for an inverted range.
pub fn calendar_days(range: &DateRange) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(range.day_count());
    let mut day = range.start;

    while day <= range.end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    days
}

/// Bins leads by creation day over every day of `range`.
///
/// Leads whose day falls outside the range are ignored.
pub fn bin_by_day(leads: &[Lead], range: &DateRange) -> DailyBins {
    let mut bins: BTreeMap<String, DayCount> = calendar_days(range)
        .into_iter()
        .map(|day| (day.format("%Y-%m-%d").to_string(), DayCount::default()))
        .collect();

    let mut ignored = 0usize;
    for lead in leads {
        match bins.get_mut(&lead.day_key()) {
            Some(bin) => {
                bin.total += 1;
                if lead.is_contacted {
                    bin.contacted += 1;
                }
            }
            None => ignored += 1,
        }
    }

    if ignored > 0 {
        tracing::debug!("{} leads fell outside the trend range", ignored);
    }

    DailyBins(bins)
}

impl DailyBins {
    pub fn get(&self, day: &str) -> Option<&DayCount> {
        self.0.get(day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DayCount)> {
        self.0.iter()
    }

    pub fn total_leads(&self) -> usize {
        self.0.values().map(|bin| bin.total).sum()
    }

    pub fn series(&self) -> TrendSeries {
        let mut series = TrendSeries::default();
        for (day, bin) in &self.0 {
            series.labels.push(day.clone());
            series.total.push(bin.total);
            series.contacted.push(bin.contacted);
        }
        series
    }
}
