use crate::models::{Lead, LeadSource};
use serde::Serialize;
use std::collections::BTreeMap;

/// Lead counts for one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub total: usize,
    pub uncontacted: usize,
}

impl SourceStats {
    fn from_leads(leads: &[Lead]) -> Self {
        Self {
            total: leads.len(),
            uncontacted: leads.iter().filter(|lead| !lead.is_contacted).count(),
        }
    }

    pub fn contacted(&self) -> usize {
        self.total - self.uncontacted
    }
}

/// Summary statistics for one refresh.
///
/// Always rebuilt from the full lead lists; never merged into a previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub uncontacted: usize,
    pub hubspot: SourceStats,
    pub google_sheets: SourceStats,
    /// Owner name → lead count. Unassigned leads are not represented.
    pub by_owner: BTreeMap<String, usize>,
}

/// One row of the owner table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerShare {
    pub owner: String,
    pub leads: usize,
    /// Share of all leads, one decimal.
    pub percentage: f64,
}

/// One slice of the source distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceShare {
    pub source: LeadSource,
    pub label: &'static str,
    pub leads: usize,
}

/// Computes statistics over both sources' leads.
///
/// # Arguments
///
/// * `hubspot` - Normalized HubSpot leads.
/// * `sheets` - Normalized Google Sheets leads.
///
/// # Returns
///
/// * `Stats` - Totals, per-source counts and the owner distribution.
pub fn compute_stats(hubspot: &[Lead], sheets: &[Lead]) -> Stats {
    let hubspot_stats = SourceStats::from_leads(hubspot);
    let sheets_stats = SourceStats::from_leads(sheets);

    let mut by_owner: BTreeMap<String, usize> = BTreeMap::new();
    for lead in hubspot.iter().chain(sheets) {
        if let Some(name) = lead.owner_name() {
            *by_owner.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    Stats {
        total: hubspot_stats.total + sheets_stats.total,
        uncontacted: hubspot_stats.uncontacted + sheets_stats.uncontacted,
        hubspot: hubspot_stats,
        google_sheets: sheets_stats,
        by_owner,
    }
}

/// Rounded share of contacted leads, 0 when there are no leads.
pub fn contacted_percentage(total: usize, uncontacted: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let contacted = total.saturating_sub(uncontacted);
    ((contacted as f64 / total as f64) * 100.0).round() as u32
}

impl Stats {
    pub fn contacted(&self) -> usize {
        self.total - self.uncontacted
    }

    pub fn contacted_percentage(&self) -> u32 {
        contacted_percentage(self.total, self.uncontacted)
    }

    pub fn for_source(&self, source: LeadSource) -> SourceStats {
        match source {
            LeadSource::Hubspot => self.hubspot,
            LeadSource::GoogleSheets => self.google_sheets,
        }
    }

    /// Owners sorted by lead count (descending), ties broken by name.
    pub fn owner_table(&self) -> Vec<OwnerShare> {
        let mut rows: Vec<OwnerShare> = self
            .by_owner
            .iter()
            .map(|(owner, &leads)| OwnerShare {
                owner: owner.clone(),
                leads,
                percentage: if self.total > 0 {
                    ((leads as f64 / self.total as f64) * 1000.0).round() / 10.0
                } else {
                    0.0
                },
            })
            .collect();

        rows.sort_by(|a, b| b.leads.cmp(&a.leads).then_with(|| a.owner.cmp(&b.owner)));
        rows
    }

    pub fn source_distribution(&self) -> Vec<SourceShare> {
        LeadSource::ALL
            .into_iter()
            .map(|source| SourceShare {
                source,
                label: source.label(),
                leads: self.for_source(source).total,
            })
            .collect()
    }
}
