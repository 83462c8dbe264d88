//! Conjunction of user-selected predicates over the normalized visit table.

use chrono::NaiveDate;

use crate::visits::VisitRecord;

/// Active filter criteria. An empty predicate is a no-op for its category;
/// the categories compose by logical AND.
#[derive(Debug, Clone, Default)]
pub struct VisitFilter {
    /// Inclusive start/end over `visit_date`. When set, rows with no
    /// parseable date are excluded.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub regions: Vec<String>,
    pub cities: Vec<String>,
    pub staff: Vec<String>,
    /// A record matches when ANY selected profile appears in its
    /// comma-joined profile string. This is deliberately a membership test,
    /// not set equality: {"Residencial","Comercial"} matches a selection of
    /// just {"Comercial"}.
    pub client_profiles: Vec<String>,
}

impl VisitFilter {
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none()
            && self.regions.is_empty()
            && self.cities.is_empty()
            && self.staff.is_empty()
            && self.client_profiles.is_empty()
    }

    fn matches(&self, record: &VisitRecord) -> bool {
        if let Some((start, end)) = self.date_range {
            match record.visit_date {
                Some(date) if date >= start && date <= end => {}
                _ => return false,
            }
        }
        if !self.regions.is_empty() && !self.regions.iter().any(|r| *r == record.region) {
            return false;
        }
        if !self.cities.is_empty() && !self.cities.iter().any(|c| *c == record.city) {
            return false;
        }
        if !self.staff.is_empty() && !self.staff.iter().any(|s| *s == record.staff_name) {
            return false;
        }
        if !self.client_profiles.is_empty()
            && !self
                .client_profiles
                .iter()
                .any(|p| record.client_profiles.contains(p.as_str()))
        {
            return false;
        }
        true
    }
}

/// Apply the filter, keeping input order.
pub fn apply(records: &[VisitRecord], filter: &VisitFilter) -> Vec<VisitRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}
