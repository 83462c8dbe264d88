//! Grouped summaries and leaderboards over a filtered visit table.
//!
//! All functions are pure and total: an empty table yields empty results or
//! zeroed headline metrics, and zero-count groups are skipped rather than
//! divided by. Orderings are deterministic, with ties broken by group name.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::visits::VisitRecord;

/// Visit count for one staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffCount {
    pub staff_name: String,
    pub visits: u64,
}

/// A monetary aggregate (mean or sum) for one staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMoney {
    pub staff_name: String,
    pub amount: Decimal,
}

/// Mean invoice value for one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityMoney {
    pub city: String,
    pub mean_invoice: Decimal,
}

/// One month of the temporal series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySummary {
    pub month_bucket: String,
    pub visits: u64,
    pub mean_invoice: Decimal,
}

/// Whole-table headline metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub visits: u64,
    pub mean_invoice: Decimal,
    pub total_invoice: Decimal,
}

/// Visit count per staff member, most visits first, names ascending on ties.
pub fn visits_per_staff(records: &[VisitRecord]) -> Vec<StaffCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.staff_name.as_str()).or_default() += 1;
    }
    let mut out: Vec<StaffCount> = counts
        .into_iter()
        .map(|(staff_name, visits)| StaffCount {
            staff_name: staff_name.to_string(),
            visits,
        })
        .collect();
    out.sort_by(|a, b| {
        b.visits
            .cmp(&a.visits)
            .then_with(|| a.staff_name.cmp(&b.staff_name))
    });
    out
}

/// Mean invoice per staff member, rounded to 2 decimal places, descending.
pub fn mean_invoice_per_staff(records: &[VisitRecord]) -> Vec<StaffMoney> {
    money_ranking(records, |sum, count| {
        (sum / Decimal::from(count)).round_dp(2)
    })
}

/// Summed invoice per staff member, descending.
pub fn total_invoice_per_staff(records: &[VisitRecord]) -> Vec<StaffMoney> {
    money_ranking(records, |sum, _count| sum)
}

fn money_ranking<F>(records: &[VisitRecord], finish: F) -> Vec<StaffMoney>
where
    F: Fn(Decimal, u64) -> Decimal,
{
    let mut groups: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.staff_name.as_str()).or_default();
        entry.0 += record.invoice_value;
        entry.1 += 1;
    }
    let mut out: Vec<StaffMoney> = groups
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(staff_name, (sum, count))| StaffMoney {
            staff_name: staff_name.to_string(),
            amount: finish(sum, count),
        })
        .collect();
    out.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.staff_name.cmp(&b.staff_name))
    });
    out
}

/// Count, mean, and sum over the whole filtered table. Zeros when empty.
pub fn headline(records: &[VisitRecord]) -> Headline {
    let visits = records.len() as u64;
    let total_invoice: Decimal = records.iter().map(|r| r.invoice_value).sum();
    let mean_invoice = if visits == 0 {
        Decimal::ZERO
    } else {
        (total_invoice / Decimal::from(visits)).round_dp(2)
    };
    Headline {
        visits,
        mean_invoice,
        total_invoice,
    }
}

/// Top `n` cities by mean invoice value. Rows with no city are
/// unattributable and skipped.
pub fn top_cities_by_mean_invoice(records: &[VisitRecord], n: usize) -> Vec<CityMoney> {
    let mut groups: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for record in records {
        if record.city.is_empty() {
            continue;
        }
        let entry = groups.entry(record.city.as_str()).or_default();
        entry.0 += record.invoice_value;
        entry.1 += 1;
    }
    let mut out: Vec<CityMoney> = groups
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(city, (sum, count))| CityMoney {
            city: city.to_string(),
            mean_invoice: (sum / Decimal::from(count)).round_dp(2),
        })
        .collect();
    out.sort_by(|a, b| {
        b.mean_invoice
            .cmp(&a.mean_invoice)
            .then_with(|| a.city.cmp(&b.city))
    });
    out.truncate(n);
    out
}

/// Per-month visit count and mean invoice, month ascending. Rows with no
/// month bucket (unparseable date) are skipped.
pub fn monthly_summary(records: &[VisitRecord]) -> Vec<MonthlySummary> {
    let mut groups: BTreeMap<&str, (Decimal, u64)> = BTreeMap::new();
    for record in records {
        let Some(bucket) = record.month_bucket.as_deref() else {
            continue;
        };
        let entry = groups.entry(bucket).or_default();
        entry.0 += record.invoice_value;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(month_bucket, (sum, count))| MonthlySummary {
            month_bucket: month_bucket.to_string(),
            visits: count,
            mean_invoice: (sum / Decimal::from(count)).round_dp(2),
        })
        .collect()
}

/// Records with plottable coordinates, for the map surface.
pub fn geo_points(records: &[VisitRecord]) -> Vec<&VisitRecord> {
    records.iter().filter(|r| r.has_geo_fix()).collect()
}
