//! Coercion of raw visit rows into typed records.
//!
//! All defaulting policy for partially-filled historical data lives here,
//! in one pure function, instead of ad hoc fills at the call sites:
//! unparseable invoices become 0, missing text columns become empty
//! strings, absent coordinates become NaN, and the month bucket is derived
//! exactly when the visit date parses. Normalization is idempotent: the
//! wire projection of a normalized table normalizes back to itself.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::store::VisitRow;
use crate::visits::{VisitRecord, month_bucket};

/// Normalize a raw visit table. Empty input passes through unchanged.
pub fn normalize(rows: &[VisitRow]) -> Vec<VisitRecord> {
    rows.iter().map(normalize_row).collect()
}

fn normalize_row(row: &VisitRow) -> VisitRecord {
    let visit_date = parse_visit_date(&row.visit_date);
    VisitRecord {
        visit_date,
        staff_name: row.staff_name.trim().to_string(),
        customer_name: row.customer_name.trim().to_string(),
        city: row.city.trim().to_string(),
        region: row.region.trim().to_string(),
        address: row.address.trim().to_string(),
        phone: row.phone.trim().to_string(),
        invoice_value: coerce_invoice(&row.invoice_value),
        notes: row.notes.trim().to_string(),
        latitude: coerce_coordinate(&row.latitude),
        longitude: coerce_coordinate(&row.longitude),
        client_profiles: row.client_profiles.trim().to_string(),
        month_bucket: visit_date.map(month_bucket),
    }
}

/// Accepts the two shapes the collection app has written over time; any
/// other value is the null marker.
pub fn parse_visit_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .map(|dt| dt.date())
        })
        .ok()
}

/// Invoice values must be non-negative; junk and negatives coerce to 0.
fn coerce_invoice(raw: &str) -> Decimal {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|value| *value >= Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}

fn coerce_coordinate(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}
