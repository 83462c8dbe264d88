//! The visit table: one record per client visit logged by the collection
//! app, plus the typed view this crate derives from it.

pub mod aggregate;
pub mod filter;
pub mod normalize;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::store::VisitRow;

/// A normalized visit. Coercion policy lives in [`normalize`]; this type
/// only holds the result.
///
/// `latitude`/`longitude` use NaN to encode "not captured", so equality
/// treats two NaN coordinates as the same value.
#[derive(Debug, Clone)]
pub struct VisitRecord {
    pub visit_date: Option<NaiveDate>,
    pub staff_name: String,
    pub customer_name: String,
    pub city: String,
    pub region: String,
    pub address: String,
    pub phone: String,
    pub invoice_value: Decimal,
    pub notes: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Comma-joined profile labels, exactly as stored.
    pub client_profiles: String,
    /// Year-month label ("2025-07"), defined iff `visit_date` parsed.
    pub month_bucket: Option<String>,
}

impl PartialEq for VisitRecord {
    fn eq(&self, other: &Self) -> bool {
        self.visit_date == other.visit_date
            && self.staff_name == other.staff_name
            && self.customer_name == other.customer_name
            && self.city == other.city
            && self.region == other.region
            && self.address == other.address
            && self.phone == other.phone
            && self.invoice_value == other.invoice_value
            && self.notes == other.notes
            && coord_eq(self.latitude, other.latitude)
            && coord_eq(self.longitude, other.longitude)
            && self.client_profiles == other.client_profiles
            && self.month_bucket == other.month_bucket
    }
}

fn coord_eq(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

impl VisitRecord {
    /// Project back onto the wire columns (used by the export surface and
    /// by the normalizer's idempotence contract).
    pub fn to_row(&self) -> VisitRow {
        VisitRow {
            visit_date: self
                .visit_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            staff_name: self.staff_name.clone(),
            customer_name: self.customer_name.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            invoice_value: self.invoice_value.to_string(),
            notes: self.notes.clone(),
            latitude: coord_to_wire(self.latitude),
            longitude: coord_to_wire(self.longitude),
            client_profiles: self.client_profiles.clone(),
        }
    }

    /// True when the record carries plottable coordinates. The collection
    /// app writes blank cells (here NaN) when no fix was captured, and a
    /// few historical rows carry a bogus (0, 0).
    pub fn has_geo_fix(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && !(self.latitude == 0.0 && self.longitude == 0.0)
    }
}

fn coord_to_wire(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Year-month bucket label for temporal grouping.
pub fn month_bucket(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
