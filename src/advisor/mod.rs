//! Narrative advisor: digest the filtered table and ask a text-generation
//! service for prose analysis.
//!
//! The digest is a fixed-shape summary built locally; only that summary
//! leaves the process, never the raw table. The advisor is optional and the
//! only component with a network dependency: without an API key it reports
//! itself disabled, and a service failure surfaces as a tagged message with
//! no retry.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::visits::VisitRecord;
use crate::visits::aggregate::{headline, top_cities_by_mean_invoice, visits_per_staff};
use crate::visits::filter::VisitFilter;

/// Fixed-shape textual digest of the filtered table and active filters.
pub fn build_digest(records: &[VisitRecord], filter: &VisitFilter) -> String {
    let period = match filter.date_range {
        Some((start, end)) => format!("{start} to {end}"),
        None => "all dates".to_string(),
    };
    let h = headline(records);
    let top_cities: Vec<String> = top_cities_by_mean_invoice(records, 3)
        .into_iter()
        .map(|c| format!("{} (R$ {})", c.city, c.mean_invoice))
        .collect();
    let top_staff: Vec<String> = visits_per_staff(records)
        .into_iter()
        .take(3)
        .map(|s| format!("{} ({} visits)", s.staff_name, s.visits))
        .collect();

    format!(
        "Field-visit data for a solar energy company. \
         Period: {period}. \
         Regions: {regions}. Cities: {cities}. \
         Total visits: {visits}. Mean invoice: R$ {mean}. \
         Top 3 cities by mean invoice: {top_cities}. \
         Top 3 staff by visit count: {top_staff}.",
        regions = selection_label(&filter.regions),
        cities = selection_label(&filter.cities),
        visits = h.visits,
        mean = h.mean_invoice,
        top_cities = list_label(&top_cities),
        top_staff = list_label(&top_staff),
    )
}

fn selection_label(selected: &[String]) -> String {
    if selected.is_empty() {
        "all".to_string()
    } else {
        selected.join(", ")
    }
}

fn list_label(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join("; ")
    }
}

fn build_prompt(digest: &str) -> String {
    format!(
        "You are a strategy consultant for a solar energy company. \
         Based on this summary: {digest}\n\n\
         Write an analysis in Markdown with: \
         1. **Executive Summary**. \
         2. **Highlights** (3 to 5 bullet points). \
         3. **Strategic Recommendations** (3 clear actions)."
    )
}

/// Advisor facade the CLI talks to.
pub enum Advisor {
    Enabled(GeminiClient),
    Disabled,
}

impl Advisor {
    pub fn from_config(config: &AdvisorConfig) -> Self {
        match &config.api_key {
            Some(key) => Self::Enabled(GeminiClient::new(key, &config.model)),
            None => Self::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// One blocking request per "generate analysis" action. The caller
    /// renders the error inline and must not retry.
    pub async fn generate_analysis(
        &self,
        records: &[VisitRecord],
        filter: &VisitFilter,
    ) -> Result<String, AdvisorError> {
        match self {
            Self::Disabled => Err(AdvisorError::Disabled),
            Self::Enabled(client) => {
                let prompt = build_prompt(&build_digest(records, filter));
                client.generate(&prompt).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::visits::VisitRecord;
    use crate::visits::filter::VisitFilter;

    use super::build_digest;

    fn visit(staff: &str, invoice: rust_decimal::Decimal, city: &str) -> VisitRecord {
        VisitRecord {
            visit_date: NaiveDate::from_ymd_opt(2025, 7, 1),
            staff_name: staff.to_string(),
            customer_name: "Cliente".to_string(),
            city: city.to_string(),
            region: "GO".to_string(),
            address: String::new(),
            phone: String::new(),
            invoice_value: invoice,
            notes: String::new(),
            latitude: f64::NAN,
            longitude: f64::NAN,
            client_profiles: String::new(),
            month_bucket: Some("2025-07".to_string()),
        }
    }

    #[test]
    fn digest_carries_every_fixed_field() {
        let records = vec![
            visit("Ana Julia", dec!(600), "Goiânia"),
            visit("Ana Julia", dec!(400), "Goiânia"),
            visit("Bruno Carvalho", dec!(900), "Campinas"),
        ];
        let filter = VisitFilter {
            date_range: Some((
                NaiveDate::from_ymd_opt(2025, 7, 1).expect("date"),
                NaiveDate::from_ymd_opt(2025, 7, 31).expect("date"),
            )),
            regions: vec!["GO".to_string(), "SP".to_string()],
            ..VisitFilter::default()
        };

        let digest = build_digest(&records, &filter);
        assert!(digest.contains("Period: 2025-07-01 to 2025-07-31"));
        assert!(digest.contains("Regions: GO, SP"));
        assert!(digest.contains("Cities: all"));
        assert!(digest.contains("Total visits: 3"));
        assert!(digest.contains("Mean invoice: R$ 633.33"));
        assert!(digest.contains("Campinas (R$ 900.00)"));
        assert!(digest.contains("Ana Julia (2 visits)"));
    }

    #[test]
    fn digest_of_empty_table_stays_total() {
        let digest = build_digest(&[], &VisitFilter::default());
        assert!(digest.contains("Period: all dates"));
        assert!(digest.contains("Total visits: 0"));
        assert!(digest.contains("Top 3 cities by mean invoice: none"));
        assert!(digest.contains("Top 3 staff by visit count: none"));
    }
}
