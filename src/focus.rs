//! Weekly-focus generator: pick the highest-potential clients from the
//! filtered table and render a message the team can paste into chat.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::visits::VisitRecord;

/// Clients worth prioritizing: invoice at or above the floor, largest
/// first, capped at `top_n`. Ties break by customer name so the selection
/// is stable.
pub fn focus_clients(
    records: &[VisitRecord],
    min_invoice: Decimal,
    top_n: usize,
) -> Vec<&VisitRecord> {
    let mut eligible: Vec<&VisitRecord> = records
        .iter()
        .filter(|r| r.invoice_value >= min_invoice)
        .collect();
    eligible.sort_by(|a, b| {
        b.invoice_value
            .cmp(&a.invoice_value)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });
    eligible.truncate(top_n);
    eligible
}

/// Render the copy-pasteable team message.
pub fn focus_message(clients: &[&VisitRecord], today: NaiveDate) -> String {
    let mut message = format!(
        "FOCO DA SEMANA - {}\n\nEquipe, vamos priorizar o contato com os seguintes \
         clientes de alto potencial:\n\n",
        today.format("%d/%m/%Y")
    );
    for client in clients {
        message.push_str(&format!(
            "Cliente: {}\nCidade: {}\nTelefone: {}\nPotencial (fatura): R$ {}\n\
             --------------------------------------\n",
            client.customer_name,
            client.city,
            client.phone,
            client.invoice_value.round_dp(2),
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::visits::VisitRecord;

    use super::{focus_clients, focus_message};

    fn visit(customer: &str, invoice: rust_decimal::Decimal) -> VisitRecord {
        VisitRecord {
            visit_date: NaiveDate::from_ymd_opt(2025, 7, 1),
            staff_name: "Ana Julia".to_string(),
            customer_name: customer.to_string(),
            city: "Goiânia".to_string(),
            region: "GO".to_string(),
            address: String::new(),
            phone: "62 99999-0000".to_string(),
            invoice_value: invoice,
            notes: String::new(),
            latitude: f64::NAN,
            longitude: f64::NAN,
            client_profiles: String::new(),
            month_bucket: Some("2025-07".to_string()),
        }
    }

    #[test]
    fn selection_applies_floor_cap_and_ordering() {
        let records = vec![
            visit("Padaria Sul", dec!(450)),
            visit("Mercado Central", dec!(900)),
            visit("Auto Peças Norte", dec!(700)),
            visit("Condomínio Leste", dec!(600)),
        ];
        let picked = focus_clients(&records, dec!(500), 2);
        let names: Vec<&str> = picked.iter().map(|c| c.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Mercado Central", "Auto Peças Norte"]);
    }

    #[test]
    fn message_lists_each_client_with_contact_details() {
        let records = vec![visit("Mercado Central", dec!(900))];
        let picked = focus_clients(&records, dec!(0), 5);
        let today = NaiveDate::from_ymd_opt(2025, 7, 8).expect("date");

        let message = focus_message(&picked, today);
        assert!(message.starts_with("FOCO DA SEMANA - 08/07/2025"));
        assert!(message.contains("Cliente: Mercado Central"));
        assert!(message.contains("Telefone: 62 99999-0000"));
        assert!(message.contains("Potencial (fatura): R$ 900.00"));
    }

    #[test]
    fn empty_selection_renders_just_the_header() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 8).expect("date");
        let message = focus_message(&[], today);
        assert!(message.contains("FOCO DA SEMANA"));
        assert!(!message.contains("Cliente:"));
    }
}
