//! End-to-end flow over real CSV files: load, normalize, filter, aggregate,
//! then the gated goal and action write paths through the same stores.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use solarops::actions::{ActionDraft, ActionFilter, ActionTracker};
use solarops::export;
use solarops::goals::{GoalDraft, GoalTracker, ManagerGate, UpsertOutcome};
use solarops::store::{ActionStatus, CsvStores, GoalMetric, GoalStore, VisitStore};
use solarops::visits::aggregate;
use solarops::visits::filter::{VisitFilter, apply};
use solarops::visits::normalize::normalize;

const VISITS_CSV: &str = "\
data_visita,nome_funcionario,nome_consumidor,cidade,estado,endereco,telefone,valor_fatura_r$,observacoes,latitude,longitude,perfil_cliente
2025-07-01,Ana Julia,Mercado Central,Goiânia,GO,Rua 10,62 9000-0001,600,interessado,-16.68,-49.25,Comercial
2025-07-02,Bruno Carvalho,Sítio Boa Vista,Anápolis,GO,,62 9000-0002,1200.50,,,,\"Residencial, Agronegócio\"
2025-07-03,Ana Julia,Condomínio Sol,Goiânia,GO,,,450,,,,Condomínio
2025-08-01,Carla Dias,Padaria Trigo,Brasília,DF,,,abc,,junk,junk,Comercial
sem-data,Bruno Carvalho,Loja Azul,Goiânia,GO,,,-300,,,,Comercial
";

fn stores(dir: &tempfile::TempDir) -> Arc<CsvStores> {
    Arc::new(CsvStores::new(
        dir.path().join("dados_visitas.csv"),
        dir.path().join("metas_equipe.csv"),
        dir.path().join("planos_de_acao.csv"),
    ))
}

#[tokio::test]
async fn load_normalize_filter_aggregate_over_csv_fixture() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("dados_visitas.csv"), VISITS_CSV).expect("write fixture");
    let stores = stores(&dir);

    let rows = stores.load_visits().await.expect("load visits");
    assert_eq!(rows.len(), 5);

    let records = normalize(&rows);
    // Junk invoice coerces to zero, negatives clamp to zero, junk date drops.
    assert_eq!(records[3].invoice_value, dec!(0));
    assert_eq!(records[4].invoice_value, dec!(0));
    assert_eq!(records[4].visit_date, None);
    assert_eq!(records[0].month_bucket.as_deref(), Some("2025-07"));

    let filter = VisitFilter {
        date_range: Some((
            NaiveDate::from_ymd_opt(2025, 7, 1).expect("date"),
            NaiveDate::from_ymd_opt(2025, 7, 31).expect("date"),
        )),
        regions: vec!["GO".to_string()],
        ..VisitFilter::default()
    };
    let july = apply(&records, &filter);
    assert_eq!(july.len(), 3);

    let counts = aggregate::visits_per_staff(&july);
    assert_eq!(counts[0].staff_name, "Ana Julia");
    assert_eq!(counts[0].visits, 2);

    let headline = aggregate::headline(&july);
    assert_eq!(headline.visits, 3);
    assert_eq!(headline.mean_invoice, dec!(750.17));

    // The filtered table exports with the collection app's exact header.
    let bytes = export::to_csv_bytes(&july).expect("export");
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.starts_with(
        "data_visita,nome_funcionario,nome_consumidor,cidade,estado,endereco,\
         telefone,valor_fatura_r$,observacoes,latitude,longitude,perfil_cliente\n"
    ));
}

#[tokio::test]
async fn goal_upsert_persists_and_replaces_through_csv_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stores = stores(&dir);
    let tracker = GoalTracker::new(
        stores.clone(),
        ManagerGate::new(Some("segredo".to_string())),
    );

    let draft = GoalDraft {
        staff_name: "Ana Julia".to_string(),
        metric: GoalMetric::VisitCount,
        target_value: dec!(30),
        period: "Julho/2025".to_string(),
    };
    let outcome = tracker.upsert_goal("segredo", &draft).await.expect("upsert");
    let UpsertOutcome::Saved(saved) = outcome else {
        panic!("expected save, got denial");
    };
    assert_eq!(saved.goal_id, "META-Ana Julia-Julho-2025");

    // Same (staff, period) replaces rather than duplicates.
    let revised = GoalDraft {
        target_value: dec!(40),
        ..draft.clone()
    };
    tracker.upsert_goal("segredo", &revised).await.expect("upsert");
    let goals = stores.load_goals().await.expect("reload");
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].target_value, dec!(40));

    // A bad credential is a silent denial and writes nothing.
    let intruder = GoalDraft {
        period: "Agosto/2025".to_string(),
        ..draft
    };
    let outcome = tracker.upsert_goal("errado", &intruder).await.expect("upsert");
    assert_eq!(outcome, UpsertOutcome::Denied);
    assert_eq!(stores.load_goals().await.expect("reload").len(), 1);
}

#[tokio::test]
async fn action_append_round_trips_through_csv_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stores = stores(&dir);
    let tracker = ActionTracker::new(stores.clone());

    let now = Utc.with_ymd_and_hms(2025, 7, 10, 9, 0, 0).single().expect("timestamp");
    let draft = ActionDraft {
        source_narrative: "Focar no interior".to_string(),
        specific_action: "Visitar Anápolis duas vezes por semana".to_string(),
        owner: "Bruno Carvalho".to_string(),
        due_date: NaiveDate::from_ymd_opt(2025, 7, 20).expect("date"),
        status: ActionStatus::Todo,
    };
    let record = tracker.append_action(&draft, now).await.expect("append");
    assert_eq!(record.action_id, format!("ACAO-{}", now.timestamp()));

    let listed = tracker
        .list_actions(&ActionFilter {
            owners: vec!["Bruno Carvalho".to_string()],
            statuses: vec![ActionStatus::Todo],
        })
        .await
        .expect("list");
    assert_eq!(listed, vec![record]);
}
