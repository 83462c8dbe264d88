//! Store abstraction layer.
//!
//! Each persisted entity type is backed by exactly one flat tabular store,
//! reached through a narrow trait so callers never touch file paths. The one
//! provided backend is CSV (`CsvStores`); the traits are the seam for
//! swapping in an embedded table store without changing call sites.
//!
//! Wire column names are the collection app's Portuguese headers and must
//! not change: the visit store is shared with an external writer.

pub mod csv;

pub use self::csv::CsvStores;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One raw row of the visit store, exactly as the collection app wrote it.
///
/// Every field is a string: coercion to typed values is the normalizer's
/// job, so historical rows with blank or junk cells still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRow {
    #[serde(rename = "data_visita", default)]
    pub visit_date: String,
    #[serde(rename = "nome_funcionario", default)]
    pub staff_name: String,
    #[serde(rename = "nome_consumidor", default)]
    pub customer_name: String,
    #[serde(rename = "cidade", default)]
    pub city: String,
    #[serde(rename = "estado", default)]
    pub region: String,
    #[serde(rename = "endereco", default)]
    pub address: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
    #[serde(rename = "valor_fatura_r$", default)]
    pub invoice_value: String,
    #[serde(rename = "observacoes", default)]
    pub notes: String,
    #[serde(rename = "latitude", default)]
    pub latitude: String,
    #[serde(rename = "longitude", default)]
    pub longitude: String,
    #[serde(rename = "perfil_cliente", default)]
    pub client_profiles: String,
}

/// Metric a goal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalMetric {
    VisitCount,
    AverageInvoice,
}

impl GoalMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VisitCount => "visit_count",
            Self::AverageInvoice => "average_invoice",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "visit_count" => Some(Self::VisitCount),
            "average_invoice" => Some(Self::AverageInvoice),
            _ => None,
        }
    }
}

/// A target for one staff member over one period. At most one goal exists
/// per (staff, period); the id is derived from that pair and used as the
/// upsert key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    #[serde(rename = "id_meta")]
    pub goal_id: String,
    #[serde(rename = "funcionario")]
    pub staff_name: String,
    #[serde(rename = "metrica")]
    pub metric: GoalMetric,
    #[serde(rename = "valor_meta")]
    pub target_value: Decimal,
    #[serde(rename = "periodo")]
    pub period: String,
}

/// Action item state. There is no update path: status is set once at
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Todo,
    InProgress,
    Done,
}

impl ActionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// A task derived from a narrative recommendation. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "id_acao")]
    pub action_id: String,
    #[serde(rename = "recomendacao_ia")]
    pub source_narrative: String,
    #[serde(rename = "acao_especifica")]
    pub specific_action: String,
    #[serde(rename = "responsavel")]
    pub owner: String,
    #[serde(rename = "prazo")]
    pub due_date: NaiveDate,
    #[serde(rename = "status")]
    pub status: ActionStatus,
    #[serde(rename = "data_criacao")]
    pub created_at: DateTime<Utc>,
}

/// Read access to the visit log. This crate never writes it.
#[async_trait]
pub trait VisitStore: Send + Sync {
    async fn load_visits(&self) -> Result<Vec<VisitRow>, StoreError>;
}

/// Goal persistence. Writes replace the whole table; upsert composition
/// lives in the goal tracker.
#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn load_goals(&self) -> Result<Vec<GoalRecord>, StoreError>;
    async fn save_goals(&self, goals: &[GoalRecord]) -> Result<(), StoreError>;
}

/// Action-plan persistence. Same whole-table write discipline as goals.
#[async_trait]
pub trait ActionStore: Send + Sync {
    async fn load_actions(&self) -> Result<Vec<ActionRecord>, StoreError>;
    async fn save_actions(&self, actions: &[ActionRecord]) -> Result<(), StoreError>;
}
