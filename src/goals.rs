//! Goal tracking: capability-gated upsert and live progress comparison.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::store::{GoalMetric, GoalRecord, GoalStore};
use crate::visits::aggregate::{StaffCount, StaffMoney};

/// Deterministic upsert key: one goal per (staff, period).
pub fn goal_id(staff_name: &str, period: &str) -> String {
    format!("META-{}-{}", staff_name, period.replace('/', "-"))
}

/// Outcome of a capability check against the shared manager secret.
///
/// This is NOT a security boundary: a single static secret shared by a
/// handful of operators, with no identity and no audit trail. It exists to
/// prevent casual misuse of the goal-definition controls, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Denied,
}

#[derive(Debug, Clone)]
pub struct ManagerGate {
    secret: Option<String>,
}

impl ManagerGate {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.manager_secret.clone())
    }

    /// Compare a supplied credential against the shared secret. With no
    /// secret configured, every request is denied.
    pub fn decide(&self, supplied: &str) -> GateDecision {
        match &self.secret {
            Some(secret) if bool::from(secret.as_bytes().ct_eq(supplied.as_bytes())) => {
                GateDecision::Allowed
            }
            _ => GateDecision::Denied,
        }
    }
}

/// What the manager submits; the id is derived, never supplied.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub staff_name: String,
    pub metric: GoalMetric,
    pub target_value: Decimal,
    pub period: String,
}

/// Result of an upsert attempt. Denial is an outcome, not an error: the
/// caller leaves the controls locked and says nothing more.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Saved(GoalRecord),
    Denied,
}

pub struct GoalTracker {
    store: Arc<dyn GoalStore>,
    gate: ManagerGate,
}

impl GoalTracker {
    pub fn new(store: Arc<dyn GoalStore>, gate: ManagerGate) -> Self {
        Self { store, gate }
    }

    /// Insert-or-replace the goal keyed by (staff, period), persisting the
    /// whole store. Gated by the manager secret; validation failures abort
    /// before any write.
    pub async fn upsert_goal(
        &self,
        credential: &str,
        draft: &GoalDraft,
    ) -> Result<UpsertOutcome, String> {
        if self.gate.decide(credential) == GateDecision::Denied {
            return Ok(UpsertOutcome::Denied);
        }

        let staff_name = draft.staff_name.trim();
        if staff_name.is_empty() {
            return Err("Staff member is required".to_string());
        }
        let period = draft.period.trim();
        if period.is_empty() {
            return Err("Period is required".to_string());
        }
        if draft.target_value < Decimal::ZERO {
            return Err("Target value must be non-negative".to_string());
        }

        let record = GoalRecord {
            goal_id: goal_id(staff_name, period),
            staff_name: staff_name.to_string(),
            metric: draft.metric,
            target_value: draft.target_value,
            period: period.to_string(),
        };

        let mut goals = self.store.load_goals().await.map_err(|e| e.to_string())?;
        goals.retain(|g| g.goal_id != record.goal_id);
        goals.push(record.clone());
        self.store
            .save_goals(&goals)
            .await
            .map_err(|e| e.to_string())?;
        Ok(UpsertOutcome::Saved(record))
    }

    pub async fn list_goals(&self) -> Result<Vec<GoalRecord>, String> {
        self.store.load_goals().await.map_err(|e| e.to_string())
    }
}

/// The live aggregate a goal is measured against. Zero when the staff
/// member has no row in the relevant ranking.
pub fn current_value(
    goal: &GoalRecord,
    visit_counts: &[StaffCount],
    mean_invoices: &[StaffMoney],
) -> Decimal {
    match goal.metric {
        GoalMetric::VisitCount => visit_counts
            .iter()
            .find(|c| c.staff_name == goal.staff_name)
            .map(|c| Decimal::from(c.visits))
            .unwrap_or_default(),
        GoalMetric::AverageInvoice => mean_invoices
            .iter()
            .find(|m| m.staff_name == goal.staff_name)
            .map(|m| m.amount)
            .unwrap_or_default(),
    }
}

/// current / target, clamped to [0, 1]. A target of zero (or below, which
/// the write path rejects anyway) is defined as zero progress so nothing
/// ever divides by zero.
pub fn progress(goal: &GoalRecord, current: Decimal) -> f64 {
    if goal.target_value <= Decimal::ZERO {
        return 0.0;
    }
    let current = current.to_f64().unwrap_or(0.0);
    let target = goal.target_value.to_f64().unwrap_or(0.0);
    if target <= 0.0 {
        return 0.0;
    }
    (current / target).clamp(0.0, 1.0)
}
