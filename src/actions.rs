//! Action-plan tracking: validated append and filtered listing.
//!
//! Items are derived from narrative recommendations and persisted
//! append-only. There is no update or delete path; once written, a row is
//! history.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::store::{ActionRecord, ActionStatus, ActionStore};

/// What the operator submits; id, status default, and creation timestamp
/// are filled in by the tracker.
#[derive(Debug, Clone)]
pub struct ActionDraft {
    pub source_narrative: String,
    pub specific_action: String,
    pub owner: String,
    pub due_date: chrono::NaiveDate,
    pub status: ActionStatus,
}

/// Listing criteria. Empty vectors are no-ops; both categories must match.
#[derive(Debug, Clone, Default)]
pub struct ActionFilter {
    pub owners: Vec<String>,
    pub statuses: Vec<ActionStatus>,
}

impl ActionFilter {
    fn matches(&self, record: &ActionRecord) -> bool {
        if !self.owners.is_empty() && !self.owners.iter().any(|o| *o == record.owner) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&record.status) {
            return false;
        }
        true
    }
}

pub struct ActionTracker {
    store: Arc<dyn ActionStore>,
}

impl ActionTracker {
    pub fn new(store: Arc<dyn ActionStore>) -> Self {
        Self { store }
    }

    /// Validate and append one action item, persisting the whole store.
    /// Validation failure aborts before any write.
    pub async fn append_action(
        &self,
        draft: &ActionDraft,
        now: DateTime<Utc>,
    ) -> Result<ActionRecord, String> {
        let specific_action = draft.specific_action.trim();
        if specific_action.is_empty() {
            return Err("Specific action is required".to_string());
        }
        let owner = draft.owner.trim();
        if owner.is_empty() {
            return Err("Owner is required".to_string());
        }
        if draft.due_date < now.date_naive() {
            return Err("Due date must not be in the past".to_string());
        }

        let record = ActionRecord {
            action_id: format!("ACAO-{}", now.timestamp()),
            source_narrative: draft.source_narrative.clone(),
            specific_action: specific_action.to_string(),
            owner: owner.to_string(),
            due_date: draft.due_date,
            status: draft.status,
            created_at: now,
        };

        let mut actions = self.store.load_actions().await.map_err(|e| e.to_string())?;
        actions.push(record.clone());
        self.store
            .save_actions(&actions)
            .await
            .map_err(|e| e.to_string())?;
        Ok(record)
    }

    /// Load the full action store and apply the filter.
    pub async fn list_actions(&self, filter: &ActionFilter) -> Result<Vec<ActionRecord>, String> {
        let actions = self.store.load_actions().await.map_err(|e| e.to_string())?;
        Ok(actions
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect())
    }
}
