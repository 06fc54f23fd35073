//! Form/list state for kinematic entries and the four remote operations.

use std::sync::Arc;

use shared::domain::{EntryId, KinematicDraft, KinematicEntry};
use shared::error::ValidationError;
use tracing::{error, info, warn};

use crate::{
    error::FormError,
    notify::{notice_for, Notifier, Operation},
    table::RemoteTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completed {
    Fetched { rows: usize },
    Saved,
    Updated(EntryId),
    Deleted(EntryId),
}

/// Owns the draft being edited and the last fetched group. Every operation
/// reports its outcome through the notifier and also returns it.
pub struct KinematicController {
    table: Arc<dyn RemoteTable>,
    notifier: Arc<dyn Notifier>,
    draft: KinematicDraft,
    results: Vec<KinematicEntry>,
}

impl KinematicController {
    pub fn new(table: Arc<dyn RemoteTable>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            table,
            notifier,
            draft: KinematicDraft::default(),
            results: Vec::new(),
        }
    }

    pub fn draft(&self) -> &KinematicDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut KinematicDraft {
        &mut self.draft
    }

    pub fn results(&self) -> &[KinematicEntry] {
        &self.results
    }

    pub async fn fetch_by_group(&mut self) -> Result<Completed, FormError> {
        let outcome = self.try_fetch_by_group().await;
        self.report(Operation::Fetch, outcome)
    }

    pub async fn save(&mut self) -> Result<Completed, FormError> {
        let outcome = self.try_save().await;
        self.report(Operation::Save, outcome)
    }

    pub async fn update(&mut self) -> Result<Completed, FormError> {
        let outcome = self.try_update().await;
        self.report(Operation::Update, outcome)
    }

    // results are left as they are until the next fetch
    pub async fn delete(&mut self, id: Option<EntryId>) -> Result<Completed, FormError> {
        let outcome = self.try_delete(id).await;
        self.report(Operation::Delete, outcome)
    }

    pub fn select_for_edit(&mut self, entry: &KinematicEntry) {
        self.draft = KinematicDraft::from(entry);
    }

    pub fn reset(&mut self) {
        self.draft.reset_keeping_group();
    }

    async fn try_fetch_by_group(&mut self) -> Result<Completed, FormError> {
        let group_id = self.draft.group_key()?.to_string();
        let rows = self.table.select_by_group(&group_id).await?;
        info!(group_id = %group_id, rows = rows.len(), "fetched kinematic group");
        self.results = rows;
        Ok(Completed::Fetched {
            rows: self.results.len(),
        })
    }

    async fn try_save(&mut self) -> Result<Completed, FormError> {
        let entry = self.draft.to_new_entry()?;
        self.table.insert(&entry).await?;
        info!(group_id = %entry.group_id, servo_id = entry.servo_id, "saved kinematic entry");
        self.reset();
        Ok(Completed::Saved)
    }

    async fn try_update(&mut self) -> Result<Completed, FormError> {
        let (id, changes) = self.draft.to_changes()?;
        self.table.update(id, &changes).await?;
        info!(entry_id = id.0, "updated kinematic entry");
        self.reset();
        Ok(Completed::Updated(id))
    }

    async fn try_delete(&mut self, id: Option<EntryId>) -> Result<Completed, FormError> {
        let id = id
            .filter(|id| id.is_assigned())
            .ok_or(ValidationError::NoRecordSelected)?;
        self.table.delete(id).await?;
        info!(entry_id = id.0, "deleted kinematic entry");
        Ok(Completed::Deleted(id))
    }

    fn report(
        &self,
        op: Operation,
        outcome: Result<Completed, FormError>,
    ) -> Result<Completed, FormError> {
        match &outcome {
            Err(err) if err.is_validation() => {
                warn!(operation = ?op, error = %err, "kinematic form rejected")
            }
            Err(err) => error!(operation = ?op, error = %err, "kinematic operation failed"),
            Ok(_) => {}
        }
        if let Some(notice) = notice_for(op, &outcome) {
            self.notifier.notify(notice);
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
