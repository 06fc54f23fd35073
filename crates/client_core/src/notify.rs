//! User-facing notices and the mapping from operation outcomes to them.

use std::fmt;

use shared::error::ValidationError;
use tracing::{error, info, warn};

use crate::{controller::Completed, error::FormError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            text: text.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => error!(title = %notice.title, "{}", notice.text),
            Severity::Warning => warn!(title = %notice.title, "{}", notice.text),
            Severity::Success | Severity::Info => info!(title = %notice.title, "{}", notice.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Save,
    Update,
    Delete,
}

impl Operation {
    fn verb(self) -> &'static str {
        match self {
            Operation::Fetch => "searching",
            Operation::Save => "saving to",
            Operation::Update => "updating",
            Operation::Delete => "deleting from",
        }
    }
}

/// Returns `None` for outcomes the user does not need to be told about,
/// which is a fetch that found rows.
pub fn notice_for(op: Operation, outcome: &Result<Completed, FormError>) -> Option<Notice> {
    let notice = match outcome {
        Ok(completed) => return success_notice(completed),
        Err(FormError::Validation(err)) => validation_notice(op, err),
        Err(FormError::Remote(err)) => Notice::new(
            Severity::Error,
            "Remote store error",
            format!(
                "There was an error while {} the remote store: {}",
                op.verb(),
                err.message
            ),
        ),
        Err(FormError::Unexpected(_)) => Notice::new(
            Severity::Error,
            "Unexpected error",
            "An unexpected error occurred.",
        ),
    };
    Some(notice)
}

fn success_notice(completed: &Completed) -> Option<Notice> {
    let notice = match completed {
        Completed::Fetched { rows: 0 } => Notice::new(
            Severity::Info,
            "No results",
            "No entries were found for this group id.",
        ),
        Completed::Fetched { .. } => return None,
        Completed::Saved => Notice::new(
            Severity::Success,
            "Entry saved",
            "The entry was saved successfully.",
        ),
        Completed::Updated(_) => Notice::new(
            Severity::Success,
            "Entry updated",
            "The entry was updated successfully.",
        ),
        Completed::Deleted(_) => Notice::new(
            Severity::Success,
            "Entry deleted",
            "The entry was deleted successfully.",
        ),
    };
    Some(notice)
}

fn validation_notice(op: Operation, err: &ValidationError) -> Notice {
    match err {
        ValidationError::MissingGroupId => Notice::new(
            Severity::Warning,
            "Empty field",
            "Please enter a valid group id.",
        ),
        ValidationError::IncompleteFields(fields) => Notice::new(
            Severity::Warning,
            "Incomplete fields",
            format!(
                "Please fill in every field (missing: {}).",
                fields
                    .iter()
                    .map(|f| f.column())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ),
        ValidationError::NoRecordSelected => {
            let action = if op == Operation::Delete {
                "delete"
            } else {
                "edit"
            };
            Notice::new(
                Severity::Warning,
                "No record selected",
                format!("Please select a record to {action}."),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{domain::EntryId, error::RemoteError};

    fn shown(op: Operation, outcome: Result<Completed, FormError>) -> Notice {
        notice_for(op, &outcome).expect("a notice")
    }

    #[test]
    fn empty_fetch_is_informational() {
        let notice = shown(Operation::Fetch, Ok(Completed::Fetched { rows: 0 }));
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.title, "No results");
    }

    #[test]
    fn fetch_with_rows_is_silent() {
        assert_eq!(
            notice_for(Operation::Fetch, &Ok(Completed::Fetched { rows: 3 })),
            None
        );
    }

    #[test]
    fn remote_message_is_passed_through() {
        let outcome = Err(FormError::Remote(RemoteError::new("duplicate key value")));
        let notice = shown(Operation::Save, outcome);
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(
            notice.text,
            "There was an error while saving to the remote store: duplicate key value"
        );
    }

    #[test]
    fn unexpected_failure_hides_details() {
        let outcome = Err(FormError::Unexpected("connection reset".into()));
        let notice = shown(Operation::Update, outcome);
        assert_eq!(notice.text, "An unexpected error occurred.");
    }

    #[test]
    fn missing_selection_names_the_action() {
        let outcome = || Err(FormError::Validation(ValidationError::NoRecordSelected));
        assert_eq!(
            shown(Operation::Delete, outcome()).text,
            "Please select a record to delete."
        );
        assert_eq!(
            shown(Operation::Update, outcome()).text,
            "Please select a record to edit."
        );
    }

    #[test]
    fn deletion_is_a_success_notice() {
        let notice = shown(Operation::Delete, Ok(Completed::Deleted(EntryId(2))));
        assert_eq!(notice.severity, Severity::Success);
    }
}
