use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    GroupId,
    ServoId,
    Direction,
    MinValue,
    MaxValue,
}

impl DraftField {
    pub fn column(self) -> &'static str {
        match self {
            DraftField::GroupId => "group_id",
            DraftField::ServoId => "servo_id",
            DraftField::Direction => "direction",
            DraftField::MinValue => "min_value",
            DraftField::MaxValue => "max_value",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("group id is empty")]
    MissingGroupId,
    #[error("missing required fields: {}", join_fields(.0))]
    IncompleteFields(Vec<DraftField>),
    #[error("no record selected")]
    NoRecordSelected,
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|field| field.column())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_fields_lists_columns_in_order() {
        let err = ValidationError::IncompleteFields(vec![DraftField::ServoId, DraftField::MaxValue]);
        assert_eq!(err.to_string(), "missing required fields: servo_id, max_value");
    }

    #[test]
    fn remote_error_decodes_postgrest_body() {
        let body = r#"{"code":"23502","details":null,"hint":null,"message":"null value in column \"servo_id\""}"#;
        let err: RemoteError = serde_json::from_str(body).expect("decode");
        assert_eq!(err.code.as_deref(), Some("23502"));
        assert_eq!(err.details, None);
        assert_eq!(err.to_string(), "null value in column \"servo_id\"");
    }
}
