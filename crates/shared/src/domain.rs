use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{DraftField, ValidationError},
    protocol::{KinematicChanges, NewKinematicEntry},
};

pub const DEFAULT_MIN_VALUE: i32 = 0;
pub const DEFAULT_MAX_VALUE: i32 = 1023;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EntryId);

impl EntryId {
    // store-generated ids start at 1
    pub fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinematicEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    pub group_id: String,
    pub servo_id: i32,
    pub direction: String,
    pub min_value: i32,
    pub max_value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinematicDraft {
    pub id: Option<EntryId>,
    pub group_id: String,
    pub servo_id: Option<i32>,
    pub direction: String,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
}

impl Default for KinematicDraft {
    fn default() -> Self {
        Self {
            id: None,
            group_id: String::new(),
            servo_id: None,
            direction: String::new(),
            min_value: Some(DEFAULT_MIN_VALUE),
            max_value: Some(DEFAULT_MAX_VALUE),
        }
    }
}

impl From<&KinematicEntry> for KinematicDraft {
    fn from(entry: &KinematicEntry) -> Self {
        Self {
            id: entry.id,
            group_id: entry.group_id.clone(),
            servo_id: Some(entry.servo_id),
            direction: entry.direction.clone(),
            min_value: Some(entry.min_value),
            max_value: Some(entry.max_value),
        }
    }
}

impl KinematicDraft {
    pub fn for_group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            ..Self::default()
        }
    }

    pub fn reset_keeping_group(&mut self) {
        let group_id = std::mem::take(&mut self.group_id);
        *self = Self::for_group(group_id);
    }

    pub fn group_key(&self) -> Result<&str, ValidationError> {
        let key = self.group_id.trim();
        if key.is_empty() {
            return Err(ValidationError::MissingGroupId);
        }
        Ok(key)
    }

    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.group_id.trim().is_empty() {
            missing.push(DraftField::GroupId);
        }
        if self.servo_id.is_none() {
            missing.push(DraftField::ServoId);
        }
        if self.direction.trim().is_empty() {
            missing.push(DraftField::Direction);
        }
        if self.min_value.is_none() {
            missing.push(DraftField::MinValue);
        }
        if self.max_value.is_none() {
            missing.push(DraftField::MaxValue);
        }
        missing
    }

    pub fn to_new_entry(&self) -> Result<NewKinematicEntry, ValidationError> {
        let missing = self.missing_fields();
        let (Some(servo_id), Some(min_value), Some(max_value)) =
            (self.servo_id, self.min_value, self.max_value)
        else {
            return Err(ValidationError::IncompleteFields(missing));
        };
        if !missing.is_empty() {
            return Err(ValidationError::IncompleteFields(missing));
        }

        Ok(NewKinematicEntry {
            group_id: self.group_id.trim().to_string(),
            servo_id,
            direction: self.direction.trim().to_string(),
            min_value,
            max_value,
        })
    }

    // Only the id is checked; unset numeric fields are written as null.
    pub fn to_changes(&self) -> Result<(EntryId, KinematicChanges), ValidationError> {
        let id = self
            .id
            .filter(|id| id.is_assigned())
            .ok_or(ValidationError::NoRecordSelected)?;

        Ok((
            id,
            KinematicChanges {
                group_id: self.group_id.trim().to_string(),
                servo_id: self.servo_id,
                direction: self.direction.trim().to_string(),
                min_value: self.min_value,
                max_value: self.max_value,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> KinematicDraft {
        KinematicDraft {
            id: None,
            group_id: "G1".into(),
            servo_id: Some(3),
            direction: "cw".into(),
            min_value: Some(10),
            max_value: Some(900),
        }
    }

    #[test]
    fn default_draft_uses_full_adc_range() {
        let draft = KinematicDraft::default();
        assert_eq!(draft.min_value, Some(0));
        assert_eq!(draft.max_value, Some(1023));
        assert_eq!(draft.servo_id, None);
    }

    #[test]
    fn new_entry_requires_every_field() {
        let mut draft = complete_draft();
        draft.direction = "   ".into();
        draft.max_value = None;

        let err = draft.to_new_entry().expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::IncompleteFields(vec![DraftField::Direction, DraftField::MaxValue])
        );
    }

    #[test]
    fn servo_zero_is_a_valid_value() {
        let mut draft = complete_draft();
        draft.servo_id = Some(0);

        let entry = draft.to_new_entry().expect("zero servo accepted");
        assert_eq!(entry.servo_id, 0);
    }

    #[test]
    fn changes_require_an_assigned_id() {
        let mut draft = complete_draft();
        assert_eq!(draft.to_changes(), Err(ValidationError::NoRecordSelected));

        draft.id = Some(EntryId(0));
        assert_eq!(draft.to_changes(), Err(ValidationError::NoRecordSelected));

        draft.id = Some(EntryId(12));
        let (id, changes) = draft.to_changes().expect("changes");
        assert_eq!(id, EntryId(12));
        assert_eq!(changes.servo_id, Some(3));
    }

    #[test]
    fn changes_trim_text_fields_like_inserts() {
        let mut draft = complete_draft();
        draft.id = Some(EntryId(5));
        draft.group_id = " G2 ".into();
        draft.direction = "ccw ".into();

        let (_, changes) = draft.to_changes().expect("changes");
        assert_eq!(changes.group_id, "G2");
        assert_eq!(changes.direction, "ccw");
    }

    #[test]
    fn reset_keeps_only_group_id() {
        let mut draft = complete_draft();
        draft.id = Some(EntryId(4));
        draft.reset_keeping_group();

        assert_eq!(draft, KinematicDraft::for_group("G1"));
    }

    #[test]
    fn group_key_is_trimmed() {
        let draft = KinematicDraft::for_group("  arm-left ");
        assert_eq!(draft.group_key(), Ok("arm-left"));
        assert_eq!(
            KinematicDraft::for_group(" ").group_key(),
            Err(ValidationError::MissingGroupId)
        );
    }

    #[test]
    fn entry_without_id_omits_it_on_the_wire() {
        let entry = KinematicEntry {
            id: None,
            group_id: "G1".into(),
            servo_id: 1,
            direction: "ccw".into(),
            min_value: 0,
            max_value: 1023,
        };
        let json = serde_json::to_value(&entry).expect("encode");
        assert!(json.get("id").is_none());
    }
}
