use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKinematicEntry {
    pub group_id: String,
    pub servo_id: i32,
    pub direction: String,
    pub min_value: i32,
    pub max_value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinematicChanges {
    pub group_id: String,
    pub servo_id: Option<i32>,
    pub direction: String,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
}
