use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sort::SortOrder;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    pub name: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: u64,

    pub title: String,

    pub date_added: String,

    pub priority: Priority,

    #[serde(default)]
    pub completion_date: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<TaskRecord>,

    #[serde(default)]
    pub sort_by: Option<String>,

    #[serde(default)]
    pub sort_order: Option<SortOrder>,
}
