//! Jira issue entity.
//!
//! Issues are standalone: they have no parent in the local model and are
//! matched on their human-readable key (`PROJ-123`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jira_issues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Human-readable issue key (external key).
    #[sea_orm(unique)]
    pub issue_key: String,
    /// Jira's numeric issue ID, kept as a string the way the API returns it.
    #[sea_orm(indexed)]
    pub issue_id: String,

    // ─── Content ─────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
    pub project_key: Option<String>,

    // ─── People ──────────────────────────────────────────────────────────────
    pub reporter: Option<String>,
    pub assignee: Option<String>,
    pub creator: Option<String>,

    pub resolution: Option<String>,
    pub resolution_date: Option<DateTimeWithTimeZone>,
    pub due_date: Option<DateTimeWithTimeZone>,

    // ─── Name sets (JSON arrays of strings) ──────────────────────────────────
    #[sea_orm(column_type = "Json")]
    pub labels: Json,
    #[sea_orm(column_type = "Json")]
    pub components: Json,
    #[sea_orm(column_type = "Json")]
    pub fix_versions: Json,
    #[sea_orm(column_type = "Json")]
    pub affected_versions: Json,

    // ─── Estimates (seconds, story points rounded) ───────────────────────────
    pub story_points: Option<i32>,
    pub time_original_estimate: Option<i32>,
    pub time_remaining: Option<i32>,
    pub time_spent: Option<i32>,

    pub epic: Option<String>,
    pub sprint: Option<String>,
    pub issue_url: Option<String>,

    pub jira_created_at: Option<DateTimeWithTimeZone>,
    pub jira_updated_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Labels as plain strings, skipping anything that is not a JSON string.
    pub fn label_names(&self) -> Vec<String> {
        json_names(&self.labels)
    }
}

fn json_names(value: &Json) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
