//! A single execution of a GitHub Actions workflow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "github_workflow_runs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub github_id: i64,

    pub name: Option<String>,
    pub display_title: Option<String>,
    pub run_number: i32,
    pub run_attempt: i32,
    /// Triggering event (`push`, `pull_request`, `schedule`, ...).
    pub event: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub head_branch: Option<String>,
    pub head_sha: Option<String>,

    // ─── URLs ────────────────────────────────────────────────────────────────
    pub html_url: Option<String>,
    pub jobs_url: Option<String>,
    pub logs_url: Option<String>,
    pub check_suite_url: Option<String>,
    pub artifacts_url: Option<String>,
    pub cancel_url: Option<String>,
    pub rerun_url: Option<String>,

    pub github_created_at: Option<DateTimeWithTimeZone>,
    pub github_updated_at: Option<DateTimeWithTimeZone>,
    pub run_started_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,

    pub workflow_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::github_workflow::Entity",
        from = "Column::WorkflowId",
        to = "super::github_workflow::Column::Id",
        on_delete = "Cascade"
    )]
    Workflow,
    #[sea_orm(has_many = "super::github_workflow_job::Entity")]
    Jobs,
}

impl Related<super::github_workflow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workflow.def()
    }
}

impl Related<super::github_workflow_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
