//! A job inside a workflow run.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "github_workflow_jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub github_id: i64,

    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub head_sha: Option<String>,
    pub html_url: Option<String>,
    pub runner_name: Option<String>,
    pub runner_group_name: Option<String>,
    pub check_run_id: Option<i64>,

    pub github_created_at: Option<DateTimeWithTimeZone>,
    pub github_started_at: Option<DateTimeWithTimeZone>,
    pub github_completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,

    pub workflow_run_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::github_workflow_run::Entity",
        from = "Column::WorkflowRunId",
        to = "super::github_workflow_run::Column::Id",
        on_delete = "Cascade"
    )]
    WorkflowRun,
}

impl Related<super::github_workflow_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkflowRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
