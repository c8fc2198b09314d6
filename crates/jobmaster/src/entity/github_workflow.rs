//! GitHub Actions workflow entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "github_workflows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub github_id: i64,

    pub name: String,
    /// Path of the workflow file, e.g. `.github/workflows/ci.yml`.
    pub path: String,
    /// `active`, `disabled_manually`, ...
    pub state: String,
    pub html_url: Option<String>,
    pub badge_url: Option<String>,

    pub github_created_at: Option<DateTimeWithTimeZone>,
    pub github_updated_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,

    pub repository_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::github_repository::Entity",
        from = "Column::RepositoryId",
        to = "super::github_repository::Column::Id",
        on_delete = "Cascade"
    )]
    Repository,
    #[sea_orm(has_many = "super::github_workflow_run::Entity")]
    Runs,
}

impl Related<super::github_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::github_workflow_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Runs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
