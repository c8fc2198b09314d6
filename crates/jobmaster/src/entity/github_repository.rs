//! GitHub repository entity.
//!
//! A repository optionally belongs to an organisation. Deleting the
//! organisation clears the link instead of removing the repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "github_repositories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// GitHub's numeric repository ID (external key).
    #[sea_orm(unique)]
    pub github_id: i64,

    // ─── Naming ──────────────────────────────────────────────────────────────
    pub name: String,
    pub full_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub default_branch: Option<String>,

    // ─── Flags ───────────────────────────────────────────────────────────────
    pub private: bool,
    pub fork: bool,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub has_pages: bool,
    pub has_downloads: bool,
    pub archived: bool,
    pub disabled: bool,

    // ─── Counters ────────────────────────────────────────────────────────────
    pub forks_count: i32,
    pub stargazers_count: i32,
    pub watchers_count: i32,
    /// Repository size in KB.
    pub size: i32,
    pub open_issues_count: i32,

    // ─── URLs ────────────────────────────────────────────────────────────────
    pub html_url: Option<String>,
    pub clone_url: Option<String>,
    pub ssh_url: Option<String>,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    pub github_created_at: Option<DateTimeWithTimeZone>,
    pub github_updated_at: Option<DateTimeWithTimeZone>,
    pub github_pushed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,

    /// Owning organisation, if any.
    pub organisation_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::github_organisation::Entity",
        from = "Column::OrganisationId",
        to = "super::github_organisation::Column::Id",
        on_delete = "SetNull"
    )]
    Organisation,
    #[sea_orm(has_many = "super::github_workflow::Entity")]
    Workflows,
}

impl Related<super::github_organisation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organisation.def()
    }
}

impl Related<super::github_workflow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workflows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
