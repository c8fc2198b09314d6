//! GitHub organisation entity - the root of the workflow hierarchy.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "github_organisations")]
pub struct Model {
    /// Local identifier assigned by the store.
    #[sea_orm(primary_key)]
    pub id: i32,

    /// GitHub's numeric organisation ID (external key).
    #[sea_orm(unique)]
    pub github_id: i64,

    // ─── Profile ─────────────────────────────────────────────────────────────
    pub login: String,
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub twitter_username: Option<String>,

    // ─── Counters ────────────────────────────────────────────────────────────
    pub public_repos: i32,
    pub public_gists: i32,
    pub followers: i32,
    pub following: i32,

    pub html_url: Option<String>,
    pub avatar_url: Option<String>,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    pub github_created_at: Option<DateTimeWithTimeZone>,
    pub github_updated_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::github_repository::Entity")]
    Repositories,
}

impl Related<super::github_repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repositories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
