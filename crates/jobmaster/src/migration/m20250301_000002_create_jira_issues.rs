//! Creates the `jira_issues` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(JiraIssues::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(JiraIssues::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(JiraIssues::IssueKey).string().not_null())
            .col(ColumnDef::new(JiraIssues::IssueId).string().not_null())
            .col(ColumnDef::new(JiraIssues::Summary).text().not_null())
            .col(ColumnDef::new(JiraIssues::Description).text().null());

        for col in [
            JiraIssues::IssueType,
            JiraIssues::Status,
            JiraIssues::Priority,
            JiraIssues::Project,
            JiraIssues::ProjectKey,
            JiraIssues::Reporter,
            JiraIssues::Assignee,
            JiraIssues::Creator,
            JiraIssues::Resolution,
        ] {
            table.col(ColumnDef::new(col).string().null());
        }

        table
            .col(
                ColumnDef::new(JiraIssues::ResolutionDate)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(JiraIssues::DueDate)
                    .timestamp_with_time_zone()
                    .null(),
            );

        for col in [
            JiraIssues::Labels,
            JiraIssues::Components,
            JiraIssues::FixVersions,
            JiraIssues::AffectedVersions,
        ] {
            table.col(
                ColumnDef::new(col)
                    .json()
                    .not_null()
                    .default(Expr::cust("'[]'")),
            );
        }

        for col in [
            JiraIssues::StoryPoints,
            JiraIssues::TimeOriginalEstimate,
            JiraIssues::TimeRemaining,
            JiraIssues::TimeSpent,
        ] {
            table.col(ColumnDef::new(col).integer().null());
        }

        table
            .col(ColumnDef::new(JiraIssues::Epic).string().null())
            .col(ColumnDef::new(JiraIssues::Sprint).string().null())
            .col(ColumnDef::new(JiraIssues::IssueUrl).string().null())
            .col(
                ColumnDef::new(JiraIssues::JiraCreatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(JiraIssues::JiraUpdatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(JiraIssues::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(JiraIssues::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            );
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jira_issues_issue_key")
                    .table(JiraIssues::Table)
                    .col(JiraIssues::IssueKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jira_issues_issue_id")
                    .table(JiraIssues::Table)
                    .col(JiraIssues::IssueId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jira_issues_project_status")
                    .table(JiraIssues::Table)
                    .col(JiraIssues::ProjectKey)
                    .col(JiraIssues::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jira_issues_jira_updated_at")
                    .table(JiraIssues::Table)
                    .col(JiraIssues::JiraUpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JiraIssues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JiraIssues {
    Table,
    Id,
    IssueKey,
    IssueId,
    Summary,
    Description,
    IssueType,
    Status,
    Priority,
    Project,
    ProjectKey,
    Reporter,
    Assignee,
    Creator,
    Resolution,
    ResolutionDate,
    DueDate,
    Labels,
    Components,
    FixVersions,
    AffectedVersions,
    StoryPoints,
    TimeOriginalEstimate,
    TimeRemaining,
    TimeSpent,
    Epic,
    Sprint,
    IssueUrl,
    JiraCreatedAt,
    JiraUpdatedAt,
    CreatedAt,
    UpdatedAt,
}
