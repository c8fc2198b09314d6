//! Creates the GitHub Actions hierarchy: organisations, repositories,
//! workflows, workflow runs and workflow jobs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_organisations(manager).await?;
        self.create_repositories(manager).await?;
        self.create_workflows(manager).await?;
        self.create_workflow_runs(manager).await?;
        self.create_workflow_jobs(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GithubWorkflowJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GithubWorkflowRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GithubWorkflows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GithubRepositories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GithubOrganisations::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// Columns every synced table shares.
fn tracking_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Tracking::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Tracking::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
}

impl Migration {
    async fn create_organisations(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(GithubOrganisations::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(GithubOrganisations::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(GithubOrganisations::GithubId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(GithubOrganisations::Login).string().not_null())
            .col(ColumnDef::new(GithubOrganisations::Name).string().null())
            .col(ColumnDef::new(GithubOrganisations::Description).text().null())
            .col(ColumnDef::new(GithubOrganisations::Company).string().null())
            .col(ColumnDef::new(GithubOrganisations::Blog).string().null())
            .col(ColumnDef::new(GithubOrganisations::Location).string().null())
            .col(ColumnDef::new(GithubOrganisations::Email).string().null())
            .col(
                ColumnDef::new(GithubOrganisations::TwitterUsername)
                    .string()
                    .null(),
            )
            .col(
                ColumnDef::new(GithubOrganisations::PublicRepos)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(GithubOrganisations::PublicGists)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(GithubOrganisations::Followers)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(GithubOrganisations::Following)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(GithubOrganisations::HtmlUrl).string().null())
            .col(ColumnDef::new(GithubOrganisations::AvatarUrl).string().null())
            .col(
                ColumnDef::new(GithubOrganisations::GithubCreatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(GithubOrganisations::GithubUpdatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            );
        tracking_columns(&mut table);
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_organisations_github_id")
                    .table(GithubOrganisations::Table)
                    .col(GithubOrganisations::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_repositories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(GithubRepositories::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(GithubRepositories::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(GithubRepositories::GithubId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(GithubRepositories::Name).string().not_null())
            .col(ColumnDef::new(GithubRepositories::FullName).string().not_null())
            .col(ColumnDef::new(GithubRepositories::Description).text().null())
            .col(ColumnDef::new(GithubRepositories::Homepage).text().null())
            .col(ColumnDef::new(GithubRepositories::Language).string().null())
            .col(ColumnDef::new(GithubRepositories::DefaultBranch).string().null());

        for flag in [
            GithubRepositories::Private,
            GithubRepositories::Fork,
            GithubRepositories::HasIssues,
            GithubRepositories::HasProjects,
            GithubRepositories::HasWiki,
            GithubRepositories::HasPages,
            GithubRepositories::HasDownloads,
            GithubRepositories::Archived,
            GithubRepositories::Disabled,
        ] {
            table.col(ColumnDef::new(flag).boolean().not_null().default(false));
        }

        for counter in [
            GithubRepositories::ForksCount,
            GithubRepositories::StargazersCount,
            GithubRepositories::WatchersCount,
            GithubRepositories::Size,
            GithubRepositories::OpenIssuesCount,
        ] {
            table.col(ColumnDef::new(counter).integer().not_null().default(0));
        }

        table
            .col(ColumnDef::new(GithubRepositories::HtmlUrl).string().null())
            .col(ColumnDef::new(GithubRepositories::CloneUrl).string().null())
            .col(ColumnDef::new(GithubRepositories::SshUrl).string().null())
            .col(
                ColumnDef::new(GithubRepositories::GithubCreatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(GithubRepositories::GithubUpdatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(GithubRepositories::GithubPushedAt)
                    .timestamp_with_time_zone()
                    .null(),
            );
        tracking_columns(&mut table);
        table
            .col(
                ColumnDef::new(GithubRepositories::OrganisationId)
                    .integer()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_github_repositories_organisation")
                    .from(GithubRepositories::Table, GithubRepositories::OrganisationId)
                    .to(GithubOrganisations::Table, GithubOrganisations::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_repositories_github_id")
                    .table(GithubRepositories::Table)
                    .col(GithubRepositories::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_repositories_full_name")
                    .table(GithubRepositories::Table)
                    .col(GithubRepositories::FullName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_workflows(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(GithubWorkflows::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(GithubWorkflows::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(GithubWorkflows::GithubId).big_integer().not_null())
            .col(ColumnDef::new(GithubWorkflows::Name).string().not_null())
            .col(ColumnDef::new(GithubWorkflows::Path).string().not_null())
            .col(ColumnDef::new(GithubWorkflows::State).string().not_null())
            .col(ColumnDef::new(GithubWorkflows::HtmlUrl).string().null())
            .col(ColumnDef::new(GithubWorkflows::BadgeUrl).string().null())
            .col(
                ColumnDef::new(GithubWorkflows::GithubCreatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(GithubWorkflows::GithubUpdatedAt)
                    .timestamp_with_time_zone()
                    .null(),
            );
        tracking_columns(&mut table);
        table
            .col(ColumnDef::new(GithubWorkflows::RepositoryId).integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_github_workflows_repository")
                    .from(GithubWorkflows::Table, GithubWorkflows::RepositoryId)
                    .to(GithubRepositories::Table, GithubRepositories::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_workflows_github_id")
                    .table(GithubWorkflows::Table)
                    .col(GithubWorkflows::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_workflows_repository_name")
                    .table(GithubWorkflows::Table)
                    .col(GithubWorkflows::RepositoryId)
                    .col(GithubWorkflows::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_workflow_runs(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(GithubWorkflowRuns::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(GithubWorkflowRuns::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(GithubWorkflowRuns::GithubId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(GithubWorkflowRuns::Name).string().null())
            .col(ColumnDef::new(GithubWorkflowRuns::DisplayTitle).text().null())
            .col(
                ColumnDef::new(GithubWorkflowRuns::RunNumber)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(GithubWorkflowRuns::RunAttempt)
                    .integer()
                    .not_null()
                    .default(1),
            )
            .col(ColumnDef::new(GithubWorkflowRuns::Event).string().not_null())
            .col(ColumnDef::new(GithubWorkflowRuns::Status).string().not_null())
            .col(ColumnDef::new(GithubWorkflowRuns::Conclusion).string().null())
            .col(ColumnDef::new(GithubWorkflowRuns::HeadBranch).string().null())
            .col(ColumnDef::new(GithubWorkflowRuns::HeadSha).string().null());

        for url in [
            GithubWorkflowRuns::HtmlUrl,
            GithubWorkflowRuns::JobsUrl,
            GithubWorkflowRuns::LogsUrl,
            GithubWorkflowRuns::CheckSuiteUrl,
            GithubWorkflowRuns::ArtifactsUrl,
            GithubWorkflowRuns::CancelUrl,
            GithubWorkflowRuns::RerunUrl,
        ] {
            table.col(ColumnDef::new(url).string().null());
        }

        for ts in [
            GithubWorkflowRuns::GithubCreatedAt,
            GithubWorkflowRuns::GithubUpdatedAt,
            GithubWorkflowRuns::RunStartedAt,
        ] {
            table.col(ColumnDef::new(ts).timestamp_with_time_zone().null());
        }
        tracking_columns(&mut table);
        table
            .col(ColumnDef::new(GithubWorkflowRuns::WorkflowId).integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_github_workflow_runs_workflow")
                    .from(GithubWorkflowRuns::Table, GithubWorkflowRuns::WorkflowId)
                    .to(GithubWorkflows::Table, GithubWorkflows::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_workflow_runs_github_id")
                    .table(GithubWorkflowRuns::Table)
                    .col(GithubWorkflowRuns::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_workflow_runs_workflow_run_number")
                    .table(GithubWorkflowRuns::Table)
                    .col(GithubWorkflowRuns::WorkflowId)
                    .col(GithubWorkflowRuns::RunNumber)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_workflow_jobs(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(GithubWorkflowJobs::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(GithubWorkflowJobs::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(GithubWorkflowJobs::GithubId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(GithubWorkflowJobs::Name).string().not_null())
            .col(ColumnDef::new(GithubWorkflowJobs::Status).string().not_null())
            .col(ColumnDef::new(GithubWorkflowJobs::Conclusion).string().null())
            .col(ColumnDef::new(GithubWorkflowJobs::HeadSha).string().null())
            .col(ColumnDef::new(GithubWorkflowJobs::HtmlUrl).string().null())
            .col(ColumnDef::new(GithubWorkflowJobs::RunnerName).string().null())
            .col(
                ColumnDef::new(GithubWorkflowJobs::RunnerGroupName)
                    .string()
                    .null(),
            )
            .col(
                ColumnDef::new(GithubWorkflowJobs::CheckRunId)
                    .big_integer()
                    .null(),
            );

        for ts in [
            GithubWorkflowJobs::GithubCreatedAt,
            GithubWorkflowJobs::GithubStartedAt,
            GithubWorkflowJobs::GithubCompletedAt,
        ] {
            table.col(ColumnDef::new(ts).timestamp_with_time_zone().null());
        }
        tracking_columns(&mut table);
        table
            .col(
                ColumnDef::new(GithubWorkflowJobs::WorkflowRunId)
                    .integer()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_github_workflow_jobs_workflow_run")
                    .from(GithubWorkflowJobs::Table, GithubWorkflowJobs::WorkflowRunId)
                    .to(GithubWorkflowRuns::Table, GithubWorkflowRuns::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_workflow_jobs_github_id")
                    .table(GithubWorkflowJobs::Table)
                    .col(GithubWorkflowJobs::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_workflow_jobs_run_name")
                    .table(GithubWorkflowJobs::Table)
                    .col(GithubWorkflowJobs::WorkflowRunId)
                    .col(GithubWorkflowJobs::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tracking {
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GithubOrganisations {
    Table,
    Id,
    GithubId,
    Login,
    Name,
    Description,
    Company,
    Blog,
    Location,
    Email,
    TwitterUsername,
    PublicRepos,
    PublicGists,
    Followers,
    Following,
    HtmlUrl,
    AvatarUrl,
    GithubCreatedAt,
    GithubUpdatedAt,
}

#[derive(DeriveIden)]
enum GithubRepositories {
    Table,
    Id,
    GithubId,
    Name,
    FullName,
    Description,
    Homepage,
    Language,
    DefaultBranch,
    Private,
    Fork,
    HasIssues,
    HasProjects,
    HasWiki,
    HasPages,
    HasDownloads,
    Archived,
    Disabled,
    ForksCount,
    StargazersCount,
    WatchersCount,
    Size,
    OpenIssuesCount,
    HtmlUrl,
    CloneUrl,
    SshUrl,
    GithubCreatedAt,
    GithubUpdatedAt,
    GithubPushedAt,
    OrganisationId,
}

#[derive(DeriveIden)]
enum GithubWorkflows {
    Table,
    Id,
    GithubId,
    Name,
    Path,
    State,
    HtmlUrl,
    BadgeUrl,
    GithubCreatedAt,
    GithubUpdatedAt,
    RepositoryId,
}

#[derive(DeriveIden)]
enum GithubWorkflowRuns {
    Table,
    Id,
    GithubId,
    Name,
    DisplayTitle,
    RunNumber,
    RunAttempt,
    Event,
    Status,
    Conclusion,
    HeadBranch,
    HeadSha,
    HtmlUrl,
    JobsUrl,
    LogsUrl,
    CheckSuiteUrl,
    ArtifactsUrl,
    CancelUrl,
    RerunUrl,
    GithubCreatedAt,
    GithubUpdatedAt,
    RunStartedAt,
    WorkflowId,
}

#[derive(DeriveIden)]
enum GithubWorkflowJobs {
    Table,
    Id,
    GithubId,
    Name,
    Status,
    Conclusion,
    HeadSha,
    HtmlUrl,
    RunnerName,
    RunnerGroupName,
    CheckRunId,
    GithubCreatedAt,
    GithubStartedAt,
    GithubCompletedAt,
    WorkflowRunId,
}
