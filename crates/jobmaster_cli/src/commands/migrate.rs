use console::style;
use jobmaster::db;
use jobmaster::migration::{MigrationStatus, Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use super::shared::CliResult;
use crate::MigrateAction;

pub(crate) async fn handle_migrate(action: MigrateAction, database_url: &str) -> CliResult<()> {
    let db = db::connect(database_url).await?;

    match action {
        MigrateAction::Up => {
            let pending = Migrator::get_pending_migrations(&db).await?.len();
            Migrator::up(&db, None).await?;
            println!("{} applied {pending} migration(s)", style("✓").green());
        }
        MigrateAction::Down => {
            Migrator::down(&db, Some(1)).await?;
            println!("{} rolled back the latest migration", style("✓").green());
        }
        MigrateAction::Status => print_status(&db).await?,
        MigrateAction::Fresh => {
            Migrator::fresh(&db).await?;
            println!(
                "{} dropped all jobmaster tables and rebuilt the schema",
                style("✓").green()
            );
        }
    }

    Ok(())
}

async fn print_status(db: &DatabaseConnection) -> CliResult<()> {
    for migration in Migrator::get_migration_with_status(db).await? {
        let mark = match migration.status() {
            MigrationStatus::Applied => style("applied").green(),
            MigrationStatus::Pending => style("pending").yellow(),
        };
        println!("  {:<8} {}", mark, migration.name());
    }
    Ok(())
}
