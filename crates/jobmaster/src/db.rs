//! Database connection utilities.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Pragmas applied to every file-backed SQLite database.
///
/// WAL keeps the two sync pipelines from blocking each other's readers,
/// and the busy timeout lets concurrent writers queue instead of failing.
const SQLITE_PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode=WAL",
    "PRAGMA busy_timeout=5000",
    "PRAGMA synchronous=NORMAL",
    "PRAGMA foreign_keys=ON",
];

async fn configure_sqlite(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    for pragma in SQLITE_PRAGMAS {
        db.execute(Statement::from_string(backend, pragma.to_string()))
            .await?;
    }
    Ok(())
}

fn is_sqlite_file(database_url: &str) -> bool {
    database_url.starts_with("sqlite://")
}

/// Establish a connection to the database.
///
/// File-backed SQLite databases get WAL journaling, a 5 second busy timeout,
/// `synchronous=NORMAL` and enforced foreign keys.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    if is_sqlite_file(database_url) {
        configure_sqlite(&db).await?;
    }

    Ok(db)
}

/// Connect and bring the schema up to date.
///
/// # Example
/// ```ignore
/// let db = jobmaster::connect_and_migrate("sqlite::memory:").await?;
/// ```
#[cfg(feature = "migrate")]
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let db = connect(database_url).await?;
    crate::migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sqlite")]
    async fn pragma(db: &DatabaseConnection, name: &str) -> i64 {
        let backend = db.get_database_backend();
        db.query_one(Statement::from_string(backend, format!("PRAGMA {name}")))
            .await
            .expect("pragma query should succeed")
            .expect("pragma should return a row")
            .try_get_by_index::<i64>(0)
            .expect("pragma value should be an integer")
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn configure_sqlite_applies_timeout_and_foreign_keys() {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite should open");

        configure_sqlite(&db)
            .await
            .expect("pragmas should apply");

        assert_eq!(pragma(&db, "busy_timeout").await, 5000);
        assert_eq!(pragma(&db, "foreign_keys").await, 1);
        assert_eq!(pragma(&db, "synchronous").await, 1);
    }

    #[test]
    fn only_file_urls_are_treated_as_sqlite_files() {
        assert!(is_sqlite_file("sqlite:///var/lib/jobmaster.db?mode=rwc"));
        assert!(!is_sqlite_file("sqlite::memory:"));
        assert!(!is_sqlite_file("postgres://localhost/jobmaster"));
    }

    #[tokio::test]
    async fn connect_returns_error_for_invalid_database_url() {
        let err = connect("this-is-not-a-db-url")
            .await
            .expect_err("invalid URL should error");
        let msg = err.to_string().to_ascii_lowercase();
        assert!(
            msg.contains("error") || msg.contains("invalid"),
            "unexpected error message: {err}"
        );
    }
}
