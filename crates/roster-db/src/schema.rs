//! Schema definitions and migration runner for SurrealDB.
//!
//! Both tables are SCHEMAFULL. UUIDs are stored as strings, both as record
//! keys and inside the `projects` / `members` arrays.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Resources
-- =======================================================================
DEFINE TABLE resource SCHEMAFULL;
DEFINE FIELD name ON TABLE resource TYPE option<string>;
DEFINE FIELD phone_number ON TABLE resource TYPE option<string>;
DEFINE FIELD email ON TABLE resource TYPE option<string>;
DEFINE FIELD identity_card ON TABLE resource TYPE option<string>;
DEFINE FIELD address ON TABLE resource TYPE option<string>;
DEFINE FIELD metadata ON TABLE resource TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD projects ON TABLE resource TYPE array<string> DEFAULT [];
DEFINE FIELD created_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_resource_created_at ON TABLE resource \
    COLUMNS created_at;

-- =======================================================================
-- Projects (owned externally, only `members` is written here)
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD description ON TABLE project TYPE string DEFAULT '';
DEFINE FIELD members ON TABLE project TYPE array<string> DEFAULT [];
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_project_members ON TABLE project COLUMNS members;
";

// Tracking table: one row per applied schema version.
const TRACKING_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedVersion {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

impl Migration {
    async fn apply<C: Connection>(&self, db: &Surreal<C>) -> Result<(), DbError> {
        let label = format!("v{} '{}'", self.version, self.name);

        db.query(self.sql)
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("{label} failed: {e}")))?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", self.version))
            .bind(("name", self.name))
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("could not record {label}: {e}")))?;

        Ok(())
    }
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "resources_and_projects",
    sql: SCHEMA_V1,
}];

/// Migrations newer than `applied`, in version order.
fn pending(applied: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS.iter().filter(move |m| m.version > applied)
}

async fn applied_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let rows: Vec<AppliedVersion> = result.take(0)?;
    Ok(rows.first().map_or(0, |row| row.version))
}

/// Bring the database up to the latest schema version.
///
/// Safe to call on every startup; already-applied versions are skipped.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(TRACKING_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let applied = applied_version(db).await?;
    for migration in pending(applied) {
        info!(version = migration.version, name = migration.name, "Applying migration");
        migration.apply(db).await?;
    }

    Ok(())
}
