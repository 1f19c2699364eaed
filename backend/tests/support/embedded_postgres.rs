//! Embedded PostgreSQL databases for integration suites.
//!
//! Every test gets its own temporary database on a cluster shared by the
//! test binary, with the embedded migrations applied. When the cluster
//! cannot start the test is skipped, unless
//! `RECIPES_REQUIRE_EMBEDDED_POSTGRES` is truthy, in which case it fails.

use std::sync::{Mutex, OnceLock};

use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use recipe_backend::outbound::persistence::run_pending_migrations;

const REQUIRE_ENV: &str = "RECIPES_REQUIRE_EMBEDDED_POSTGRES";
const TEST_PASSWORD: &str = "recipes_embedded_test";

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Returns true when `RECIPES_REQUIRE_EMBEDDED_POSTGRES` is "1", "true" or
/// "yes" (case-insensitive).
pub fn embedded_postgres_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skips with a marker, or panics when the cluster is required.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if embedded_postgres_required() {
        panic!("embedded PostgreSQL unavailable: {reason}");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}

/// A migrated temporary database, dropped with the value.
pub struct TestDatabase {
    url: String,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _guard = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    // A data directory reused across processes keeps its first password.
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: set under the bootstrap lock before the cluster starts.
        unsafe {
            std::env::set_var("PG_PASSWORD", TEST_PASSWORD);
        }
    }
    pg_embedded_setup_unpriv::test_support::shared_cluster_handle().map_err(|err| format!("{err:?}"))
}

fn provision() -> Result<TestDatabase, String> {
    let cluster = shared_cluster()?;
    let database = cluster
        .create_temporary_database()
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_string();
    run_pending_migrations(&url).map_err(|err| format!("migrate: {err}"))?;
    Ok(TestDatabase {
        url,
        _database: database,
    })
}

/// Provision a migrated database, or `None` when the test should be skipped.
pub fn test_database() -> Option<TestDatabase> {
    match provision() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
