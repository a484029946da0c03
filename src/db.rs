use anyhow::{Context, Result};
use directories::ProjectDirs;
use sqlx::any::AnyPoolOptions;
use sqlx::{any::AnyConnectOptions, migrate::Migrator, AnyPool, ConnectOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Once;

use crate::storage::Storage;

// Ensure drivers are installed exactly once for sqlx::any
static INSTALL_DRIVERS: Once = Once::new();

// Embed SQL migrations from the migrations/ directory
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed key/value store used for favorites.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    // If database_url is None, use a SQLite file in the user's data directory.
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let url = match database_url {
            Some(u) if !u.trim().is_empty() => u.to_string(),
            _ => default_sqlite_url()?,
        };

        let opts = AnyConnectOptions::from_str(&url)
            .with_context(|| format!("invalid database URL: {url}"))?;
        // Quiet by default; callers can enable SQLX_LOG if they want
        let opts = opts.disable_statement_logging();

        let pool = AnyPoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to connect to database: {url}"))?;

        Ok(Self { pool })
    }

    /// Connect and apply the embedded migrations.
    pub async fn open(database_url: Option<&str>) -> Result<Self> {
        let db = Self::connect(database_url).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.context("running migrations")
    }

    pub fn pool(&self) -> &AnyPool { &self.pool }
}

#[async_trait::async_trait]
impl Storage for Database {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>(
            "SELECT value FROM local_storage WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("reading storage key {key}"))?;
        Ok(row)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO local_storage(key, value) VALUES (?, ?)\n             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("writing storage key {key}"))?;
        Ok(())
    }
}

/// `sqlite://` URL for a database file, created on first open.
pub fn sqlite_url_for(path: &Path) -> String {
    // Encode spaces in the path for a valid sqlite URL
    let path_str = path.to_string_lossy().replace(' ', "%20");
    format!("sqlite://{path_str}?mode=rwc")
}

fn default_sqlite_url() -> Result<String> {
    let proj = ProjectDirs::from("dev", "stayboard", "stayboard")
        .context("unable to determine data directory for default sqlite path")?;
    let dir = proj.data_dir();
    std::fs::create_dir_all(dir).with_context(|| format!("creating data dir: {}", dir.display()))?;
    Ok(sqlite_url_for(&dir.join("stayboard.db")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn items_round_trip_and_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let url = sqlite_url_for(&tmp.path().join("store.db"));
        let db = Database::open(Some(&url)).await.unwrap();

        assert_eq!(db.get_item("favs").await.unwrap(), None);
        db.set_item("favs", "[\"a\"]").await.unwrap();
        db.set_item("favs", "[\"a\",\"b\"]").await.unwrap();
        assert_eq!(db.get_item("favs").await.unwrap().as_deref(), Some("[\"a\",\"b\"]"));
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let url = sqlite_url_for(&tmp.path().join("store.db"));
        {
            let db = Database::open(Some(&url)).await.unwrap();
            db.set_item("favs", "[\"42\"]").await.unwrap();
            db.pool().close().await;
        }
        let db = Database::open(Some(&url)).await.unwrap();
        assert_eq!(db.get_item("favs").await.unwrap().as_deref(), Some("[\"42\"]"));
    }
}
