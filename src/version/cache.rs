use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::version::error::CacheError;
use crate::version::provider::ProviderType;

/// SQLite store of recently fetched provider listings.
///
/// Listings are stored as serialized text and only returned while younger
/// than the configured lifetime, so repeated runs within a few minutes do
/// not hit provider rate limits.
pub struct Cache {
    conn: Mutex<Connection>,
    ttl_ms: i64,
}

impl Cache {
    pub fn new(db_path: &Path, ttl_ms: i64) -> Result<Self, CacheError> {
        info!("Initializing listing cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::from_connection(conn, ttl_ms)
    }

    /// Cache backed by a private in-memory database
    pub fn in_memory(ttl_ms: i64) -> Result<Self, CacheError> {
        Self::from_connection(Connection::open_in_memory()?, ttl_ms)
    }

    fn from_connection(conn: Connection, ttl_ms: i64) -> Result<Self, CacheError> {
        let cache = Self {
            conn: Mutex::new(conn),
            ttl_ms,
        };
        cache.create_schema()?;
        debug!("Listing cache ready");
        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                provider_type TEXT NOT NULL,
                listing_key TEXT NOT NULL,
                body TEXT NOT NULL,
                fetched_at INTEGER NOT NULL,
                PRIMARY KEY (provider_type, listing_key)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_fetched_at ON listings(fetched_at)",
            [],
        )?;

        Ok(())
    }

    /// Get a listing if it was stored within the cache lifetime
    pub fn get_listing(
        &self,
        provider_type: ProviderType,
        key: &str,
    ) -> Result<Option<String>, CacheError> {
        self.get_listing_at(provider_type, key, Self::current_timestamp_ms())
    }

    fn get_listing_at(
        &self,
        provider_type: ProviderType,
        key: &str,
        now_ms: i64,
    ) -> Result<Option<String>, CacheError> {
        let conn = self.lock_conn()?;
        let body = conn
            .query_row(
                r#"
                SELECT body FROM listings
                WHERE provider_type = ?1 AND listing_key = ?2 AND fetched_at > ?3
                "#,
                (provider_type.as_str(), key, now_ms - self.ttl_ms),
                |row| row.get(0),
            )
            .optional()?;

        Ok(body)
    }

    /// Store or replace the listing for a provider
    pub fn store_listing(
        &self,
        provider_type: ProviderType,
        key: &str,
        body: &str,
    ) -> Result<(), CacheError> {
        self.store_listing_at(provider_type, key, body, Self::current_timestamp_ms())
    }

    fn store_listing_at(
        &self,
        provider_type: ProviderType,
        key: &str,
        body: &str,
        now_ms: i64,
    ) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO listings (provider_type, listing_key, body, fetched_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(provider_type, listing_key)
            DO UPDATE SET body = excluded.body, fetched_at = excluded.fetched_at
            "#,
            (provider_type.as_str(), key, body, now_ms),
        )?;

        debug!("Cached {} listing {}", provider_type.as_str(), key);
        Ok(())
    }

    /// Delete listings older than the cache lifetime, returning how many
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let cutoff = Self::current_timestamp_ms() - self.ttl_ms;
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM listings WHERE fetched_at <= ?1", [cutoff])?;
        Ok(removed)
    }
}
