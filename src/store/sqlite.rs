//! SQLite-based storage implementation

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    ConfirmationRecord, ExternalId, LinkRecord, LinkStore, LocalId, PendingVerification,
    StoreResult, VerificationStore,
};
use crate::error::LinkError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based store implementing both LinkStore and VerificationStore
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, LinkError> {
        let conn = Connection::open(path).map_err(|e| LinkError::Internal(e.to_string()))?;

        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), LinkError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| LinkError::Internal(e.to_string()))?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, LinkError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| LinkError::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(|e| LinkError::Internal(e.to_string()))
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), LinkError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Confirmed links, one per chat user
            CREATE TABLE IF NOT EXISTS links (
                local_id TEXT PRIMARY KEY,
                external_id INTEGER NOT NULL,
                external_username TEXT NOT NULL,
                linked_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_links_username ON links(external_username);

            -- In-flight claims, one per chat user; a new claim replaces the row
            CREATE TABLE IF NOT EXISTS pending_verifications (
                local_id TEXT PRIMARY KEY,
                claimed_id INTEGER NOT NULL,
                claimed_username TEXT NOT NULL,
                code TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Oracle confirmations, one per chat user
            CREATE TABLE IF NOT EXISTS confirmations (
                local_id TEXT PRIMARY KEY,
                external_id INTEGER NOT NULL,
                external_username TEXT NOT NULL,
                confirmed_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| LinkError::Internal(e.to_string()))?;

        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<LinkRecord> {
    let local_id: String = row.get(0)?;
    let external_id: i64 = row.get(1)?;
    let external_username: String = row.get(2)?;
    let linked_at: String = row.get(3)?;
    Ok(LinkRecord {
        local_id: LocalId(local_id),
        external_id: ExternalId(external_id as u64),
        external_username,
        linked_at: parse_timestamp(&linked_at),
    })
}

impl LinkStore for SqliteStore {
    fn put_link(&self, link: LinkRecord) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO links (local_id, external_id, external_username, linked_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                link.local_id.0,
                link.external_id.0 as i64,
                link.external_username,
                link.linked_at.to_rfc3339(),
            ],
        )
        .map_err(|e| LinkError::Internal(e.to_string()))?;

        Ok(())
    }

    fn get_link(&self, local_id: &LocalId) -> StoreResult<Option<LinkRecord>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT local_id, external_id, external_username, linked_at
             FROM links WHERE local_id = ?1",
            params![local_id.0],
            link_from_row,
        )
        .optional()
        .map_err(|e| LinkError::Internal(e.to_string()))
    }

    fn delete_link(&self, local_id: &LocalId) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute("DELETE FROM links WHERE local_id = ?1", params![local_id.0])
            .map_err(|e| LinkError::Internal(e.to_string()))?;

        Ok(rows_affected > 0)
    }

    fn find_by_username(&self, username: &str) -> StoreResult<Option<LinkRecord>> {
        let conn = self.conn.lock().unwrap();

        // Exact match against the last-confirmed username; the default
        // BINARY collation keeps this case-sensitive, which is the
        // documented contract.
        conn.query_row(
            "SELECT local_id, external_id, external_username, linked_at
             FROM links WHERE external_username = ?1",
            params![username],
            link_from_row,
        )
        .optional()
        .map_err(|e| LinkError::Internal(e.to_string()))
    }

    fn list_links(&self) -> StoreResult<Vec<LinkRecord>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT local_id, external_id, external_username, linked_at
                 FROM links ORDER BY local_id",
            )
            .map_err(|e| LinkError::Internal(e.to_string()))?;

        let links = stmt
            .query_map([], link_from_row)
            .map_err(|e| LinkError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LinkError::Internal(e.to_string()))?;

        Ok(links)
    }
}

impl VerificationStore for SqliteStore {
    fn put_pending(&self, pending: PendingVerification) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        // REPLACE on the primary key supersedes an earlier claim and
        // invalidates its code in one atomic row write.
        conn.execute(
            "INSERT OR REPLACE INTO pending_verifications
             (local_id, claimed_id, claimed_username, code, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                pending.local_id.0,
                pending.claimed_id.0 as i64,
                pending.claimed_username,
                pending.code,
                pending.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| LinkError::Internal(e.to_string()))?;

        Ok(())
    }

    fn get_pending(&self, local_id: &LocalId) -> StoreResult<Option<PendingVerification>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT local_id, claimed_id, claimed_username, code, created_at
             FROM pending_verifications WHERE local_id = ?1",
            params![local_id.0],
            |row| {
                let local_id: String = row.get(0)?;
                let claimed_id: i64 = row.get(1)?;
                let claimed_username: String = row.get(2)?;
                let code: String = row.get(3)?;
                let created_at: String = row.get(4)?;
                Ok(PendingVerification {
                    local_id: LocalId(local_id),
                    claimed_id: ExternalId(claimed_id as u64),
                    claimed_username,
                    code,
                    created_at: parse_timestamp(&created_at),
                })
            },
        )
        .optional()
        .map_err(|e| LinkError::Internal(e.to_string()))
    }

    fn delete_pending(&self, local_id: &LocalId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "DELETE FROM pending_verifications WHERE local_id = ?1",
            params![local_id.0],
        )
        .map_err(|e| LinkError::Internal(e.to_string()))?;

        Ok(())
    }

    fn put_confirmation(&self, confirmation: ConfirmationRecord) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO confirmations
             (local_id, external_id, external_username, confirmed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                confirmation.local_id.0,
                confirmation.external_id.0 as i64,
                confirmation.external_username,
                confirmation.confirmed_at.to_rfc3339(),
            ],
        )
        .map_err(|e| LinkError::Internal(e.to_string()))?;

        Ok(())
    }

    fn get_confirmation(&self, local_id: &LocalId) -> StoreResult<Option<ConfirmationRecord>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT local_id, external_id, external_username, confirmed_at
             FROM confirmations WHERE local_id = ?1",
            params![local_id.0],
            |row| {
                let local_id: String = row.get(0)?;
                let external_id: i64 = row.get(1)?;
                let external_username: String = row.get(2)?;
                let confirmed_at: String = row.get(3)?;
                Ok(ConfirmationRecord {
                    local_id: LocalId(local_id),
                    external_id: ExternalId(external_id as u64),
                    external_username,
                    confirmed_at: parse_timestamp(&confirmed_at),
                })
            },
        )
        .optional()
        .map_err(|e| LinkError::Internal(e.to_string()))
    }
}
