//! SQLite-backed provider. Every call is a pass-through to the database;
//! nothing is cached, so `reload()` has nothing to do.

use std::fmt::Display;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use reverbmon_core::errors::{ProviderError, ProviderResult};
use reverbmon_core::models::{AppOptions, ApplicationRecord, ApplicationUpdate};
use reverbmon_core::traits::ApplicationProvider;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS reverb_applications (
    id TEXT PRIMARY KEY,
    key TEXT NOT NULL UNIQUE,
    secret TEXT NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    allowed_origins TEXT NOT NULL DEFAULT '[\"*\"]',
    enable_client_messages INTEGER NOT NULL DEFAULT 0,
    max_connections INTEGER,
    max_message_size INTEGER NOT NULL DEFAULT 10000,
    options TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const COLUMNS: &str = "id, key, secret, name, allowed_origins, enable_client_messages, \
                       max_connections, max_message_size, options, created_at, updated_at";

fn to_backend(e: impl Display) -> ProviderError {
    ProviderError::backend(e.to_string())
}

pub struct DatabaseApplicationProvider {
    conn: Mutex<Connection>,
}

impl DatabaseApplicationProvider {
    /// Open a provider backed by a database file, creating the
    /// `reverb_applications` table if needed.
    pub fn open(path: &Path) -> ProviderResult<Self> {
        let conn = Connection::open(path).map_err(to_backend)?;
        Self::initialize(conn)
    }

    /// Open an in-memory provider (for testing).
    pub fn open_in_memory() -> ProviderResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_backend)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> ProviderResult<Self> {
        conn.execute(SCHEMA, []).map_err(to_backend)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> ProviderResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ProviderError::backend(format!("connection lock poisoned: {e}")))
    }

    fn get_by_id(conn: &Connection, id: &str) -> ProviderResult<Option<ApplicationRecord>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM reverb_applications WHERE id = ?1"),
            params![id],
            row_to_record,
        )
        .optional()
        .map_err(to_backend)
    }
}

impl ApplicationProvider for DatabaseApplicationProvider {
    fn all(&self) -> ProviderResult<Vec<ApplicationRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM reverb_applications ORDER BY rowid"))
            .map_err(to_backend)?;
        let rows = stmt.query_map([], row_to_record).map_err(to_backend)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_backend)
    }

    fn find_by_id(&self, id: &str) -> ProviderResult<ApplicationRecord> {
        let conn = self.conn()?;
        Self::get_by_id(&conn, id)?.ok_or_else(|| ProviderError::not_found(id))
    }

    fn find_by_key(&self, key: &str) -> ProviderResult<ApplicationRecord> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM reverb_applications WHERE key = ?1"),
            params![key],
            row_to_record,
        )
        .optional()
        .map_err(to_backend)?
        .ok_or_else(|| ProviderError::not_found(key))
    }

    fn raw(&self) -> ProviderResult<Vec<serde_json::Value>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM reverb_applications ORDER BY rowid"))
            .map_err(to_backend)?;
        let rows = stmt
            .query_map([], |row| {
                let record = row_to_record(row)?;
                let created_at: String = row.get("created_at")?;
                let updated_at: String = row.get("updated_at")?;
                Ok((record, created_at, updated_at))
            })
            .map_err(to_backend)?;

        let mut values = Vec::new();
        for row in rows {
            let (record, created_at, updated_at) = row.map_err(to_backend)?;
            let mut value = serde_json::to_value(&record).map_err(to_backend)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("created_at".to_string(), created_at.into());
                object.insert("updated_at".to_string(), updated_at.into());
            }
            values.push(value);
        }
        Ok(values)
    }

    fn add_app(&self, app: ApplicationRecord) -> ProviderResult<()> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO reverb_applications (
                id, key, secret, name, allowed_origins, enable_client_messages,
                max_connections, max_message_size, options, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                app.id,
                app.key,
                app.secret,
                app.name,
                serde_json::to_string(&app.allowed_origins).map_err(to_backend)?,
                app.enable_client_messages,
                app.max_connections,
                app.max_message_size,
                serde_json::to_string(&app.options).map_err(to_backend)?,
                now,
                now,
            ],
        )
        .map_err(to_backend)?;
        Ok(())
    }

    fn update_app(&self, id: &str, update: ApplicationUpdate) -> ProviderResult<ApplicationRecord> {
        let conn = self.conn()?;

        let mut record = Self::get_by_id(&conn, id)?.ok_or_else(|| ProviderError::not_found(id))?;
        record.apply(update);

        conn.execute(
            "UPDATE reverb_applications SET
                key = ?2, secret = ?3, name = ?4, allowed_origins = ?5,
                enable_client_messages = ?6, max_connections = ?7,
                max_message_size = ?8, options = ?9, updated_at = ?10
             WHERE id = ?1",
            params![
                id,
                record.key,
                record.secret,
                record.name,
                serde_json::to_string(&record.allowed_origins).map_err(to_backend)?,
                record.enable_client_messages,
                record.max_connections,
                record.max_message_size,
                serde_json::to_string(&record.options).map_err(to_backend)?,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(to_backend)?;

        Ok(record)
    }

    fn delete_app(&self, id: &str) -> ProviderResult<()> {
        let conn = self.conn()?;
        let deleted = conn
            .execute("DELETE FROM reverb_applications WHERE id = ?1", params![id])
            .map_err(to_backend)?;
        if deleted == 0 {
            return Err(ProviderError::not_found(id));
        }
        Ok(())
    }

    fn exists(&self, id: &str) -> ProviderResult<bool> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM reverb_applications WHERE id = ?1)",
            params![id],
            |row| row.get::<_, bool>(0),
        )
        .map_err(to_backend)
    }

    fn key_exists(&self, key: &str, exclude_id: Option<&str>) -> ProviderResult<bool> {
        let conn = self.conn()?;
        match exclude_id {
            Some(exclude) => conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM reverb_applications WHERE key = ?1 AND id != ?2)",
                params![key, exclude],
                |row| row.get::<_, bool>(0),
            ),
            None => conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM reverb_applications WHERE key = ?1)",
                params![key],
                |row| row.get::<_, bool>(0),
            ),
        }
        .map_err(to_backend)
    }

    /// No-op: every read already goes to the database.
    fn reload(&self) -> ProviderResult<()> {
        Ok(())
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ApplicationRecord> {
    let origins_json: String = row.get("allowed_origins")?;
    let options_json: String = row.get("options")?;

    let allowed_origins: Vec<String> = serde_json::from_str(&origins_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e)))?;
    let options: AppOptions = serde_json::from_str(&options_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(ApplicationRecord {
        id: row.get("id")?,
        key: row.get("key")?,
        secret: row.get("secret")?,
        name: row.get("name")?,
        allowed_origins,
        enable_client_messages: row.get("enable_client_messages")?,
        max_connections: row.get("max_connections")?,
        max_message_size: row.get("max_message_size")?,
        options,
    })
}
