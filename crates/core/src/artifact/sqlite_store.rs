//! SQLite-backed image store implementation.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::trips::TripMode;

use super::{ArtifactError, ArtifactStore, TripImage, TripImageMeta};

/// SQLite-backed image store.
///
/// One row per travel mode; `put` is an `INSERT ... ON CONFLICT` upsert on
/// the mode column.
pub struct SqliteArtifactStore {
    conn: Mutex<Connection>,
}

impl SqliteArtifactStore {
    /// Create a new store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, ArtifactError> {
        let conn = Connection::open(path).map_err(|e| ArtifactError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, ArtifactError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ArtifactError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ArtifactError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS trip_images (
                mode TEXT PRIMARY KEY,
                payload BLOB NOT NULL,
                content_type TEXT NOT NULL,
                checksum TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ArtifactError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_image(row: &rusqlite::Row) -> rusqlite::Result<TripImage> {
        let mode_str: String = row.get(0)?;
        let payload: Vec<u8> = row.get(1)?;
        let content_type: String = row.get(2)?;
        let checksum: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;

        let mode: TripMode = mode_str.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        // Use now if the stored timestamp fails to parse (shouldn't happen
        // with valid data)
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(TripImage {
            mode,
            payload,
            content_type,
            checksum,
            created_at,
        })
    }
}

impl ArtifactStore for SqliteArtifactStore {
    fn put(&self, image: TripImage) -> Result<TripImageMeta, ArtifactError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO trip_images (mode, payload, content_type, checksum, created_at) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(mode) DO UPDATE SET
                payload = excluded.payload,
                content_type = excluded.content_type,
                checksum = excluded.checksum,
                created_at = excluded.created_at",
            params![
                image.mode.as_str(),
                image.payload,
                image.content_type,
                image.checksum,
                image.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| ArtifactError::Database(e.to_string()))?;

        Ok(TripImageMeta::from(&image))
    }

    fn get(&self, mode: TripMode) -> Result<TripImage, ArtifactError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT mode, payload, content_type, checksum, created_at FROM trip_images WHERE mode = ?",
            params![mode.as_str()],
            Self::row_to_image,
        );

        match result {
            Ok(image) => Ok(image),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(ArtifactError::NotFound(mode)),
            Err(e) => Err(ArtifactError::Database(e.to_string())),
        }
    }

    fn exists(&self, mode: TripMode) -> Result<bool, ArtifactError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM trip_images WHERE mode = ?)",
            params![mode.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    fn exists_any(&self) -> Result<bool, ArtifactError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row("SELECT EXISTS(SELECT 1 FROM trip_images)", [], |row| {
            row.get(0)
        })
        .map_err(|e| ArtifactError::Database(e.to_string()))
    }

    fn missing_modes(&self) -> Result<Vec<TripMode>, ArtifactError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare("SELECT mode FROM trip_images")
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        let mut stored = HashSet::new();
        for row_result in rows {
            let mode_str = row_result.map_err(|e| ArtifactError::Database(e.to_string()))?;
            if let Ok(mode) = mode_str.parse::<TripMode>() {
                stored.insert(mode);
            }
        }

        Ok(TripMode::ALL
            .iter()
            .copied()
            .filter(|mode| !stored.contains(mode))
            .collect())
    }

    fn list_meta(&self) -> Result<Vec<TripImageMeta>, ArtifactError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT mode, content_type, length(payload), checksum, created_at FROM trip_images ORDER BY mode",
            )
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let mode_str: String = row.get(0)?;
                let content_type: String = row.get(1)?;
                let size_bytes: i64 = row.get(2)?;
                let checksum: String = row.get(3)?;
                let created_at_str: String = row.get(4)?;

                let mode: TripMode = mode_str.parse().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;

                let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());

                Ok(TripImageMeta {
                    mode,
                    content_type,
                    size_bytes: size_bytes.max(0) as u64,
                    checksum,
                    created_at,
                })
            })
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        let mut metas = Vec::new();
        for row_result in rows {
            metas.push(row_result.map_err(|e| ArtifactError::Database(e.to_string()))?);
        }

        Ok(metas)
    }
}
