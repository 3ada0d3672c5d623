use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Composer, ComposerId, Composition, CompositionId};
use crate::taxonomy::{Format, KeySignature, UnknownCode};

use super::migrations::MIGRATIONS;
use super::query::CompositionPredicate;

const COMPOSITION_COLUMNS: &str = "c.id, c.name, c.key_signature, c.number_of_movements, c.format,
            c.created_at, c.updated_at,
            p.id, p.name, p.created_at, p.updated_at";

const COMPOSITION_FROM: &str = "FROM compositions c JOIN composers p ON p.id = c.composer_id";

/// A database connection with CRUD methods for composers and compositions.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // Foreign keys are a per-connection setting in SQLite
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` returns `Ok`. On `Err`, or if anything unwinds
    /// before the commit, the transaction guard rolls every statement back.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.in_transaction(|db| {
                    db.conn.execute_batch(migration.sql)?;
                    db.conn.execute(
                        "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                        rusqlite::params![migration.version, migration.name],
                    )?;
                    Ok(())
                })?;
            }
        }

        Ok(())
    }
}

// Composer CRUD
impl Database {
    /// Insert a new composer.
    pub fn insert_composer(&self, composer: &Composer) -> Result<()> {
        self.conn.execute(
            "INSERT INTO composers (id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                composer.id.to_string(),
                composer.name,
                composer.created_at.to_rfc3339(),
                composer.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up a composer by id.
    pub fn get_composer(&self, id: ComposerId) -> Result<Option<Composer>> {
        let composer = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM composers WHERE id = ?1",
                [id.to_string()],
                |row| row_to_composer(row, 0),
            )
            .optional()?;
        Ok(composer)
    }

    /// Look up a composer by exact name. When several share the name, the
    /// earliest created wins.
    pub fn find_composer_by_name(&self, name: &str) -> Result<Option<Composer>> {
        let composer = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM composers
                 WHERE name = ?1
                 ORDER BY created_at, rowid
                 LIMIT 1",
                [name],
                |row| row_to_composer(row, 0),
            )
            .optional()?;
        Ok(composer)
    }

    /// List all composers, ordered by name.
    pub fn list_composers(&self) -> Result<Vec<Composer>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at FROM composers ORDER BY name, rowid",
        )?;
        let composers = stmt
            .query_map([], |row| row_to_composer(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(composers)
    }

    /// Delete a composer and, by cascade, all of its compositions.
    ///
    /// Returns `false` when no composer had the id.
    pub fn delete_composer(&self, id: ComposerId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM composers WHERE id = ?1", [id.to_string()])?;
        Ok(deleted > 0)
    }

    pub fn count_composers(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM composers", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

// Composition CRUD
impl Database {
    /// Insert a new composition. Its composer must already be stored.
    pub fn insert_composition(&self, composition: &Composition) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO compositions (
                    id, name, key_signature, number_of_movements, format,
                    composer_id, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    composition.id.to_string(),
                    composition.name,
                    composition.key_signature.code(),
                    composition.movements,
                    composition.format.code(),
                    composition.composer.id.to_string(),
                    composition.created_at.to_rfc3339(),
                    composition.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| unique_violation_as_conflict(e, composition))?;
        Ok(())
    }

    /// Overwrite every mutable column of an existing composition.
    pub fn update_composition(&self, composition: &Composition) -> Result<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE compositions SET
                    name = ?2, key_signature = ?3, number_of_movements = ?4,
                    format = ?5, composer_id = ?6, updated_at = ?7
                 WHERE id = ?1",
                rusqlite::params![
                    composition.id.to_string(),
                    composition.name,
                    composition.key_signature.code(),
                    composition.movements,
                    composition.format.code(),
                    composition.composer.id.to_string(),
                    composition.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| unique_violation_as_conflict(e, composition))?;

        if updated == 0 {
            return Err(Error::composition_not_found(composition.id));
        }
        Ok(())
    }

    /// Fetch a composition joined with its composer.
    pub fn get_composition(&self, id: CompositionId) -> Result<Option<Composition>> {
        let sql = format!("SELECT {COMPOSITION_COLUMNS} {COMPOSITION_FROM} WHERE c.id = ?1");
        let composition = self
            .conn
            .query_row(&sql, [id.to_string()], row_to_composition)
            .optional()?;
        Ok(composition)
    }

    /// Whether a composition with this exact (name, key, composer) exists.
    pub fn composition_exists(
        &self,
        name: &str,
        key_signature: KeySignature,
        composer_id: ComposerId,
    ) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM compositions
                WHERE name = ?1 AND key_signature = ?2 AND composer_id = ?3
            )",
            rusqlite::params![name, key_signature.code(), composer_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List compositions matching `predicate`, in insertion order.
    pub fn find_compositions(&self, predicate: &CompositionPredicate) -> Result<Vec<Composition>> {
        let (where_clause, params) = predicate.to_sql();
        let sql = format!(
            "SELECT {COMPOSITION_COLUMNS} {COMPOSITION_FROM} {where_clause} ORDER BY c.rowid"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let compositions = stmt
            .query_map(rusqlite::params_from_iter(params), row_to_composition)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(compositions)
    }

    /// Delete a composition. Its composer is left in place.
    ///
    /// Returns `false` when no composition had the id.
    pub fn delete_composition(&self, id: CompositionId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM compositions WHERE id = ?1", [id.to_string()])?;
        Ok(deleted > 0)
    }

    pub fn count_compositions(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM compositions", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

fn unique_violation_as_conflict(err: rusqlite::Error, composition: &Composition) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, message)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || message
                    .as_deref()
                    .is_some_and(|m| m.starts_with("UNIQUE constraint failed")) =>
        {
            Error::Conflict(format!(
                "a composition named '{}' in {} by {} already exists",
                composition.name, composition.key_signature, composition.composer.name
            ))
        }
        _ => Error::Database(err),
    }
}

fn row_to_composer(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Composer> {
    Ok(Composer {
        id: ComposerId::from_uuid(parse_uuid(row, offset)?),
        name: row.get(offset + 1)?,
        created_at: parse_timestamp(row, offset + 2)?,
        updated_at: parse_timestamp(row, offset + 3)?,
    })
}

fn row_to_composition(row: &rusqlite::Row) -> rusqlite::Result<Composition> {
    let key_code: i64 = row.get(2)?;
    let movements: u32 = row.get(3)?;
    let format_code: i64 = row.get(4)?;

    Ok(Composition {
        id: CompositionId::from_uuid(parse_uuid(row, 0)?),
        name: row.get(1)?,
        key_signature: KeySignature::from_code(key_code)
            .ok_or_else(|| unknown_code(2, "key signature", key_code))?,
        movements,
        format: Format::from_code(format_code)
            .ok_or_else(|| unknown_code(4, "format", format_code))?,
        created_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
        composer: row_to_composer(row, 7)?,
    })
}

fn parse_uuid(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(Into::into)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn unknown_code(idx: usize, family: &'static str, code: i64) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Integer,
        Box::new(UnknownCode {
            family,
            value: code.to_string(),
        }),
    )
}
