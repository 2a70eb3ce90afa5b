//! SQLite-backed entry store
//!
//! One `entries` table under `<root>/.aerodex/index.sqlite`. Writes go
//! through [`IndexTx`], which rolls back unless explicitly committed.

use crate::config::IndexConfig;
use crate::context::ensure_initialized;
use crate::error::{IndexError, Result};
use aerodex_core::path::{CONFIG_FILE, INDEX_FILE, PRIVATE_DIR};
use aerodex_core::{Entry, EntryType, Point, Polygon};
use rusqlite::{params, CachedStatement, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    path TEXT PRIMARY KEY NOT NULL,
    hash TEXT,
    type INTEGER,
    meta TEXT,
    mtime INTEGER,
    size INTEGER,
    depth INTEGER,
    point_geom TEXT,
    polygon_geom TEXT
);
CREATE INDEX IF NOT EXISTS ix_entries_depth ON entries (depth);
";

const ENTRY_COLUMNS: &str =
    "path, hash, type, meta, mtime, size, depth, point_geom, polygon_geom";

const INSERT_ENTRY: &str = "INSERT INTO entries \
    (path, hash, type, meta, mtime, size, depth, point_geom, polygon_geom) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const UPDATE_ENTRY: &str = "UPDATE entries SET \
    hash = ?2, type = ?3, meta = ?4, mtime = ?5, size = ?6, depth = ?7, \
    point_geom = ?8, polygon_geom = ?9 WHERE path = ?1";

const DELETE_ENTRY: &str = "DELETE FROM entries WHERE path = ?1";

const LOOKUP_FINGERPRINT: &str = "SELECT mtime, hash FROM entries WHERE path = ?1";

/// Stored change-detection inputs of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub mtime: i64,
    pub hash: String,
}

/// An open index
pub struct Database {
    conn: Connection,
    root: PathBuf,
    config: IndexConfig,
}

impl Database {
    /// Create a new index in `root`
    ///
    /// Fails if `root` does not exist or already holds a `.aerodex` directory.
    pub fn create(root: &Path) -> Result<Self> {
        ensure_initialized()?;

        let root = std::fs::canonicalize(root).map_err(|e| IndexError::from_io(root, e))?;
        let private_dir = root.join(PRIVATE_DIR);

        debug!("Checking if {} exists...", private_dir.display());
        if private_dir.exists() {
            return Err(IndexError::AlreadyExists(private_dir));
        }
        std::fs::create_dir(&private_dir).map_err(|e| IndexError::io(&private_dir, e))?;

        match Self::create_in(&root, &private_dir) {
            Ok(db) => {
                info!("Initialized empty index in {}", private_dir.display());
                Ok(db)
            }
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_dir_all(&private_dir) {
                    warn!("Cannot remove {}: {}", private_dir.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    fn create_in(root: &Path, private_dir: &Path) -> Result<Self> {
        let conn = Connection::open(private_dir.join(INDEX_FILE))?;
        conn.execute_batch(SCHEMA)?;

        let config = IndexConfig::default();
        config.save(&private_dir.join(CONFIG_FILE))?;

        Ok(Self {
            conn,
            root: root.to_path_buf(),
            config,
        })
    }

    /// Open the index rooted at `dir`, or at the nearest ancestor holding one
    /// when `traverse_up` is set
    pub fn open(dir: &Path, traverse_up: bool) -> Result<Self> {
        ensure_initialized()?;

        let start = std::fs::canonicalize(dir).map_err(|e| IndexError::from_io(dir, e))?;
        let mut current = start.as_path();

        loop {
            let private_dir = current.join(PRIVATE_DIR);
            let db_path = private_dir.join(INDEX_FILE);

            if db_path.is_file() {
                debug!("{} exists", db_path.display());
                return Self::open_at(current, &private_dir, &db_path);
            }

            match current.parent() {
                Some(parent) if traverse_up => current = parent,
                _ => return Err(IndexError::NotAnIndex(start)),
            }
        }
    }

    fn open_at(root: &Path, private_dir: &Path, db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        if !table_exists(&conn, "entries")? {
            return Err(IndexError::MissingTable(db_path.to_path_buf()));
        }

        let config = IndexConfig::load(&private_dir.join(CONFIG_FILE))?;

        Ok(Self {
            conn,
            root: root.to_path_buf(),
            config,
        })
    }

    /// Tracked root (the directory containing `.aerodex`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn private_dir(&self) -> PathBuf {
        self.root.join(PRIVATE_DIR)
    }

    /// Begin a write transaction
    pub fn transaction(&mut self) -> Result<IndexTx<'_>> {
        Ok(IndexTx {
            tx: self.conn.transaction()?,
        })
    }

    pub fn get(&self, path: &str) -> Result<Option<Entry>> {
        let sql = format!("SELECT {} FROM entries WHERE path = ?1", ENTRY_COLUMNS);
        let raw = self
            .conn
            .prepare_cached(&sql)?
            .query_row(params![path], RawEntry::from_row)
            .optional()?;

        raw.map(RawEntry::into_entry).transpose()
    }

    /// Entries at or below `prefix`, ordered by path
    ///
    /// `max_depth` bounds the stored depth column (0 = top level only).
    pub fn list(&self, prefix: Option<&str>, max_depth: Option<usize>) -> Result<Vec<Entry>> {
        let prefix = prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty());
        let pattern = prefix.map(|p| format!("{}/%", escape_like(p)));

        let sql = format!(
            "SELECT {} FROM entries \
             WHERE (?1 IS NULL OR path = ?1 OR path LIKE ?2 ESCAPE '\\') \
             AND (?3 IS NULL OR depth <= ?3) \
             ORDER BY path",
            ENTRY_COLUMNS
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(
                params![prefix, pattern, max_depth.map(|d| d as i64)],
                RawEntry::from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawEntry::into_entry).collect()
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

/// Write transaction over the entries table
///
/// Dropping without [`IndexTx::commit`] discards every change.
pub struct IndexTx<'a> {
    tx: rusqlite::Transaction<'a>,
}

impl IndexTx<'_> {
    pub fn lookup(&self, path: &str) -> Result<Option<Fingerprint>> {
        let fp = self
            .tx
            .prepare_cached(LOOKUP_FINGERPRINT)?
            .query_row(params![path], |row| {
                Ok(Fingerprint {
                    mtime: row.get(0)?,
                    hash: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            })
            .optional()?;
        Ok(fp)
    }

    /// Every stored path with its fingerprint, in storage order
    pub fn fingerprints(&self) -> Result<Vec<(String, Fingerprint)>> {
        let mut stmt = self.tx.prepare_cached("SELECT path, mtime, hash FROM entries")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    Fingerprint {
                        mtime: row.get(1)?,
                        hash: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert(&self, entry: &Entry) -> Result<()> {
        let row = RawEntry::from_entry(entry)?;
        row.execute(&mut self.tx.prepare_cached(INSERT_ENTRY)?)?;
        Ok(())
    }

    /// Replace every column of the row at `entry.path`; returns rows changed
    pub fn update(&self, entry: &Entry) -> Result<usize> {
        let row = RawEntry::from_entry(entry)?;
        Ok(row.execute(&mut self.tx.prepare_cached(UPDATE_ENTRY)?)?)
    }

    /// Returns rows deleted (0 when the path was not tracked)
    pub fn delete(&self, path: &str) -> Result<usize> {
        Ok(self.tx.prepare_cached(DELETE_ENTRY)?.execute(params![path])?)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

/// Column-level form of an [`Entry`]
struct RawEntry {
    path: String,
    hash: Option<String>,
    entry_type: i64,
    meta: Option<String>,
    mtime: i64,
    size: i64,
    depth: i64,
    point_geom: Option<String>,
    polygon_geom: Option<String>,
}

impl RawEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            path: row.get(0)?,
            hash: row.get(1)?,
            entry_type: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
            meta: row.get(3)?,
            mtime: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
            size: row.get::<_, Option<i64>>(5)?.unwrap_or_default(),
            depth: row.get::<_, Option<i64>>(6)?.unwrap_or_default(),
            point_geom: row.get(7)?,
            polygon_geom: row.get(8)?,
        })
    }

    fn from_entry(entry: &Entry) -> Result<Self> {
        Ok(Self {
            path: entry.path.clone(),
            hash: Some(entry.hash.clone()),
            entry_type: entry.entry_type.as_i64(),
            meta: Some(serde_json::to_string(&entry.meta)?),
            mtime: entry.mtime,
            size: entry.size as i64,
            depth: entry.depth as i64,
            point_geom: entry.point_geom.map(|p| p.to_ewkt()),
            polygon_geom: entry.polygon_geom.as_ref().map(Polygon::to_ewkt),
        })
    }

    /// Bind all columns in table order (`?1` = path) and run
    fn execute(&self, stmt: &mut CachedStatement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.path,
            self.hash,
            self.entry_type,
            self.meta,
            self.mtime,
            self.size,
            self.depth,
            self.point_geom,
            self.polygon_geom,
        ])
    }

    fn into_entry(self) -> Result<Entry> {
        let meta = match self.meta.as_deref() {
            Some(text) if !text.is_empty() => serde_json::from_str(text)?,
            _ => serde_json::Value::Object(Default::default()),
        };

        Ok(Entry {
            path: self.path,
            hash: self.hash.unwrap_or_default(),
            entry_type: EntryType::from_i64(self.entry_type)?,
            meta,
            mtime: self.mtime,
            size: self.size.max(0) as u64,
            depth: self.depth.max(0) as usize,
            point_geom: self.point_geom.as_deref().map(Point::from_ewkt).transpose()?,
            polygon_geom: self
                .polygon_geom
                .as_deref()
                .map(Polygon::from_ewkt)
                .transpose()?,
        })
    }
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
