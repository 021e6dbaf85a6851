//! Row-level access to `places.sqlite`

use crate::tree::{BookmarkRow, PlaceRow};
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// A handle on a Firefox bookmark database.
///
/// The connection is opened once per run and closed at the end. Every
/// query on a closed handle fails with [`Error::StoreNotOpen`].
#[derive(Debug)]
pub struct PlacesDb {
    path: PathBuf,
    conn: Option<Connection>,
}

impl PlacesDb {
    /// Create a closed handle on the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Create a handle and open it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut db = Self::new(path);
        db.connect()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the connection. The database file must already exist.
    pub fn connect(&mut self) -> Result<()> {
        if self.conn.is_none() {
            let conn = Connection::open_with_flags(
                &self.path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            tracing::debug!(path = ?self.path, "Opened bookmark database");
            self.conn = Some(conn);
        }
        Ok(())
    }

    /// Close the connection, if open.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| Error::Sqlite(e))?;
            tracing::debug!(path = ?self.path, "Closed bookmark database");
        }
        Ok(())
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| Error::StoreNotOpen {
            path: self.path.clone(),
        })
    }

    /// All `moz_bookmarks` rows, in table order.
    pub fn bookmark_rows(&self) -> Result<Vec<BookmarkRow>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, type, fk, parent, position, title FROM moz_bookmarks ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(BookmarkRow {
                id: row.get(0)?,
                row_type: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
                place_id: row.get(2)?,
                parent: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
                position: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
                title: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// All `moz_places` rows that carry a URL.
    pub fn place_rows(&self) -> Result<Vec<PlaceRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, url FROM moz_places WHERE url IS NOT NULL")?;
        let rows = stmt.query_map([], |row| {
            Ok(PlaceRow {
                id: row.get(0)?,
                url: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn insert_bookmark(&self, row: &BookmarkRow) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO moz_bookmarks (id, type, fk, parent, position, title) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![row.id, row.row_type, row.place_id, row.parent, row.position, row.title],
        )?;
        Ok(())
    }

    pub fn delete_bookmark(&self, id: i64) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM moz_bookmarks WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Rewrite a row in place, keeping its id.
    pub fn replace_bookmark(&self, row: &BookmarkRow) -> Result<()> {
        self.delete_bookmark(row.id)?;
        self.insert_bookmark(row)
    }

    pub fn max_bookmark_id(&self) -> Result<i64> {
        let max = self
            .conn()?
            .query_row("SELECT MAX(id) FROM moz_bookmarks", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?;
        Ok(max.unwrap_or_default())
    }

    pub fn place_id_for_url(&self, url: &str) -> Result<Option<i64>> {
        let id = self
            .conn()?
            .query_row(
                "SELECT id FROM moz_places WHERE url = ?1 LIMIT 1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn insert_place(&self, id: i64, url: &str, title: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO moz_places (id, url, title, hidden) VALUES (?1, ?2, ?3, 1)",
            params![id, url, title],
        )?;
        Ok(())
    }

    /// Delete a URL row unless a bookmark still points at it.
    ///
    /// Returns whether the row was deleted.
    pub fn delete_place_if_unused(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let references: i64 = conn.query_row(
            "SELECT COUNT(*) FROM moz_bookmarks WHERE fk = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if references > 0 {
            return Ok(false);
        }
        conn.execute("DELETE FROM moz_places WHERE id = ?1", params![id])?;
        Ok(true)
    }

    pub fn max_place_id(&self) -> Result<i64> {
        let max = self
            .conn()?
            .query_row("SELECT MAX(id) FROM moz_places", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?;
        Ok(max.unwrap_or_default())
    }
}
