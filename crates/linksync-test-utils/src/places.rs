//! [`PlacesFixture`]: a minimal `places.sqlite` for bookmark store tests.

use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// A bookmark database with the `moz_places` and `moz_bookmarks` tables
/// and the built-in root, menu, toolbar, tags and unsorted folders.
pub struct PlacesFixture {
    path: PathBuf,
    conn: Connection,
}

impl PlacesFixture {
    pub const ROOT: i64 = 1;
    pub const MENU: i64 = 2;
    pub const TOOLBAR: i64 = 3;
    pub const TAGS: i64 = 4;
    pub const UNSORTED: i64 = 5;

    /// Create the database at `path` with the built-in folders.
    pub fn create(path: &Path) -> Self {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_places (
                 id INTEGER PRIMARY KEY,
                 url LONGVARCHAR,
                 title LONGVARCHAR,
                 hidden INTEGER DEFAULT 0 NOT NULL
             );
             CREATE TABLE moz_bookmarks (
                 id INTEGER PRIMARY KEY,
                 type INTEGER,
                 fk INTEGER DEFAULT NULL,
                 parent INTEGER,
                 position INTEGER,
                 title LONGVARCHAR
             );
             INSERT INTO moz_bookmarks VALUES (1, 2, NULL, 0, 0, '');
             INSERT INTO moz_bookmarks VALUES (2, 2, NULL, 1, 0, 'Bookmarks Menu');
             INSERT INTO moz_bookmarks VALUES (3, 2, NULL, 1, 1, 'Bookmarks Toolbar');
             INSERT INTO moz_bookmarks VALUES (4, 2, NULL, 1, 2, 'Tags');
             INSERT INTO moz_bookmarks VALUES (5, 2, NULL, 1, 3, 'Unsorted Bookmarks');",
        )
        .unwrap();

        Self {
            path: path.to_path_buf(),
            conn,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fixture's own connection, for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn next_id(&self, table: &str) -> i64 {
        let max: Option<i64> = self
            .conn
            .query_row(&format!("SELECT MAX(id) FROM {table}"), [], |row| row.get(0))
            .unwrap();
        max.unwrap_or(0) + 1
    }

    fn next_position(&self, parent: i64) -> i64 {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM moz_bookmarks WHERE parent = ?1",
                params![parent],
                |row| row.get(0),
            )
            .unwrap()
    }

    /// Insert a raw bookmark row, for corrupt or unusual trees.
    pub fn insert_row(
        &self,
        id: i64,
        row_type: i64,
        fk: Option<i64>,
        parent: i64,
        title: &str,
    ) {
        let position = self.next_position(parent);
        self.conn
            .execute(
                "INSERT INTO moz_bookmarks (id, type, fk, parent, position, title)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, row_type, fk, parent, position, title],
            )
            .unwrap();
    }

    /// Add a folder under `parent` and return its id.
    pub fn add_folder(&self, parent: i64, title: &str) -> i64 {
        let id = self.next_id("moz_bookmarks");
        self.insert_row(id, 2, None, parent, title);
        id
    }

    /// Add a bookmark under `parent` and return its id. The URL row is
    /// shared with existing bookmarks of the same URL.
    pub fn add_link(&self, parent: i64, title: &str, url: &str) -> i64 {
        let place = self.place_for(url, title);
        let id = self.next_id("moz_bookmarks");
        self.insert_row(id, 1, Some(place), parent, title);
        id
    }

    /// Point the bookmark `id` at `url`, the way editing it in the
    /// browser does.
    pub fn set_url(&self, id: i64, url: &str) {
        let place = self.place_for(url, "");
        self.conn
            .execute(
                "UPDATE moz_bookmarks SET fk = ?1 WHERE id = ?2",
                params![place, id],
            )
            .unwrap();
    }

    fn place_for(&self, url: &str, title: &str) -> i64 {
        if let Some(id) = self.place_id(url) {
            return id;
        }
        let id = self.next_id("moz_places");
        self.conn
            .execute(
                "INSERT INTO moz_places (id, url, title) VALUES (?1, ?2, ?3)",
                params![id, url, title],
            )
            .unwrap();
        id
    }

    /// Delete the bookmark row `id` and everything below it.
    pub fn remove(&self, id: i64) {
        let children: Vec<i64> = {
            let mut stmt = self
                .conn
                .prepare("SELECT id FROM moz_bookmarks WHERE parent = ?1")
                .unwrap();
            stmt.query_map(params![id], |row| row.get(0))
                .unwrap()
                .collect::<rusqlite::Result<_>>()
                .unwrap()
        };
        for child in children {
            self.remove(child);
        }
        self.conn
            .execute("DELETE FROM moz_bookmarks WHERE id = ?1", params![id])
            .unwrap();
    }

    /// Id of the `moz_places` row for `url`.
    pub fn place_id(&self, url: &str) -> Option<i64> {
        self.conn
            .query_row(
                "SELECT id FROM moz_places WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()
            .unwrap()
    }

    /// Id of the first bookmark row titled `title` under `parent`.
    pub fn find(&self, parent: i64, title: &str) -> Option<i64> {
        self.conn
            .query_row(
                "SELECT id FROM moz_bookmarks WHERE parent = ?1 AND title = ?2 ORDER BY id",
                params![parent, title],
                |row| row.get(0),
            )
            .optional()
            .unwrap()
    }

    /// URL of the bookmark row `id`, if it is a link.
    pub fn url_of(&self, id: i64) -> Option<String> {
        self.conn
            .query_row(
                "SELECT p.url FROM moz_bookmarks b JOIN moz_places p ON p.id = b.fk
                 WHERE b.id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .unwrap()
    }

    /// Titles of all rows past the built-in folders, in id order.
    pub fn titles(&self) -> Vec<String> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM moz_bookmarks WHERE id > ?1 ORDER BY id")
            .unwrap();
        stmt.query_map(params![Self::UNSORTED], |row| {
            row.get::<_, Option<String>>(0).map(Option::unwrap_or_default)
        })
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap()
    }

    /// Number of `moz_places` rows.
    pub fn place_count(&self) -> i64 {
        self.conn
            .query_row("SELECT COUNT(*) FROM moz_places", [], |row| row.get(0))
            .unwrap()
    }
}
