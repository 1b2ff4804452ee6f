//! SQLite-backed property store

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use stevedore_domain::traits::{ArtifactStore, PropertyFilter};
use stevedore_domain::ArtifactLocator;

use crate::{pattern, StoreError};

/// SQLite-based implementation of [`ArtifactStore`].
///
/// Repositories and artifacts live in an `artifacts` table, properties in
/// a `properties` table keyed by `(repo_key, path, name)`. The repository
/// root is the row with an empty path.
///
/// The connection is wrapped in a `Mutex`, so one store instance can be
/// shared across threads; contention is per statement.
///
/// # Examples
///
/// ```no_run
/// use stevedore_store::SqliteStore;
///
/// let store = SqliteStore::open("stevedore.db").unwrap();
/// store.add_repository("npm-local").unwrap();
/// ```
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (and initialize if needed) a store at the given path.
    ///
    /// Use `:memory:` for a throwaway database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS artifacts (
                repo_key      TEXT NOT NULL,
                path          TEXT NOT NULL,
                last_modified INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (repo_key, path)
            );
            CREATE TABLE IF NOT EXISTS properties (
                repo_key TEXT NOT NULL,
                path     TEXT NOT NULL,
                name     TEXT NOT NULL,
                value    TEXT NOT NULL,
                PRIMARY KEY (repo_key, path, name)
            );
            CREATE INDEX IF NOT EXISTS idx_properties_name_value
                ON properties (name, value);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Add a repository (idempotent).
    pub fn add_repository(&self, repo_key: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO artifacts (repo_key, path, last_modified) VALUES (?1, '', 0)",
            params![repo_key],
        )?;
        Ok(())
    }

    /// Add an artifact with the given last-modified time (epoch millis).
    pub fn add_artifact(
        &self,
        repo_key: &str,
        path: &str,
        last_modified: i64,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO artifacts (repo_key, path, last_modified) VALUES (?1, '', 0)",
            params![repo_key],
        )?;
        conn.execute(
            "INSERT OR REPLACE INTO artifacts (repo_key, path, last_modified) VALUES (?1, ?2, ?3)",
            params![repo_key, path, last_modified],
        )?;
        Ok(())
    }

    fn artifact_exists(conn: &Connection, locator: &ArtifactLocator) -> Result<bool, StoreError> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM artifacts WHERE repo_key = ?1 AND path = ?2",
                params![locator.repo_key(), locator.path()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl ArtifactStore for SqliteStore {
    type Error = StoreError;

    fn repository_exists(&self, repo_key: &str) -> Result<bool, Self::Error> {
        let conn = self.conn.lock().unwrap();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM artifacts WHERE repo_key = ?1 AND path = '' LIMIT 1",
                params![repo_key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn artifact_count(&self, repo_keys: &[String]) -> Result<u64, Self::Error> {
        let conn = self.conn.lock().unwrap();
        let mut count = 0u64;
        for repo_key in repo_keys {
            let repo_count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM artifacts WHERE repo_key = ?1 AND path != ''",
                params![repo_key],
                |row| row.get(0),
            )?;
            count += repo_count;
        }
        Ok(count)
    }

    fn last_modified(&self, locator: &ArtifactLocator) -> Result<i64, Self::Error> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT last_modified FROM artifacts WHERE repo_key = ?1 AND path = ?2",
            params![locator.repo_key(), locator.path()],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| StoreError::UnknownArtifact(locator.clone()))
    }

    fn artifacts_by_name(
        &self,
        repo_key: &str,
        name_pattern: &str,
    ) -> Result<Vec<ArtifactLocator>, Self::Error> {
        let matcher = pattern::compile(name_pattern)?;
        let conn = self.conn.lock().unwrap();

        if !Self::artifact_exists(&conn, &ArtifactLocator::repository(repo_key))? {
            return Err(StoreError::UnknownRepository(repo_key.to_string()));
        }

        let mut stmt = conn.prepare(
            "SELECT path FROM artifacts WHERE repo_key = ?1 AND path != '' ORDER BY path",
        )?;
        let paths = stmt.query_map(params![repo_key], |row| row.get::<_, String>(0))?;

        let mut found = Vec::new();
        for path in paths {
            let path = path?;
            if matcher.is_match(pattern::file_name(&path)) {
                found.push(ArtifactLocator::new(repo_key, path));
            }
        }
        Ok(found)
    }

    fn artifacts_by_properties(
        &self,
        filter: &PropertyFilter,
        repo_keys: &[String],
    ) -> Result<Vec<ArtifactLocator>, Self::Error> {
        let conn = self.conn.lock().unwrap();
        let mut found = Vec::new();

        for repo_key in repo_keys {
            // Pull the repository's property rows and filter in memory;
            // property sets per repository are small.
            let mut stmt = conn.prepare(
                "SELECT path, name, value FROM properties WHERE repo_key = ?1 AND path != ''",
            )?;
            let rows = stmt.query_map(params![repo_key], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;

            let mut by_path: HashMap<String, HashMap<String, String>> = HashMap::new();
            for row in rows {
                let (path, name, value) = row?;
                by_path.entry(path).or_default().insert(name, value);
            }

            for (path, properties) in &by_path {
                if filter.matches(|name| properties.get(name).map(String::as_str)) {
                    found.push(ArtifactLocator::new(repo_key, path.clone()));
                }
            }
        }

        found.sort();
        Ok(found)
    }

    fn get_property(
        &self,
        locator: &ArtifactLocator,
        name: &str,
    ) -> Result<Option<String>, Self::Error> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT value FROM properties WHERE repo_key = ?1 AND path = ?2 AND name = ?3",
                params![locator.repo_key(), locator.path(), name],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set_property(
        &self,
        locator: &ArtifactLocator,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error> {
        let conn = self.conn.lock().unwrap();
        if !Self::artifact_exists(&conn, locator)? {
            return Err(StoreError::UnknownArtifact(locator.clone()));
        }
        conn.execute(
            "INSERT OR REPLACE INTO properties (repo_key, path, name, value) VALUES (?1, ?2, ?3, ?4)",
            params![locator.repo_key(), locator.path(), name, value],
        )?;
        tracing::debug!("set property {} to {} on {}", name, value, locator);
        Ok(())
    }

    fn delete_property(&self, locator: &ArtifactLocator, name: &str) -> Result<(), Self::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM properties WHERE repo_key = ?1 AND path = ?2 AND name = ?3",
            params![locator.repo_key(), locator.path(), name],
        )?;
        Ok(())
    }
}
