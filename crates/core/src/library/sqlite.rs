//! SQLite-backed media library implementation.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection};
use tracing::{debug, warn};

use super::{EpisodeKey, LibraryError, MediaLibrary};
use crate::episode::{Episode, EpisodeType, Movie, Show};

/// Number of episode keys per lookup query (4 bound parameters each).
const KEY_CHUNK_SIZE: usize = 200;

/// Number of ids per `IN (...)` query.
const ID_CHUNK_SIZE: usize = 500;

const EPISODE_COLUMNS: &str = "id, show_id, season, number, type, airdate, name";

/// SQLite-backed media library.
pub struct SqliteLibrary {
    conn: Mutex<Connection>,
}

impl SqliteLibrary {
    /// Open the library database, creating the file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path).map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory library (useful for testing).
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LibraryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS shows (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                year INTEGER
            );

            CREATE TABLE IF NOT EXISTS episodes (
                id INTEGER PRIMARY KEY,
                show_id INTEGER NOT NULL REFERENCES shows(id) ON DELETE CASCADE,
                season INTEGER NOT NULL,
                number INTEGER NOT NULL,
                type TEXT NOT NULL DEFAULT 'regular',
                airdate TEXT,
                name TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_episodes_show ON episodes(show_id, season, number);
            "#,
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, LibraryError> {
        self.conn
            .lock()
            .map_err(|_| LibraryError::Internal("library connection lock poisoned".to_string()))
    }

    /// Insert or update a show.
    pub fn upsert_show(&self, show: &Show) -> Result<(), LibraryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO shows (id, name) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![show.id as i64, show.name],
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert or update a movie.
    pub fn upsert_movie(&self, movie: &Movie) -> Result<(), LibraryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO movies (id, title, year) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET title = excluded.title, year = excluded.year",
            params![movie.id as i64, movie.title, movie.year],
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert or update episodes in one transaction.
    ///
    /// Returns the number of rows written.
    pub fn upsert_episodes(&self, episodes: &[Episode]) -> Result<usize, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO episodes (id, show_id, season, number, type, airdate, name)
                     VALUES (?, ?, ?, ?, ?, ?, ?)
                     ON CONFLICT(id) DO UPDATE SET
                        show_id = excluded.show_id,
                        season = excluded.season,
                        number = excluded.number,
                        type = excluded.type,
                        airdate = excluded.airdate,
                        name = excluded.name",
                )
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            for episode in episodes {
                stmt.execute(params![
                    episode.id as i64,
                    episode.show_id as i64,
                    episode.season,
                    episode.number,
                    episode.episode_type.as_str(),
                    episode.airdate.map(|d| d.format("%Y-%m-%d").to_string()),
                    episode.name,
                ])
                .map_err(|e| LibraryError::Database(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        debug!("Upserted {} episodes", episodes.len());
        Ok(episodes.len())
    }

    /// Delete an episode (used when the upstream source drops it).
    pub fn remove_episode(&self, id: u64) -> Result<(), LibraryError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM episodes WHERE id = ?", params![id as i64])
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(())
    }

    fn row_to_episode(row: &rusqlite::Row) -> rusqlite::Result<Episode> {
        let id: i64 = row.get(0)?;
        let show_id: i64 = row.get(1)?;
        let type_str: String = row.get(4)?;
        let airdate_str: Option<String> = row.get(5)?;

        let airdate = airdate_str.and_then(|s| match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                warn!("Ignoring unparseable airdate {:?} on episode {}", s, id);
                None
            }
        });

        Ok(Episode {
            id: id as u64,
            show_id: show_id as u64,
            season: row.get(2)?,
            number: row.get(3)?,
            episode_type: EpisodeType::from_db(&type_str),
            airdate,
            name: row.get(6)?,
        })
    }

    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }
}

impl MediaLibrary for SqliteLibrary {
    fn find_movies_by_ids(&self, ids: &[u64]) -> Result<Vec<Movie>, LibraryError> {
        let conn = self.lock()?;
        let mut movies = Vec::new();

        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let sql = format!(
                "SELECT id, title, year FROM movies WHERE id IN ({}) ORDER BY id",
                Self::placeholders(chunk.len())
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            let rows = stmt
                .query_map(params_from_iter(chunk.iter().map(|id| *id as i64)), |row| {
                    let id: i64 = row.get(0)?;
                    Ok(Movie {
                        id: id as u64,
                        title: row.get(1)?,
                        year: row.get(2)?,
                    })
                })
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            for row_result in rows {
                movies.push(row_result.map_err(|e| LibraryError::Database(e.to_string()))?);
            }
        }

        Ok(movies)
    }

    fn find_episodes_by_keys(&self, keys: &[EpisodeKey]) -> Result<Vec<Episode>, LibraryError> {
        let conn = self.lock()?;
        let mut episodes = Vec::new();
        let mut resolved: HashSet<EpisodeKey> = HashSet::new();

        for chunk in keys.chunks(KEY_CHUNK_SIZE) {
            let conditions = vec![
                "(show_id = ? AND season = ? AND number = ? AND (type != 'regular') = ?)";
                chunk.len()
            ]
            .join(" OR ");
            let sql = format!(
                "SELECT {} FROM episodes WHERE {}
                 ORDER BY show_id, season, number, type = 'insignificant_special', id",
                EPISODE_COLUMNS, conditions
            );

            let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::with_capacity(chunk.len() * 4);
            for key in chunk {
                params.push(Box::new(key.show_id as i64));
                params.push(Box::new(key.season));
                params.push(Box::new(key.number));
                params.push(Box::new(key.is_special));
            }
            let param_refs: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();

            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| LibraryError::Database(e.to_string()))?;
            let rows = stmt
                .query_map(param_refs.as_slice(), Self::row_to_episode)
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            for row_result in rows {
                let episode = row_result.map_err(|e| LibraryError::Database(e.to_string()))?;
                // Specials of both kinds share a code; the first row per key wins
                if resolved.insert(EpisodeKey::of(&episode)) {
                    episodes.push(episode);
                }
            }
        }

        Ok(episodes)
    }

    fn find_all_episodes_for_shows(
        &self,
        show_ids: &[u64],
    ) -> Result<HashMap<u64, Vec<Episode>>, LibraryError> {
        let conn = self.lock()?;
        let mut by_show: HashMap<u64, Vec<Episode>> = HashMap::new();

        for chunk in show_ids.chunks(ID_CHUNK_SIZE) {
            let sql = format!(
                "SELECT {} FROM episodes
                 WHERE show_id IN ({}) AND type != 'insignificant_special'
                 ORDER BY show_id, season, number",
                EPISODE_COLUMNS,
                Self::placeholders(chunk.len())
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            let rows = stmt
                .query_map(
                    params_from_iter(chunk.iter().map(|id| *id as i64)),
                    Self::row_to_episode,
                )
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            for row_result in rows {
                let episode = row_result.map_err(|e| LibraryError::Database(e.to_string()))?;
                by_show.entry(episode.show_id).or_default().push(episode);
            }
        }

        Ok(by_show)
    }

    fn find_shows_by_ids(&self, ids: &[u64]) -> Result<Vec<Show>, LibraryError> {
        let conn = self.lock()?;
        let mut shows = Vec::new();

        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let sql = format!(
                "SELECT id, name FROM shows WHERE id IN ({}) ORDER BY id",
                Self::placeholders(chunk.len())
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            let rows = stmt
                .query_map(params_from_iter(chunk.iter().map(|id| *id as i64)), |row| {
                    let id: i64 = row.get(0)?;
                    Ok(Show {
                        id: id as u64,
                        name: row.get(1)?,
                    })
                })
                .map_err(|e| LibraryError::Database(e.to_string()))?;

            for row_result in rows {
                shows.push(row_result.map_err(|e| LibraryError::Database(e.to_string()))?);
            }
        }

        Ok(shows)
    }
}
