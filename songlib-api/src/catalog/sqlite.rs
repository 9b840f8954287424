//! SQLite-backed catalog repository

use async_trait::async_trait;
use songlib_common::db::Song;
use songlib_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::filter::{Clause, Predicate};
use super::patch::{FieldValue, UpdateSet};
use super::repository::{CatalogRepository, NewSong, SongReplacement};

const SONG_COLUMNS: &str = "SELECT s.id, s.group_id, g.name AS group_name, s.name, \
                            s.release_date, s.lyrics, s.link \
                            FROM songs s JOIN groups g ON g.id = s.group_id";

/// Catalog repository over a shared SQLite pool
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn song_exists(&self, id: i64) -> Result<bool> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM songs WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists != 0)
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalog {
    async fn find_group_id_by_name(&self, name: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM groups WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Group not found".to_string()))
    }

    async fn insert_song(&self, song: NewSong) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO songs (group_id, name, release_date, lyrics, link)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(song.group_id)
        .bind(song.name)
        .bind(song.release_date)
        .bind(song.lyrics)
        .bind(song.link)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn replace_song(&self, replacement: SongReplacement) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET group_id = ?, name = ?, lyrics = ?, release_date = ?, link = ?
            WHERE id = ?
            "#,
        )
        .bind(replacement.group_id)
        .bind(replacement.name)
        .bind(replacement.lyrics)
        .bind(replacement.release_date)
        .bind(replacement.link)
        .bind(replacement.id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Song not found".to_string()));
        }
        Ok(())
    }

    async fn apply_partial_update(&self, id: i64, updates: &UpdateSet) -> Result<()> {
        if updates.is_empty() {
            return if self.song_exists(id).await? {
                Ok(())
            } else {
                Err(Error::NotFound("Song not found".to_string()))
            };
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE songs SET ");
        {
            let mut assignments = qb.separated(", ");
            for (field, value) in updates.iter() {
                assignments.push(format!("{} = ", field.column()));
                match value {
                    FieldValue::Integer(v) => assignments.push_bind_unseparated(*v),
                    FieldValue::Text(v) => assignments.push_bind_unseparated(v.clone()),
                    FieldValue::Date(v) => assignments.push_bind_unseparated(*v),
                };
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        debug!(song_id = id, sql = %qb.sql(), "Applying partial update");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Song not found".to_string()));
        }
        Ok(())
    }

    async fn delete_song(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Song not found".to_string()));
        }
        Ok(())
    }

    async fn list_songs(&self, predicate: &Predicate, limit: i64, offset: i64) -> Result<Vec<Song>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SONG_COLUMNS);
        qb.push(" WHERE 1 = 1");

        for clause in predicate.clauses() {
            match clause {
                Clause::GroupNameContains(needle) => {
                    qb.push(" AND instr(lower(g.name), lower(")
                        .push_bind(needle.clone())
                        .push(")) > 0");
                }
                Clause::SongNameContains(needle) => {
                    qb.push(" AND instr(lower(s.name), lower(")
                        .push_bind(needle.clone())
                        .push(")) > 0");
                }
                Clause::ReleasedOn(date) => {
                    qb.push(" AND s.release_date = ").push_bind(*date);
                }
            }
        }

        // SQLite treats a negative LIMIT as "no limit"
        let limit = if limit > 0 { limit } else { -1 };
        qb.push(" ORDER BY s.id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset.max(0));

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(song_from_row).collect()
    }

    async fn get_lyrics(&self, song_id: i64) -> Result<Option<String>> {
        sqlx::query_scalar::<_, Option<String>>("SELECT lyrics FROM songs WHERE id = ?")
            .bind(song_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Song not found".to_string()))
    }
}

fn song_from_row(row: &SqliteRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get("id")?,
        group_id: row.try_get("group_id")?,
        group_name: row.try_get("group_name")?,
        name: row.try_get("name")?,
        release_date: row.try_get("release_date")?,
        lyrics: row.try_get("lyrics")?,
        link: row.try_get("link")?,
    })
}

/// Classify constraint failures on writes
///
/// A foreign key failure can only come from `group_id`, so it means the
/// referenced group does not exist.
fn map_write_error(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation()
            || db_err.message().contains("FOREIGN KEY constraint failed")
        {
            return Error::NotFound("Group not found".to_string());
        }
        if db_err.is_unique_violation() || db_err.is_check_violation() {
            return Error::Conflict(db_err.message().to_string());
        }
    }
    Error::Database(err)
}
