//! SQLite-backed [`CatalogStore`].
//!
//! Maps each trait method onto the bundled dataset's three tables
//! (`basic_info`, `character`, `ext_links`) and converts raw rows into the
//! typed records of `vtuber_handbook_core::models` right here, at the store
//! boundary. Only the image column selected by [`ImageMode`] is ever read.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool};

use vtuber_handbook_core::error::{CatalogError, Result};
use vtuber_handbook_core::models::{
    DetailRecord, ExternalLinksRecord, ImageMode, ImageRef, ProfileRecord,
};
use vtuber_handbook_core::store::CatalogStore;

/// Upper bound on bound parameters per `IN (...)` statement.
const MAX_IN_PARAMS: usize = 500;

const PROFILE_COLUMNS: &str =
    "name, is_agency, profile_img, profile_img_link, intro, display_title, credit";

/// SQLite implementation of [`CatalogStore`] over one pool.
pub struct SqliteCatalog {
    pool: SqlitePool,
    image_mode: ImageMode,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool, image_mode: ImageMode) -> Self {
        Self { pool, image_mode }
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    fn profile_from_row(&self, row: &SqliteRow) -> Result<ProfileRecord> {
        let (profile_img, profile_img_link) = match self.image_mode {
            ImageMode::Embedded => (text_column(row, "profile_img")?, None),
            ImageMode::Linked => (None, text_column(row, "profile_img_link")?),
        };
        Ok(ProfileRecord {
            name: required_text(row, "name")?,
            is_agency: flag_column(row, "is_agency")?,
            display_title: text_column(row, "display_title")?.unwrap_or_default(),
            intro: text_column(row, "intro")?.unwrap_or_default(),
            credit: text_column(row, "credit")?.unwrap_or_default(),
            image: ImageRef::from_columns(self.image_mode, profile_img, profile_img_link),
        })
    }

    fn profiles_from_rows(&self, rows: &[SqliteRow]) -> Result<Vec<ProfileRecord>> {
        rows.iter().map(|row| self.profile_from_row(row)).collect()
    }
}

fn query_err(e: sqlx::Error) -> CatalogError {
    CatalogError::Query(e.to_string())
}

fn required_text(row: &SqliteRow, column: &str) -> Result<String> {
    text_column(row, column)?
        .ok_or_else(|| CatalogError::Decode(format!("{column} is NULL")))
}

fn flag_column(row: &SqliteRow, column: &str) -> Result<bool> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(column) {
        return Ok(v.unwrap_or(0) != 0);
    }
    row.try_get::<Option<bool>, _>(column)
        .map(|v| v.unwrap_or(false))
        .map_err(|e| CatalogError::Decode(format!("{column}: {e}")))
}

/// Read any scalar column as text. SQLite is dynamically typed, so the
/// catalog may hold numbers or blobs where text is expected.
fn text_column(row: &SqliteRow, column: &str) -> Result<Option<String>> {
    if let Ok(v) = row.try_get::<Option<String>, _>(column) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(column) {
        return Ok(v.map(|n| n.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(column) {
        return Ok(v.map(|n| n.to_string()));
    }
    row.try_get::<Option<Vec<u8>>, _>(column)
        .map(|v| v.map(|b| String::from_utf8_lossy(&b).into_owned()))
        .map_err(|e| CatalogError::Decode(format!("{column}: {e}")))
}

fn detail_from_row(row: &SqliteRow) -> Result<DetailRecord> {
    let mut detail = DetailRecord::new(required_text(row, "name")?);
    for column in row.columns() {
        let key = column.name();
        if key == "name" {
            continue;
        }
        detail
            .fields
            .insert(key.to_string(), text_column(row, key)?);
    }
    Ok(detail)
}

fn links_from_row(row: &SqliteRow) -> Result<ExternalLinksRecord> {
    let mut links = ExternalLinksRecord::new(required_text(row, "name")?);
    for column in row.columns() {
        let key = column.name();
        if key == "name" {
            continue;
        }
        links.insert_column(key, text_column(row, key)?);
    }
    Ok(links)
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn list_all_names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM basic_info")
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;

        rows.iter().map(|row| required_text(row, "name")).collect()
    }

    async fn get_profiles_by_names(&self, names: &[String]) -> Result<Vec<ProfileRecord>> {
        let mut seen = HashSet::new();
        let unique: Vec<&String> = names.iter().filter(|n| seen.insert(n.as_str())).collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await.map_err(query_err)?;
        let mut profiles = Vec::with_capacity(unique.len());

        for batch in unique.chunks(MAX_IN_PARAMS) {
            let placeholders = vec!["?"; batch.len()].join(", ");
            let sql = format!(
                "SELECT {PROFILE_COLUMNS} FROM basic_info WHERE name IN ({placeholders})"
            );
            let mut query = sqlx::query(&sql);
            for name in batch {
                query = query.bind(name.as_str());
            }
            let rows = query.fetch_all(&mut *tx).await.map_err(query_err)?;
            profiles.extend(self.profiles_from_rows(&rows)?);
        }

        tx.commit().await.map_err(query_err)?;
        Ok(profiles)
    }

    async fn get_random_profiles(
        &self,
        is_agency: bool,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM basic_info WHERE is_agency = ? ORDER BY RANDOM() LIMIT ?"
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(is_agency))
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;

        self.profiles_from_rows(&rows)
    }

    async fn get_agency_profiles(&self, limit: usize) -> Result<Vec<ProfileRecord>> {
        let sql = format!(
            r#"
            SELECT {PROFILE_COLUMNS} FROM basic_info AS i
            WHERE i.is_agency = 1
              AND EXISTS (
                  SELECT 1 FROM character AS c
                  WHERE LOWER(c.affiliation) = LOWER(i.name)
                    AND c.name <> i.name
              )
            ORDER BY RANDOM()
            LIMIT ?
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;

        self.profiles_from_rows(&rows)
    }

    async fn get_detail_and_links(
        &self,
        name: &str,
    ) -> Result<(Option<DetailRecord>, Option<ExternalLinksRecord>)> {
        let mut tx = self.pool.begin().await.map_err(query_err)?;

        let detail_row = sqlx::query("SELECT * FROM character WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_err)?;

        let links_row = sqlx::query("SELECT * FROM ext_links WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;

        let detail = detail_row.as_ref().map(detail_from_row).transpose()?;
        let links = links_row.as_ref().map(links_from_row).transpose()?;
        Ok((detail, links))
    }
}
