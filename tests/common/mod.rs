//! Shared SQLite fixture for integration tests.
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

pub const SUISEI_JPEG: &[u8] = b"\xff\xd8\xff\xe0suisei";

pub fn compressed(bytes: &[u8]) -> String {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes).unwrap();
    STANDARD.encode(enc.finish().unwrap())
}

/// Write a catalog with the three tables to `dir/wiki-data.db`.
pub async fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("wiki-data.db");
    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await
        .unwrap();

    for stmt in [
        "CREATE TABLE basic_info (
            name TEXT PRIMARY KEY,
            is_agency INTEGER NOT NULL DEFAULT 0,
            profile_img TEXT,
            profile_img_link TEXT,
            intro TEXT,
            display_title TEXT,
            credit TEXT
        )",
        "CREATE TABLE character (
            name TEXT PRIMARY KEY,
            affiliation TEXT,
            height TEXT,
            real_name TEXT,
            biography TEXT
        )",
        "CREATE TABLE ext_links (
            name TEXT PRIMARY KEY,
            official_channel TEXT,
            twitch TEXT,
            twitter TEXT,
            official_site TEXT
        )",
    ] {
        sqlx::query(stmt).execute(&mut conn).await.unwrap();
    }

    let suisei_img = compressed(SUISEI_JPEG);
    let profiles: [(&str, i64, Option<&str>, Option<&str>); 6] = [
        ("Hoshimachi Suisei", 0, Some(suisei_img.as_str()), Some("https://img/suisei.png")),
        ("Minato Aqua", 0, None, Some("https://img/aqua.png")),
        ("Gawr Gura", 0, Some("corrupt!!"), None),
        ("hololive", 1, None, Some("https://img/hololive.png")),
        ("Nijisanji", 1, None, Some("https://img/niji.png")),
        ("Solo Agency", 1, None, Some("https://img/solo.png")),
    ];
    for (name, is_agency, img, link) in profiles {
        sqlx::query(
            "INSERT INTO basic_info (name, is_agency, profile_img, profile_img_link, intro, display_title, credit)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(is_agency)
        .bind(img)
        .bind(link)
        .bind(format!("**{name}** intro"))
        .bind(format!("{name} title"))
        .bind("From the [wiki](https://virtualyoutuber.fandom.com)")
        .execute(&mut conn)
        .await
        .unwrap();
    }

    let biography = "a".repeat(500);
    let characters: [(&str, Option<&str>, Option<&str>, Option<&str>, Option<&str>); 3] = [
        ("Minato Aqua", Some("Hololive"), Some("148 cm"), Some(""), Some(biography.as_str())),
        ("Hoshimachi Suisei", Some("HOLOLIVE"), Some("160 cm"), None, None),
        // Affiliated only with itself, so it is not listed as an agency.
        ("Solo Agency", Some("solo agency"), None, None, None),
    ];
    for (name, affiliation, height, real_name, biography) in characters {
        sqlx::query(
            "INSERT INTO character (name, affiliation, height, real_name, biography) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(affiliation)
        .bind(height)
        .bind(real_name)
        .bind(biography)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    sqlx::query(
        "INSERT INTO ext_links (name, official_channel, twitch, twitter, official_site) VALUES (?, ?, ?, ?, ?)",
    )
    .bind("Minato Aqua")
    .bind("https://youtube.com/@MinatoAqua")
    .bind(Option::<&str>::None)
    .bind("https://twitter.com/minatoaqua")
    .bind("")
    .execute(&mut conn)
    .await
    .unwrap();

    conn.close().await.unwrap();
    path
}

pub fn write_config(dir: &Path, catalog: &Path, embedded: bool) -> PathBuf {
    let config = format!(
        r#"[catalog]
path = "{}"

[images]
embedded = {}

[discovery]
min_cards = 1

[bookmarks]
path = "{}"

[spotlight]
url = "http://127.0.0.1:9/hot.json"
timeout_secs = 2
"#,
        catalog.display(),
        embedded,
        dir.join("bookmarks.json").display()
    );
    let path = dir.join("vtdb.toml");
    std::fs::write(&path, config).unwrap();
    path
}

pub async fn fixture(embedded: bool) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let catalog = write_catalog(tmp.path()).await;
    let config = write_config(tmp.path(), &catalog, embedded);
    (tmp, config)
}
