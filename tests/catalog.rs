//! Catalog lifecycle, SQLite store and query layer against a real dataset.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use vtuber_handbook::catalog::CatalogHandle;
use vtuber_handbook::config::load_config;
use vtuber_handbook::handbook::Handbook;
use vtuber_handbook::images::image_uri;
use vtuber_handbook_core::error::CatalogError;
use vtuber_handbook_core::models::{ImageMode, ImageRef, Platform};
use vtuber_handbook_core::store::CatalogStore;

async fn open_catalog(embedded: bool) -> (tempfile::TempDir, CatalogHandle) {
    let (tmp, config_path) = common::fixture(embedded).await;
    let cfg = load_config(&config_path).unwrap();
    let catalog = CatalogHandle::from_config(&cfg);
    assert!(catalog.open().await);
    (tmp, catalog)
}

fn names_of(profiles: &[vtuber_handbook_core::models::ProfileRecord]) -> HashSet<String> {
    profiles.iter().map(|p| p.name.clone()).collect()
}

#[tokio::test]
async fn open_and_close_are_idempotent() {
    let (_tmp, catalog) = open_catalog(false).await;
    assert!(catalog.is_ready().await);

    // Second open keeps the existing connection.
    assert!(catalog.open().await);
    assert!(catalog.is_ready().await);
    assert_eq!(catalog.list_all_names().await.unwrap().len(), 6);

    catalog.close().await;
    assert!(!catalog.is_ready().await);
    catalog.close().await;
    assert!(!catalog.is_ready().await);

    // Reopening after close works.
    assert!(catalog.open().await);
    assert!(catalog.is_ready().await);
    catalog.close().await;
}

#[tokio::test]
async fn queries_on_closed_catalog_are_not_ready() {
    let (_tmp, catalog) = open_catalog(false).await;
    catalog.close().await;

    assert!(matches!(
        catalog.list_all_names().await,
        Err(CatalogError::NotReady)
    ));
    assert!(matches!(
        catalog.get_detail_and_links("Minato Aqua").await,
        Err(CatalogError::NotReady)
    ));
    // Empty input never reaches the connection.
    assert!(catalog.get_profiles_by_names(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_dataset_leaves_catalog_closed() {
    let tmp = tempfile::TempDir::new().unwrap();
    let catalog = CatalogHandle::new(tmp.path().join("nope.db"), ImageMode::Linked);
    assert!(!catalog.open().await);
    assert!(!catalog.is_ready().await);
    assert!(!tmp.path().join("nope.db").exists());
}

#[tokio::test]
async fn handbook_returns_empty_when_not_ready() {
    let (tmp, config_path) = common::fixture(false).await;
    let cfg = load_config(&config_path).unwrap();
    let handbook = Handbook::new(CatalogHandle::from_config(&cfg), &cfg);

    assert!(!handbook.is_ready().await);
    assert!(handbook.names().await.is_empty());
    assert!(handbook.search("Aqua").await.is_empty());
    assert!(handbook.resolve(&["Minato Aqua".to_string()]).await.is_empty());
    assert!(handbook.agencies().await.is_empty());
    assert!(handbook.detail("Minato Aqua").await.page.sections.is_empty());
    drop(tmp);
}

#[tokio::test]
async fn agencies_need_an_affiliated_member() {
    let (_tmp, catalog) = open_catalog(false).await;
    let agencies = catalog.get_agency_profiles(20).await.unwrap();

    // Nijisanji has no members and Solo Agency only lists itself.
    assert_eq!(names_of(&agencies), HashSet::from(["hololive".to_string()]));
    assert!(agencies.iter().all(|p| p.is_agency));
    catalog.close().await;
}

#[tokio::test]
async fn random_profiles_respect_filter_and_limit() {
    let (_tmp, catalog) = open_catalog(false).await;

    let people = catalog.get_random_profiles(false, 20).await.unwrap();
    assert_eq!(
        names_of(&people),
        HashSet::from([
            "Hoshimachi Suisei".to_string(),
            "Minato Aqua".to_string(),
            "Gawr Gura".to_string(),
        ])
    );

    let two = catalog.get_random_profiles(true, 2).await.unwrap();
    assert_eq!(two.len(), 2);
    assert!(two.iter().all(|p| p.is_agency));
    catalog.close().await;
}

#[tokio::test]
async fn image_mode_selects_exactly_one_column() {
    let names = vec!["Hoshimachi Suisei".to_string()];

    let (_tmp, linked) = open_catalog(false).await;
    let p = linked.get_profiles_by_names(&names).await.unwrap().remove(0);
    assert_eq!(p.image, ImageRef::Link("https://img/suisei.png".into()));
    linked.close().await;

    let (_tmp, embedded) = open_catalog(true).await;
    let p = embedded.get_profiles_by_names(&names).await.unwrap().remove(0);
    assert_eq!(p.image, ImageRef::Embedded(common::compressed(common::SUISEI_JPEG)));
    assert!(image_uri(&p.image).starts_with("data:image/jpeg;base64,"));

    // Corrupt blob decodes to the empty sentinel.
    let gura = embedded
        .get_profiles_by_names(&["Gawr Gura".to_string()])
        .await
        .unwrap()
        .remove(0);
    assert_eq!(image_uri(&gura.image), "");
    embedded.close().await;
}

#[tokio::test]
async fn large_name_lists_are_batched() {
    let (_tmp, catalog) = open_catalog(false).await;
    let mut names: Vec<String> = (0..1200).map(|i| format!("missing {i}")).collect();
    names.push("Minato Aqua".to_string());
    names.insert(0, "hololive".to_string());

    let found = catalog.get_profiles_by_names(&names).await.unwrap();
    assert_eq!(
        names_of(&found),
        HashSet::from(["Minato Aqua".to_string(), "hololive".to_string()])
    );
    catalog.close().await;
}

#[tokio::test]
async fn detail_and_links_are_typed() {
    let (_tmp, catalog) = open_catalog(false).await;
    let (detail, links) = catalog.get_detail_and_links("Minato Aqua").await.unwrap();

    let detail = detail.unwrap();
    assert!(!detail.fields.contains_key("name"));
    assert_eq!(detail.affiliation(), Some("Hololive"));

    let links: Vec<Platform> = links.unwrap().ordered().map(|(p, _)| p).collect();
    assert_eq!(links, vec![Platform::OfficialChannel, Platform::Twitter]);

    let (detail, links) = catalog.get_detail_and_links("Nijisanji").await.unwrap();
    assert!(detail.is_none());
    assert!(links.is_none());
    catalog.close().await;
}

#[tokio::test]
async fn search_and_detail_end_to_end() {
    let (tmp, config_path) = common::fixture(false).await;
    let cfg = load_config(&config_path).unwrap();
    let catalog = CatalogHandle::from_config(&cfg);
    catalog.open().await;
    let handbook = Handbook::new(catalog, &cfg);

    let hits = handbook.search("Suisay").await;
    assert_eq!(hits[0].profile.name, "Hoshimachi Suisei");
    assert!(handbook.search("").await.is_empty());

    let detail = handbook.detail("Minato Aqua").await;
    // real_name is empty and filtered; biography is long and goes last.
    let labels: Vec<&str> = detail
        .page
        .sections
        .rows()
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Height", "Affiliation", "Biography"]);
    assert_eq!(detail.page.sections.back.len(), 1);
    assert_eq!(detail.intro_html, "<strong>Minato Aqua</strong> intro");
    assert!(detail.credit_html.contains("<a href=\"https://virtualyoutuber.fandom.com\">wiki</a>"));

    handbook.store().close().await;
    drop(tmp);
}

#[tokio::test]
async fn bookmark_order_survives_resolution() {
    let (_tmp, catalog) = open_catalog(false).await;
    let handbook_cfg = vtuber_handbook::config::parse_config("[catalog]\npath = \"x\"\n").unwrap();
    let handbook = Handbook::new(catalog, &handbook_cfg);

    let bookmarks = vec![
        "Minato Aqua".to_string(),
        "Deleted Entry".to_string(),
        "Hoshimachi Suisei".to_string(),
    ];
    let resolved = handbook.resolve(&bookmarks).await;
    let order: Vec<(usize, &str)> = resolved
        .iter()
        .map(|r| (r.position, r.profile.name.as_str()))
        .collect();
    assert_eq!(order, vec![(0, "Minato Aqua"), (2, "Hoshimachi Suisei")]);
    handbook.store().close().await;
}

#[tokio::test]
async fn concurrent_queries_share_one_connection() {
    let (_tmp, catalog) = open_catalog(false).await;
    let catalog = Arc::new(catalog);

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let catalog = Arc::clone(&catalog);
        tasks.push(tokio::spawn(async move {
            let names = catalog.list_all_names().await.unwrap();
            catalog.get_profiles_by_names(&names).await.unwrap().len()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), 6);
    }
    catalog.close().await;
}
