//! End-to-end resolution against a site root on disk

use std::io::Cursor;
use std::path::Path;

use artframe::application::{ArtworkResolver, Presented, RecordingAdapter};
use artframe::domain::{Environment, IdentifierSource, ResolutionError};
use artframe::infrastructure::config::{AppConfig, ConfigManager};
use image::{ImageFormat, RgbImage};
use tempfile::TempDir;

const CATALOG: &str = "\
Tilda UID,SKU,Название,Описание
782957961992,P-045,Sunrise,Warm light over the bay
555000111,ART-0007b,Новые фрески Альтамира,Cave walls
";

fn encoded(format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbImage::from_pixel(4, 3, image::Rgb([200, 120, 40]))
        .write_to(&mut out, format)
        .unwrap();
    out.into_inner()
}

fn put(root: &Path, relative: &str, bytes: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn site(with_catalog: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    if with_catalog {
        put(dir.path(), "paintings.csv", CATALOG.as_bytes());
    }
    dir
}

fn resolver_for(dir: &TempDir) -> ArtworkResolver {
    let mut config = AppConfig::default();
    config.site.root = dir.path().display().to_string();
    ArtworkResolver::from_config(&config).unwrap()
}

fn env(url: &str, referrer: Option<&str>) -> Environment {
    Environment::parse(url, referrer).unwrap()
}

#[tokio::test]
async fn resolves_path_identifier_to_large_image_in_capitalized_folder() {
    let dir = site(true);
    put(dir.path(), "images/Paintings/45_large.jpg", &encoded(ImageFormat::Jpeg));
    put(dir.path(), "images/paintings/045_thumb.png", &encoded(ImageFormat::Png));

    let adapter = RecordingAdapter::new();
    let view = resolver_for(&dir)
        .run(&env("https://shop.example/tproduct/782957961992-artwork", None), &adapter)
        .await
        .unwrap();

    assert_eq!(view.identifier.source, IdentifierSource::Path);
    assert_eq!(view.record.title, "Sunrise");
    assert_eq!(view.record.description, "Warm light over the bay");
    assert_eq!(view.record.derived_asset_id, "45");
    assert_eq!(view.image.as_ref().unwrap().url, "images/Paintings/45_large.jpg");
    // Thumbnails race: either existing file may answer first
    let thumbnail = view.thumbnail.as_ref().unwrap().url.as_str();
    assert!(
        ["images/paintings/045_thumb.png", "images/Paintings/45_large.jpg"].contains(&thumbnail),
        "unexpected thumbnail {thumbnail}"
    );
    assert_eq!(adapter.events(), vec![Presented::Artwork(Box::new(view))]);
}

#[tokio::test]
async fn missing_identifier_never_reads_catalog() {
    // No paintings.csv on disk: reading it would surface "catalog unavailable"
    let dir = site(false);
    let adapter = RecordingAdapter::new();

    let outcome = resolver_for(&dir)
        .run(&env("https://shop.example/about", Some("https://shop.example/")), &adapter)
        .await;

    assert_eq!(outcome.unwrap_err(), ResolutionError::NoIdentifierResolved);
    assert_eq!(adapter.messages(), vec!["no identifier in link".to_string()]);
}

#[tokio::test]
async fn missing_catalog_is_reported() {
    let dir = site(false);
    let adapter = RecordingAdapter::new();

    let outcome = resolver_for(&dir)
        .run(&env("https://shop.example/?pid=782957961992", None), &adapter)
        .await;

    assert!(matches!(outcome, Err(ResolutionError::CatalogUnreachable { .. })));
    assert_eq!(adapter.messages(), vec!["catalog unavailable".to_string()]);
}

#[tokio::test]
async fn record_is_shown_when_no_image_exists() {
    let dir = site(true);
    let adapter = RecordingAdapter::new();

    let view = resolver_for(&dir)
        .run(&env("https://shop.example/?uid=782957961992", None), &adapter)
        .await
        .unwrap();

    assert!(view.image.is_none());
    assert!(view.thumbnail.is_none());
    let artworks = adapter.artworks();
    assert_eq!(artworks.len(), 1);
    assert_eq!(artworks[0].record.title, "Sunrise");
    assert_eq!(adapter.messages(), vec!["image not found".to_string()]);
}

#[tokio::test]
async fn undecodable_file_is_skipped() {
    let dir = site(true);
    put(dir.path(), "images/paintings/45.jpg", b"<html>404</html>");
    put(dir.path(), "images/paintings/45_large.png", &encoded(ImageFormat::Png));

    let view = resolver_for(&dir)
        .resolve(&env("https://shop.example/?pid=782957961992", None))
        .await
        .unwrap();

    assert_eq!(view.image.unwrap().url, "images/paintings/45_large.png");
}

#[tokio::test]
async fn referrer_slug_falls_back_to_cyrillic_title() {
    let dir = site(true);
    put(dir.path(), "images/paintings/07.webp", &encoded(ImageFormat::WebP));

    let view = resolver_for(&dir)
        .resolve(&env(
            "https://widget.example/frame",
            Some("https://shop.example/tproduct/999-novie-freski-altamira"),
        ))
        .await
        .unwrap();

    assert_eq!(view.identifier.source, IdentifierSource::ReferrerPath);
    assert_eq!(view.record.title, "Новые фрески Альтамира");
    assert_eq!(view.record.derived_asset_id, "7");
    assert_eq!(view.image.unwrap().url, "images/paintings/07.webp");
}

#[tokio::test]
async fn config_round_trip_drives_resolution() {
    let dir = site(true);
    put(dir.path(), "images/paintings/45_main.png", &encoded(ImageFormat::Png));

    let config_path = dir.path().join("config").join("artframe_config.json");
    let manager = ConfigManager::with_path(&config_path);
    let mut config = AppConfig::default();
    config.site.root = dir.path().display().to_string();
    config.matching.slug_fallback = false;
    manager.save_config(&config).await.unwrap();

    let loaded = manager.load_config().await.unwrap();
    assert_eq!(loaded, config);

    let resolver = ArtworkResolver::from_config(&loaded).unwrap();
    let view = resolver
        .resolve(&env("https://shop.example/p?sku=x&pid=782957961992", None))
        .await
        .unwrap();
    assert_eq!(view.image.unwrap().url, "images/paintings/45_main.png");

    let slug_only = resolver
        .resolve(&env("https://shop.example/tproduct/1-novie-freski-altamira", None))
        .await;
    assert!(matches!(slug_only, Err(ResolutionError::NoMatchingRecord { .. })));
}
