//! Render Command Integration Tests
//!
//! End-to-end: catalog JSON on disk through the CLI render path.

use std::path::PathBuf;

use mediatree::adapters::JsonCatalog;
use mediatree::cli::{render, OutputMode, RenderOptions};
use mediatree::NamePolicy;
use tempfile::TempDir;
use tokio::fs;

const CATALOG: &str = r#"[
    {"key": "start", "name": "Start", "home": true,
     "content": [{"type": "category", "key": "movies", "name": "Movies"}]},
    {"key": "movies", "name": "Movies",
     "content": [{"type": "media", "name": "Clip 1", "url": "http://x/1.mp4"}]}
]"#;

fn options(mode: OutputMode, wd: PathBuf) -> RenderOptions {
    RenderOptions {
        mode,
        work_dir: wd,
        subdir: Some("E-OurStudio".to_string()),
        uniq: false,
        include_keyname: false,
        clean: false,
        policy: NamePolicy::Unix,
    }
}

#[tokio::test]
async fn test_render_m3u_from_catalog_file() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.path().join("catalog.json");
    fs::write(&catalog, CATALOG).await.unwrap();
    let wd = temp.path().join("out");

    render(&JsonCatalog::new(&catalog), options(OutputMode::M3u, wd.clone()))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(wd.join("Start.m3u")).await.unwrap(),
        "#EXTM3U\n#EXTINF:0,MOVIES\nE-OurStudio/movies.m3u\n"
    );
}

#[tokio::test]
async fn test_filesystem_render_prunes_stale_links() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.path().join("catalog.json");
    fs::write(&catalog, CATALOG).await.unwrap();
    let wd = temp.path().join("out");

    // Leftover from an earlier catalog
    let stale = wd.join("E-OurStudio/movies/Old.mp4");
    fs::create_dir_all(stale.parent().unwrap()).await.unwrap();
    fs::symlink("../old.mp4", &stale).await.unwrap();

    render(&JsonCatalog::new(&catalog), options(OutputMode::Filesystem, wd.clone()))
        .await
        .unwrap();

    assert!(fs::symlink_metadata(&stale).await.is_err());
    assert_eq!(
        fs::read_link(wd.join("E-OurStudio/start/Movies")).await.unwrap(),
        PathBuf::from("../movies")
    );
}

#[tokio::test]
async fn test_bad_catalog_is_an_error() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.path().join("catalog.json");
    fs::write(&catalog, "not json").await.unwrap();

    let err = render(
        &JsonCatalog::new(&catalog),
        options(OutputMode::Html, temp.path().to_path_buf()),
    )
    .await
    .unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to parse catalog JSON"));
}
