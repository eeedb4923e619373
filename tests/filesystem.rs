//! Symlink Tree Integration Tests
//!
//! Filesystem rendering, idempotent re-runs and pruning with the janitor.

use std::path::PathBuf;

use mediatree::{
    clean_symlinks, Category, CategoryRef, FilesystemRenderer, MediaItem, NamePolicy,
    OutputTarget, Renderer,
};
use tempfile::TempDir;
use tokio::fs;

const SD: &str = "E-OurStudio";

fn tree(wd: &std::path::Path) -> Vec<Category> {
    let media = wd.join(SD);
    vec![
        Category::new("start", "Start")
            .home()
            .with_entry(CategoryRef::new("movies", "Movies")),
        Category::new("movies", "Movies")
            .with_entry(MediaItem::new("Clip 1", "http://x/1.mp4").with_file(media.join("1_r720P.mp4")))
            .with_entry(MediaItem::new("Clip 2", "http://x/2.mp4")),
    ]
}

async fn count_links(dir: PathBuf) -> usize {
    let mut count = 0;
    let mut entries = fs::read_dir(dir).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        if entry.file_type().await.unwrap().is_symlink() {
            count += 1;
        }
    }
    count
}

#[tokio::test]
async fn test_tree_layout() {
    let temp = TempDir::new().unwrap();
    let wd = temp.path();
    let target = OutputTarget::new(wd, SD);
    fs::create_dir_all(wd.join(SD)).await.unwrap();
    fs::write(wd.join(SD).join("1_r720P.mp4"), b"video").await.unwrap();

    FilesystemRenderer::new(target, NamePolicy::Unix)
        .render(&tree(wd))
        .await
        .unwrap();

    // Home link at the top points into the subdir
    assert_eq!(
        fs::read_link(wd.join("Start")).await.unwrap(),
        PathBuf::from("E-OurStudio/start")
    );
    assert!(wd.join("Start").join("Movies").join("Clip 1.mp4").exists());

    assert_eq!(
        fs::read_link(wd.join(SD).join("start").join("Movies")).await.unwrap(),
        PathBuf::from("../movies")
    );
    assert_eq!(
        fs::read_link(wd.join(SD).join("movies").join("Clip 1.mp4")).await.unwrap(),
        PathBuf::from("../1_r720P.mp4")
    );

    // Undownloaded media has nothing to link to
    assert_eq!(count_links(wd.join(SD).join("movies")).await, 1);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let wd = temp.path();
    let renderer = FilesystemRenderer::new(OutputTarget::new(wd, SD), NamePolicy::Unix);

    let first = renderer.render(&tree(wd)).await.unwrap();
    let second = renderer.render(&tree(wd)).await.unwrap();

    assert_eq!(first.entries, 3);
    assert_eq!(second.entries, 0);
    assert_eq!(count_links(wd.join(SD).join("start")).await, 1);
    assert_eq!(count_links(wd.join(SD).join("movies")).await, 1);
}

#[tokio::test]
async fn test_janitor_removes_only_broken_links() {
    let temp = TempDir::new().unwrap();
    let wd = temp.path();
    fs::create_dir_all(wd.join(SD)).await.unwrap();
    fs::write(wd.join(SD).join("1_r720P.mp4"), b"video").await.unwrap();

    let mut categories = tree(wd);
    categories[1] = categories[1]
        .clone()
        .with_entry(MediaItem::new("Gone", "http://x/3.mp4").with_file(wd.join(SD).join("3.mp4")));

    FilesystemRenderer::new(OutputTarget::new(wd, SD), NamePolicy::Unix)
        .render(&categories)
        .await
        .unwrap();
    assert_eq!(count_links(wd.join(SD).join("movies")).await, 2);

    let report = clean_symlinks(&wd.join(SD), false).await.unwrap();
    assert_eq!(report.checked, 3);
    assert_eq!(report.removed, 1);

    let movies = wd.join(SD).join("movies");
    assert!(fs::symlink_metadata(movies.join("Clip 1.mp4")).await.is_ok());
    assert!(fs::symlink_metadata(movies.join("Gone.mp4")).await.is_err());
    assert!(fs::symlink_metadata(wd.join(SD).join("start").join("Movies")).await.is_ok());
}

#[tokio::test]
async fn test_janitor_remove_all() {
    let temp = TempDir::new().unwrap();
    let wd = temp.path();
    fs::create_dir_all(wd.join(SD)).await.unwrap();
    fs::write(wd.join(SD).join("1_r720P.mp4"), b"video").await.unwrap();

    FilesystemRenderer::new(OutputTarget::new(wd, SD), NamePolicy::Unix)
        .render(&tree(wd))
        .await
        .unwrap();

    let report = clean_symlinks(&wd.join(SD), true).await.unwrap();
    assert_eq!(report.removed, 2);
    assert_eq!(count_links(wd.join(SD).join("start")).await, 0);
    assert_eq!(count_links(wd.join(SD).join("movies")).await, 0);

    // Media files and category dirs stay
    assert!(wd.join(SD).join("1_r720P.mp4").exists());
    assert!(wd.join(SD).join("movies").is_dir());
}
