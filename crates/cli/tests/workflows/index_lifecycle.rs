//! init → add → sync → remove against a real directory

use crate::adx;
use crate::common::Dataset;
use anyhow::Result;

#[test]
fn test_init_add_sync_delete() -> Result<()> {
    let ds = Dataset::new();
    let root = ds.root();

    let init = adx!(root, "init").assert_success()?;
    assert!(init.stdout.contains(".aerodex"));
    assert!(root.join(".aerodex/index.sqlite").is_file());

    ds.write("img.jpg", b"fake jpeg", 1_650_000_000);
    let add = adx!(root, "add", "img.jpg").assert_success()?;
    assert_eq!(add.lines(), vec!["A\timg.jpg"]);

    let list = adx!(root, "list").assert_success()?;
    assert_eq!(list.lines(), vec!["image\timg.jpg"]);

    ds.remove("img.jpg");
    let sync = adx!(root, "sync").assert_success()?;
    assert_eq!(sync.lines(), vec!["D\timg.jpg"]);

    let list = adx!(root, "ls").assert_success()?;
    assert!(list.lines().is_empty());
    Ok(())
}

#[test]
fn test_add_directory_then_remove() -> Result<()> {
    let ds = Dataset::new();
    let root = ds.root();
    adx!(root, "init").assert_success()?;

    ds.write("flight/day1/a.jpg", b"a", 1_650_000_000);
    ds.write("flight/day1/b.laz", b"b", 1_650_000_000);

    let add = adx!(root, "a", "flight").assert_success()?;
    assert_eq!(
        add.lines(),
        vec![
            "A\tflight/day1/a.jpg",
            "A\tflight/day1/b.laz",
            "A\tflight",
            "A\tflight/day1"
        ]
    );

    let list = adx!(root, "list", "flight/day1").assert_success()?;
    assert_eq!(
        list.lines(),
        vec![
            "directory\tflight/day1",
            "image\tflight/day1/a.jpg",
            "pointcloud\tflight/day1/b.laz"
        ]
    );

    let rm = adx!(root, "rm", "flight/day1/b.laz").assert_success()?;
    assert_eq!(rm.lines(), vec!["D\tflight/day1/b.laz"]);

    let again = adx!(root, "add", ".").assert_success()?;
    assert_eq!(again.lines(), vec!["A\tflight/day1/b.laz"]);
    Ok(())
}

#[test]
fn test_sync_reports_updates_once() -> Result<()> {
    let ds = Dataset::new();
    let root = ds.root();
    adx!(root, "init").assert_success()?;
    ds.write("notes.txt", b"v1", 1_650_000_000);
    adx!(root, "add", "notes.txt").assert_success()?;

    ds.write("notes.txt", b"v2 longer", 1_650_000_900);
    let first = adx!(root, "s").assert_success()?;
    assert_eq!(first.lines(), vec!["U\tnotes.txt"]);

    let second = adx!(root, "sync").assert_success()?;
    assert!(second.lines().is_empty());
    Ok(())
}

#[test]
fn test_touch_is_not_an_update() -> Result<()> {
    let ds = Dataset::new();
    let root = ds.root();
    adx!(root, "init").assert_success()?;
    ds.write("notes.txt", b"same", 1_650_000_000);
    adx!(root, "add", "notes.txt").assert_success()?;

    ds.touch("notes.txt", 1_650_777_777);
    assert!(adx!(root, "sync").assert_success()?.lines().is_empty());
    assert!(adx!(root, "add", "notes.txt").assert_success()?.lines().is_empty());
    Ok(())
}

#[test]
fn test_commands_from_subdirectory() -> Result<()> {
    let ds = Dataset::new();
    let root = ds.root();
    adx!(root, "init").assert_success()?;
    ds.write("flight/a.jpg", b"a", 1_650_000_000);

    let add = adx!(root.join("flight"), "add", "a.jpg").assert_success()?;
    assert_eq!(add.lines(), vec!["A\tflight/a.jpg", "A\tflight"]);

    let root_str = root.to_string_lossy().to_string();
    let list = adx!(std::env::temp_dir(), "-C", &root_str, "list", "--depth", "0")
        .assert_success()?;
    assert_eq!(list.lines(), vec!["directory\tflight"]);
    Ok(())
}

#[test]
fn test_config_roundtrip() -> Result<()> {
    let ds = Dataset::new();
    let root = ds.root();
    adx!(root, "init").assert_success()?;

    let get = adx!(root, "config", "scan.max_depth").assert_success()?;
    assert_eq!(get.lines(), vec!["0"]);

    adx!(root, "config", "scan.max_depth", "1").assert_success()?;
    let get = adx!(root, "config", "scan.max_depth").assert_success()?;
    assert_eq!(get.lines(), vec!["1"]);

    ds.write("top.txt", b"t", 1_650_000_000);
    ds.write("a/b/c.txt", b"c", 1_650_000_000);
    let add = adx!(root, "add", ".").assert_success()?;
    assert_eq!(add.lines(), vec!["A\ttop.txt", "A\ta"]);

    let list = adx!(root, "config").assert_success()?;
    assert!(list.stdout.contains("max_depth"));
    Ok(())
}
