//! Failure paths: nothing is printed and nothing is stored

use crate::adx;
use crate::common::Dataset;
use anyhow::Result;

#[test]
fn test_commands_outside_index_fail() -> Result<()> {
    let ds = Dataset::new();

    let result = adx!(ds.root(), "sync").assert_failure()?;
    assert!(result.contains_stderr("Not an aerodex directory"));
    assert!(result.stdout.is_empty());
    Ok(())
}

#[test]
fn test_init_twice_fails() -> Result<()> {
    let ds = Dataset::new();
    adx!(ds.root(), "init").assert_success()?;

    let result = adx!(ds.root(), "init").assert_failure()?;
    assert!(result.contains_stderr("already exists"));
    Ok(())
}

#[test]
fn test_init_missing_directory_fails() -> Result<()> {
    let ds = Dataset::new();
    let result = adx!(ds.root(), "init", "does/not/exist").assert_failure()?;
    assert!(result.contains_stderr("does not exist"));
    Ok(())
}

#[test]
fn test_add_outside_root_adds_nothing() -> Result<()> {
    let ds = Dataset::new();
    let other = Dataset::new();
    adx!(ds.root(), "init").assert_success()?;
    ds.write("a.jpg", b"a", 1_650_000_000);
    let outside = other.write("b.jpg", b"b", 1_650_000_000);

    let result = adx!(ds.root(), "add", "a.jpg", &outside.to_string_lossy())
        .assert_failure()?;
    assert!(result.contains_stderr("not contained within"));
    assert!(result.stdout.is_empty());

    assert!(adx!(ds.root(), "list").assert_success()?.lines().is_empty());
    Ok(())
}

#[test]
fn test_add_missing_path_fails() -> Result<()> {
    let ds = Dataset::new();
    adx!(ds.root(), "init").assert_success()?;

    let result = adx!(ds.root(), "add", "ghost.jpg").assert_failure()?;
    assert!(result.contains_stderr("does not exist"));
    Ok(())
}

#[test]
fn test_unknown_config_key_fails() -> Result<()> {
    let ds = Dataset::new();
    adx!(ds.root(), "init").assert_success()?;

    let result = adx!(ds.root(), "config", "scan.colour", "blue")
        .env("NO_COLOR", "1")
        .assert_failure()?;
    assert!(result.contains_stderr("Unknown config key"));
    assert!(result.duration.as_secs() < 30);
    Ok(())
}
