//! Engine lifecycle; kept in its own test binary since it shuts the
//! process-wide context down

use aerodex_index::{initialize, is_initialized, shutdown, Database, IndexError};

#[test]
fn test_operations_require_initialize() {
    let dir = tempfile::tempdir().unwrap();

    assert!(!is_initialized());
    assert!(matches!(
        Database::create(dir.path()),
        Err(IndexError::NotInitialized)
    ));

    let info = initialize();
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(initialize(), info);
    Database::create(dir.path()).unwrap();

    shutdown();
    shutdown();
    assert!(!is_initialized());
    assert!(matches!(
        Database::open(dir.path(), false),
        Err(IndexError::NotInitialized)
    ));

    initialize();
    assert!(Database::open(dir.path(), false).is_ok());
}
