//! Workflow integration tests
//!
//! Each test runs several commands against one scratch dataset and checks
//! the change log printed on stdout.

pub mod edge_cases;
pub mod index_lifecycle;
