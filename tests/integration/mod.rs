//! Integration tests for unidb.

pub mod executor_test;
pub mod instance_test;
pub mod introspect_test;

use std::path::PathBuf;
use unidb::catalog::Engine;
use unidb::instance::{ConnectionTarget, Credentials, InstanceHandle};

/// Opens a handle to a fresh in-memory SQLite database.
pub async fn memory_handle() -> InstanceHandle {
    InstanceHandle::connect(
        Engine::Sqlite,
        ConnectionTarget::File {
            path: PathBuf::from(":memory:"),
        },
        Credentials::default(),
    )
    .await
    .expect("in-memory sqlite connect")
}
