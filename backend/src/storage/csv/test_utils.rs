/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// The temporary data directory is removed when the environment is dropped,
/// even if the test panics.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::csv_store::CsvStore;

/// Test environment that provides a temporary directory and connection
/// that will be automatically cleaned up when the environment is dropped.
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    /// Create a new test environment with a temporary directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// A full store over this environment's connection
    pub fn store(&self) -> CsvStore {
        CsvStore::from_connection(self.connection.clone())
    }
}
