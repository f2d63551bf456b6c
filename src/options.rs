//! Client configuration.

use std::env;
use std::path::PathBuf;

/// Default number of rows inserted per statement batch during a bulk load.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Configuration for a [crate::TableQuery].
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory where the backing store file is created.
    pub store_dir: PathBuf,

    /// Rows loaded per transaction when copying a table into the store.
    pub batch_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            store_dir: env::temp_dir(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory holding the backing store file.
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// Sets the bulk load batch size, clamped to at least one row.
    pub fn batch_size(mut self, rows: usize) -> Self {
        self.batch_size = rows.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();

        assert_eq!(options.store_dir, env::temp_dir());
        assert_eq!(options.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_builder() {
        let options = Options::new().store_dir("/var/tmp/dfq").batch_size(0);

        assert_eq!(options.store_dir, PathBuf::from("/var/tmp/dfq"));
        assert_eq!(options.batch_size, 1);
    }
}
