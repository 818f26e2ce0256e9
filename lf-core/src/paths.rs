//! Per-user directories for the register's database, config, logs and cache.

use std::path::PathBuf;
use crate::constants::APP_NAME;
use crate::error::{LfError, LfResult};

#[derive(Debug, Clone, Copy)]
enum Base {
    Data,
    Config,
    Cache,
}

fn app_dir(base: Base) -> LfResult<PathBuf> {
    let root = match base {
        Base::Data => dirs::data_dir(),
        Base::Config => dirs::config_dir(),
        Base::Cache => dirs::cache_dir(),
    };
    root.map(|dir| dir.join(APP_NAME))
        .ok_or_else(|| LfError::Config(format!("could not determine the {base:?} directory")))
}

/// Holds the database file, logs and generated reports,
/// e.g. `~/.local/share/LostFound` on Linux.
pub fn data_dir() -> LfResult<PathBuf> {
    app_dir(Base::Data)
}

pub fn config_dir() -> LfResult<PathBuf> {
    app_dir(Base::Config)
}

/// Holds the file backend's snapshot between runs.
pub fn cache_dir() -> LfResult<PathBuf> {
    app_dir(Base::Cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_are_namespaced() {
        // CI containers may run without a home directory.
        for dir in [data_dir(), config_dir(), cache_dir()].into_iter().flatten() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
