use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseConfig {
    pub storage_path: String,
}

impl DatabaseConfig {
    /// Resolve the directory holding the database file; relative paths are
    /// anchored at the process working directory. Created when missing.
    pub fn parse_dir(&self) -> anyhow::Result<PathBuf> {
        let path = std::path::Path::new(&self.storage_path);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        if !path.is_dir() {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create storage directory. {:?}", path))?;
        }
        Ok(path)
    }
}
