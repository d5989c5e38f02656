//! Path utilities for DeepScout directory resolution.

use anyhow::Result;
use std::path::PathBuf;

const DEEPSCOUT_DIR: &str = ".deepscout";
const DATABASE_FILE: &str = "deepscout.db";

/// Environment variable to override the DeepScout directory.
const DEEPSCOUT_DIR_ENV: &str = "DEEPSCOUT_DIR";

/// Resolve the DeepScout data directory.
/// Priority: DEEPSCOUT_DIR env var > ~/.deepscout/
pub fn resolve_deepscout_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DEEPSCOUT_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(DEEPSCOUT_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the DeepScout directory exists and return its path.
pub fn ensure_deepscout_dir() -> Result<PathBuf> {
    let dir = resolve_deepscout_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the database path: ~/.deepscout/deepscout.db
pub fn database_path() -> Result<PathBuf> {
    Ok(resolve_deepscout_dir()?.join(DATABASE_FILE))
}
