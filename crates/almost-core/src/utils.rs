//! Home directory lookup

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Home directory of the current user, which must exist
///
/// A non-empty `HOME` wins over the platform lookup.
pub fn get_home_dir() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or_else(|| Error::home_not_found("<unknown>"))?;

    if !home.is_dir() {
        return Err(Error::home_not_found(home.display().to_string()));
    }
    Ok(home)
}
