use std::fs::create_dir_all;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{bail, SamplerError, SamplerResult};

/// Returns the directory in which downloaded dataset shards are kept
/// (e.g. `~/.cache/sampler` on Linux). The directory is created if it
/// doesn't exist.
pub(crate) fn cache_dir() -> SamplerResult<PathBuf> {
    if let Some(project_dirs) =
        ProjectDirs::from("de.dnb", "DNB", "sampler")
    {
        let cache_dir = project_dirs.cache_dir();
        if !cache_dir.exists() {
            create_dir_all(cache_dir)?;
        }

        return Ok(cache_dir.to_path_buf());
    }

    bail!("unable determine cache directory!")
}
