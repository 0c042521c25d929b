use std::path::PathBuf;
use std::{env, fs};

use clap::Parser;
use log::info;

use crate::prelude::*;

/// Create a new sampler config (`sampler.toml`).
#[derive(Debug, Parser)]
pub(crate) struct Init {
    /// The id of the Hugging Face dataset.
    #[arg(long)]
    dataset: Option<String>,

    /// The zero-based index of the last record to keep.
    #[arg(short = 'n', long, value_name = "index")]
    limit: Option<usize>,

    /// The path of the sample file.
    #[arg(short, long, value_name = "filename")]
    output: Option<PathBuf>,

    /// Whether to overwrite an existing config with default values or
    /// not.
    #[arg(short, long)]
    force: bool,

    /// The directory in which the config is created.
    #[arg(default_value = ".")]
    path: PathBuf,
}

impl Init {
    pub(crate) fn execute(self) -> SamplerResult<()> {
        let root_dir = env::current_dir()?.join(self.path);
        let path = root_dir.join(Config::FILENAME);

        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
            info!("created directory {}", root_dir.display());
        }

        if path.exists() && !self.force {
            bail!("config {path:?} already exists (use `--force`)");
        }

        let mut config = Config::create(&path);
        if let Some(dataset) = self.dataset {
            config.source.dataset = dataset;
        }

        if let Some(limit) = self.limit {
            config.sample.limit = limit;
        }

        if let Some(output) = self.output {
            config.sample.output = output;
        }

        config.save()?;
        info!("created config {}", path.display());
        Ok(())
    }
}
