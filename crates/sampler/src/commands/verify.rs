use std::fs;
use std::path::PathBuf;

use clap::Parser;
use humansize::{format_size, BINARY};

use crate::prelude::*;
use crate::sample::read_sample;

/// Verify that a sample file is well-formed.
///
/// Every record must occupy exactly one line followed by a blank line.
#[derive(Debug, Default, Parser)]
pub(crate) struct Verify {
    /// Fail unless the sample holds exactly `num` records.
    #[arg(long, value_name = "num")]
    records: Option<usize>,

    /// The sample file to verify. By default the configured output
    /// file is used.
    #[arg(value_name = "filename")]
    path: Option<PathBuf>,
}

impl Verify {
    pub(crate) fn execute(self) -> SamplerResult<()> {
        let path = match self.path {
            Some(path) => path,
            None => {
                let config = Config::discover()?.unwrap_or_default();
                config.sample.output
            }
        };

        let texts = read_sample(&path)?;
        if let Some(expected) = self.records {
            if texts.len() != expected {
                bail!(
                    "verification failed: expected {expected} records, \
                        found {} (path = {path:?})",
                    texts.len()
                );
            }
        }

        let size = fs::metadata(&path)?.len();
        println!(
            "{}: {} records, {}",
            path.display(),
            texts.len(),
            format_size(size, BINARY)
        );

        Ok(())
    }
}
