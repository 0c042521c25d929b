use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::vec;

use clap::ValueEnum;

pub(crate) use hub::{HubOptions, HubSource};
pub(crate) use jsonl::JsonLinesSource;
pub(crate) use shard::ParquetSource;

use crate::prelude::*;
use crate::sample::read_sample;

mod hub;
mod jsonl;
mod shard;

/// A lazy, ordered sequence of records.
pub(crate) type RecordIter = Box<dyn Iterator<Item = SamplerResult<Record>>>;

/// File formats of a local record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Apache Parquet (one row per record).
    Parquet,
    /// JSON Lines (one object per line).
    Jsonl,
    /// A sample file written by `sampler`.
    Sample,
}

impl Format {
    /// Guesses the format from the file extension.
    pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        match path.as_ref().extension().and_then(OsStr::to_str)? {
            "parquet" => Some(Self::Parquet),
            "jsonl" | "ndjson" | "json" => Some(Self::Jsonl),
            "txt" => Some(Self::Sample),
            _ => None,
        }
    }
}

/// Where the records of a run come from.
#[derive(Debug, Clone)]
pub(crate) enum Input {
    File {
        path: PathBuf,
        format: Option<Format>,
        field: String,
    },
    Hub(HubOptions),
}

impl Input {
    /// Opens the record source.
    ///
    /// Nothing is read beyond what is needed to validate the source;
    /// records are produced on demand.
    pub(crate) fn open(self) -> SamplerResult<RecordIter> {
        match self {
            Self::Hub(options) => Ok(Box::new(HubSource::new(options)?)),
            Self::File {
                path,
                format,
                field,
            } => {
                let format = format.or_else(|| Format::from_path(&path));
                let Some(format) = format else {
                    bail!(
                        "unable to determine the format of '{}'",
                        path.display()
                    );
                };

                let source: RecordIter = match format {
                    Format::Parquet => {
                        Box::new(ParquetSource::from_path(&path, &field)?)
                    }
                    Format::Jsonl => {
                        Box::new(JsonLinesSource::from_path(&path, &field)?)
                    }
                    Format::Sample => {
                        Box::new(SampleSource::from_path(&path)?)
                    }
                };

                Ok(source)
            }
        }
    }
}

/// Yields the records of an existing sample file.
pub(crate) struct SampleSource {
    blocks: vec::IntoIter<String>,
}

impl SampleSource {
    pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> SamplerResult<Self> {
        Ok(Self {
            blocks: read_sample(path)?.into_iter(),
        })
    }
}

impl Iterator for SampleSource {
    type Item = SamplerResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocks.next().map(|text| Ok(Record::new(text)))
    }
}
