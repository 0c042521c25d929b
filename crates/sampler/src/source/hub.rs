use std::collections::VecDeque;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use humansize::{format_size, BINARY};
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use url::Url;

use super::ParquetSource;
use crate::prelude::*;

/// Location of a dataset split on the Hugging Face hub.
#[derive(Debug, Clone)]
pub(crate) struct HubOptions {
    /// The dataset id, e.g. `openwebtext`.
    pub(crate) dataset: String,

    /// The dataset configuration (subset), e.g. `plain_text`.
    pub(crate) config: String,

    /// The split name, e.g. `train`.
    pub(crate) split: String,

    /// The name of the column holding the text.
    pub(crate) field: String,

    /// Base URL of the datasets-server API.
    pub(crate) endpoint: Url,

    /// Directory in which downloaded shards are kept.
    pub(crate) cache_dir: PathBuf,

    /// Optional access token, sent as bearer token.
    pub(crate) token: Option<String>,
}

impl HubOptions {
    /// Returns the URL listing all parquet shards of the dataset.
    pub(crate) fn listing_url(&self) -> SamplerResult<Url> {
        let scheme = self.endpoint.scheme();
        if scheme != "http" && scheme != "https" {
            bail!("unsupported scheme {scheme}");
        }

        let mut url = self.endpoint.clone();
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push("parquet");
            }
            Err(_) => bail!("invalid endpoint {}", self.endpoint),
        }

        url.query_pairs_mut().append_pair("dataset", &self.dataset);
        Ok(url)
    }

    /// Returns the directory in which the shards of the split are
    /// stored.
    pub(crate) fn shard_dir(&self) -> PathBuf {
        self.cache_dir
            .join(self.dataset.replace('/', "--"))
            .join(&self.config)
            .join(&self.split)
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    parquet_files: Vec<Shard>,
}

#[derive(Debug, Clone, Deserialize)]
struct Shard {
    config: String,
    split: String,
    url: Url,
    filename: String,
    #[serde(default)]
    size: u64,
}

/// Selects the shards of the requested config and split, ordered by
/// their file names.
fn select_shards(
    listing: Listing,
    config: &str,
    split: &str,
) -> VecDeque<Shard> {
    let mut shards: Vec<_> = listing
        .parquet_files
        .into_iter()
        .filter(|shard| shard.config == config && shard.split == split)
        .collect();

    shards.sort_by(|a, b| a.filename.cmp(&b.filename));
    shards.into()
}

/// Streams the records of a dataset split from the Hugging Face hub.
///
/// Shards are downloaded one at a time, only when the previous shard
/// is exhausted, and kept in the cache directory for later runs.
pub(crate) struct HubSource {
    options: HubOptions,
    client: Client,
    shards: VecDeque<Shard>,
    current: Option<ParquetSource>,
}

impl HubSource {
    pub(crate) fn new(options: HubOptions) -> SamplerResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("sampler/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SamplerError::unavailable(&options.dataset, e))?;

        Self::with_client(options, client)
    }

    /// Lists the shards of the split using an existing client.
    fn with_client(
        options: HubOptions,
        client: Client,
    ) -> SamplerResult<Self> {
        let url = options.listing_url()?;
        info!("listing parquet shards of dataset '{}'", options.dataset);

        let listing: Listing = request(&client, &options, url)?
            .json()
            .map_err(|e| {
                SamplerError::unavailable(
                    &options.dataset,
                    format!("invalid shard listing: {e}"),
                )
            })?;

        let shards =
            select_shards(listing, &options.config, &options.split);
        if shards.is_empty() {
            return Err(SamplerError::unavailable(
                &options.dataset,
                format!(
                    "no parquet shards found (config = {}, split = {})",
                    options.config, options.split
                ),
            ));
        }

        debug!("found {} shards", shards.len());
        Ok(Self::with_shards(options, client, shards))
    }

    fn with_shards(
        options: HubOptions,
        client: Client,
        shards: VecDeque<Shard>,
    ) -> Self {
        Self {
            options,
            client,
            shards,
            current: None,
        }
    }

    /// Returns the local path of the shard, downloading it if it isn't
    /// cached yet.
    fn fetch(&self, shard: &Shard) -> SamplerResult<PathBuf> {
        let Some(filename) = Path::new(&shard.filename).file_name()
        else {
            return Err(SamplerError::unavailable(
                &self.options.dataset,
                format!("invalid shard name '{}'", shard.filename),
            ));
        };

        let shard_dir = self.options.shard_dir();
        let target = shard_dir.join(filename);
        if target.is_file() {
            debug!("using cached shard {}", target.display());
            return Ok(target);
        }

        let unavailable = |reason: String| {
            SamplerError::unavailable(&self.options.dataset, reason)
        };

        fs::create_dir_all(&shard_dir).map_err(|e| {
            unavailable(format!(
                "unable to create '{}': {e}",
                shard_dir.display()
            ))
        })?;

        info!(
            "downloading shard {} ({})",
            shard.filename,
            format_size(shard.size, BINARY)
        );

        let mut response =
            request(&self.client, &self.options, shard.url.clone())?;

        let partial = target.with_extension("part");
        let result = File::create(&partial)
            .map_err(|e| e.to_string())
            .and_then(|mut out| {
                response.copy_to(&mut out).map_err(|e| e.to_string())
            })
            .and_then(|_| {
                fs::rename(&partial, &target).map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            let _ = fs::remove_file(&partial);
            return Err(unavailable(format!(
                "download of '{}' failed: {e}",
                shard.filename
            )));
        }

        Ok(target)
    }
}

fn request(
    client: &Client,
    options: &HubOptions,
    url: Url,
) -> SamplerResult<Response> {
    let mut builder = client.get(url);
    if let Some(ref token) = options.token {
        builder = builder.bearer_auth(token);
    }

    builder
        .send()
        .and_then(Response::error_for_status)
        .map_err(|e| SamplerError::unavailable(&options.dataset, e))
}

impl Iterator for HubSource {
    type Item = SamplerResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) =
                self.current.as_mut().and_then(Iterator::next)
            {
                return Some(item);
            }

            self.current = None;

            let shard = self.shards.pop_front()?;
            let result = self.fetch(&shard).and_then(|path| {
                ParquetSource::from_path(path, &self.options.field)
            });

            match result {
                Ok(rows) => self.current = Some(rows),
                Err(e) => {
                    self.shards.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}
