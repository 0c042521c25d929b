use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SamplerResult;
use crate::record::Record;

const DEFAULT_ENDPOINT: &str = "https://datasets-server.huggingface.co";

/// Sampler config.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The path of the config.
    #[serde(skip)]
    path: PathBuf,

    /// Where records are read from.
    #[serde(default)]
    pub(crate) source: SourceConfig,

    /// How the sample is written.
    #[serde(default)]
    pub(crate) sample: SampleConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SourceConfig {
    /// The Hugging Face dataset id.
    pub(crate) dataset: String,

    /// The dataset configuration (subset).
    pub(crate) config: String,

    /// The split to read.
    pub(crate) split: String,

    /// The name of the field holding the text of a record.
    pub(crate) field: String,

    /// The base URL of the datasets-server API.
    pub(crate) endpoint: Url,

    /// Where downloaded shards are kept. Defaults to the user's cache
    /// directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) cache_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dataset: "openwebtext".into(),
            config: "plain_text".into(),
            split: "train".into(),
            field: Record::DEFAULT_FIELD.into(),
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("valid url"),
            cache_dir: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SampleConfig {
    /// The zero-based index of the last record to keep.
    pub(crate) limit: usize,

    /// The path of the sample file.
    pub(crate) output: PathBuf,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            limit: 999,
            output: PathBuf::from("openwebtext_sample.txt"),
        }
    }
}

impl Config {
    pub(crate) const FILENAME: &'static str = "sampler.toml";

    /// Creates a new default config and sets the file location.
    pub(crate) fn create<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            path: path.as_ref().into(),
            ..Default::default()
        }
    }

    /// Loads an existing config from a path.
    pub(crate) fn from_path<P>(path: P) -> SamplerResult<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().into();
        let content = fs::read_to_string(&path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.path = path;

        Ok(config)
    }

    /// Searches `dir` and its parents for a config file and loads the
    /// first one found.
    pub(crate) fn discover_from<P>(dir: P) -> SamplerResult<Option<Self>>
    where
        P: AsRef<Path>,
    {
        let mut dir = dir.as_ref().to_path_buf();

        loop {
            let path = dir.join(Self::FILENAME);
            if path.is_file() {
                return Self::from_path(path).map(Some);
            }

            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Like [Config::discover_from], starting at the current directory.
    pub(crate) fn discover() -> SamplerResult<Option<Self>> {
        Self::discover_from(env::current_dir()?)
    }

    /// Returns the location of the config.
    #[inline]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves a path from the config against the directory of the
    /// config file. Absolute paths and paths of an unsaved config are
    /// returned unchanged.
    pub(crate) fn resolve<P>(&self, path: P) -> PathBuf
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        match self.path.parent() {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.into(),
        }
    }

    /// Saves the config.
    pub(crate) fn save(&self) -> SamplerResult<()> {
        let content = toml::to_string(self)?;
        let mut out = File::create(&self.path)?;
        out.write_all(content.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::SamplerError;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn config_defaults() -> TestResult {
        let config: Config = toml::from_str("")?;
        assert_eq!(config.source.dataset, "openwebtext");
        assert_eq!(config.source.config, "plain_text");
        assert_eq!(config.source.split, "train");
        assert_eq!(config.source.field, "text");
        assert_eq!(
            config.source.endpoint.as_str(),
            "https://datasets-server.huggingface.co/"
        );
        assert_eq!(config.source.cache_dir, None);
        assert_eq!(config.sample.limit, 999);
        assert_eq!(
            config.sample.output,
            PathBuf::from("openwebtext_sample.txt")
        );
        Ok(())
    }

    #[test]
    fn config_partial() -> TestResult {
        let config: Config = toml::from_str(
            "[source]\ndataset = \"wikitext\"\n\n[sample]\nlimit = 9\n",
        )?;

        assert_eq!(config.source.dataset, "wikitext");
        assert_eq!(config.source.split, "train");
        assert_eq!(config.sample.limit, 9);
        Ok(())
    }

    #[test]
    fn config_save_and_load() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join(Config::FILENAME);

        let mut config = Config::create(&path);
        config.source.split = "validation".into();
        config.source.cache_dir = Some(dir.path().join("cache"));
        config.sample.limit = 99;
        config.save()?;

        let config = Config::from_path(&path)?;
        assert_eq!(config.path(), path);
        assert_eq!(config.source.split, "validation");
        assert_eq!(config.source.cache_dir, Some(dir.path().join("cache")));
        assert_eq!(config.sample.limit, 99);
        Ok(())
    }

    #[test]
    fn config_discover() -> TestResult {
        let dir = TempDir::new()?;
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested)?;

        assert!(Config::discover_from(&nested)?.is_none());

        let mut config = Config::create(dir.path().join(Config::FILENAME));
        config.sample.limit = 4;
        config.save()?;

        let config = Config::discover_from(&nested)?.unwrap();
        assert_eq!(config.sample.limit, 4);
        Ok(())
    }

    #[test]
    fn config_resolve() -> TestResult {
        let dir = TempDir::new()?;
        let config = Config::create(dir.path().join(Config::FILENAME));

        assert_eq!(
            config.resolve("sample.txt"),
            dir.path().join("sample.txt")
        );
        assert_eq!(config.resolve("/data/cache"), Path::new("/data/cache"));

        let config = Config::default();
        assert_eq!(config.resolve("sample.txt"), Path::new("sample.txt"));
        Ok(())
    }

    #[test]
    fn config_invalid() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join(Config::FILENAME);
        fs::write(&path, "[sample]\nlimit = \"many\"\n")?;

        assert!(matches!(
            Config::from_path(&path),
            Err(SamplerError::Toml(_))
        ));
        Ok(())
    }
}
