use std::path::PathBuf;

use clap::Parser;
use indicatif::ProgressIterator;
use log::{debug, info};

use crate::prelude::*;
use crate::sample::generate_sample;
use crate::source::{Format, HubOptions, Input};
use crate::utils;

const PBAR_SAMPLE: &str = "Sampling records: {human_pos}/{human_len} | \
        elapsed: {elapsed_precise}{msg}";

/// Write the first records of a dataset to a sample file.
#[derive(Debug, Default, Parser)]
pub(crate) struct Generate {
    /// Read records from `filename` instead of the Hugging Face hub.
    #[arg(short, long, value_name = "filename")]
    input: Option<PathBuf>,

    /// The format of the input file. By default the format is derived
    /// from the file extension.
    #[arg(long, requires = "input")]
    format: Option<Format>,

    /// The id of the Hugging Face dataset (default: `openwebtext`).
    #[arg(long, conflicts_with = "input")]
    dataset: Option<String>,

    /// The dataset configuration (default: `plain_text`).
    #[arg(long, conflicts_with = "input")]
    subset: Option<String>,

    /// The split to read (default: `train`).
    #[arg(long, conflicts_with = "input")]
    split: Option<String>,

    /// The name of the field holding the text (default: `text`).
    #[arg(long)]
    field: Option<String>,

    /// The zero-based index of the last record to keep. A value of
    /// `999` (default) keeps the first 1000 records.
    #[arg(short = 'n', long, value_name = "index")]
    limit: Option<usize>,

    /// Write the sample into `filename` (default:
    /// `openwebtext_sample.txt`). An existing file is overwritten.
    #[arg(short, long, value_name = "filename")]
    output: Option<PathBuf>,

    /// An access token for the Hugging Face hub.
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl Generate {
    /// Resolves the record source; flags take precedence over the
    /// config.
    fn input(&mut self, config: Config) -> SamplerResult<Input> {
        let cache_dir = config
            .source
            .cache_dir
            .as_deref()
            .map(|dir| config.resolve(dir));

        let source = config.source;
        let field = self.field.take().unwrap_or(source.field);

        if let Some(path) = self.input.take() {
            return Ok(Input::File {
                path,
                format: self.format,
                field,
            });
        }

        let cache_dir = match cache_dir {
            Some(cache_dir) => cache_dir,
            None => utils::cache_dir()?,
        };

        Ok(Input::Hub(HubOptions {
            dataset: self.dataset.take().unwrap_or(source.dataset),
            config: self.subset.take().unwrap_or(source.config),
            split: self.split.take().unwrap_or(source.split),
            field,
            endpoint: source.endpoint,
            cache_dir,
            token: self.token.take(),
        }))
    }

    /// Returns the path of the sample file. A path from the config is
    /// relative to the config file.
    fn output(&mut self, config: &Config) -> PathBuf {
        self.output
            .take()
            .unwrap_or_else(|| config.resolve(&config.sample.output))
    }

    pub(crate) fn execute(mut self, quiet: bool) -> SamplerResult<()> {
        let config = Config::discover()?.unwrap_or_default();
        if !config.path().as_os_str().is_empty() {
            debug!("using config {}", config.path().display());
        }

        let limit = self.limit.unwrap_or(config.sample.limit);
        let output = self.output(&config);

        let source = self.input(config)?.open()?;
        let pbar = ProgressBarBuilder::new(PBAR_SAMPLE, quiet)
            .len((limit as u64).saturating_add(1))
            .build();

        let source = source.progress_with(pbar.clone());
        let count = generate_sample(source, limit, &output)?;
        pbar.finish_using_style();

        info!("wrote {count} records to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::config::SourceConfig;

    type TestResult = anyhow::Result<()>;

    fn parse(args: &[&str]) -> Generate {
        Generate::parse_from(
            std::iter::once("generate").chain(args.iter().copied()),
        )
    }

    #[test]
    fn input_from_file() -> TestResult {
        let mut cmd = parse(&["-i", "docs.data", "--format", "jsonl"]);

        match cmd.input(Config::default())? {
            Input::File {
                path,
                format,
                field,
            } => {
                assert_eq!(path, Path::new("docs.data"));
                assert_eq!(format, Some(Format::Jsonl));
                assert_eq!(field, "text");
            }
            input => panic!("unexpected input {input:?}"),
        }

        Ok(())
    }

    #[test]
    fn input_from_hub() -> TestResult {
        let dir = TempDir::new()?;
        let mut config = Config::default();
        config.source = SourceConfig {
            dataset: "wikitext".into(),
            split: "test".into(),
            cache_dir: Some(dir.path().into()),
            ..Default::default()
        };

        let mut cmd = parse(&["--split", "validation", "--field", "body"]);
        match cmd.input(config)? {
            Input::Hub(options) => {
                assert_eq!(options.dataset, "wikitext");
                assert_eq!(options.config, "plain_text");
                assert_eq!(options.split, "validation");
                assert_eq!(options.field, "body");
                assert_eq!(options.cache_dir, dir.path());
            }
            input => panic!("unexpected input {input:?}"),
        }

        Ok(())
    }

    #[test]
    fn paths_relative_to_config() -> TestResult {
        let dir = TempDir::new()?;
        let mut config = Config::create(dir.path().join(Config::FILENAME));
        config.source.cache_dir = Some(PathBuf::from("cache"));
        config.sample.output = PathBuf::from("out/sample.txt");

        let mut cmd = parse(&[]);
        assert_eq!(cmd.output(&config), dir.path().join("out/sample.txt"));
        match cmd.input(config)? {
            Input::Hub(options) => {
                assert_eq!(options.cache_dir, dir.path().join("cache"));
            }
            input => panic!("unexpected input {input:?}"),
        }

        let config = Config::create(dir.path().join(Config::FILENAME));
        let mut cmd = parse(&["-o", "sample.txt"]);
        assert_eq!(cmd.output(&config), Path::new("sample.txt"));
        Ok(())
    }

    #[test]
    fn conflicting_flags() {
        let args = ["generate", "-i", "a.jsonl", "--dataset", "x"];
        assert!(Generate::try_parse_from(args).is_err());

        let args = ["generate", "--format", "jsonl"];
        assert!(Generate::try_parse_from(args).is_err());
    }

    #[test]
    fn generate_from_jsonl() -> TestResult {
        let dir = TempDir::new()?;
        let input = dir.path().join("docs.jsonl");
        let output = dir.path().join("sample.txt");
        fs::write(
            &input,
            "{\"text\":\"a\\nb\"}\n{\"text\":\"c\"}\n{\"text\":\"d\\ne\"}\n",
        )?;

        let cmd = parse(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-n",
            "1",
        ]);

        cmd.execute(true)?;
        assert_eq!(fs::read_to_string(&output)?, "a b\n\nc\n\n");
        Ok(())
    }

    #[test]
    fn generate_malformed_record() -> TestResult {
        let dir = TempDir::new()?;
        let input = dir.path().join("docs.jsonl");
        let output = dir.path().join("sample.txt");
        fs::write(&input, "{\"text\":\"a\"}\n{\"title\":\"b\"}\n")?;

        let cmd = parse(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);

        assert!(matches!(
            cmd.execute(true),
            Err(SamplerError::MalformedRecord { index: 1, .. })
        ));
        Ok(())
    }
}
