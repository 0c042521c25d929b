use std::fs::File;
use std::io::{stdout, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Args;
use crate::prelude::*;

/// Generate completion scripts for various shells.
#[derive(Debug, clap::Parser)]
pub(crate) struct Completions {
    /// Write output to `filename` instead of `stdout`.
    #[arg(long, short, value_name = "filename")]
    output: Option<PathBuf>,

    /// Shell for which a completion script is to be generated.
    #[arg(value_name = "shell")]
    shell: Shell,
}

impl Completions {
    pub(crate) fn execute(self) -> SamplerResult<()> {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();

        let mut wtr: Box<dyn Write> = match self.output {
            Some(path) => match File::create(&path) {
                Ok(file) => Box::new(file),
                Err(source) => {
                    return Err(SamplerError::OutputWrite { path, source })
                }
            },
            None => Box::new(stdout().lock()),
        };

        generate(self.shell, &mut cmd, name, &mut wtr);
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn bash_completions() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("sampler.bash");

        Completions::parse_from([
            "completions",
            "-o",
            path.to_str().unwrap(),
            "bash",
        ])
        .execute()?;

        let script = fs::read_to_string(&path)?;
        assert!(script.contains("sampler"));
        assert!(script.contains("generate"));
        Ok(())
    }

    #[test]
    fn completions_unwritable_output() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("missing").join("sampler.zsh");

        let result = Completions::parse_from([
            "completions",
            "-o",
            path.to_str().unwrap(),
            "zsh",
        ])
        .execute();

        assert!(matches!(result, Err(SamplerError::OutputWrite { .. })));
        Ok(())
    }
}
