use std::io;
use std::path::PathBuf;

pub(crate) type SamplerResult<T> = Result<T, SamplerError>;

macro_rules! bail {
    ($($arg:tt)*) => {{
        return Err(SamplerError::Other(format!($($arg)*)));
    }};
}

pub(crate) use bail;

#[derive(Debug, thiserror::Error)]
pub(crate) enum SamplerError {
    #[error("data source '{origin}' is unavailable: {reason}")]
    SourceUnavailable { origin: String, reason: String },

    #[error("malformed record #{index} in '{origin}': {reason}")]
    MalformedRecord {
        origin: String,
        index: usize,
        reason: String,
    },

    #[error("unable to write sample '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed sample '{}': {reason}", .path.display())]
    MalformedSample { path: PathBuf, reason: String },

    #[error(transparent)]
    IO(#[from] io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl SamplerError {
    #[inline]
    pub(crate) fn unavailable<S, R>(origin: S, reason: R) -> Self
    where
        S: ToString,
        R: ToString,
    {
        Self::SourceUnavailable {
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }

    #[inline]
    pub(crate) fn malformed<S, R>(
        origin: S,
        index: usize,
        reason: R,
    ) -> Self
    where
        S: ToString,
        R: ToString,
    {
        Self::MalformedRecord {
            origin: origin.to_string(),
            index,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = SamplerError::unavailable("openwebtext", "timeout");
        assert_eq!(
            err.to_string(),
            "data source 'openwebtext' is unavailable: timeout"
        );

        let err =
            SamplerError::malformed("a.jsonl", 3, "missing field `text`");
        assert_eq!(
            err.to_string(),
            "malformed record #3 in 'a.jsonl': missing field `text`"
        );
    }
}
