use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::Path;

use serde_json::Value;

use crate::prelude::*;

/// Reads records from a JSON Lines file, one object per line.
pub(crate) struct JsonLinesSource<R> {
    origin: String,
    field: String,
    lines: Lines<R>,
    index: usize,
}

impl JsonLinesSource<BufReader<File>> {
    pub(crate) fn from_path<P: AsRef<Path>>(
        path: P,
        field: &str,
    ) -> SamplerResult<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| {
            SamplerError::unavailable(&origin, format!("{e}"))
        })?;

        Ok(Self::new(origin, BufReader::new(file), field))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub(crate) fn new<S: Into<String>>(
        origin: S,
        reader: R,
        field: &str,
    ) -> Self {
        Self {
            origin: origin.into(),
            field: field.into(),
            lines: reader.lines(),
            index: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = SamplerResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    // The offending line is consumed by the reader.
                    let index = self.index;
                    self.index += 1;
                    return Some(Err(SamplerError::malformed(
                        &self.origin,
                        index,
                        format!("invalid UTF-8: {e}"),
                    )));
                }
                Err(e) => {
                    return Some(Err(SamplerError::unavailable(
                        &self.origin,
                        format!("read failed: {e}"),
                    )));
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let index = self.index;
            self.index += 1;

            let result = serde_json::from_str::<Value>(&line)
                .map_err(|e| format!("invalid JSON: {e}"))
                .and_then(|value| Record::from_json(&value, &self.field))
                .map_err(|reason| {
                    SamplerError::malformed(&self.origin, index, reason)
                });

            return Some(result);
        }
    }
}
