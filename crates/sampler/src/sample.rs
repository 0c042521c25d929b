use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::prelude::*;

/// Terminates every record of a sample file: one line terminator
/// followed by one blank line.
pub(crate) const SEPARATOR: &str = "\n\n";

/// Writes the first `limit + 1` records of `source` to `path`.
///
/// The `limit` is the zero-based index of the last record to keep, so
/// a limit of `0` keeps exactly one record. The source is consumed
/// lazily and never polled past the last kept record. Each record's
/// text is normalized (newlines replaced by spaces) and followed by a
/// blank line. An existing file at `path` is truncated.
///
/// Returns the number of records written. Errors of the source are
/// propagated as they are; the sample file may be left incomplete in
/// that case.
pub(crate) fn generate_sample<I, P>(
    source: I,
    limit: usize,
    path: P,
) -> SamplerResult<usize>
where
    I: IntoIterator<Item = SamplerResult<Record>>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let output_err = |source: io::Error| SamplerError::OutputWrite {
        path: path.into(),
        source,
    };

    let file = File::create(path).map_err(output_err)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0;

    for result in source.into_iter().take(limit.saturating_add(1)) {
        let record = result?;
        writer
            .write_all(record.normalized().as_bytes())
            .and_then(|_| writer.write_all(SEPARATOR.as_bytes()))
            .map_err(output_err)?;

        count += 1;
    }

    writer.flush().map_err(output_err)?;
    Ok(count)
}

/// Reads a sample file back into the list of its (normalized) texts.
pub(crate) fn read_sample<P: AsRef<Path>>(
    path: P,
) -> SamplerResult<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    parse_sample(&content).map_err(|reason| {
        SamplerError::MalformedSample {
            path: path.into(),
            reason,
        }
    })
}

fn parse_sample(content: &str) -> Result<Vec<String>, String> {
    if !content.is_empty() && !content.ends_with(SEPARATOR) {
        return Err("missing blank line after the last record".into());
    }

    content
        .split_terminator(SEPARATOR)
        .enumerate()
        .map(|(idx, block)| {
            if block.contains('\n') {
                Err(format!("record #{idx} spans multiple lines"))
            } else {
                Ok(block.to_string())
            }
        })
        .collect()
}
