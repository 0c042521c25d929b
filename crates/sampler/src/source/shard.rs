use std::fs::File;
use std::path::Path;

use parquet::file::reader::SerializedFileReader;
use parquet::record::reader::RowIter;
use parquet::record::{Field, Row};

use crate::prelude::*;

/// Streams the rows of a single parquet file as records.
pub(crate) struct ParquetSource {
    origin: String,
    field: String,
    rows: RowIter<'static>,
    index: usize,
}

impl ParquetSource {
    pub(crate) fn from_path<P: AsRef<Path>>(
        path: P,
        field: &str,
    ) -> SamplerResult<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();

        let file = File::open(path).map_err(|e| {
            SamplerError::unavailable(
                &origin,
                format!("failed opening parquet file: {e}"),
            )
        })?;

        let reader = SerializedFileReader::new(file).map_err(|e| {
            SamplerError::unavailable(
                &origin,
                format!("failed reading parquet metadata: {e}"),
            )
        })?;

        Ok(Self {
            origin,
            field: field.into(),
            rows: reader.into_iter(),
            index: 0,
        })
    }
}

fn row_to_record(row: &Row, field: &str) -> Result<Record, String> {
    let value = row
        .get_column_iter()
        .find_map(|(name, value)| (name == field).then_some(value));

    match value {
        Some(Field::Str(text)) => Ok(Record::new(text.as_str())),
        Some(Field::Bytes(bytes)) => bytes
            .as_utf8()
            .map(Record::new)
            .map_err(|_| format!("field `{field}` is not valid UTF-8")),
        Some(Field::Null) => Err(format!("field `{field}` is null")),
        Some(_) => Err(format!("field `{field}` is not a string")),
        None => Err(format!("missing field `{field}`")),
    }
}

impl Iterator for ParquetSource {
    type Item = SamplerResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(e) => {
                return Some(Err(SamplerError::unavailable(
                    &self.origin,
                    format!("failed reading row #{}: {e}", self.index),
                )));
            }
        };

        let index = self.index;
        self.index += 1;

        Some(row_to_record(&row, &self.field).map_err(|reason| {
            SamplerError::malformed(&self.origin, index, reason)
        }))
    }
}
