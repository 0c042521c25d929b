use serde_json::Value;

/// A single unit of text yielded by a record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub(crate) text: String,
}

impl Record {
    pub(crate) const DEFAULT_FIELD: &'static str = "text";

    #[inline]
    pub(crate) fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }

    /// Extracts the record from a JSON object.
    ///
    /// The error is the reason why the value isn't a valid record; the
    /// caller decides how to report it. A missing or non-string field
    /// is never replaced by a default.
    pub(crate) fn from_json(
        value: &Value,
        field: &str,
    ) -> Result<Self, String> {
        let Some(object) = value.as_object() else {
            return Err("expected a JSON object".into());
        };

        match object.get(field) {
            Some(Value::String(text)) => Ok(Self::new(text.as_str())),
            Some(_) => Err(format!("field `{field}` is not a string")),
            None => Err(format!("missing field `{field}`")),
        }
    }

    /// Returns the single-line representation of the record's text.
    #[inline]
    pub(crate) fn normalized(&self) -> String {
        normalize(&self.text)
    }
}

/// Replaces every newline character with a single space.
#[inline]
pub(crate) fn normalize(text: &str) -> String {
    text.replace('\n', " ")
}
