use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::FlipError;
use crate::event::ErrorRateBucket;

/// Borrowed view over a configured run, ready for serialization.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub mode: &'static str,
    pub seed: u64,
    pub width_bits: u32,
    pub cursor: Cursor,
    pub buckets: &'a [ErrorRateBucket],
}

impl Report<'_> {
    /// Tab-indented JSON of every bucket and event.
    pub fn render(&self) -> Result<String, FlipError> {
        let mut buf = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| FlipError::Render(serde::ser::Error::custom(e)))
    }

    pub fn to_value(&self) -> Result<serde_json::Value, FlipError> {
        Ok(serde_json::to_value(self)?)
    }
}
