use crate::adapters::json_parser::record_from_value;
use crate::domain::model::Record;
use crate::domain::ports::{ParsedStream, Parser, StreamingParser};
use crate::utils::error::{IngestError, Result};
use tracing::{debug, error};

/// JSON-Lines parser: every non-blank line is an independent JSON object.
///
/// Blank lines are skipped and do not count towards record positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesParser;

impl Parser for JsonLinesParser {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn parse(&self, raw: &str) -> Result<Vec<Record>> {
        debug!("Parsing {} bytes of JSON-Lines", raw.len());
        let mut records = Vec::new();

        for (line_number, line) in raw.split('\n').enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let position = records.len();
            records.push(decode_line(line_number + 1, position, line)?);
        }

        debug!("JSON-Lines parsing complete: {} records", records.len());
        Ok(records)
    }
}

impl StreamingParser for JsonLinesParser {
    fn parse_stream(&self, raw: String) -> ParsedStream {
        Box::new(LineRecords::new(raw))
    }
}

fn decode_line(line_number: usize, position: usize, line: &str) -> Result<Record> {
    let value = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
        error!("Failed to parse JSON-Lines line {}: {}", line_number, e);
        IngestError::LineParseError {
            line: line_number,
            content: line.to_string(),
            source: e,
        }
    })?;
    record_from_value(position, value)
}

/// Decodes one line per `next` call. Stops for good after the first error.
struct LineRecords {
    raw: String,
    offset: usize,
    line_number: usize,
    position: usize,
    failed: bool,
}

impl LineRecords {
    fn new(raw: String) -> Self {
        Self {
            raw,
            offset: 0,
            line_number: 0,
            position: 0,
            failed: false,
        }
    }

    fn next_line(&mut self) -> Option<(usize, usize, usize)> {
        if self.offset > self.raw.len() {
            return None;
        }
        let start = self.offset;
        let end = self.raw[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.raw.len());
        self.offset = end + 1;
        self.line_number += 1;
        Some((self.line_number, start, end))
    }
}

impl Iterator for LineRecords {
    type Item = Result<(usize, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some((line_number, start, end)) = self.next_line() {
            let line = self.raw[start..end].trim();
            if line.is_empty() {
                continue;
            }

            let position = self.position;
            let result = decode_line(line_number, position, line);
            if result.is_err() {
                self.failed = true;
            } else {
                self.position += 1;
            }
            return Some(result.map(|record| (position, record)));
        }

        None
    }
}
