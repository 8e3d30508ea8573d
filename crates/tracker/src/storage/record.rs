//! Line codec for the delimited data file.
//!
//! One record per line: `id|title|status|priority|due_date`. There is no
//! header and no escaping; titles never contain the delimiter because it is
//! stripped on the way in. Lines are handled as bytes so that one line of
//! invalid UTF-8 is only that line's problem.

use crate::entities::{Task, TaskPriority, TaskStatus};

const FIELD_COUNT: usize = 5;

/// A persisted line that could not be decoded into a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the file as last read
    pub line: usize,

    /// Original text for display, lossily decoded
    pub raw: String,

    /// Original bytes, written back untouched
    pub bytes: Vec<u8>,

    /// Why decoding failed
    pub reason: String,

    /// Leading id, when the first field is still a well-formed integer
    pub id: Option<u64>,
}

/// One line of the data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredLine {
    Task(Task),
    Malformed(MalformedLine),
}

impl StoredLine {
    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Self::Task(task) => Some(task),
            Self::Malformed(_) => None,
        }
    }

    /// Id carried by the line, if any is readable
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Task(task) => Some(task.id),
            Self::Malformed(malformed) => malformed.id,
        }
    }
}

/// Encoder/decoder for delimited task lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCodec {
    delimiter: char,
}

impl LineCodec {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Decode a single line; never fails, bad lines come back as `Malformed`
    pub fn decode(&self, line: usize, raw: &str) -> StoredLine {
        let fields: Vec<&str> = raw.split(self.delimiter).collect();
        let id = fields.first().and_then(|f| parse_id(f));

        let malformed = |reason: String| {
            StoredLine::Malformed(MalformedLine {
                line,
                raw: raw.to_string(),
                bytes: raw.as_bytes().to_vec(),
                reason,
                id,
            })
        };

        if fields.len() != FIELD_COUNT {
            return malformed(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            ));
        }

        let Some(id) = id else {
            return malformed(format!("id '{}' is not a non-negative integer", fields[0]));
        };

        if fields[1].trim().is_empty() {
            return malformed("empty title".to_string());
        }

        StoredLine::Task(Task {
            id,
            title: fields[1].to_string(),
            status: TaskStatus::from_stored(fields[2]),
            priority: TaskPriority::from_stored(fields[3]),
            due_date: fields[4].to_string(),
        })
    }

    /// Encode a task as a single line (no trailing newline)
    pub fn encode(&self, task: &Task) -> String {
        let d = self.delimiter;
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            task.id, task.title, task.status, task.priority, task.due_date
        )
    }

    /// Decode a line of raw bytes; invalid UTF-8 comes back as `Malformed`
    pub fn decode_bytes(&self, line: usize, bytes: &[u8]) -> StoredLine {
        match std::str::from_utf8(bytes) {
            Ok(raw) => self.decode(line, raw),
            Err(e) => {
                let raw = String::from_utf8_lossy(bytes).into_owned();
                let id = raw.split(self.delimiter).next().and_then(parse_id);
                StoredLine::Malformed(MalformedLine {
                    line,
                    raw,
                    bytes: bytes.to_vec(),
                    reason: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
                    id,
                })
            }
        }
    }

    /// Decode a whole file, skipping blank lines
    ///
    /// Lines end at `\n`; a `\r` before it is dropped.
    pub fn decode_document(&self, content: &[u8]) -> Vec<StoredLine> {
        content
            .split(|b| *b == b'\n')
            .map(|raw| raw.strip_suffix(b"\r").unwrap_or(raw))
            .enumerate()
            .filter(|(_, raw)| !raw.iter().all(u8::is_ascii_whitespace))
            .map(|(idx, raw)| self.decode_bytes(idx + 1, raw))
            .collect()
    }

    /// Encode every line, malformed ones byte for byte, with a trailing newline
    pub fn encode_document(&self, lines: &[StoredLine]) -> Vec<u8> {
        let mut out = Vec::new();
        for line in lines {
            match line {
                StoredLine::Task(task) => out.extend_from_slice(self.encode(task).as_bytes()),
                StoredLine::Malformed(malformed) => out.extend_from_slice(&malformed.bytes),
            }
            out.push(b'\n');
        }
        out
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new('|')
    }
}

/// Digits only: no sign, no whitespace
fn parse_id(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
