//! Decode/encode for the CCDOBS queue list text format.
//!
//! A file is a sequence of sections. `% <name>` opens a named section;
//! rows before the first header belong to the reserved current queue.
//! Rows are whitespace-delimited `number type filter exposure rot` fields.

use thiserror::Error;

use crate::filter;
use crate::model::{Queue, QueueCollection, QueueRow, CURRENT_QUEUE_NAME};

/// Why a row line failed to parse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected 5 fields, got {0}")]
    FieldCount(usize),
    #[error("invalid row number: {0}")]
    BadNumber(String),
    #[error("invalid exposure time: {0}")]
    BadExposure(String),
}

/// A line that was rejected during decode, with its 1-based line number.
///
/// Rejection is per line; the rest of the file still loads.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    pub line: usize,
    pub content: String,
    pub reason: RowError,
}

/// Result of decoding queue file text.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub collection: QueueCollection,
    pub rejected: Vec<RejectedLine>,
}

/// Parse queue file text into a collection of named queues.
///
/// The reserved current queue is always present in the result, possibly
/// empty. Malformed rows are skipped and reported in
/// [`Decoded::rejected`].
pub fn decode(text: &str) -> Decoded {
    let mut collection = QueueCollection::new();
    collection.insert(Queue::new(CURRENT_QUEUE_NAME));
    let mut rejected = Vec::new();
    let mut section = CURRENT_QUEUE_NAME.to_string();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix('%') {
            section = name.trim().to_string();
            if !collection.contains(&section) {
                collection.insert(Queue::new(section.clone()));
            }
            continue;
        }
        // Long-form filter names embed a space; fold them to single tokens
        // before field splitting. Header lines never get here.
        let line = filter::normalize(line);
        match parse_row(&line) {
            Ok(row) => {
                if let Some(queue) = collection.get_mut(&section) {
                    queue.rows.push(row);
                }
            }
            Err(reason) => rejected.push(RejectedLine {
                line: idx + 1,
                content: raw.trim().to_string(),
                reason,
            }),
        }
    }

    Decoded {
        collection,
        rejected,
    }
}

fn parse_row(line: &str) -> Result<QueueRow, RowError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(RowError::FieldCount(fields.len()));
    }
    let number = fields[0]
        .parse::<u32>()
        .map_err(|_| RowError::BadNumber(fields[0].to_string()))?;
    let exposure = fields[3]
        .parse::<f64>()
        .map_err(|_| RowError::BadExposure(fields[3].to_string()))?;
    if !exposure.is_finite() || exposure < 0.0 {
        return Err(RowError::BadExposure(fields[3].to_string()));
    }
    Ok(QueueRow {
        number,
        image_type: fields[1].to_string(),
        filter: fields[2].to_string(),
        exposure,
        readout: fields[4].to_string(),
    })
}

/// Serialize a collection back to queue file text.
///
/// The reserved current queue is written first without a header, followed
/// by a blank line, then each named queue as a `% name` section. Short
/// filter codes are expanded to their long forms on the way out.
pub fn encode(collection: &QueueCollection) -> String {
    let mut out = String::new();
    if let Some(current) = collection.current() {
        for row in &current.rows {
            push_row(&mut out, row);
        }
    }
    out.push('\n');
    for queue in collection.iter().filter(|q| !q.is_current()) {
        out.push_str("% ");
        out.push_str(&queue.name);
        out.push('\n');
        for row in &queue.rows {
            push_row(&mut out, row);
        }
        out.push('\n');
    }
    out
}

fn push_row(out: &mut String, row: &QueueRow) {
    let filter = filter::denormalize(&row.filter);
    out.push_str(&format!(
        "{:^5}{:<7}{:<11}{:<7.1}{:<2}\n",
        row.number, row.image_type, filter, row.exposure, row.readout
    ));
}
