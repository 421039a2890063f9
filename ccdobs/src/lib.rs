//! CCDOBS queue list format
//!
//! This crate provides the data model and text codec for the flat-file
//! observation queue format consumed by the Andor CCD acquisition software.
//! A file is a sequence of sections: a line starting with `%` opens a named
//! queue, and rows before the first header belong to the reserved current
//! queue.

mod codec;
mod filter;
mod model;

pub use codec::{decode, encode, Decoded, RejectedLine, RowError};
pub use filter::{denormalize, normalize};
pub use model::{Queue, QueueCollection, QueueRow, CURRENT_QUEUE_NAME};
