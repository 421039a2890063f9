//! Current-queue construction and timing.
//!
//! Pure helpers over the operator-edited row sequence: wrapping it into a
//! queue under the reserved name ("set queue") or a fresh object name
//! ("add queue"), and summing the expected execution time.

use ccdobs::{Queue, QueueRow};

/// Wrap live rows into a queue named `name`.
///
/// Rows are copied as-is; their order and numbering are the operator's.
pub fn build(rows: &[QueueRow], name: &str) -> Queue {
    Queue::with_rows(name, rows.to_vec())
}

/// Total exposure time across rows, in seconds.
pub fn count_duration(rows: &[QueueRow]) -> f64 {
    rows.iter().map(|r| r.exposure).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccdobs::CURRENT_QUEUE_NAME;

    fn row(number: u32, exposure: f64) -> QueueRow {
        QueueRow {
            number,
            image_type: "Image".to_string(),
            filter: "V".to_string(),
            exposure,
            readout: "16".to_string(),
        }
    }

    #[test]
    fn test_build_relabels_without_touching_rows() {
        let rows = vec![row(3, 10.0), row(1, 20.0)];
        let queue = build(&rows, CURRENT_QUEUE_NAME);
        assert!(queue.is_current());
        assert_eq!(queue.rows, rows);

        let named = build(&rows, "M31");
        assert_eq!(named.name, "M31");
        assert_eq!(named.rows, rows);
    }

    #[test]
    fn test_count_duration_empty_is_zero() {
        assert_eq!(count_duration(&[]), 0.0);
    }

    #[test]
    fn test_count_duration_is_order_invariant() {
        let forward = vec![row(1, 30.0), row(2, 12.5), row(3, 0.0)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(count_duration(&forward), 42.5);
        assert_eq!(count_duration(&forward), count_duration(&backward));
    }
}
