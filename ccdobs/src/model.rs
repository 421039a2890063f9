/// Name of the reserved slot holding the queue currently being executed.
///
/// At most one queue in a collection carries this name, and it is always
/// written first when the collection is serialized.
pub const CURRENT_QUEUE_NAME: &str = "0_CURRENT_QUEUE";

/// One exposure request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRow {
    /// Display order within the queue
    pub number: u32,
    /// Exposure category, e.g. "Image", "Bias", "Flat", "Dark"
    pub image_type: String,
    /// Filter identifier, short form (see [`crate::normalize`])
    pub filter: String,
    /// Exposure time in seconds
    pub exposure: f64,
    /// CCD readout mode code
    pub readout: String,
}

/// A named, ordered sequence of exposure requests for one object.
///
/// Row order is execution order and must survive serialization unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Queue {
    pub name: String,
    pub rows: Vec<QueueRow>,
}

impl Queue {
    /// Create an empty queue.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Create a queue from existing rows.
    pub fn with_rows(name: impl Into<String>, rows: Vec<QueueRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Whether this queue holds the reserved current-queue name.
    pub fn is_current(&self) -> bool {
        self.name == CURRENT_QUEUE_NAME
    }
}

/// All queues known to the application, keyed by name.
///
/// Insertion order is preserved for serialization, except that the reserved
/// current queue is always surfaced first. At most one entry carries the
/// reserved name; [`QueueCollection::insert`] and
/// [`QueueCollection::replace_current`] maintain that invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueCollection {
    queues: Vec<Queue>,
}

impl QueueCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queues, the reserved one included.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Queue> {
        self.queues.iter()
    }

    /// Queue names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.queues.iter().map(|q| q.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queues.iter().any(|q| q.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Queue> {
        self.queues.iter().find(|q| q.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Queue> {
        self.queues.iter_mut().find(|q| q.name == name)
    }

    /// The queue under the reserved name, if any.
    pub fn current(&self) -> Option<&Queue> {
        self.get(CURRENT_QUEUE_NAME)
    }

    /// Insert a queue, replacing any existing queue with the same name
    /// in place.
    pub fn insert(&mut self, queue: Queue) {
        match self.queues.iter_mut().find(|q| q.name == queue.name) {
            Some(slot) => *slot = queue,
            None => self.queues.push(queue),
        }
    }

    /// Remove and return the named queue.
    pub fn remove(&mut self, name: &str) -> Option<Queue> {
        let idx = self.queues.iter().position(|q| q.name == name)?;
        Some(self.queues.remove(idx))
    }

    /// Substitute the reserved current queue with a fresh one built from
    /// `rows`. Whatever previously held the reserved name is dropped; the
    /// new queue is placed first.
    pub fn replace_current(&mut self, rows: Vec<QueueRow>) {
        self.queues.retain(|q| !q.is_current());
        self.queues
            .insert(0, Queue::with_rows(CURRENT_QUEUE_NAME, rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(number: u32) -> QueueRow {
        QueueRow {
            number,
            image_type: "Image".to_string(),
            filter: "V".to_string(),
            exposure: 30.0,
            readout: "16".to_string(),
        }
    }

    #[test]
    fn test_insert_replaces_same_name_in_place() {
        let mut collection = QueueCollection::new();
        collection.insert(Queue::new("M31"));
        collection.insert(Queue::new("M42"));
        collection.insert(Queue::with_rows("M31", vec![row(1)]));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.names(), vec!["M31", "M42"]);
        assert_eq!(collection.get("M31").unwrap().rows.len(), 1);
    }

    #[test]
    fn test_replace_current_keeps_single_reserved_entry() {
        let mut collection = QueueCollection::new();
        collection.insert(Queue::new("M31"));

        collection.replace_current(vec![row(1)]);
        collection.replace_current(vec![row(1), row(2)]);

        let reserved: Vec<_> = collection.iter().filter(|q| q.is_current()).collect();
        assert_eq!(reserved.len(), 1);
        assert_eq!(reserved[0].rows.len(), 2);
        // Reserved queue is surfaced first
        assert_eq!(collection.names()[0], CURRENT_QUEUE_NAME);
    }

    #[test]
    fn test_remove_returns_queue() {
        let mut collection = QueueCollection::new();
        collection.insert(Queue::with_rows("M31", vec![row(1)]));

        let removed = collection.remove("M31").unwrap();
        assert_eq!(removed.name, "M31");
        assert!(collection.is_empty());
        assert!(collection.remove("M31").is_none());
    }
}
