//! Queue lifecycle orchestration.
//!
//! All store mutations run here, on the control thread, as a store
//! operation followed by a full file rewrite. The publisher learns about
//! selection changes only through the shared active-target cell, so a
//! publish tick can never observe a half-applied mutation.

use std::sync::Arc;

use ccdobs::QueueRow;
use objinfo::{ObjectPosition, Resolver};
use time::OffsetDateTime;
use tracing::info;

use crate::current;
use crate::error::StoreError;
use crate::publisher::ActiveTarget;
use crate::render::{ChartJob, RenderPool};
use crate::status::{self, StatusCallback};
use crate::store::QueueStore;

/// Control-thread session over one queue file.
///
/// Holds the store, the rows currently under edit for the selected queue,
/// and the collaborator handles (resolver, chart pool, status line).
pub struct Session {
    store: QueueStore,
    resolver: Arc<dyn Resolver + Send + Sync>,
    target: ActiveTarget,
    charts: RenderPool,
    status: StatusCallback,
    /// Rows currently displayed/edited for the selected queue
    rows: Vec<QueueRow>,
    /// Name of the selected queue
    selected: String,
}

impl Session {
    pub fn new(
        store: QueueStore,
        resolver: Arc<dyn Resolver + Send + Sync>,
        target: ActiveTarget,
        charts: RenderPool,
        status: StatusCallback,
    ) -> Self {
        Self {
            store,
            resolver,
            target,
            charts,
            status,
            rows: Vec::new(),
            selected: String::new(),
        }
    }

    fn report(&self, message: &str) {
        info!("{message}");
        (self.status)(&status::stamp(message));
    }

    /// Name of the selected queue.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Rows currently under edit.
    pub fn rows(&self) -> &[QueueRow] {
        &self.rows
    }

    /// Expected execution time of the edited rows, in seconds.
    pub fn queue_time(&self) -> f64 {
        current::count_duration(&self.rows)
    }

    /// Queue names sorted case-insensitively.
    pub fn list_names(&self) -> Vec<String> {
        self.store.list_names()
    }

    /// Queue names whose name contains `pattern`, case-insensitively.
    pub fn filter_names(&self, pattern: &str) -> Vec<String> {
        let pattern = pattern.to_lowercase();
        self.store
            .list_names()
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&pattern))
            .collect()
    }

    /// Load a queue into the edit buffer, resolve its object and hand the
    /// selection to the publisher and chart pool.
    pub fn select(&mut self, name: &str) -> Result<ObjectPosition, StoreError> {
        let queue = self
            .store
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        self.rows = queue.rows;
        self.selected = queue.name;

        let position = self.resolve_selected();
        self.report(&format!("Queue for {} loaded!", self.selected));
        Ok(position)
    }

    /// Re-resolve the selected object, update the shared target and queue
    /// a finder chart. Unresolved objects still become the active target;
    /// the publisher handles them with a sentinel record.
    pub fn resolve_selected(&mut self) -> ObjectPosition {
        let position = self
            .resolver
            .resolve(&self.selected, OffsetDateTime::now_utc());
        *self.target.lock().unwrap() = Some(position.name.clone());
        if let Some(eq) = position.equatorial {
            self.charts.submit(ChartJob {
                object: position.name.clone(),
                ra_deg: eq.ra_deg,
                dec_deg: eq.dec_deg,
            });
        }
        position
    }

    /// Promote the edited rows to the reserved current queue and persist.
    pub fn set_queue(&mut self) -> Result<(), StoreError> {
        self.store.promote_to_current(self.rows.clone());
        self.store.save()?;
        self.report("Queue set!");
        Ok(())
    }

    /// Duplicate the edited rows as a new named queue and persist.
    pub fn add_queue(&mut self, name: &str) -> Result<(), StoreError> {
        let queue = current::build(&self.rows, name);
        self.store.add(&queue.name, queue.rows)?;
        self.store.save()?;
        self.report(&format!("Queue for {name} added!"));
        self.select(name)?;
        Ok(())
    }

    /// Remove a queue and persist.
    pub fn remove_queue(&mut self, name: &str) -> Result<(), StoreError> {
        self.store.remove(name)?;
        self.store.save()?;
        self.report(&format!("Queue for {name} removed!"));
        if self.selected == name {
            self.rows.clear();
            self.selected.clear();
        }
        Ok(())
    }

    /// Rename a queue and persist.
    pub fn rename_queue(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        self.store.rename(old, new)?;
        self.store.save()?;
        if self.selected == old {
            self.selected = new.to_string();
        }
        self.report(&format!("Name changed to {new}!"));
        Ok(())
    }

    /// Append a default row to the edit buffer.
    pub fn add_row(&mut self) {
        let number = self.rows.len() as u32 + 1;
        self.rows.push(QueueRow {
            number,
            image_type: "Image".to_string(),
            filter: "None".to_string(),
            exposure: 1.0,
            readout: "16".to_string(),
        });
        self.report("Row added!");
    }

    /// First object to select at startup: the reserved queue when present,
    /// else the case-insensitively first name.
    pub fn first_object(&self) -> Option<String> {
        self.store.list_names().into_iter().next()
    }

    /// Shut down the collaborators that own threads.
    pub fn shutdown(self) {
        self.charts.wait_for_completion();
    }
}
