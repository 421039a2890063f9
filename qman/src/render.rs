//! Fire-and-forget chart rendering pool.
//!
//! Finder-chart and sky-chart generation is slow, UI-facing work. Jobs go
//! into a bounded queue drained by worker threads; the control thread never
//! blocks on or consumes a result. A full queue drops the job with a
//! warning - the next selection supersedes it anyway.

use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Result;
use crossbeam_channel::{bounded, Sender, TrySendError};
use tracing::{debug, info, warn};

/// A chart to render for one object.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartJob {
    pub object: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
}

/// Renders one chart. Implementations live on the UI side.
pub trait ChartRenderer: Send + Sync + 'static {
    fn render(&self, job: &ChartJob) -> Result<()>;
}

/// A renderer that only logs; the headless default.
pub struct LogRenderer;

impl ChartRenderer for LogRenderer {
    fn render(&self, job: &ChartJob) -> Result<()> {
        debug!(
            "chart for {} at ra={:.5} dec={:.5}",
            job.object, job.ra_deg, job.dec_deg
        );
        Ok(())
    }
}

/// Handle to the render worker pool.
pub struct RenderPool {
    sender: Sender<ChartJob>,
    workers: Vec<JoinHandle<()>>,
}

impl RenderPool {
    pub fn new(renderer: Arc<dyn ChartRenderer>, num_workers: usize, buffer_size: usize) -> Self {
        let (sender, receiver) = bounded::<ChartJob>(buffer_size);

        let mut workers = Vec::new();
        for worker_id in 0..num_workers {
            let receiver = receiver.clone();
            let renderer = renderer.clone();

            let handle = std::thread::spawn(move || {
                debug!("chart worker {} started", worker_id);
                while let Ok(job) = receiver.recv() {
                    if let Err(e) = renderer.render(&job) {
                        warn!("worker {} failed to render chart for {}: {}", worker_id, job.object, e);
                    }
                }
                debug!("chart worker {} shutting down", worker_id);
            });

            workers.push(handle);
        }

        Self { sender, workers }
    }

    /// Queue a job without blocking. Returns false when the job was
    /// dropped (queue full or workers gone).
    pub fn submit(&self, job: ChartJob) -> bool {
        match self.sender.try_send(job) {
            Ok(_) => true,
            Err(TrySendError::Full(job)) => {
                warn!("chart queue full, dropping job for {}", job.object);
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("chart workers have shut down");
                false
            }
        }
    }

    /// Close the queue and wait for in-flight jobs to finish.
    pub fn wait_for_completion(mut self) {
        std::mem::drop(self.sender);

        for (worker_id, handle) in self.workers.drain(..).enumerate() {
            if let Err(e) = handle.join() {
                warn!("chart worker {} panicked: {:?}", worker_id, e);
            }
        }

        info!("all chart workers completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingRenderer {
        rendered: AtomicUsize,
        delay: Duration,
    }

    impl ChartRenderer for CountingRenderer {
        fn render(&self, _job: &ChartJob) -> Result<()> {
            std::thread::sleep(self.delay);
            self.rendered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn job(object: &str) -> ChartJob {
        ChartJob {
            object: object.to_string(),
            ra_deg: 10.68,
            dec_deg: 41.27,
        }
    }

    #[test]
    fn test_jobs_are_rendered() {
        let renderer = Arc::new(CountingRenderer {
            rendered: AtomicUsize::new(0),
            delay: Duration::ZERO,
        });
        let pool = RenderPool::new(renderer.clone(), 2, 10);

        for i in 0..5 {
            assert!(pool.submit(job(&format!("obj{i}"))));
        }
        pool.wait_for_completion();

        assert_eq!(renderer.rendered.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_full_queue_drops_instead_of_blocking() {
        let renderer = Arc::new(CountingRenderer {
            rendered: AtomicUsize::new(0),
            delay: Duration::from_millis(200),
        });
        let pool = RenderPool::new(renderer, 1, 1);

        let mut accepted = 0;
        for i in 0..10 {
            if pool.submit(job(&format!("obj{i}"))) {
                accepted += 1;
            }
        }
        // One in flight plus one buffered; the rest must be dropped
        assert!(accepted < 10);
        pool.wait_for_completion();
    }
}
