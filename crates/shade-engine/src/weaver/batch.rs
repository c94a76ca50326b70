//! Parallel batch weaving
//!
//! Classes are queued on a channel and pulled by scoped worker threads. Each
//! worker clones its class out of the shared, read-only pool and weaves it
//! start to finish; nothing mutable is shared between workers.

use super::{WeaveReport, Weaver};
use crate::config::WeaveConfig;
use crate::error::{WeaveError, WeaveResult};
use crate::model::{ClassPool, ClassUnit};
use crossbeam::channel;
use tracing::{debug, info, warn};

/// Result of weaving one class in a batch
#[derive(Debug)]
pub struct BatchOutcome {
    /// Class name as requested
    pub class: String,
    /// Woven class and report, or the error that aborted it
    pub result: WeaveResult<(ClassUnit, WeaveReport)>,
}

impl BatchOutcome {
    /// Whether the class was woven
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Weave `names` across `config.worker_count()` threads.
///
/// Outcomes come back in the order of `names`. A failure affects only its own
/// class.
pub fn weave_batch(pool: &ClassPool, config: &WeaveConfig, names: &[String]) -> Vec<BatchOutcome> {
    if names.is_empty() {
        return Vec::new();
    }
    let workers = config.worker_count().clamp(1, names.len());

    let (job_tx, job_rx) = channel::unbounded::<(usize, &str)>();
    let (done_tx, done_rx) = channel::unbounded();
    for (idx, name) in names.iter().enumerate() {
        // Receiver is alive until the scope below ends
        let _ = job_tx.send((idx, name.as_str()));
    }
    drop(job_tx);

    let scoped = crossbeam::thread::scope(|scope| {
        for worker in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move |_| {
                let weaver = Weaver::new(pool, config);
                for (idx, name) in job_rx.iter() {
                    debug!(worker, class = name, "weaving");
                    if done_tx.send((idx, weaver.weave_named(name))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);
    if scoped.is_err() {
        warn!("a weaving worker panicked");
    }

    let mut slots: Vec<Option<WeaveResult<(ClassUnit, WeaveReport)>>> =
        (0..names.len()).map(|_| None).collect();
    for (idx, result) in done_rx.iter() {
        if let Some(slot) = slots.get_mut(idx) {
            *slot = Some(result);
        }
    }

    let outcomes: Vec<BatchOutcome> = names
        .iter()
        .zip(slots)
        .map(|(name, slot)| BatchOutcome {
            class: name.clone(),
            result: slot.unwrap_or_else(|| {
                Err(WeaveError::WorkerLost {
                    class: name.clone(),
                })
            }),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(classes = outcomes.len(), workers, failed, "batch woven");
    outcomes
}
