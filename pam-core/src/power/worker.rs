//! Deferred work queue.
//!
//! One dedicated thread drains a single-slot signal: kicking while a signal
//! is already pending supersedes it, so the worker always observes the
//! latest power demand instead of stacking stale executions. A pass that
//! ends in `RetryResume` re-arms the worker after the configured backoff;
//! any new kick cancels the pending retry (the pass re-reads demand anyway).
//!
//! A pass already executing always runs to completion; only the not-yet-run
//! pending signal can be superseded. The worker stops at detach.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use pam_hal::{PamHardware, PowerDomain};

use crate::link::DataPath;
use crate::power::orchestrator::{PowerOrchestrator, RunOutcome, SharedState};
use crate::rm::ResourceManager;

struct Signal {
    kicked: bool,
    shutdown: bool,
}

struct Inner {
    signal: Mutex<Signal>,
    cv: Condvar,
}

/// Handle to the dedicated power worker thread.
pub struct PowerWorker {
    inner: Arc<Inner>,
    thread: Option<JoinHandle<()>>,
}

impl PowerWorker {
    /// Spawn the worker owning the state machine.
    pub fn spawn<H, PD, DP, RM>(
        mut orchestrator: PowerOrchestrator<H, PD, DP, RM>,
        shared: Arc<SharedState>,
        retry_delay: Duration,
    ) -> Self
    where
        H: PamHardware + 'static,
        PD: PowerDomain + 'static,
        DP: DataPath + 'static,
        RM: ResourceManager + 'static,
    {
        let inner = Arc::new(Inner {
            signal: Mutex::new(Signal {
                kicked: false,
                shutdown: false,
            }),
            cv: Condvar::new(),
        });

        let worker_inner = Arc::clone(&inner);
        let thread = thread::spawn(move || {
            let mut retry_at: Option<Instant> = None;
            loop {
                {
                    let mut sig = lock(&worker_inner.signal);
                    loop {
                        if sig.shutdown {
                            return;
                        }
                        if sig.kicked {
                            sig.kicked = false;
                            // A fresh signal supersedes a pending retry.
                            retry_at = None;
                            break;
                        }
                        match retry_at {
                            Some(deadline) => {
                                let now = Instant::now();
                                if now >= deadline {
                                    retry_at = None;
                                    break;
                                }
                                sig = wait_timeout(&worker_inner.cv, sig, deadline - now);
                            }
                            None => sig = wait(&worker_inner.cv, sig),
                        }
                    }
                }

                if orchestrator.run_once(&shared) == RunOutcome::RetryResume {
                    retry_at = Some(Instant::now() + retry_delay);
                }
            }
        });

        Self {
            inner,
            thread: Some(thread),
        }
    }

    /// Schedule one orchestration pass, superseding any unconsumed signal.
    /// Never blocks on the worker.
    pub fn kick(&self) {
        lock(&self.inner.signal).kicked = true;
        self.inner.cv.notify_one();
    }

    /// Stop the worker and wait for a pass in flight to finish.
    pub fn shutdown(&mut self) {
        lock(&self.inner.signal).shutdown = true;
        self.inner.cv.notify_one();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for PowerWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// The worker never panics while holding the lock; recover the guard rather
// than propagating poison.

fn lock<'a>(mutex: &'a Mutex<Signal>) -> MutexGuard<'a, Signal> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn wait<'a>(cv: &Condvar, guard: MutexGuard<'a, Signal>) -> MutexGuard<'a, Signal> {
    cv.wait(guard).unwrap_or_else(|e| e.into_inner())
}

fn wait_timeout<'a>(
    cv: &Condvar,
    guard: MutexGuard<'a, Signal>,
    dur: Duration,
) -> MutexGuard<'a, Signal> {
    match cv.wait_timeout(guard, dur) {
        Ok((guard, _)) => guard,
        Err(e) => e.into_inner().0,
    }
}
