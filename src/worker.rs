//! Background runs for hosts with an event loop.
//!
//! A [`Worker`] runs at most one install or update check at a time on a
//! background thread. While one is in flight new requests are refused, so a
//! host can wire a button straight to [`Worker::spawn_install`] and grey it
//! out while [`Worker::doing_something`] is true. Runs cannot be cancelled.
//!
//! Printers are called from the worker thread; wrap main-thread-only sinks in
//! a [`QueuedPrinter`](crate::printer::QueuedPrinter).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::context::Context;
use crate::error::Result;
use crate::updates::UpdateCandidate;

/// Clears the busy flag when the background thread ends, even on panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Worker {
    busy: Arc<AtomicBool>,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A background run is in flight.
    pub fn doing_something(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn claim(&self) -> Option<BusyGuard> {
        if self.busy.swap(true, Ordering::SeqCst) {
            tracing::debug!("Worker busy, request refused");
            return None;
        }
        Some(BusyGuard(Arc::clone(&self.busy)))
    }

    fn spawn<T, F>(&self, name: &str, job: F) -> Option<JoinHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let guard = self.claim()?;
        let spawned = thread::Builder::new()
            .name(format!("dephandler-{}", name))
            .spawn(move || {
                let _guard = guard;
                job()
            });
        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Could not start {} thread: {}", name, e);
                None
            }
        }
    }

    /// Install every pending dependency on a background thread.
    ///
    /// Returns `None` while another run is in flight. The thread's result is
    /// that of [`Context::install_all`].
    pub fn spawn_install(&self, ctx: Arc<Mutex<Context>>) -> Option<JoinHandle<Result<bool>>> {
        self.spawn("install", move || {
            let mut ctx = ctx.lock().unwrap_or_else(|e| e.into_inner());
            ctx.install_all()
        })
    }

    /// Look for updates of declared dependencies on a background thread.
    ///
    /// Returns `None` while another run is in flight.
    pub fn spawn_update_check(
        &self,
        ctx: Arc<Mutex<Context>>,
    ) -> Option<JoinHandle<Vec<UpdateCandidate>>> {
        self.spawn("updates", move || {
            let ctx = ctx.lock().unwrap_or_else(|e| e.into_inner());
            ctx.available_updates()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    use crate::deps::MockImporter;
    use crate::pip::PackageManager;
    use crate::shell::{MockResponse, MockRunner};

    fn shared(importer: &MockImporter, runner: &MockRunner) -> Arc<Mutex<Context>> {
        Arc::new(Mutex::new(Context::new(
            PackageManager::new("python3").with_upgrade_pip(false),
            Box::new(importer.clone()),
            Box::new(runner.clone()),
        )))
    }

    #[test]
    fn refuses_while_busy_and_clears_after() {
        let importer = MockImporter::new();
        importer.install("pip", "24.0");
        let runner = MockRunner::new();
        let started = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let (s, r, landed) = (started.clone(), release.clone(), importer.clone());
        runner.respond(
            "alpha",
            MockResponse::ok(&[]).then(move || {
                s.wait();
                r.wait();
                landed.install("alpha", "1.0");
            }),
        );
        let ctx = shared(&importer, &runner);
        ctx.lock().unwrap().declare("alpha").unwrap();
        let flags = ctx.lock().unwrap().flags();

        let worker = Worker::new();
        let handle = worker.spawn_install(Arc::clone(&ctx)).unwrap();
        started.wait();
        assert!(worker.doing_something());
        assert!(worker.spawn_install(Arc::clone(&ctx)).is_none());
        assert!(worker.spawn_update_check(Arc::clone(&ctx)).is_none());
        release.wait();

        assert!(handle.join().unwrap().unwrap());
        assert!(!worker.doing_something());
        assert!(flags.dependencies_imported());
    }

    #[test]
    fn update_check_runs_in_background() {
        let runner = MockRunner::new();
        runner.respond(
            "--outdated",
            MockResponse::ok(&[
                "Package Version Latest Type",
                "------- ------- ------ -----",
                "alpha   1.0     1.1    wheel",
            ]),
        );
        let ctx = shared(&MockImporter::new(), &runner);
        ctx.lock().unwrap().declare("alpha").unwrap();

        let worker = Worker::new();
        let updates = worker
            .spawn_update_check(ctx)
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].latest, "1.1");
    }
}
