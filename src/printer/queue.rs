//! Main-thread callback queue.
//!
//! Hosts that only allow UI mutation on their main thread register a
//! recurring poll that calls [`QueueReceiver::drain`]. Worker threads hand
//! work over through a [`QueueSender`]; callbacks run in enqueue order.
//!
//! ```
//! use dephandler::printer::{main_thread_queue, Printer, QueuedPrinter, RecordingPrinter};
//!
//! let (sender, receiver) = main_thread_queue();
//! let recorder = RecordingPrinter::new("panel");
//! let mut queued = QueuedPrinter::new(recorder.clone(), sender);
//!
//! queued.log("Collecting numpy").unwrap();
//! assert!(recorder.lines().is_empty());
//!
//! assert_eq!(receiver.drain(), 1);
//! assert_eq!(recorder.lines(), vec!["Collecting numpy"]);
//! ```

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::Result;

use super::Printer;

type Callback = Box<dyn FnOnce() + Send>;

/// Create a connected sender/receiver pair.
pub fn main_thread_queue() -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::channel();
    (QueueSender { tx }, QueueReceiver { rx })
}

/// Producer side, used from worker threads.
#[derive(Clone)]
pub struct QueueSender {
    tx: Sender<Callback>,
}

impl QueueSender {
    /// Queue `callback`; returns false once the receiver is gone.
    pub fn enqueue(&self, callback: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Box::new(callback)).is_ok()
    }
}

/// Consumer side, owned by the host's main thread.
pub struct QueueReceiver {
    rx: Receiver<Callback>,
}

impl QueueReceiver {
    /// Run every queued callback without blocking. Returns how many ran.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        while let Ok(callback) = self.rx.try_recv() {
            callback();
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for the first callback, then drain the rest.
    ///
    /// Returns `None` once every sender has been dropped and nothing is left.
    pub fn drain_timeout(&self, timeout: Duration) -> Option<usize> {
        match self.rx.recv_timeout(timeout) {
            Ok(callback) => {
                callback();
                Some(1 + self.drain())
            }
            Err(RecvTimeoutError::Timeout) => Some(0),
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Defers every call of the wrapped printer to the main-thread queue.
pub struct QueuedPrinter<P: Printer + 'static> {
    inner: Arc<Mutex<P>>,
    queue: QueueSender,
    name: String,
}

impl<P: Printer + 'static> QueuedPrinter<P> {
    pub fn new(printer: P, queue: QueueSender) -> Self {
        let name = format!("queued {}", printer.name());
        Self {
            inner: Arc::new(Mutex::new(printer)),
            queue,
            name,
        }
    }

    fn defer<F>(&self, call: F) -> Result<()>
    where
        F: FnOnce(&mut P) -> Result<()> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let queued = self.queue.enqueue(move || {
            let mut printer = inner.lock().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = call(&mut printer) {
                tracing::warn!("Deferred call to printer '{}' failed: {}", printer.name(), e);
            }
        });
        if queued {
            Ok(())
        } else {
            Err(anyhow::anyhow!("main thread queue is closed").into())
        }
    }
}

impl<P: Printer + 'static> Printer for QueuedPrinter<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&mut self) -> Result<()> {
        self.defer(|p| p.prepare())
    }

    fn log(&mut self, message: &str) -> Result<()> {
        let message = message.to_string();
        self.defer(move |p| p.log(&message))
    }

    fn finish(&mut self) -> Result<()> {
        self.defer(|p| p.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{PrinterEvent, RecordingPrinter};
    use std::thread;

    #[test]
    fn callbacks_run_in_enqueue_order() {
        let (sender, receiver) = main_thread_queue();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let seen = Arc::clone(&seen);
            assert!(sender.enqueue(move || seen.lock().unwrap().push(i)));
        }
        assert_eq!(receiver.drain(), 5);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(receiver.drain(), 0);
    }

    #[test]
    fn worker_thread_logs_arrive_in_order_on_drain() {
        let (sender, receiver) = main_thread_queue();
        let recorder = RecordingPrinter::new("panel");
        let mut queued = QueuedPrinter::new(recorder.clone(), sender);

        let worker = thread::spawn(move || {
            queued.prepare().unwrap();
            for i in 0..3 {
                queued.log(&format!("line {}", i)).unwrap();
            }
            queued.finish().unwrap();
        });
        worker.join().unwrap();

        assert!(recorder.events().is_empty());
        while receiver.drain_timeout(Duration::from_millis(10)).is_some() {}

        assert_eq!(
            recorder.events(),
            vec![
                PrinterEvent::Prepare,
                PrinterEvent::Log("line 0".to_string()),
                PrinterEvent::Log("line 1".to_string()),
                PrinterEvent::Log("line 2".to_string()),
                PrinterEvent::Finish,
            ]
        );
    }

    #[test]
    fn closed_queue_is_an_error() {
        let (sender, receiver) = main_thread_queue();
        drop(receiver);
        let mut queued = QueuedPrinter::new(RecordingPrinter::new("gone"), sender);
        assert!(queued.log("x").is_err());
        assert_eq!(queued.name(), "queued gone");
    }
}
