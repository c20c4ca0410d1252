use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;

use crate::traits::audio_recorder::PowerDataCallback;

/// Shared, replaceable power callback slot.
pub type PowerSlot = Arc<RwLock<Option<PowerDataCallback>>>;

enum PowerMessage {
    Sample(f32),
    Drain,
}

/// Real-time side of the power hop. Cloned into the tap.
#[derive(Clone)]
pub struct PowerSender {
    tx: Sender<PowerMessage>,
}

impl PowerSender {
    /// Enqueue a sample without blocking. Returns false once the delivery
    /// thread is gone.
    pub fn post(&self, db: f32) -> bool {
        match self.tx.try_send(PowerMessage::Sample(db)) {
            Ok(()) => true,
            // Unbounded queue: only disconnection can fail.
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Moves power samples from the audio thread to a `power-delivery` thread
/// that invokes the power slot in FIFO order.
pub struct PowerDispatcher {
    tx: Sender<PowerMessage>,
    worker: Option<thread::JoinHandle<()>>,
}

impl PowerDispatcher {
    pub fn spawn(slot: PowerSlot) -> std::io::Result<Self> {
        let (tx, rx) = unbounded();
        let worker = thread::Builder::new()
            .name("power-delivery".into())
            .spawn(move || delivery_loop(rx, slot))?;
        Ok(Self {
            tx,
            worker: Some(worker),
        })
    }

    pub fn sender(&self) -> PowerSender {
        PowerSender { tx: self.tx.clone() }
    }

    /// Deliver everything queued so far, then stop the delivery thread.
    ///
    /// Must not be called from inside a power callback.
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.tx.send(PowerMessage::Drain);
        if worker.join().is_err() {
            log::error!("power delivery thread panicked");
        }
    }
}

impl Drop for PowerDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn delivery_loop(rx: Receiver<PowerMessage>, slot: PowerSlot) {
    while let Ok(message) = rx.recv() {
        match message {
            PowerMessage::Sample(db) => {
                let callback = slot.read().clone();
                if let Some(callback) = callback {
                    callback(db);
                }
            }
            PowerMessage::Drain => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recording_slot() -> (PowerSlot, Arc<Mutex<Vec<f32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: PowerDataCallback = Arc::new(move |db: f32| sink.lock().push(db));
        (Arc::new(RwLock::new(Some(callback))), seen)
    }

    #[test]
    fn delivers_in_order_before_shutdown_returns() {
        let (slot, seen) = recording_slot();
        let mut dispatcher = PowerDispatcher::spawn(slot).unwrap();
        let sender = dispatcher.sender();

        for db in [-100.0, -20.0, -6.0] {
            assert!(sender.post(db));
        }
        dispatcher.shutdown();

        assert_eq!(*seen.lock(), vec![-100.0, -20.0, -6.0]);
    }

    #[test]
    fn post_after_shutdown_is_dropped() {
        let (slot, seen) = recording_slot();
        let mut dispatcher = PowerDispatcher::spawn(slot).unwrap();
        let sender = dispatcher.sender();
        dispatcher.shutdown();
        drop(dispatcher);

        assert!(!sender.post(-3.0));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn empty_slot_discards_samples() {
        let slot: PowerSlot = Arc::new(RwLock::new(None));
        let mut dispatcher = PowerDispatcher::spawn(slot).unwrap();
        assert!(dispatcher.sender().post(-40.0));
        dispatcher.shutdown();
    }

    #[test]
    fn shutdown_twice_is_harmless() {
        let (slot, _) = recording_slot();
        let mut dispatcher = PowerDispatcher::spawn(slot).unwrap();
        dispatcher.shutdown();
        dispatcher.shutdown();
    }
}
