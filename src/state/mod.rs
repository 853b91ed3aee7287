// src/state/mod.rs
//! Observable state slots for the monitoring workflows
//!
//! Each workflow owns exactly one writable slot; consumers subscribe and
//! only ever observe. Snapshots are replaced wholesale on every transition
//! so a reader can never see a half-updated value.

pub mod calibration;
pub mod device;
pub mod metrics;

pub use calibration::{CalibrationPlan, CalibrationSnapshot};
pub use device::{ChannelDescriptor, DeviceSnapshot, DeviceStatus};
pub use metrics::{MetricsSampler, NetworkStatus, SystemMetrics};

use tokio::sync::watch;

/// Single-writer observable slot backed by a `tokio::sync::watch` channel.
///
/// Cloning shares the underlying channel, so a workflow can hand read/write
/// handles to its spawned tasks while subscribers watch for changes.
pub struct StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: watch::Sender<T>,
}

impl<T> StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Current snapshot (cloned out of the channel)
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Replace the snapshot wholesale, notifying all subscribers
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Modify the snapshot in place, notifying all subscribers
    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(mutate);
    }

    /// Subscribe to snapshot changes
    ///
    /// ```rust,ignore
    /// let mut rx = cell.subscribe();
    /// while rx.changed().await.is_ok() {
    ///     let snapshot = rx.borrow().clone();
    /// }
    /// ```
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> Clone for StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> std::fmt::Debug for StateCell<T>
where
    T: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("current", &*self.sender.borrow())
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl<T> Default for StateCell<T>
where
    T: Clone + Send + Sync + Default + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set() {
        let cell = StateCell::new(7u32);
        assert_eq!(cell.get(), 7);

        cell.set(42);
        assert_eq!(cell.get(), 42);
    }

    #[test]
    fn test_update_in_place() {
        let cell = StateCell::new(vec![1, 2, 3]);
        cell.update(|v| v.push(4));
        assert_eq!(cell.get(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_clone_shares_channel() {
        let cell = StateCell::new(0u64);
        let writer = cell.clone();

        writer.set(99);
        assert_eq!(cell.get(), 99);
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let cell = StateCell::new(String::from("idle"));
        let mut rx = cell.subscribe();

        assert_eq!(*rx.borrow(), "idle");

        cell.set(String::from("running"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "running");
    }
}
