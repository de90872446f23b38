//! Thread-safe handle for hosts that drive the kernel from one thread and
//! edit it from others.
//!
//! Edits are queued without touching the simulation lock and drained only at
//! tick boundaries, so a tick never observes a half-applied edit.

use super::collaborators::{FrameView, Renderer};
use super::commands::EditCommand;
use super::master_pipeline::Simulation;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
    pending: Arc<Mutex<Vec<EditCommand>>>,
}

impl SharedSimulation {
    pub fn new(sim: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sim)),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an edit for the next tick boundary.
    pub fn queue_edit(&self, cmd: EditCommand) {
        self.pending.lock().push(cmd);
    }

    pub fn pending_edits(&self) -> usize {
        self.pending.lock().len()
    }

    /// Apply queued edits in submission order. Rejected edits are logged
    /// and skipped; returns how many were rejected.
    fn drain_into(&self, sim: &mut Simulation) -> usize {
        let edits = std::mem::take(&mut *self.pending.lock());
        let mut rejected = 0;
        for cmd in edits {
            if let Err(e) = sim.apply(cmd) {
                warn!("[SharedSimulation] Rejected edit: {}", e);
                rejected += 1;
            }
        }
        rejected
    }

    /// Drain edits, then run one tick under the lock.
    pub fn tick(&self) -> bool {
        let mut sim = self.inner.lock();
        self.drain_into(&mut sim);
        sim.tick()
    }

    pub fn frame<R: Renderer + ?Sized>(&self, renderer: &mut R) -> bool {
        let mut sim = self.inner.lock();
        self.drain_into(&mut sim);
        sim.frame(renderer)
    }

    /// Apply queued edits without ticking (e.g. while the host is paused).
    pub fn flush_edits(&self) -> usize {
        let mut sim = self.inner.lock();
        self.drain_into(&mut sim)
    }

    /// Read-only access between ticks.
    pub fn read<T>(&self, f: impl FnOnce(&Simulation) -> T) -> T {
        let sim = self.inner.lock();
        f(&sim)
    }

    pub fn with_view<T>(&self, f: impl FnOnce(&FrameView<'_>) -> T) -> T {
        let sim = self.inner.lock();
        f(&sim.view())
    }
}
