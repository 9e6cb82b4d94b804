//! Control-thread → audio-thread command queue.
//!
//! A bounded `crossbeam-channel` carries [`Command`]s. The sender never
//! blocks: when the queue is full the command is dropped, logged and counted.
//! The receiver is drained with `try_recv` at each block boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tessera_synth::Command;

/// Queue capacity used by the player.
pub const CONTROL_QUEUE_CAPACITY: usize = 1024;

/// Create a bounded command queue.
///
/// ```rust
/// use tessera_io::control_channel;
/// use tessera_synth::Command;
///
/// let (tx, rx) = control_channel(4);
/// assert!(tx.send(Command::AllNotesOff));
///
/// let mut seen = Vec::new();
/// rx.drain(|cmd| seen.push(cmd));
/// assert_eq!(seen, [Command::AllNotesOff]);
/// ```
pub fn control_channel(capacity: usize) -> (ControlSender, ControlReceiver) {
    let (tx, rx) = bounded(capacity);
    (
        ControlSender {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        ControlReceiver { rx },
    )
}

/// Sending half, held by the control thread.
#[derive(Debug, Clone)]
pub struct ControlSender {
    tx: Sender<Command>,
    dropped: Arc<AtomicU64>,
}

impl ControlSender {
    /// Queue `command` without blocking. Returns `false` if it was dropped.
    pub fn send(&self, command: Command) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(cmd)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(command = ?cmd, dropped = total, "control queue full, command dropped");
                false
            }
            Err(TrySendError::Disconnected(cmd)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(command = ?cmd, "audio thread gone, command dropped");
                false
            }
        }
    }

    /// Commands dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Commands waiting in the queue.
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

/// Receiving half, owned by the renderer on the audio thread.
#[derive(Debug, Clone)]
pub struct ControlReceiver {
    rx: Receiver<Command>,
}

impl ControlReceiver {
    /// Apply every queued command in arrival order. Never blocks.
    #[inline]
    pub fn drain(&self, mut apply: impl FnMut(Command)) -> usize {
        let mut count = 0;
        while let Ok(cmd) = self.rx.try_recv() {
            apply(cmd);
            count += 1;
        }
        count
    }
}
