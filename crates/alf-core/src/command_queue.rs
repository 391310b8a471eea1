//! Queue of commands waiting for the next tick boundary.
//!
//! Commands are submitted by the embedding driver (input, scripting, replay)
//! and drained in submission order when a tick starts, which keeps the order
//! of state mutations independent of when real time happened to arrive.

/// A FIFO of pending commands with optional `(tick, command)` history.
#[derive(Debug, Clone)]
pub struct CommandQueue<C> {
    /// Commands waiting to be executed.
    pending: Vec<C>,
    /// History of drained commands: (tick, command).
    history: Vec<(u64, C)>,
    /// Maximum history entries to retain. 0 = no history.
    max_history: usize,
}

impl<C> Default for CommandQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CommandQueue<C> {
    /// Create a new empty command queue with no history tracking.
    pub fn new() -> Self {
        Self::with_max_history(0)
    }

    /// Create a new command queue that retains up to `max_history` entries.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            pending: Vec::new(),
            history: Vec::new(),
            max_history,
        }
    }

    /// Push a single command onto the queue.
    pub fn push(&mut self, command: C) {
        self.pending.push(command);
    }

    /// Push several commands, keeping their order.
    pub fn push_batch(&mut self, commands: impl IntoIterator<Item = C>) {
        self.pending.extend(commands);
    }

    /// Put commands back at the front of the queue, ahead of anything
    /// submitted since they were drained. Their relative order is kept.
    pub fn requeue_front(&mut self, commands: impl IntoIterator<Item = C>) {
        let mut front: Vec<C> = commands.into_iter().collect();
        front.append(&mut self.pending);
        self.pending = front;
    }

    /// Remove every pending command without recording it in history.
    pub fn take_pending(&mut self) -> Vec<C> {
        std::mem::take(&mut self.pending)
    }

    /// Number of commands waiting to be executed.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Get the command history (tick, command) pairs, oldest first.
    pub fn history(&self) -> &[(u64, C)] {
        &self.history
    }

    /// Forget recorded history. Pending commands are untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl<C: Clone> CommandQueue<C> {
    /// Drain all pending commands, recording them in history under `tick`.
    /// Returns the drained commands in submission order.
    pub fn drain(&mut self, tick: u64) -> Vec<C> {
        let commands: Vec<C> = self.pending.drain(..).collect();

        if self.max_history > 0 {
            self.history.extend(commands.iter().map(|cmd| (tick, cmd.clone())));
            let excess = self.history.len().saturating_sub(self.max_history);
            if excess > 0 {
                self.history.drain(..excess);
            }
        }

        commands
    }
}

// ===========================================================================
// Tests
// ===========================================================================
