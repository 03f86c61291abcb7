//! Control-plane diagnostic ring.
//!
//! Fixed-size ring that captures orchestration warnings and debug notes for
//! later retrieval by the platform integration (there is no console at this
//! layer). Oldest entries are overwritten when the ring is full.
//!
//! # Design
//!
//! - Fixed-size, no_std compatible (no heap allocation)
//! - Spin-lock guarded: written from both the power worker and the
//!   companion-readiness entry point
//! - Messages are static strings; categorized by orchestration stage

use spin::Mutex;

/// Number of entries in the ring (power of 2 for cheap modulo).
pub const TRACE_RING_SIZE: usize = 32;

/// Orchestration stage a trace entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStage {
    /// Connection negotiation / companion readiness.
    Negotiate,
    /// Staged suspend sequence.
    Suspend,
    /// Staged resume sequence.
    Resume,
    /// Hardware facade calls.
    Hal,
    /// Resource-manager binding.
    ResMgr,
    /// Deferred work queue / power worker.
    Worker,
}

impl TraceStage {
    /// Get human-readable stage name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Negotiate => "NEG",
            Self::Suspend => "SUSP",
            Self::Resume => "RES",
            Self::Hal => "HAL",
            Self::ResMgr => "RM",
            Self::Worker => "WORK",
        }
    }
}

/// Single entry in the trace ring.
#[derive(Debug, Clone, Copy)]
pub struct TraceEntry {
    /// Static message text.
    pub msg: &'static str,
    /// Stage the entry was recorded from.
    pub stage: TraceStage,
    /// True for warnings, false for debug notes.
    pub is_warning: bool,
}

/// The ring itself. A process-wide instance backs the free functions below;
/// tests can use their own.
pub struct TraceRing {
    entries: [Option<TraceEntry>; TRACE_RING_SIZE],
    /// Next write slot.
    write: usize,
    /// Next read slot.
    read: usize,
    /// Total entries ever written (overflow detection).
    written: usize,
}

impl TraceRing {
    /// Create an empty ring.
    pub const fn new() -> Self {
        Self {
            entries: [None; TRACE_RING_SIZE],
            write: 0,
            read: 0,
            written: 0,
        }
    }

    /// Append an entry, overwriting the oldest if full.
    pub fn push(&mut self, stage: TraceStage, msg: &'static str, is_warning: bool) {
        self.entries[self.write % TRACE_RING_SIZE] = Some(TraceEntry {
            msg,
            stage,
            is_warning,
        });
        self.write += 1;
        self.written += 1;
        // Reader fell more than a full ring behind: drop overwritten slots.
        if self.write - self.read > TRACE_RING_SIZE {
            self.read = self.write - TRACE_RING_SIZE;
        }
    }

    /// Pop the oldest unread entry.
    pub fn pop(&mut self) -> Option<TraceEntry> {
        if self.read == self.write {
            return None;
        }
        let entry = self.entries[self.read % TRACE_RING_SIZE];
        self.read += 1;
        entry
    }

    /// Number of unread entries.
    pub fn available(&self) -> usize {
        self.write - self.read
    }

    /// Total entries ever written.
    pub fn count(&self) -> usize {
        self.written
    }

    /// Discard all unread entries.
    pub fn clear(&mut self) {
        self.read = self.write;
    }
}

impl Default for TraceRing {
    fn default() -> Self {
        Self::new()
    }
}

static TRACE: Mutex<TraceRing> = Mutex::new(TraceRing::new());

/// Record a warning.
pub fn trace_warn(stage: TraceStage, msg: &'static str) {
    TRACE.lock().push(stage, msg, true);
}

/// Record a debug note.
pub fn trace_debug(stage: TraceStage, msg: &'static str) {
    TRACE.lock().push(stage, msg, false);
}

/// Pop the oldest unread entry from the process-wide ring.
pub fn trace_pop() -> Option<TraceEntry> {
    TRACE.lock().pop()
}

/// Number of unread entries in the process-wide ring.
pub fn trace_available() -> usize {
    TRACE.lock().available()
}

/// Discard all unread entries in the process-wide ring.
pub fn trace_clear() {
    TRACE.lock().clear()
}
