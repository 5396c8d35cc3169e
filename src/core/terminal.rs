//! Boundary traits between the controller and its host.
//!
//! - [`TerminalSink`] - the write-only terminal surface
//! - [`Logger`] - output channel handed to running commands
//! - [`MemoryTerminal`] - in-memory sink for tests (`mock` feature)

/// Whether a write has reached the screen yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStatus {
    /// Applied synchronously.
    Flushed,
    /// The host will call [`crate::ReplController::flush_completed`] later.
    Pending,
}

/// A terminal that only accepts character streams.
///
/// There is no cursor query: the controller keeps the visual cursor in sync
/// by construction, through the sequences it writes.
pub trait TerminalSink {
    fn write(&mut self, data: &str);

    /// Write and report whether the data is already on screen.
    ///
    /// Sinks with asynchronous rendering return [`FlushStatus::Pending`] and
    /// notify the controller once the write is applied.
    fn write_and_flush(&mut self, data: &str) -> FlushStatus {
        self.write(data);
        FlushStatus::Flushed
    }

    /// Width of the terminal in columns.
    fn columns(&self) -> u16;

    /// Erase the visible screen.
    fn clear(&mut self);
}

/// Output channel for a running command.
pub trait Logger {
    fn log(&self, value: &str);

    /// Like [`Logger::log`], rendered so it stands out as an error.
    fn error(&self, value: &str);
}

// ============================================================================
// MemoryTerminal
// ============================================================================

/// Records everything written to it.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    output: String,
    columns: u16,
    deferred_flush: bool,
    clears: usize,
}

#[cfg(any(test, feature = "mock"))]
impl MemoryTerminal {
    pub fn new(columns: u16) -> Self {
        Self {
            output: String::new(),
            columns,
            deferred_flush: false,
            clears: 0,
        }
    }

    /// Report every flushed write as [`FlushStatus::Pending`].
    pub fn with_deferred_flush(mut self) -> Self {
        self.deferred_flush = true;
        self
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Return and forget everything written so far.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

#[cfg(any(test, feature = "mock"))]
impl Default for MemoryTerminal {
    fn default() -> Self {
        Self::new(80)
    }
}

#[cfg(any(test, feature = "mock"))]
impl TerminalSink for MemoryTerminal {
    fn write(&mut self, data: &str) {
        self.output.push_str(data);
    }

    fn write_and_flush(&mut self, data: &str) -> FlushStatus {
        self.write(data);
        if self.deferred_flush {
            FlushStatus::Pending
        } else {
            FlushStatus::Flushed
        }
    }

    fn columns(&self) -> u16 {
        self.columns
    }

    fn clear(&mut self) {
        self.output.clear();
        self.clears += 1;
    }
}
