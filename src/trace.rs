//! Diagnostic trace lines.
//!
//! The engine reports notable events (income, sales, shortfalls, unknown
//! command keys, allocation and combat summaries, the final result) as
//! human-readable lines. A [`TraceSink`] receives them when one is attached;
//! every line is also sent through the `log` facade at debug level.
//! Neither path affects game state.

/// `log` target used for engine trace lines.
pub const TRACE_TARGET: &str = "territory_duel::trace";

/// Receiver for trace lines.
///
/// Implemented for every `FnMut(&str)`, so a closure is a sink.
pub trait TraceSink {
    /// Accept one line.
    fn line(&mut self, line: &str);
}

impl<F: FnMut(&str)> TraceSink for F {
    fn line(&mut self, line: &str) {
        self(line);
    }
}

/// Sink that forwards every line to `log::info!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn line(&mut self, line: &str) {
        log::info!(target: TRACE_TARGET, "{line}");
    }
}

/// Optional sink plus the `log` mirror.
///
/// Lines are built lazily: when no sink is attached and debug logging is
/// off, the formatting closure never runs.
pub struct Tracer<'a> {
    sink: Option<Box<dyn TraceSink + 'a>>,
}

impl std::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl<'a> Tracer<'a> {
    /// Tracer without a sink.
    #[must_use]
    pub fn silent() -> Self {
        Self { sink: None }
    }

    /// Tracer that delivers to `sink`.
    #[must_use]
    pub fn with_sink(sink: impl TraceSink + 'a) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    /// Whether a sink is attached.
    #[must_use]
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Emit a line built by `build`.
    pub fn emit(&mut self, build: impl FnOnce() -> String) {
        let log_enabled = log::log_enabled!(target: TRACE_TARGET, log::Level::Debug);
        if self.sink.is_none() && !log_enabled {
            return;
        }
        let line = build();
        if log_enabled {
            log::debug!(target: TRACE_TARGET, "{line}");
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.line(&line);
        }
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::silent()
    }
}
