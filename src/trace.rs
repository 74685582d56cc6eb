//! Feature-gated instrumentation for map computation and volume I/O.
//!
//! Spans wrap whole operations (`rmap`, `load_fingerprints`, `save_volume`);
//! events record counts that explain a map, such as how many voxels came out
//! degenerate. Field lists are passed through to `tracing` unchanged, so the
//! `%` and `?` sigils work. Without the `tracing` feature every macro expands
//! to nothing and field expressions are not evaluated.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Info-level event, e.g. `trace_event!("rmap_done", degenerate = n)`.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info!(name: $name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr $(, $($field:tt)*)?) => {};
}

/// Warn-level event for inputs that yield a map but probably not the one
/// the caller wanted (an all-NaN map from a constant correlate).
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::warn!(name: $name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($name:expr $(, $($field:tt)*)?) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;
pub(crate) use trace_warn;

/// Guard returned by `trace_span!` when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub(crate) struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub(crate) fn entered(self) -> Self {
        self
    }
}
