#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! Structural events shared by every tessera format.
//!
//! A grammar (JSON text, CBOR, MessagePack) matches one value and reports it
//! to a [`Consumer`] as a flat sequence of events. Consumers either build a
//! value tree, write another format, or just check or log what they see.
//! For callers that want to decode one token at a time instead, format
//! crates also implement [`PartsParser`].
//!
//! This crate holds the pieces those format crates have in common: the
//! consumer trait and the stock consumers, the [`Input`] byte cursor, the
//! [`ParseError`] type and [`ParseOptions`].

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(any(test, feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(any(test, feature = "tracing")))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use trace;

mod consumer;
mod consumers;
mod error;
mod event;
mod input;
mod options;
mod parts;

pub use consumer::Consumer;
pub use consumers::{BinaryToHex, DebugEvents, Discard, PreferSigned, Tee, ValidateEventOrder};
pub use error::{AtOffset, EventError, ParseError, ParseErrorKind, Position, Span};
pub use event::{Event, Recorder};
pub use input::{Input, Marker};
pub use options::{DEFAULT_MAX_DEPTH, ParseOptions};
pub use parts::{ContainerState, PartsParser};

/// Tracks container nesting against [`ParseOptions::max_depth`].
#[derive(Debug, Clone, Copy)]
pub struct DepthGuard {
    depth: usize,
    limit: usize,
}

impl DepthGuard {
    /// Start at depth zero with the limit from `options`.
    pub const fn new(options: &ParseOptions) -> Self {
        DepthGuard {
            depth: 0,
            limit: options.max_depth,
        }
    }

    /// Enter a container at `offset`, failing once the limit is exceeded.
    pub fn enter(&mut self, offset: usize) -> Result<(), ParseError> {
        if self.depth >= self.limit {
            trace!(depth = self.depth, offset, "nesting limit reached");
            return Err(ParseError::depth(offset, self.limit));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave the innermost container.
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }

    /// Current nesting depth.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Go back to a depth saved in a [`Marker`].
    pub fn restore(&mut self, marker: Marker) {
        debug_assert!(marker.depth() <= self.limit);
        self.depth = marker.depth();
    }
}
