//! Error taxonomy shared across the codec, the raw section model, and the
//! layer tree.
//!
//! Every fallible operation in this crate returns a [`PsdError`]. Narrower
//! per-module error enums (e.g. [`crate::compression::CodecError`]) fold into
//! it via `#[from]`, the same way the original parser kept one small error
//! enum per section and let them bubble up through a single `Result` alias.

use crate::compression::CodecError;
use std::fmt;

/// Where in the file an error occurred, for diagnostics.
///
/// Attached at section boundaries so that a failure deep inside, say, a
/// channel decode can still be reported as "LayerAndMaskInformation at byte
/// 40213" rather than a bare decode error.
#[derive(Debug, Clone, Copy)]
pub struct Breadcrumb {
    /// Name of the section being read or written when the error occurred.
    pub section: &'static str,
    /// Byte offset within the whole file (or in-memory buffer).
    pub offset: u64,
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (offset {})", self.section, self.offset)
    }
}

/// The top level error type returned by every public operation.
#[derive(Debug, thiserror::Error)]
pub enum PsdError {
    /// The underlying storage (file or in-memory buffer) failed.
    #[error("io error at {breadcrumb}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        breadcrumb: Breadcrumb,
    },

    /// A signature, version, enum, or length field was out of range or
    /// inconsistent with the bytes that followed it.
    #[error("format error at {breadcrumb}: {reason}")]
    Format {
        reason: String,
        breadcrumb: Breadcrumb,
    },

    /// One of the four channel compression codecs failed.
    #[error("codec error at {breadcrumb}: {source}")]
    Codec {
        #[source]
        source: CodecError,
        breadcrumb: Breadcrumb,
    },

    /// A pre-write invariant was violated. Raised before any bytes of the
    /// new file are written.
    #[error("validation error: {0}")]
    Validation(String),

    /// A layer path or linked-layer hash did not resolve to anything.
    #[error("not found: {0}")]
    NotFound(String),

    /// The progress callback requested that the operation abort.
    #[error("operation cancelled at {0}")]
    Cancelled(&'static str),
}

impl PsdError {
    /// Build a [`PsdError::Format`] tagged with a breadcrumb.
    pub fn format(section: &'static str, offset: u64, reason: impl Into<String>) -> PsdError {
        PsdError::Format {
            reason: reason.into(),
            breadcrumb: Breadcrumb { section, offset },
        }
    }

    /// Build a [`PsdError::Io`] tagged with a breadcrumb.
    pub fn io(section: &'static str, offset: u64, source: std::io::Error) -> PsdError {
        PsdError::Io {
            source,
            breadcrumb: Breadcrumb { section, offset },
        }
    }

    /// Build a [`PsdError::Codec`] tagged with a breadcrumb.
    pub fn codec(section: &'static str, offset: u64, source: CodecError) -> PsdError {
        PsdError::Codec {
            source,
            breadcrumb: Breadcrumb { section, offset },
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PsdError>;
