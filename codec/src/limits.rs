//! Limits for codec-level decoding.

/// Limits enforced while decoding untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum declared length of one length-delimited payload.
    pub max_field_bytes: usize,
    /// Maximum number of embedded messages (map entries included) below the
    /// top-level message.
    pub max_depth: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_field_bytes: 64 * 1024 * 1024,
            max_depth: 100,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_field_bytes: 4096,
            max_depth: 16,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    ///
    /// Declared payload lengths are trusted, so a hostile length prefix on a
    /// reader without a remaining-length hint can force a large allocation.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_field_bytes: usize::MAX,
            max_depth: usize::MAX,
        }
    }
}
