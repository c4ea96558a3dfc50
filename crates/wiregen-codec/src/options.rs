//! Codec options.

/// Tuning knobs shared by encode and decode.
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// Maximum recursion depth before the codec fails instead of
    /// overflowing the call stack. One level per nested struct, union, or
    /// list.
    pub max_depth: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        // Matches the default decoder depth limit schemas expose.
        Self { max_depth: 32 }
    }
}

impl CodecOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum recursion depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
