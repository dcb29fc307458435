// Parser resource limits.
//
// Guards against stack exhaustion from deeply nested input and against
// pathological buffer sizes. Defaults are permissive; callers that parse
// untrusted input can tighten them.

/// Limits applied by [`parse_with`](crate::parse_with).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_input_size: usize,  // bytes
    pub max_token_count: usize, // significant tokens, extras excluded
    pub max_depth: usize,       // nested blocks / operands / argument lists
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000, // 10 MB
            max_token_count: 1_000_000,
            max_depth: 128,
        }
    }
}

impl ParseLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
