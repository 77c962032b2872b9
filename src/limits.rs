/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum container length limit for arrays/maps.
///
/// This is a safety limit; adjust explicitly for your deployment.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 16;

/// Decode-time resource limits for walking, validation and materialization.
///
/// Limits are enforced deterministically while bytes are consumed; nothing is pre-scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum total input length in bytes.
    pub max_input_bytes: usize,
    /// Maximum nesting depth. A top-level container sits at depth 1.
    pub max_depth: usize,
    /// Maximum total count of container items:
    /// `sum(array_len) + sum(2 * map_pairs)` across one walk (maps count keys and values).
    pub max_total_items: usize,
    /// Maximum array length.
    pub max_array_len: usize,
    /// Maximum map length (pairs).
    pub max_map_len: usize,
    /// Maximum binary payload length.
    pub max_bin_len: usize,
    /// Maximum string payload length in UTF-8 bytes.
    pub max_str_len: usize,
}

impl DecodeLimits {
    /// Construct conservative limits derived from a maximum message size.
    ///
    /// The defaults are:
    /// - `max_input_bytes = max_message_bytes`
    /// - `max_total_items = max_message_bytes`
    /// - `max_bin_len = max_message_bytes`
    /// - `max_str_len = max_message_bytes`
    /// - `max_array_len` and `max_map_len` are capped by `DEFAULT_MAX_CONTAINER_LEN`
    ///
    /// This is a pragmatic baseline. Production deployments should tune these explicitly.
    #[must_use]
    pub fn for_bytes(max_message_bytes: usize) -> Self {
        let max_container_len = max_message_bytes.min(DEFAULT_MAX_CONTAINER_LEN);
        Self {
            max_input_bytes: max_message_bytes,
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: max_message_bytes,
            max_array_len: max_container_len,
            max_map_len: max_container_len,
            max_bin_len: max_message_bytes,
            max_str_len: max_message_bytes,
        }
    }

    /// Limits that only bound nesting depth.
    ///
    /// Every other bound is `usize::MAX`; lengths are still checked against the buffer itself.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_input_bytes: usize::MAX,
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: usize::MAX,
            max_array_len: usize::MAX,
            max_map_len: usize::MAX,
            max_bin_len: usize::MAX,
            max_str_len: usize::MAX,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}
