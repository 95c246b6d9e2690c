/// Default maximum payload size: 10 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 10 * 1024 * 1024;

/// Controls MessagePack decoding behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgpackConfig {
    /// Payloads larger than this are rejected before decoding.
    pub max_payload_size: usize,
    /// When true, a payload whose only defect is trailing bytes after a
    /// complete value decodes the leading value instead of failing.
    pub recover_trailing_bytes: bool,
}

impl Default for MsgpackConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            recover_trailing_bytes: true,
        }
    }
}
