use aptechka_msgpack::MsgpackConfig;

use crate::kind::ContentKind;

/// Controls negotiation and the wrapped codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatorConfig {
    /// Config for the MessagePack codec.
    pub msgpack: MsgpackConfig,
    /// Order used when the caller states no preference or uses a wildcard.
    pub server_preference: Vec<ContentKind>,
}

impl Default for NegotiatorConfig {
    fn default() -> Self {
        Self {
            msgpack: MsgpackConfig::default(),
            server_preference: ContentKind::ALL.to_vec(),
        }
    }
}
