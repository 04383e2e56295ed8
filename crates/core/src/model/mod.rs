mod ids;
mod keys;
mod progress;

pub use ids::{
    SESSION_SUFFIX_ALPHABET, SESSION_SUFFIX_LEN, SessionId, SessionIdError, SubscriberId,
    SubscriberIdError,
};
pub use keys::{
    CONFIG_EXPORT_INSTRUCTIONS, ExportedKeyPair, ExportedKeys, KeyConfigExport, KeySet,
};
pub use progress::ProgressRecord;
