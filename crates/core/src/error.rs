use thiserror::Error;

use crate::header::HeaderParseError;
use crate::model::{SessionIdError, SubscriberIdError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    SubscriberId(#[from] SubscriberIdError),
    #[error(transparent)]
    SessionId(#[from] SessionIdError),
    #[error(transparent)]
    Header(#[from] HeaderParseError),
}
