//! API modules.

mod notification;
mod traits;

pub use notification::{NotificationApi, NotificationListBuilder};
pub use traits::NotificationBackend;

use crate::error::{Error, Result};
use crate::models::NotificationId;

/// Reject empty identifiers before any request is issued.
pub(crate) fn ensure_id(id: &NotificationId) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidArgument(
            "`_id` cannot be undefined or an empty string".into(),
        ));
    }
    Ok(())
}
