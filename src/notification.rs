//! Match notifications and the emitter that appends them to the store.
//!
//! A [`Notification`] is only created by [`emit_notification`]. The core never
//! mutates or deletes one; marking it read is left to external readers.

use crate::error::StoreError;
use crate::store::{append_record, load_candidates, Candidate, RecordStore};
use crate::types::{Collection, Listing, OwnerId};
use log::{info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

/// Title sent to the owner of the newly submitted listing.
pub const TITLE_MATCH_FOUND: &str = "Match found";
/// Title sent to the owner of the existing listing it matched.
pub const TITLE_NEW_MATCH: &str = "New match found";

/// Counterpart details carried by a notification.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NotificationDetails {
    /// Role of the counterpart ("farmer" or "buyer").
    pub role: String,
    pub contact: String,
    pub race: String,
    pub quantity: u32,
    pub location: String,
}

impl NotificationDetails {
    /// Details describing `listing` to the other party.
    pub fn describe(listing: &Listing) -> Self {
        Self {
            role: listing.role().describe().to_string(),
            contact: listing.contact().to_string(),
            race: listing.race_label(),
            quantity: listing.quantity(),
            location: listing.location_label(),
        }
    }
}

/// Stored notification (`notifications` collection).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    pub user_id: OwnerId,
    pub title: String,
    pub details: NotificationDetails,
    #[serde(default)]
    pub read: bool,
    /// Unix seconds.
    pub timestamp: f64,
}

/// Current wall-clock time in Unix seconds (fractional).
pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Appends exactly one unread notification for `user_id`. Returns the stored record.
pub fn emit_notification(
    store: &dyn RecordStore,
    user_id: &OwnerId,
    title: impl Into<String>,
    details: NotificationDetails,
) -> Result<Notification, StoreError> {
    let notification = Notification {
        user_id: user_id.clone(),
        title: title.into(),
        details,
        read: false,
        timestamp: now_secs(),
    };
    append_record(store, &notification)?;
    info!(
        "notification saved user_id={} title={:?} counterpart_contact={}",
        notification.user_id, notification.title, notification.details.contact
    );
    Ok(notification)
}

/// All notifications addressed to `owner`, in creation order.
/// Records that do not decode are logged and skipped.
pub fn notifications_for(store: &dyn RecordStore, owner: &OwnerId) -> Result<Vec<Notification>, StoreError> {
    let mut out = Vec::new();
    for candidate in load_candidates::<Notification>(store)? {
        match candidate {
            Candidate::Valid(n) if &n.user_id == owner => out.push(n),
            Candidate::Valid(_) => {}
            Candidate::Malformed { index, reason } => {
                warn!(
                    "skipping malformed record collection={} index={} reason={}",
                    Collection::Notification,
                    index,
                    reason
                );
            }
        }
    }
    Ok(out)
}
