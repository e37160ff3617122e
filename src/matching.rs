//! Match scanning: find every counterpart of a new listing and notify both owners.
//!
//! [`scan`] is the entry point. Candidate selection sits behind [`Matcher`] so the
//! full-collection [`LinearScan`] can be swapped for an indexed lookup without
//! changing the predicate in [`crate::eligibility`].

use crate::eligibility::MatchRules;
use crate::error::ScanError;
use crate::notification::{emit_notification, NotificationDetails, TITLE_MATCH_FOUND, TITLE_NEW_MATCH};
use crate::store::{load_candidates, Candidate, CollectionRecord, RecordStore};
use crate::types::{Collection, DemandListing, Listing, Role, SupplyListing};
use log::{info, warn};

/// Selects the counterpart listings that match a new listing.
pub trait Matcher: Send + Sync {
    /// Matching counterparts in store order. Must not mutate the store.
    fn find_matches(&self, store: &dyn RecordStore, new_record: &Listing) -> Result<Vec<Listing>, ScanError>;
}

/// Loads the whole opposite collection and tests every record. O(n) per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearScan {
    pub rules: MatchRules,
}

impl LinearScan {
    pub fn new(rules: MatchRules) -> Self {
        Self { rules }
    }
}

/// Valid records of a collection; malformed ones are logged and dropped.
fn valid_candidates<T: CollectionRecord>(store: &dyn RecordStore) -> Result<Vec<T>, ScanError> {
    let mut out = Vec::new();
    for candidate in load_candidates::<T>(store)? {
        match candidate {
            Candidate::Valid(record) => out.push(record),
            Candidate::Malformed { index, reason } => {
                warn!(
                    "skipping malformed candidate collection={} index={} reason={}",
                    T::COLLECTION,
                    index,
                    reason
                );
            }
        }
    }
    Ok(out)
}

impl Matcher for LinearScan {
    fn find_matches(&self, store: &dyn RecordStore, new_record: &Listing) -> Result<Vec<Listing>, ScanError> {
        let matches = match new_record {
            Listing::Supply(supply) => valid_candidates::<DemandListing>(store)?
                .into_iter()
                .filter(|demand| self.rules.eligible(supply, demand))
                .map(Listing::Demand)
                .collect(),
            Listing::Demand(demand) => valid_candidates::<SupplyListing>(store)?
                .into_iter()
                .filter(|supply| self.rules.eligible(supply, demand))
                .map(Listing::Supply)
                .collect(),
        };
        Ok(matches)
    }
}

/// Scan `opposite_collection` for counterparts of `new_record` and notify both sides of each match.
///
/// `role` must be the new record's role and `opposite_collection` its counterpart
/// collection. For every match, the new record's owner (if any) is notified first,
/// then the candidate's owner (if any); anonymous listings get no notification.
/// Returns the number of matched candidates. Repeated calls are not deduplicated.
pub fn scan(
    store: &dyn RecordStore,
    matcher: &dyn Matcher,
    new_record: &Listing,
    role: Role,
    opposite_collection: Collection,
) -> Result<usize, ScanError> {
    let actual = new_record.role();
    if actual != role {
        return Err(ScanError::RoleMismatch { declared: role, actual });
    }
    let expected = role.opposite_collection();
    if opposite_collection != expected {
        return Err(ScanError::WrongCollection {
            role,
            expected,
            got: opposite_collection,
        });
    }

    let matches = matcher.find_matches(store, new_record)?;
    for candidate in &matches {
        info!(
            "match new_listing={} role={:?} counterpart={}",
            new_record.id(),
            role,
            candidate.id()
        );
        if let Some(owner) = new_record.owner_id() {
            emit_notification(store, owner, TITLE_MATCH_FOUND, NotificationDetails::describe(candidate))?;
        }
        if let Some(owner) = candidate.owner_id() {
            emit_notification(store, owner, TITLE_NEW_MATCH, NotificationDetails::describe(new_record))?;
        }
    }
    Ok(matches.len())
}
