//! Single-entry matchmaking facade.
//!
//! Holds the record store and matcher so the API layer can create listings
//! without calling the store and [`crate::matching::scan`] directly.

use crate::eligibility::MatchRules;
use crate::error::{ScanError, StoreError};
use crate::matching::{scan, LinearScan, Matcher};
use crate::notification::{emit_notification, notifications_for, now_secs, Notification, NotificationDetails};
use crate::store::{append_record, RecordStore};
use crate::types::{Collection, DemandListing, Listing, ListingId, NewDemand, NewSupply, OwnerId, SupplyListing};
use log::info;
use serde_json::Value;

/// Outcome of creating one listing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Submission {
    pub id: ListingId,
    pub matches_found: usize,
}

/// Creates listings and matches them against the opposite side.
///
/// Each `create_*` call appends the listing and scans under one `&mut self`, so
/// sharing a `Matchmaker` behind a mutex serializes submissions and two
/// concurrently submitted counterparts always see each other. Processes sharing
/// one backing store without such a lock can still miss a pair.
pub struct Matchmaker<S: RecordStore> {
    store: S,
    matcher: Box<dyn Matcher>,
}

impl<S: RecordStore> Matchmaker<S> {
    /// Full-scan matching with the given rules.
    pub fn new(store: S, rules: MatchRules) -> Self {
        Self::with_matcher(store, Box::new(LinearScan::new(rules)))
    }

    pub fn with_matcher(store: S, matcher: Box<dyn Matcher>) -> Self {
        Self { store, matcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a new supply listing and matches it against every demand listing.
    pub fn create_supply(&mut self, new: NewSupply, owner_id: Option<OwnerId>) -> Result<Submission, ScanError> {
        let listing = SupplyListing::from_new(new, ListingId::new_v4(), now_secs(), owner_id);
        info!(
            "supply submitted id={} race={} age={} quantity={} location={}",
            listing.id, listing.race, listing.age, listing.quantity, listing.location
        );
        append_record(&self.store, &listing)?;
        self.match_new(Listing::Supply(listing))
    }

    /// Stores a new demand listing and matches it against every supply listing.
    pub fn create_demand(&mut self, new: NewDemand, owner_id: Option<OwnerId>) -> Result<Submission, ScanError> {
        let listing = DemandListing::from_new(new, ListingId::new_v4(), now_secs(), owner_id);
        let (age_min, age_max) = listing.age_bounds();
        info!(
            "demand submitted id={} targets={} age={}..={} quantity={}",
            listing.id,
            listing.targets.len(),
            age_min,
            age_max,
            listing.quantity
        );
        append_record(&self.store, &listing)?;
        self.match_new(Listing::Demand(listing))
    }

    fn match_new(&mut self, listing: Listing) -> Result<Submission, ScanError> {
        let role = listing.role();
        let matches_found = scan(
            &self.store,
            self.matcher.as_ref(),
            &listing,
            role,
            role.opposite_collection(),
        )?;
        info!(
            "scan complete id={} role={:?} matches_found={}",
            listing.id(),
            role,
            matches_found
        );
        Ok(Submission {
            id: listing.id(),
            matches_found,
        })
    }

    /// Notifies `owner` that the contact details of `listing` were revealed to them.
    pub fn unlock_contact(
        &self,
        owner: &OwnerId,
        listing: &Listing,
        title: &str,
    ) -> Result<Notification, StoreError> {
        emit_notification(&self.store, owner, title, NotificationDetails::describe(listing))
    }

    /// Supply records exactly as stored, including ones that no longer decode.
    pub fn supply_listings(&self) -> Result<Vec<Value>, StoreError> {
        self.store.load(Collection::Supply)
    }

    pub fn demand_listings(&self) -> Result<Vec<Value>, StoreError> {
        self.store.load(Collection::Demand)
    }

    pub fn notifications_for(&self, owner: &OwnerId) -> Result<Vec<Notification>, StoreError> {
        notifications_for(&self.store, owner)
    }

    /// Drops all supply and demand listings. Notifications are kept.
    pub fn reset_listings(&mut self) -> Result<(), StoreError> {
        self.store.clear(Collection::Supply)?;
        self.store.clear(Collection::Demand)?;
        info!("listings reset");
        Ok(())
    }
}
