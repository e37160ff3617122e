//! # Cattle Match
//!
//! Livestock matchmaking: farmer supply listings are matched against buyer demand
//! listings, and both owners are notified when a new listing satisfies an existing one.
//!
//! ## Entry point
//!
//! Use [`Matchmaker`] as the single entry point: create with [`Matchmaker::new`], then
//! [`Matchmaker::create_supply`] and [`Matchmaker::create_demand`]. Each call stores the
//! listing, scans the opposite side, and returns how many counterparts matched.
//!
//! ## Example
//!
//! ```rust
//! use cattle_match::{InMemoryStore, Location, MatchRules, Matchmaker, NewDemand, NewSupply, TargetRegion, BreedFilter, SexFilter};
//!
//! let mut mm = Matchmaker::new(InMemoryStore::new(), MatchRules::default());
//! mm.create_demand(
//!     NewDemand {
//!         targets: vec![TargetRegion::whole_state("SP")],
//!         race: BreedFilter::Any,
//!         age_min: Some(12),
//!         age_max: Some(36),
//!         sex: SexFilter::Any,
//!         quantity: 5,
//!         contact: "buyer@example.com".into(),
//!     },
//!     Some("U2".into()),
//! )
//! .unwrap();
//! let sub = mm
//!     .create_supply(
//!         NewSupply {
//!             race: "Nelore".into(),
//!             age: 24,
//!             sex: "Male".into(),
//!             quantity: 10,
//!             location: Location::new("SP", "Campinas"),
//!             contact: "farmer@example.com".into(),
//!         },
//!         Some("U1".into()),
//!     )
//!     .unwrap();
//! assert_eq!(sub.matches_found, 1);
//! ```
//!
//! ## Lower-level API
//!
//! You can also call [`eligible`], [`scan`], and [`emit_notification`] directly
//! against any [`RecordStore`] if you assign listing ids yourself.

pub mod api;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod listing_gen;
pub mod matching;
pub mod notification;
pub mod persistence;
pub mod store;
pub mod types;

pub use config::Config;
pub use eligibility::{eligible, MatchRules};
pub use engine::{Matchmaker, Submission};
pub use error::{ScanError, StoreError, ValidationError};
pub use listing_gen::{replay_into_matchmaker, Generator, GeneratorConfig};
pub use matching::{scan, LinearScan, Matcher};
pub use notification::{emit_notification, Notification, NotificationDetails};
pub use persistence::JsonFileStore;
pub use store::{InMemoryStore, RecordStore};
pub use types::{
    BreedFilter, CityFilter, Collection, DemandListing, Listing, ListingId, Location, NewDemand,
    NewSupply, OwnerId, Role, SexFilter, SupplyListing, TargetRegion,
};
