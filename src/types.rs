//! Core types and IDs for the matching engine (listing data models).
//!
//! Identifiers are newtype wrappers. [`SupplyListing`] and [`DemandListing`] are the
//! two listing shapes; [`BreedFilter`], [`CityFilter`], and [`SexFilter`] replace the
//! `"Any"` / `"ANY"` wildcard strings with explicit variants, decoded once at the
//! serialization boundary.

use crate::error::ValidationError;
use std::fmt;
use uuid::Uuid;

/// Unique listing identifier, assigned when a listing is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub Uuid);

impl ListingId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account identifier of a listing owner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which side of the market a listing is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Role {
    /// Farmer: livestock available for sale.
    Supply,
    /// Buyer: livestock sought.
    Demand,
}

impl Role {
    /// Collection the listings of this role are stored in.
    pub fn own_collection(self) -> Collection {
        match self {
            Role::Supply => Collection::Supply,
            Role::Demand => Collection::Demand,
        }
    }

    /// Collection holding the counterparts of this role.
    pub fn opposite_collection(self) -> Collection {
        match self {
            Role::Supply => Collection::Demand,
            Role::Demand => Collection::Supply,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Role::Supply => "farmer",
            Role::Demand => "buyer",
        }
    }
}

/// The fixed set of record collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Collection {
    Supply,
    Demand,
    Notification,
    /// Owner accounts. Named here only; matching never reads it.
    Account,
}

impl Collection {
    /// Deployment name of the collection.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Supply => "farmers",
            Collection::Demand => "buyers",
            Collection::Notification => "notifications",
            Collection::Account => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Breed filter on a demand listing. Serialized as `"Any"` or the breed name.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BreedFilter {
    Any,
    Only(String),
}

impl BreedFilter {
    pub const WILDCARD: &'static str = "Any";

    pub fn accepts(&self, race: &str) -> bool {
        match self {
            BreedFilter::Any => true,
            BreedFilter::Only(wanted) => wanted == race,
        }
    }
}

impl From<String> for BreedFilter {
    fn from(s: String) -> Self {
        if s == Self::WILDCARD {
            BreedFilter::Any
        } else {
            BreedFilter::Only(s)
        }
    }
}

impl From<BreedFilter> for String {
    fn from(f: BreedFilter) -> Self {
        match f {
            BreedFilter::Any => BreedFilter::WILDCARD.to_string(),
            BreedFilter::Only(s) => s,
        }
    }
}

/// City part of a target region. Serialized as `"ANY"` or the city name.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CityFilter {
    Any,
    Only(String),
}

impl CityFilter {
    pub const WILDCARD: &'static str = "ANY";
}

impl From<String> for CityFilter {
    fn from(s: String) -> Self {
        if s == Self::WILDCARD {
            CityFilter::Any
        } else {
            CityFilter::Only(s)
        }
    }
}

impl From<CityFilter> for String {
    fn from(f: CityFilter) -> Self {
        match f {
            CityFilter::Any => CityFilter::WILDCARD.to_string(),
            CityFilter::Only(s) => s,
        }
    }
}

/// Sex filter on a demand listing. Serialized as `"Any"` or the sex label.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SexFilter {
    #[default]
    Any,
    Only(String),
}

impl SexFilter {
    pub const WILDCARD: &'static str = "Any";

    /// Labels may carry a qualifier (e.g. `"Male (Bull)"`), so containment counts.
    pub fn accepts(&self, sex: &str) -> bool {
        match self {
            SexFilter::Any => true,
            SexFilter::Only(wanted) => sex.contains(wanted.as_str()),
        }
    }
}

impl From<String> for SexFilter {
    fn from(s: String) -> Self {
        if s == Self::WILDCARD {
            SexFilter::Any
        } else {
            SexFilter::Only(s)
        }
    }
}

impl From<SexFilter> for String {
    fn from(f: SexFilter) -> Self {
        match f {
            SexFilter::Any => SexFilter::WILDCARD.to_string(),
            SexFilter::Only(s) => s,
        }
    }
}

/// Where a supply listing's animals are.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub state: String,
    pub city: String,
}

impl Location {
    pub fn new(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// One acceptable (state, city-or-wildcard) region on a demand listing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetRegion {
    pub state: String,
    pub city: CityFilter,
}

impl TargetRegion {
    pub fn new(state: impl Into<String>, city: CityFilter) -> Self {
        Self {
            state: state.into(),
            city,
        }
    }

    /// Whole-state region (`city: "ANY"`).
    pub fn whole_state(state: impl Into<String>) -> Self {
        Self::new(state, CityFilter::Any)
    }

    pub fn covers(&self, location: &Location) -> bool {
        if self.state != location.state {
            return false;
        }
        match &self.city {
            CityFilter::Any => true,
            CityFilter::Only(city) => *city == location.city,
        }
    }
}

/// Supply listing as submitted, before id and timestamp are assigned.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewSupply {
    pub race: String,
    pub age: u32,
    pub sex: String,
    pub quantity: u32,
    pub location: Location,
    pub contact: String,
}

impl NewSupply {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.race.trim().is_empty() {
            return Err(ValidationError::EmptyField("race"));
        }
        if self.location.state.trim().is_empty() {
            return Err(ValidationError::EmptyField("location.state"));
        }
        if self.contact.trim().is_empty() {
            return Err(ValidationError::EmptyField("contact"));
        }
        Ok(())
    }
}

/// Demand listing as submitted, before id and timestamp are assigned.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewDemand {
    pub targets: Vec<TargetRegion>,
    pub race: BreedFilter,
    #[serde(rename = "ageMin", default, skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u32>,
    #[serde(rename = "ageMax", default, skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    #[serde(default)]
    pub sex: SexFilter,
    /// Minimum head count wanted.
    pub quantity: u32,
    pub contact: String,
}

impl NewDemand {
    /// Rejects listings that could never match (no regions, inverted age range).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.targets.is_empty() {
            return Err(ValidationError::NoTargets);
        }
        if self.targets.iter().any(|t| t.state.trim().is_empty()) {
            return Err(ValidationError::EmptyField("targets.state"));
        }
        let min = self.age_min.unwrap_or(DemandListing::DEFAULT_AGE_MIN);
        let max = self.age_max.unwrap_or(DemandListing::DEFAULT_AGE_MAX);
        if min > max {
            return Err(ValidationError::InvertedAgeRange { min, max });
        }
        if self.contact.trim().is_empty() {
            return Err(ValidationError::EmptyField("contact"));
        }
        Ok(())
    }
}

/// Stored farmer-side listing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SupplyListing {
    pub id: ListingId,
    /// Unix seconds.
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    pub race: String,
    pub age: u32,
    pub sex: String,
    pub quantity: u32,
    pub location: Location,
    pub contact: String,
}

impl SupplyListing {
    pub fn from_new(new: NewSupply, id: ListingId, timestamp: f64, owner_id: Option<OwnerId>) -> Self {
        Self {
            id,
            timestamp,
            owner_id,
            race: new.race,
            age: new.age,
            sex: new.sex,
            quantity: new.quantity,
            location: new.location,
            contact: new.contact,
        }
    }
}

/// Stored buyer-side listing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DemandListing {
    pub id: ListingId,
    /// Unix seconds.
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    pub targets: Vec<TargetRegion>,
    pub race: BreedFilter,
    #[serde(rename = "ageMin", default, skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u32>,
    #[serde(rename = "ageMax", default, skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    #[serde(default)]
    pub sex: SexFilter,
    pub quantity: u32,
    pub contact: String,
}

impl DemandListing {
    pub const DEFAULT_AGE_MIN: u32 = 0;
    pub const DEFAULT_AGE_MAX: u32 = 100;

    pub fn from_new(new: NewDemand, id: ListingId, timestamp: f64, owner_id: Option<OwnerId>) -> Self {
        Self {
            id,
            timestamp,
            owner_id,
            targets: new.targets,
            race: new.race,
            age_min: new.age_min,
            age_max: new.age_max,
            sex: new.sex,
            quantity: new.quantity,
            contact: new.contact,
        }
    }

    /// Inclusive age range with the [0, 100] defaults applied.
    pub fn age_bounds(&self) -> (u32, u32) {
        (
            self.age_min.unwrap_or(Self::DEFAULT_AGE_MIN),
            self.age_max.unwrap_or(Self::DEFAULT_AGE_MAX),
        )
    }
}

/// Either side's listing, as handed to the scanner.
#[derive(Clone, Debug, PartialEq)]
pub enum Listing {
    Supply(SupplyListing),
    Demand(DemandListing),
}

impl Listing {
    pub fn role(&self) -> Role {
        match self {
            Listing::Supply(_) => Role::Supply,
            Listing::Demand(_) => Role::Demand,
        }
    }

    pub fn id(&self) -> ListingId {
        match self {
            Listing::Supply(s) => s.id,
            Listing::Demand(d) => d.id,
        }
    }

    pub fn owner_id(&self) -> Option<&OwnerId> {
        match self {
            Listing::Supply(s) => s.owner_id.as_ref(),
            Listing::Demand(d) => d.owner_id.as_ref(),
        }
    }

    pub fn contact(&self) -> &str {
        match self {
            Listing::Supply(s) => &s.contact,
            Listing::Demand(d) => &d.contact,
        }
    }

    /// Breed as shown to a counterpart: the supply breed, or the demand filter.
    pub fn race_label(&self) -> String {
        match self {
            Listing::Supply(s) => s.race.clone(),
            Listing::Demand(d) => d.race.clone().into(),
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            Listing::Supply(s) => s.quantity,
            Listing::Demand(d) => d.quantity,
        }
    }

    /// Location as shown to a counterpart. Demand listings list every target region.
    pub fn location_label(&self) -> String {
        match self {
            Listing::Supply(s) => s.location.to_string(),
            Listing::Demand(d) => d
                .targets
                .iter()
                .map(|t| match &t.city {
                    CityFilter::Any => format!("anywhere in {}", t.state),
                    CityFilter::Only(city) => format!("{}, {}", city, t.state),
                })
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl From<SupplyListing> for Listing {
    fn from(s: SupplyListing) -> Self {
        Listing::Supply(s)
    }
}

impl From<DemandListing> for Listing {
    fn from(d: DemandListing) -> Self {
        Listing::Demand(d)
    }
}
