//! Synthetic listing generator.
//!
//! Deterministic, configurable stream of supply and demand submissions for replay
//! tests, benchmarks, and demos. Same seed ⇒ same sequence of listings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::Matchmaker;
use crate::error::ScanError;
use crate::store::RecordStore;
use crate::types::{BreedFilter, CityFilter, Location, NewDemand, NewSupply, OwnerId, SexFilter, TargetRegion};

const BREEDS: &[&str] = &["Nelore", "Angus", "Brahman", "Gir", "Guzerá"];
const SEXES: &[&str] = &["Male", "Male (Bull)", "Female"];
const REGIONS: &[(&str, &[&str])] = &[
    ("SP", &["Campinas", "Santos", "Ribeirão Preto"]),
    ("MG", &["Uberaba", "Belo Horizonte"]),
    ("PA", &["Belém", "Marabá", "Santarém"]),
    ("GO", &["Goiânia", "Rio Verde"]),
];

/// Configuration for the synthetic listing generator.
/// All ranges are inclusive. Same config + seed produces the same stream.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same listing stream.
    pub seed: u64,
    /// Number of listings produced by [`Generator::all_listings`].
    pub num_listings: usize,
    /// Probability of a supply listing (0.0..=1.0). Demand otherwise.
    pub supply_ratio: f64,
    /// Probability that a listing has no owner.
    pub anonymous_ratio: f64,
    /// Probability that a demand listing accepts any breed.
    pub any_breed_ratio: f64,
    /// Probability that a target region accepts any city in its state.
    pub any_city_ratio: f64,
    /// Maximum number of target regions per demand listing (at least 1).
    pub max_targets: usize,
    /// Supply ages (years).
    pub age_min: u32,
    pub age_max: u32,
    /// Head counts for both sides.
    pub quantity_min: u32,
    pub quantity_max: u32,
    /// Number of distinct owner IDs (U1..=U{num_owners}).
    pub num_owners: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_listings: 1000,
            supply_ratio: 0.5,
            anonymous_ratio: 0.1,
            any_breed_ratio: 0.4,
            any_city_ratio: 0.5,
            max_targets: 3,
            age_min: 6,
            age_max: 60,
            quantity_min: 1,
            quantity_max: 100,
            num_owners: 10,
        }
    }
}

/// One generated submission and its (optional) owner.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratedListing {
    Supply(NewSupply, Option<OwnerId>),
    Demand(NewDemand, Option<OwnerId>),
}

/// Deterministic listing stream. Create with [`Generator::new`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_contact: u64,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            next_contact: 1,
        }
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.gen_range(0..items.len())]
    }

    fn owner(&mut self) -> Option<OwnerId> {
        if self.rng.gen::<f64>() < self.config.anonymous_ratio {
            return None;
        }
        let n = self.rng.gen_range(1..=self.config.num_owners.max(1));
        Some(OwnerId(format!("U{}", n)))
    }

    fn contact(&mut self, prefix: &str) -> String {
        let c = format!("{}-{}@example.com", prefix, self.next_contact);
        self.next_contact += 1;
        c
    }

    fn quantity(&mut self) -> u32 {
        self.rng
            .gen_range(self.config.quantity_min..=self.config.quantity_max.max(self.config.quantity_min))
    }

    pub fn next_supply(&mut self) -> NewSupply {
        let (state, cities) = self.pick(REGIONS);
        let city = self.pick(cities);
        NewSupply {
            race: self.pick(BREEDS).to_string(),
            age: self
                .rng
                .gen_range(self.config.age_min..=self.config.age_max.max(self.config.age_min)),
            sex: self.pick(SEXES).to_string(),
            quantity: self.quantity(),
            location: Location::new(state, city),
            contact: self.contact("farmer"),
        }
    }

    pub fn next_demand(&mut self) -> NewDemand {
        let n_targets = self.rng.gen_range(1..=self.config.max_targets.max(1));
        let mut targets = Vec::with_capacity(n_targets);
        for _ in 0..n_targets {
            let (state, cities) = self.pick(REGIONS);
            let city = if self.rng.gen::<f64>() < self.config.any_city_ratio {
                CityFilter::Any
            } else {
                CityFilter::Only(self.pick(cities).to_string())
            };
            targets.push(TargetRegion::new(state, city));
        }
        let race = if self.rng.gen::<f64>() < self.config.any_breed_ratio {
            BreedFilter::Any
        } else {
            BreedFilter::Only(self.pick(BREEDS).to_string())
        };
        let a = self.rng.gen_range(self.config.age_min..=self.config.age_max.max(self.config.age_min));
        let b = self.rng.gen_range(self.config.age_min..=self.config.age_max.max(self.config.age_min));
        let sex = match self.rng.gen_range(0..3) {
            0 => SexFilter::Any,
            1 => SexFilter::Only("Male".into()),
            _ => SexFilter::Only("Female".into()),
        };
        NewDemand {
            targets,
            race,
            age_min: Some(a.min(b)),
            age_max: Some(a.max(b)),
            sex,
            quantity: self.quantity(),
            contact: self.contact("buyer"),
        }
    }

    /// Generates the next submission. Advances internal state (contact counter, RNG).
    pub fn next_listing(&mut self) -> GeneratedListing {
        if self.rng.gen::<f64>() < self.config.supply_ratio {
            let new = self.next_supply();
            GeneratedListing::Supply(new, self.owner())
        } else {
            let new = self.next_demand();
            GeneratedListing::Demand(new, self.owner())
        }
    }

    pub fn take_listings(&mut self, n: usize) -> Vec<GeneratedListing> {
        (0..n).map(|_| self.next_listing()).collect()
    }

    /// Returns the full stream as defined by `config.num_listings`.
    pub fn all_listings(&mut self) -> Vec<GeneratedListing> {
        self.take_listings(self.config.num_listings)
    }
}

/// Submits listings in order. Returns (submissions, total matches found) or the first error.
pub fn replay_into_matchmaker<S: RecordStore>(
    mm: &mut Matchmaker<S>,
    listings: impl IntoIterator<Item = GeneratedListing>,
) -> Result<(usize, usize), ScanError> {
    let mut submissions = 0usize;
    let mut total_matches = 0usize;
    for listing in listings {
        let sub = match listing {
            GeneratedListing::Supply(new, owner) => mm.create_supply(new, owner)?,
            GeneratedListing::Demand(new, owner) => mm.create_demand(new, owner)?,
        };
        submissions += 1;
        total_matches += sub.matches_found;
    }
    Ok((submissions, total_matches))
}
