use std::collections::BTreeMap;

use crate::error::XoError;
use crate::grid::Grid;
use crate::state::{derive_raw_state, RawState, Seed, Sha256Hasher, StateHasher};
use crate::TokenId;

/// Boundary contract consumed from the ledger: resolve a token's recorded
/// seed, if any. The generator never mutates ledger state.
pub trait SeedSource {
    fn seed_of(&self, token_id: TokenId) -> Option<Seed>;
}

impl SeedSource for BTreeMap<TokenId, Seed> {
    fn seed_of(&self, token_id: TokenId) -> Option<Seed> {
        self.get(&token_id).copied()
    }
}

/// Derives raw state, plates, and renderings for tokens of the collection.
pub struct Generator<H = Sha256Hasher> {
    hasher: H,
}

impl Generator<Sha256Hasher> {
    /// Generator over the collection's default SHA-256 word family.
    pub fn new() -> Self {
        Self::with_hasher(Sha256Hasher)
    }
}

impl Default for Generator<Sha256Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: StateHasher> Generator<H> {
    /// Generator over a caller-supplied hash family.
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    /// Derive the 64 state words for a seed. Total over all seeds.
    pub fn raw_state(&self, seed: Seed) -> RawState {
        derive_raw_state(&self.hasher, seed)
    }

    /// Derive the state for a seed and paint its plate.
    pub fn grid(&self, seed: Seed) -> Grid {
        Grid::from_state(&self.raw_state(seed))
    }

    /// Raw state for a minted token; fails when the id has no recorded
    /// seed.
    pub fn initial_state(
        &self,
        seeds: &impl SeedSource,
        token_id: TokenId,
    ) -> Result<RawState, XoError> {
        let seed = seeds
            .seed_of(token_id)
            .ok_or(XoError::UnknownToken { token_id })?;
        Ok(self.raw_state(seed))
    }

    /// Text rendering for a minted token; fails when the id has no
    /// recorded seed.
    pub fn draw(&self, seeds: &impl SeedSource, token_id: TokenId) -> Result<String, XoError> {
        let seed = seeds
            .seed_of(token_id)
            .ok_or(XoError::UnknownToken { token_id })?;
        Ok(self.grid(seed).render())
    }
}
