use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use xo_core::{Seed, TokenId};

use crate::{AccountId, LedgerError};

/// Ownership and seed records for minted tokens. Ids are assigned
/// sequentially from 1 and never reused; a recorded seed is immutable.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRegistry {
    owners: BTreeMap<TokenId, AccountId>,
    seeds: BTreeMap<TokenId, Seed>,
    used_seeds: BTreeMap<Seed, TokenId>,
    last_id: TokenId,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh token for `owner` with `seed`, returning the new id.
    /// Rejects a seed already bound to another token, leaving the registry
    /// untouched.
    pub fn record(&mut self, owner: &AccountId, seed: Seed) -> Result<TokenId, LedgerError> {
        if let Some(&token_id) = self.used_seeds.get(&seed) {
            return Err(LedgerError::DuplicateSeed { seed, token_id });
        }
        let token_id = self.last_id + 1;
        self.last_id = token_id;
        self.owners.insert(token_id, owner.clone());
        self.seeds.insert(token_id, seed);
        self.used_seeds.insert(seed, token_id);
        Ok(token_id)
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<&AccountId, LedgerError> {
        self.owners
            .get(&token_id)
            .ok_or(LedgerError::UnknownToken { token_id })
    }

    pub fn seed_of(&self, token_id: TokenId) -> Option<Seed> {
        self.seeds.get(&token_id).copied()
    }

    /// Number of tokens currently owned by `account`.
    pub fn balance_of(&self, account: &str) -> u64 {
        self.owners
            .values()
            .filter(|owner| owner.as_str() == account)
            .count() as u64
    }

    pub fn total_minted(&self) -> u64 {
        self.owners.len() as u64
    }

    /// Reassign ownership. Authorization is the caller's concern.
    pub fn reassign(&mut self, token_id: TokenId, to: &AccountId) -> Result<(), LedgerError> {
        let owner = self
            .owners
            .get_mut(&token_id)
            .ok_or(LedgerError::UnknownToken { token_id })?;
        *owner = to.clone();
        Ok(())
    }
}
