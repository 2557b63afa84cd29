use serde::{Deserialize, Serialize};

use xo_core::{Seed, SeedSource, TokenId};

use crate::{AccountId, Amount, LedgerError, PendingPayments, TokenRegistry, COIN};

/// Default mint price: 0.01 coin.
pub const DEFAULT_MINT_PRICE: Amount = COIN / 100;
/// Default supply cap.
pub const DEFAULT_MAX_SUPPLY: u64 = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    pub admin: AccountId,
    pub mint_price: Amount,
    pub max_supply: u64,
}

impl CollectionConfig {
    pub fn new(admin: impl Into<AccountId>) -> Self {
        Self {
            admin: admin.into(),
            mint_price: DEFAULT_MINT_PRICE,
            max_supply: DEFAULT_MAX_SUPPLY,
        }
    }
}

/// Append-only record of collection activity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollectionEvent {
    Minted {
        token_id: TokenId,
        to: AccountId,
        seed: Seed,
    },
    Transferred {
        token_id: TokenId,
        from: AccountId,
        to: AccountId,
    },
    BaseUriChanged {
        uri: String,
    },
    Withdrawn {
        payee: AccountId,
        amount: Amount,
    },
}

/// The composed collection: registry, payments, admin gate, URI
/// configuration, and event log. Operations are all-or-nothing: every
/// check happens before the first mutation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    config: CollectionConfig,
    registry: TokenRegistry,
    payments: PendingPayments,
    base_uri: Option<String>,
    events: Vec<CollectionEvent>,
}

impl Collection {
    pub fn new(config: CollectionConfig) -> Self {
        Self {
            config,
            registry: TokenRegistry::new(),
            payments: PendingPayments::new(),
            base_uri: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn is_admin(&self, account: &str) -> bool {
        self.config.admin == account
    }

    fn require_admin(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if !self.is_admin(caller) {
            return Err(LedgerError::Unauthorized {
                account: caller.clone(),
            });
        }
        Ok(())
    }

    /// Mint a token to `recipient` against `payment`. The full payment is
    /// credited to the admin's pending balance so that credits always
    /// equal revenue minus withdrawals.
    pub fn mint_to(
        &mut self,
        recipient: &AccountId,
        seed: Seed,
        payment: Amount,
    ) -> Result<TokenId, LedgerError> {
        if payment < self.config.mint_price {
            return Err(LedgerError::InsufficientPayment {
                offered: payment,
                required: self.config.mint_price,
            });
        }
        if self.registry.total_minted() >= self.config.max_supply {
            return Err(LedgerError::SupplyExceeded {
                max_supply: self.config.max_supply,
            });
        }
        let token_id = self.registry.record(recipient, seed)?;
        let admin = self.config.admin.clone();
        self.payments.credit(&admin, payment);
        self.events.push(CollectionEvent::Minted {
            token_id,
            to: recipient.clone(),
            seed,
        });
        Ok(token_id)
    }

    /// Pay out `payee`'s full pending balance. Admin-gated.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        payee: &AccountId,
    ) -> Result<Amount, LedgerError> {
        self.require_admin(caller)?;
        let amount = self.payments.withdraw_all(payee)?;
        self.events.push(CollectionEvent::Withdrawn {
            payee: payee.clone(),
            amount,
        });
        Ok(amount)
    }

    /// Configure the URI prefix used by [`Collection::token_uri`].
    /// Admin-gated.
    pub fn set_base_uri(
        &mut self,
        caller: &AccountId,
        uri: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller)?;
        let uri = uri.into();
        self.base_uri = Some(uri.clone());
        self.events.push(CollectionEvent::BaseUriChanged { uri });
        Ok(())
    }

    /// Metadata URI for a minted token: the base prefix followed by the
    /// decimal id, or empty when no base is configured.
    pub fn token_uri(&self, token_id: TokenId) -> Result<String, LedgerError> {
        self.registry.owner_of(token_id)?;
        Ok(match &self.base_uri {
            Some(base) => format!("{base}{token_id}"),
            None => String::new(),
        })
    }

    /// Move `token_id` from its current owner (the caller) to `to`.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        token_id: TokenId,
    ) -> Result<(), LedgerError> {
        let owner = self.registry.owner_of(token_id)?;
        if owner != caller {
            return Err(LedgerError::NotOwner {
                account: caller.clone(),
                token_id,
            });
        }
        let from = owner.clone();
        self.registry.reassign(token_id, to)?;
        self.events.push(CollectionEvent::Transferred {
            token_id,
            from,
            to: to.clone(),
        });
        Ok(())
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<&AccountId, LedgerError> {
        self.registry.owner_of(token_id)
    }

    pub fn balance_of(&self, account: &str) -> u64 {
        self.registry.balance_of(account)
    }

    pub fn pending_of(&self, account: &str) -> Amount {
        self.payments.pending_of(account)
    }

    pub fn total_minted(&self) -> u64 {
        self.registry.total_minted()
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    pub fn events(&self) -> &[CollectionEvent] {
        &self.events
    }
}

impl SeedSource for Collection {
    fn seed_of(&self, token_id: TokenId) -> Option<Seed> {
        self.registry.seed_of(token_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xo_core::{Generator, XoError};

    fn collection() -> Collection {
        Collection::new(CollectionConfig::new("deployer"))
    }

    fn deployer() -> AccountId {
        "deployer".to_string()
    }

    fn acct2() -> AccountId {
        "acct2".to_string()
    }

    #[test]
    fn mints_a_new_token() {
        let mut nft = collection();
        let token_id = nft
            .mint_to(&deployer(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        assert_eq!(token_id, 1);
        assert_eq!(nft.owner_of(1).unwrap(), "deployer");
        assert_eq!(nft.balance_of("deployer"), 1);
        assert_eq!(nft.balance_of("acct2"), 0);
    }

    #[test]
    fn rejects_underpayment() {
        let mut nft = collection();
        let err = nft
            .mint_to(&deployer(), Seed::from_u64(1), DEFAULT_MINT_PRICE - 1)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientPayment { .. }));
        assert_eq!(nft.balance_of("deployer"), 0);
        assert_eq!(nft.total_minted(), 0);
        assert_eq!(nft.pending_of("deployer"), 0);
    }

    #[test]
    fn sets_the_base_token_uri() {
        let mut nft = collection();
        nft.set_base_uri(&deployer(), "https://example.com/").unwrap();
        nft.mint_to(&deployer(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        assert_eq!(nft.token_uri(1).unwrap(), "https://example.com/1");
    }

    #[test]
    fn token_uri_is_empty_without_a_base() {
        let mut nft = collection();
        nft.mint_to(&deployer(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        assert_eq!(nft.token_uri(1).unwrap(), "");
        assert!(matches!(
            nft.token_uri(2),
            Err(LedgerError::UnknownToken { token_id: 2 })
        ));
    }

    #[test]
    fn admin_withdraws_sale_proceeds() {
        let mut nft = collection();
        nft.mint_to(&acct2(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        assert_eq!(nft.pending_of("deployer"), DEFAULT_MINT_PRICE);
        let paid = nft.withdraw(&deployer(), &deployer()).unwrap();
        assert_eq!(paid, DEFAULT_MINT_PRICE);
        assert_eq!(nft.pending_of("deployer"), 0);
        assert!(matches!(
            nft.withdraw(&deployer(), &deployer()),
            Err(LedgerError::NothingDue { .. })
        ));
    }

    #[test]
    fn non_admin_cannot_withdraw() {
        let mut nft = collection();
        nft.mint_to(&acct2(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        let err = nft.withdraw(&acct2(), &acct2()).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert_eq!(nft.pending_of("deployer"), DEFAULT_MINT_PRICE);
    }

    #[test]
    fn non_admin_cannot_configure_the_base_uri() {
        let mut nft = collection();
        let err = nft
            .set_base_uri(&acct2(), "https://example.com/")
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
        assert!(nft.base_uri().is_none());
    }

    #[test]
    fn supply_is_capped() {
        let mut nft = collection();
        for i in 0..DEFAULT_MAX_SUPPLY {
            nft.mint_to(&deployer(), Seed::from_u64(i + 1), DEFAULT_MINT_PRICE)
                .unwrap();
        }
        let err = nft
            .mint_to(&deployer(), Seed::from_u64(99), DEFAULT_MINT_PRICE)
            .unwrap_err();
        assert!(matches!(err, LedgerError::SupplyExceeded { max_supply: 10 }));
        assert_eq!(nft.total_minted(), DEFAULT_MAX_SUPPLY);
    }

    #[test]
    fn duplicate_seeds_do_not_mint() {
        let mut nft = collection();
        nft.mint_to(&deployer(), Seed::from_u64(5), DEFAULT_MINT_PRICE)
            .unwrap();
        let err = nft
            .mint_to(&acct2(), Seed::from_u64(5), DEFAULT_MINT_PRICE)
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateSeed { token_id: 1, .. }));
        assert_eq!(nft.total_minted(), 1);
        // the failed mint credited nothing
        assert_eq!(nft.pending_of("deployer"), DEFAULT_MINT_PRICE);
    }

    #[test]
    fn transfers_move_ownership() {
        let mut nft = collection();
        nft.mint_to(&deployer(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        nft.transfer(&deployer(), &acct2(), 1).unwrap();
        assert_eq!(nft.owner_of(1).unwrap(), "acct2");
        assert_eq!(nft.balance_of("deployer"), 0);
        assert_eq!(nft.balance_of("acct2"), 1);
        let err = nft.transfer(&deployer(), &deployer(), 1).unwrap_err();
        assert!(matches!(err, LedgerError::NotOwner { .. }));
    }

    #[test]
    fn events_trace_collection_activity() {
        let mut nft = collection();
        nft.mint_to(&deployer(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        nft.set_base_uri(&deployer(), "ipfs://plates/").unwrap();
        nft.withdraw(&deployer(), &deployer()).unwrap();
        assert_eq!(nft.events().len(), 3);
        assert!(matches!(
            nft.events()[0],
            CollectionEvent::Minted { token_id: 1, .. }
        ));
    }

    #[test]
    fn serves_seeds_to_the_generator() {
        let mut nft = collection();
        let seed = Seed::from_u64(42);
        nft.mint_to(&deployer(), seed, DEFAULT_MINT_PRICE).unwrap();
        assert_eq!(nft.seed_of(1), Some(seed));
        let generator = Generator::new();
        let text = generator.draw(&nft, 1).unwrap();
        assert_eq!(text.len(), 128 * 129);
        assert!(matches!(
            generator.draw(&nft, 2),
            Err(XoError::UnknownToken { token_id: 2 })
        ));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut nft = collection();
        nft.mint_to(&deployer(), Seed::from_u64(1), DEFAULT_MINT_PRICE)
            .unwrap();
        nft.set_base_uri(&deployer(), "https://example.com/").unwrap();
        let json = serde_json::to_string_pretty(&nft).unwrap();
        let back: Collection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, nft);
    }
}
