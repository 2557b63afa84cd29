use thiserror::Error;

use xo_core::{Seed, TokenId};

use crate::{AccountId, Amount};

/// Canonical error type for the bookkeeping layer.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("seed {seed} is already bound to token {token_id}")]
    DuplicateSeed { seed: Seed, token_id: TokenId },

    #[error("collection is sold out at {max_supply} tokens")]
    SupplyExceeded { max_supply: u64 },

    #[error("payment of {offered} is below the mint price {required}")]
    InsufficientPayment { offered: Amount, required: Amount },

    #[error("account {account} is not the collection admin")]
    Unauthorized { account: AccountId },

    #[error("token {token_id} was never minted")]
    UnknownToken { token_id: TokenId },

    #[error("account {account} has no pending payments")]
    NothingDue { account: AccountId },

    #[error("account {account} does not own token {token_id}")]
    NotOwner { account: AccountId, token_id: TokenId },
}
