use thiserror::Error;

use crate::TokenId;

/// Canonical error type exposed by the core primitives.
#[derive(Debug, Error)]
pub enum XoError {
    /// A state or rendering query for a token id with no recorded seed.
    #[error("token {token_id} has no recorded seed")]
    UnknownToken { token_id: TokenId },

    /// Seed hex input wider than 32 bytes.
    #[error("seed hex exceeds 32 bytes")]
    SeedTooLong,

    /// Malformed seed hex input.
    #[error("invalid seed hex: {0}")]
    SeedHex(#[from] hex::FromHexError),
}
