//! Core primitives for the XO collection.
//!
//! This crate exposes the building blocks that the rest of the XO stack
//! relies upon:
//!
//! * [`state`] — derivation of the 64 state words behind an injectable
//!   hash family.
//! * [`grid`] — the 128x128 cell plate and its text rendering.
//! * [`generator`] — token-level queries (`draw`, `initial_state`) over a
//!   pluggable seed source.
//!
//! The modules are intentionally small and focused so that higher level
//! crates (ledger, CLI, …) can be combined without pulling in heavy
//! dependencies or bespoke plumbing in each consumer.

pub mod generator;
pub mod grid;
pub mod state;

mod error;

pub use error::XoError;
pub use generator::{Generator, SeedSource};
pub use grid::Grid;
pub use state::{
    derive_raw_state, Blake3Hasher, RawState, Seed, Sha256Hasher, StateHasher, Word, STATE_WORDS,
    WORD_BYTES,
};

/// Identifier assigned to a minted token; sequential, starting at 1, never
/// reused.
pub type TokenId = u64;
