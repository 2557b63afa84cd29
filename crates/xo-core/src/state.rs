use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::XoError;

/// Number of 256-bit words in a derived raw state.
pub const STATE_WORDS: usize = 64;
/// Width of one state word in bytes.
pub const WORD_BYTES: usize = 32;

/// One unsigned 256-bit state value, big-endian.
pub type Word = [u8; WORD_BYTES];

/// Hash family consumed by the word derivation. Injected at generator
/// construction so callers and tests can substitute their own.
pub trait StateHasher {
    fn hash(&self, preimage: Word) -> Word;
}

/// SHA-256 word family; the collection default.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl StateHasher for Sha256Hasher {
    fn hash(&self, preimage: Word) -> Word {
        let mut hasher = Sha256::new();
        hasher.update(preimage);
        hasher.finalize().into()
    }
}

/// Blake3 word family.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl StateHasher for Blake3Hasher {
    fn hash(&self, preimage: Word) -> Word {
        *blake3::hash(&preimage).as_bytes()
    }
}

/// Caller-supplied 256-bit value bound to a token at mint time. Unique
/// across the collection; immutable once recorded.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Seed(Word);

impl Seed {
    /// Seed from a small integer, packed big-endian.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[WORD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Seed from raw big-endian bytes.
    pub fn from_bytes(bytes: Word) -> Self {
        Self(bytes)
    }

    /// Borrow the raw big-endian bytes.
    pub fn as_bytes(&self) -> &Word {
        &self.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({self})")
    }
}

impl FromStr for Seed {
    type Err = XoError;

    /// Parse hex with or without a `0x` prefix; shorter inputs are
    /// left-padded with zeroes.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let raw = hex::decode(&padded)?;
        if raw.len() > WORD_BYTES {
            return Err(XoError::SeedTooLong);
        }
        let mut bytes = [0u8; WORD_BYTES];
        bytes[WORD_BYTES - raw.len()..].copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl Serialize for Seed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(D::Error::custom)
    }
}

/// Ordered sequence of the 64 derived state words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawState(pub [Word; STATE_WORDS]);

impl RawState {
    /// Borrow the words in derivation order.
    pub fn words(&self) -> &[Word; STATE_WORDS] {
        &self.0
    }
}

/// Derive the 64 state words for a seed.
///
/// Word `i` (1-based) is the hash of the counter `i` packed as a 32-byte
/// big-endian value. The seed is accepted for interface stability but does
/// not enter the derivation; issued state sequences must stay stable
/// across releases (see DESIGN.md, "frozen derivation").
pub fn derive_raw_state<H: StateHasher>(hasher: &H, seed: Seed) -> RawState {
    let _ = seed;
    let mut words = [[0u8; WORD_BYTES]; STATE_WORDS];
    for (index, word) in words.iter_mut().enumerate() {
        *word = hasher.hash(pack_counter(index as u64 + 1));
    }
    RawState(words)
}

fn pack_counter(value: u64) -> Word {
    let mut out = [0u8; WORD_BYTES];
    out[WORD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD_1: &str = "ec4916dd28fc4c10d78e287ca5d9cc51ee1ae73cbfde08c6b37324cbfaac8bc5";
    const WORD_2: &str = "9267d3dbed802941483f1afa2a6bc68de5f653128aca9bf1461c5d0a3ad36ed2";
    const WORD_64: &str = "d9ece2cd2214f52c55dcd9bca56a900ec79c1343f12df8a60f0298d255896b61";

    #[test]
    fn words_hash_the_counter_sequence() {
        let state = derive_raw_state(&Sha256Hasher, Seed::from_u64(1));
        assert_eq!(hex::encode(state.words()[0]), WORD_1);
        assert_eq!(hex::encode(state.words()[1]), WORD_2);
        assert_eq!(hex::encode(state.words()[63]), WORD_64);
    }

    #[test]
    fn derivation_ignores_the_seed() {
        let a = derive_raw_state(&Sha256Hasher, Seed::from_u64(0));
        let b = derive_raw_state(&Sha256Hasher, Seed::from_u64(1));
        let c = derive_raw_state(&Sha256Hasher, Seed::from_bytes([0xff; WORD_BYTES]));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn families_disagree_on_words() {
        let sha = derive_raw_state(&Sha256Hasher, Seed::from_u64(1));
        let blake = derive_raw_state(&Blake3Hasher, Seed::from_u64(1));
        assert_ne!(sha, blake);
    }

    #[test]
    fn seed_parses_hex_with_padding() {
        let seed: Seed = "0x2a".parse().unwrap();
        assert_eq!(seed, Seed::from_u64(42));
        let bare: Seed = "2a".parse().unwrap();
        assert_eq!(bare, seed);
        let odd: Seed = "a".parse().unwrap();
        assert_eq!(odd, Seed::from_u64(10));
        assert_eq!(seed.to_string().len(), 2 * WORD_BYTES);
    }

    #[test]
    fn seed_rejects_oversized_hex() {
        let long = "ff".repeat(WORD_BYTES + 1);
        assert!(matches!(long.parse::<Seed>(), Err(XoError::SeedTooLong)));
    }

    #[test]
    fn seed_rejects_non_hex_input() {
        assert!("zz".parse::<Seed>().is_err());
    }

    #[test]
    fn seed_serializes_as_hex_string() {
        let seed = Seed::from_u64(7);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, format!("\"{seed}\""));
        let back: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }
}
