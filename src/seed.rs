use std::fmt;

use noise::Simplex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

// salts keep the rng and the noise stream of one seed independent
const RNG_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const NOISE_SALT: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Generation seed, either a plain number or free text.
///
/// Text that parses as an integer is the same seed as that number. Negative
/// numbers wrap into the unsigned range, `-1` is `u64::MAX`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u64),
    /// only ever holds values below zero, see `From<i64>`
    Negative(i64),
    Text(String),
}

impl Seed {
    /// Canonical 64-bit value of the seed.
    pub fn value(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Negative(n) => *n as u64,
            Seed::Text(text) => {
                let text_trimmed = text.trim();
                match text_trimmed.parse::<u64>() {
                    Ok(n) => n,
                    Err(_) => match text_trimmed.parse::<i64>() {
                        Ok(n) => n as u64,
                        Err(_) => fnv1a(text.as_bytes()),
                    },
                }
            }
        }
    }

    pub fn rng_seed(&self) -> u64 {
        splitmix(self.value() ^ RNG_SALT)
    }

    pub fn noise_seed(&self) -> u32 {
        let mixed = splitmix(self.value() ^ NOISE_SALT);
        (mixed >> 32) as u32 ^ mixed as u32
    }

    /// Fresh pair of streams for one generation run.
    pub fn streams(&self) -> Streams {
        Streams {
            rng: StdRng::seed_from_u64(self.rng_seed()),
            noise: Simplex::new(self.noise_seed()),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Number(crate::config::DEFAULT_SEED)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed::Number(value)
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        if value < 0 { Seed::Negative(value) } else { Seed::Number(value as u64) }
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_string())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Negative(n) => write!(f, "{n}"),
            Seed::Text(text) => f.write_str(text),
        }
    }
}

/// The uniform rng and the coherent 2D noise derived from one seed.
pub struct Streams {
    pub rng: StdRng,
    pub noise: Simplex,
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

// finaliser from splitmix64
pub(crate) fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
