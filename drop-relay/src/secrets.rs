//! Secret generation.
//!
//! Secrets are three words drawn uniformly and independently from
//! [`WORDS`], joined with `-`. With 1024 words that is 2^30 possible
//! secrets. Uniqueness among live offers is enforced by the
//! [`OfferTable`](crate::table::OfferTable), not here.

use crate::words::WORDS;
use drop_types::Secret;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Number of words in a generated secret.
pub const WORDS_PER_SECRET: usize = 3;

/// A source of candidate secrets.
pub trait SecretSource: Send + Sync {
    /// Draw the next candidate.
    fn next_secret(&self) -> Secret;
}

/// Random word-triple generator.
#[derive(Debug)]
pub struct Secrets {
    rng: Mutex<StdRng>,
}

impl Secrets {
    /// Generator seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Generator with a fixed seed. Identical seeds yield identical sequences.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw the next secret.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Secret {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let words: [&str; WORDS_PER_SECRET] =
            std::array::from_fn(|_| WORDS[rng.gen_range(0..WORDS.len())]);
        Secret::from_words(&words)
    }
}

impl SecretSource for Secrets {
    fn next_secret(&self) -> Secret {
        self.next()
    }
}

/// Cycles through a fixed list of secrets.
///
/// Useful for tests and demos that need to know the secret in advance.
#[derive(Debug)]
pub struct FixedSecrets {
    secrets: Vec<Secret>,
    next: Mutex<usize>,
}

impl FixedSecrets {
    /// Create a source that hands out `secrets` in order, wrapping around.
    ///
    /// Entries that are not valid secrets are skipped.
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            secrets: secrets
                .into_iter()
                .filter_map(|s| Secret::parse(s.as_ref()).ok())
                .collect(),
            next: Mutex::new(0),
        }
    }
}

impl SecretSource for FixedSecrets {
    fn next_secret(&self) -> Secret {
        if self.secrets.is_empty() {
            return Secret::from_words(&[WORDS[0]; WORDS_PER_SECRET]);
        }
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let secret = self.secrets[*next % self.secrets.len()].clone();
        *next += 1;
        secret
    }
}
