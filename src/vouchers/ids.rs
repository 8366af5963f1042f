use rand::rngs::ThreadRng;
use rand::Rng;
use uuid::Builder;

/// Random identifier source for voucher records.
///
/// The randomness is injected so runs can be reproduced in tests with a
/// seeded generator. Uniqueness only has to hold within a single run.
pub struct IdGenerator<R: Rng> {
    rng: R,
}

impl IdGenerator<ThreadRng> {
    pub fn new() -> IdGenerator<ThreadRng> {
        IdGenerator { rng: rand::thread_rng() }
    }
}

impl Default for IdGenerator<ThreadRng> {
    fn default() -> Self {
        IdGenerator::new()
    }
}

impl<R: Rng> IdGenerator<R> {
    pub fn from_rng(rng: R) -> IdGenerator<R> {
        IdGenerator { rng }
    }

    /// A fresh identifier in the canonical hyphenated 8-4-4-4-12 hex layout,
    /// version nibble `4`, variant nibble in `8..=b`.
    pub fn generate(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid().to_string()
    }

    /// Remote id for the given 0-based row index: a fresh identifier plus
    /// the 1-based row number padded to 8 digits. The suffix is strictly
    /// increasing, so remote ids stay distinct across rows even if two
    /// generated identifiers were to collide.
    pub fn remote_id(&mut self, row_index: usize) -> String {
        format!("{}-{:08}", self.generate(), row_index + 1)
    }
}
