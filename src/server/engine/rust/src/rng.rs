/* src/server/engine/rust/src/rng.rs */

//! Seeded pseudo-randomness. Every draw is a pure function of the seed, so
//! the same page key and build salt reproduce the same sequence anywhere.

use sha2::{Digest, Sha256};

const FNV_OFFSET_64: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME_64: u64 = 0x0000_0100_0000_01b3;

/// Standard FNV-1a 64-bit hash.
pub(crate) fn fnv1a_64(input: &str) -> u64 {
  let mut hash = FNV_OFFSET_64;
  for byte in input.bytes() {
    hash ^= u64::from(byte);
    hash = hash.wrapping_mul(FNV_PRIME_64);
  }
  hash
}

/// SHA-256 of `"{page_key}:{build_salt}"`, first 8 bytes as a big-endian u64.
pub fn derive_seed(page_key: &str, build_salt: &str) -> u64 {
  let mut hasher = Sha256::new();
  hasher.update(page_key.as_bytes());
  hasher.update(b":");
  hasher.update(build_salt.as_bytes());
  let digest = hasher.finalize();
  let mut head = [0u8; 8];
  head.copy_from_slice(&digest[..8]);
  u64::from_be_bytes(head)
}

/// SplitMix64 generator.
#[derive(Debug, Clone)]
pub struct SeededRng {
  state: u64,
}

impl SeededRng {
  pub fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  pub fn from_page(page_key: &str, build_salt: &str) -> Self {
    Self::new(derive_seed(page_key, build_salt))
  }

  pub fn next_u64(&mut self) -> u64 {
    self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = self.state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
  }

  /// Uniform in [0, 1) with 53 bits of precision.
  pub fn next_f64(&mut self) -> f64 {
    (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
  }

  /// Independent stream keyed by `label`. Does not advance `self`, so the
  /// draw for a label is the same no matter which other labels were forked.
  pub fn fork(&self, label: &str) -> SeededRng {
    let mut mixer = SeededRng::new(self.state ^ fnv1a_64(label));
    SeededRng::new(mixer.next_u64())
  }
}
