//! Deterministic randomness for combat rolls.
//!
//! Every roll is a pure function of a seed. The turn engine derives seeds
//! from the encounter seed, an action nonce and the acting combatant, so a
//! whole encounter replays identically from the same inputs.

/// Seed-driven random source.
///
/// Implementations must return the same value for the same seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform sample in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / (f64::from(u32::MAX) + 1.0)
    }
}

/// PCG-XSH-RR: 64-bit state, 32-bit output.
///
/// See <https://www.pcg-random.org/>.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Always returns the same sample. Useful for scripted encounters and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRoll(pub f64);

impl RngOracle for FixedRoll {
    fn next_u32(&self, _seed: u64) -> u32 {
        (self.0.clamp(0.0, 1.0) * f64::from(u32::MAX)) as u32
    }

    fn unit(&self, _seed: u64) -> f64 {
        self.0
    }
}

/// Mixes the encounter seed, action nonce, actor and roll context into one seed.
///
/// Use distinct `context` values when one action needs several independent
/// rolls (0 = hit roll).
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style multipliers
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor_id).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
