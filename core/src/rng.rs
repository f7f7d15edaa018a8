//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through a RandomSource. In production that is a
//! SubsystemRng derived from the session's master seed.
//!
//! Each subsystem gets its own RNG stream per day, seeded from
//! (master_seed, subsystem_index, day). This means:
//!   - Adding a new subsystem never changes existing subsystems' streams.
//!   - Any single day replays exactly from the seed and the state.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::types::Day;

/// The capability every random draw in the simulation goes through.
///
/// Implementors only supply uniform draws in [0.0, 1.0); bounded
/// integer and Bernoulli draws are derived from them so a scripted
/// source in tests controls every outcome.
pub trait RandomSource {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Roll an integer in [lo, hi] (inclusive).
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        let span = hi - lo;
        let offset = (self.next_f64() * (span as f64 + 1.0)) as u32;
        lo + offset.min(span)
    }

    /// Roll a float in [lo, hi).
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick an index in [0, len).
    fn pick_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "len must be > 0");
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// A named, deterministic RNG for a single subsystem.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create a subsystem RNG from the master seed and a stable
    /// subsystem index. The index must never change once assigned.
    pub fn new(master_seed: u64, subsystem_index: u64) -> Self {
        let derived_seed = master_seed ^ (subsystem_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }
}

impl RandomSource for SubsystemRng {
    fn next_f64(&mut self) -> f64 {
        let bits = self.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// All subsystem RNGs for a single session, indexed by stable slot.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream a subsystem draws from while resolving `day`.
    pub fn for_day(&self, slot: SubsystemSlot, day: Day) -> SubsystemRng {
        let day_seed = self.master_seed ^ (day as u64).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        SubsystemRng::new(day_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable subsystem slot assignments.
/// NEVER reorder or remove entries. Append only.
/// Reordering changes every subsystem's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Event = 0,
    Demand = 1,
    Customer = 2,
    Resolver = 3,
    Achievement = 4,
    Weather = 5,
    // Add new subsystems here, append only.
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Demand => "demand",
            Self::Customer => "customer",
            Self::Resolver => "resolver",
            Self::Achievement => "achievement",
            Self::Weather => "weather",
        }
    }
}
