//! Randomness tuning, seed labels and softmax finalization.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Lower bound applied to the softmax temperature
pub const MIN_TEMPERATURE: f64 = 0.05;

/// How much controlled variety selection introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomnessLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Numbers behind a [`RandomnessLevel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Half-width of the uniform sort-key perturbation
    pub jitter: f64,
    pub temperature: f64,
    /// How many top assignments the final draw considers
    pub pool_size: usize,
}

impl RandomnessLevel {
    pub const ALL: [RandomnessLevel; 3] = [RandomnessLevel::Low, RandomnessLevel::Medium, RandomnessLevel::High];

    pub fn tuning(&self) -> Tuning {
        match self {
            RandomnessLevel::Low => Tuning { jitter: 0.0, temperature: 0.25, pool_size: 1 },
            RandomnessLevel::Medium => Tuning { jitter: 0.06, temperature: 0.6, pool_size: 3 },
            RandomnessLevel::High => Tuning { jitter: 0.12, temperature: 1.0, pool_size: 5 },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RandomnessLevel::Low => "low",
            RandomnessLevel::Medium => "medium",
            RandomnessLevel::High => "high",
        }
    }
}

impl fmt::Display for RandomnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RandomnessLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RandomnessLevel::Low),
            "medium" => Ok(RandomnessLevel::Medium),
            "high" => Ok(RandomnessLevel::High),
            other => Err(Error::invalid_profile(
                "randomness level",
                format!("'{}' (expected low, medium or high)", other),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Seeds
// ─────────────────────────────────────────────────────────────────

/// Stable 64-bit seed: the first 16 hex digits of SHA-256(label).
pub fn seed_from_label(label: &str) -> u64 {
    let digest = Sha256::digest(label.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Fresh label of the form `mix-YYYYMMDD-HHMMSS-NNNNNN`.
pub fn auto_seed_label() -> String {
    let nonce: u32 = OsRng.gen_range(0..1_000_000);
    format!("mix-{}-{:06}", Utc::now().format("%Y%m%d-%H%M%S"), nonce)
}

/// Session generator plus the label that reproduces it. A missing or blank
/// label gets an auto-generated one.
pub fn build_rng(label: Option<&str>) -> (ChaCha8Rng, String) {
    let label = match label.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => auto_seed_label(),
    };
    let rng = ChaCha8Rng::seed_from_u64(seed_from_label(&label));
    (rng, label)
}

// ─────────────────────────────────────────────────────────────────
// Softmax
// ─────────────────────────────────────────────────────────────────

/// Pick one item with probability proportional to
/// `exp((score - max) / max(temperature, 0.05))`.
///
/// A single item is returned without consuming randomness.
pub fn softmax_sample<'a, T, R>(
    items: &'a [T],
    score: impl Fn(&T) -> f64,
    temperature: f64,
    rng: &mut R,
) -> Result<&'a T>
where
    R: Rng + ?Sized,
{
    match items {
        [] => return Err(Error::EmptyBeam),
        [only] => return Ok(only),
        _ => {}
    }

    let max = items.iter().map(&score).fold(f64::NEG_INFINITY, f64::max);
    let temperature = temperature.max(MIN_TEMPERATURE);
    let weights: Vec<f64> = items
        .iter()
        .map(|item| ((score(item) - max) / temperature).exp())
        .collect();
    let total: f64 = weights.iter().sum();

    let threshold = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (item, weight) in items.iter().zip(&weights) {
        cumulative += weight;
        if cumulative > threshold {
            return Ok(item);
        }
    }
    // Rounding can leave the threshold at the very top of the range
    items.last().ok_or(Error::EmptyBeam)
}
