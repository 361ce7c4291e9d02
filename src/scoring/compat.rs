//! Pairwise compatibility formulas and CEO-specific terms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::persona::{MbtiAxis, MbtiType, PersonaBundle, TraitCatalog};
use crate::profile::{ChallengePreference, HumanProfile, MbtiFamily, VibeAxis, VibeProfile};

/// Weight of each unit of axis distance in the vibe match
const AXIS_DISTANCE_WEIGHT: f64 = 0.1;

/// MBTI compatibility between two codes.
///
/// Shared T/F +0.25 else -0.1; shared J/P +0.2 else -0.05; differing E/I
/// +0.2 else +0.05; differing S/N +0.1.
pub fn mbti_compatibility(a: MbtiType, b: MbtiType) -> f64 {
    let same = |axis| a.letter(axis) == b.letter(axis);
    let mut score = 0.0;
    score += if same(MbtiAxis::JudgmentTF) { 0.25 } else { -0.1 };
    score += if same(MbtiAxis::LifestyleJP) { 0.2 } else { -0.05 };
    score += if same(MbtiAxis::EnergyEI) { 0.05 } else { 0.2 };
    if !same(MbtiAxis::PerceptionSN) {
        score += 0.1;
    }
    score
}

/// Enneagram compatibility by circular distance on the 9-point ring.
pub fn enneagram_compatibility(a: u8, b: u8) -> f64 {
    let a = i32::from(a);
    let b = i32::from(b);
    let distance = (a - b).rem_euclid(9).min((b - a).rem_euclid(9));
    match distance {
        0 => 0.1,
        1 => 0.3,
        2 => 0.15,
        3 | 4 => -0.1,
        _ => 0.0,
    }
}

/// Raw compatibility of a candidate with the human's top MBTI and Enneagram.
pub fn human_ceo_compatibility(human: &HumanProfile, candidate: &PersonaBundle) -> f64 {
    let mbti = human
        .primary_mbti()
        .map(|code| mbti_compatibility(code, candidate.mbti))
        .unwrap_or(0.0);
    let ennea = human
        .primary_enneagram()
        .map(|core| enneagram_compatibility(core, candidate.enneagram_core))
        .unwrap_or(0.0);
    mbti + ennea
}

/// CEO pleasantness gate.
///
/// A warm target (4+) rejects candidates below 4; a cool target (2 or less)
/// rejects candidates above 2. Depends on nothing but these two values.
pub fn pleasantness_gate(candidate: u8, target: u8) -> bool {
    !((target >= 4 && candidate < 4) || (target <= 2 && candidate > 2))
}

/// Outcome of matching a CEO candidate against the vibe target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibeMatch {
    pub passed: bool,
    /// 0 when the gate fails
    pub score: f64,
}

/// Gate the candidate, then score axis distance, family alignment and
/// challenge preference.
pub fn ceo_vibe_match(catalog: &TraitCatalog, candidate: &PersonaBundle, vibe: &VibeProfile) -> VibeMatch {
    let axes = catalog.candidate_axes(candidate);
    let target_pleasantness = vibe.axes.get(VibeAxis::Pleasantness);
    if !pleasantness_gate(axes.get(VibeAxis::Pleasantness), target_pleasantness) {
        return VibeMatch { passed: false, score: 0.0 };
    }

    let mut score = 0.0;
    for axis in VibeAxis::ALL {
        let distance = (f64::from(axes.get(axis)) - f64::from(vibe.axes.get(axis))).abs();
        score -= distance * AXIS_DISTANCE_WEIGHT;
    }

    let nf_targeted = vibe.targets_mbti(MbtiFamily::NF);
    if candidate.mbti.letter(MbtiAxis::PerceptionSN) == 'N' && nf_targeted {
        score += 0.2;
    }
    match candidate.mbti.letter(MbtiAxis::JudgmentTF) {
        'F' if nf_targeted => score += 0.2,
        'T' if vibe.targets_mbti(MbtiFamily::NT) => score += 0.2,
        _ => {}
    }
    if vibe.targets_enneagram(candidate.enneagram_core) {
        score += 0.3;
    }

    if candidate.has_tag("challenging") {
        match vibe.challenge_preference {
            ChallengePreference::MostlyCalm => score -= 0.4,
            ChallengePreference::OftenChallenge => score += 0.2,
            ChallengePreference::Balanced => {}
        }
    }

    VibeMatch { passed: true, score }
}

// ─────────────────────────────────────────────────────────────────
// Originality
// ─────────────────────────────────────────────────────────────────

/// How far from the most compatible CEO the human wants to stray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Originality {
    Subtle,
    #[default]
    Balanced,
    Bold,
}

impl Originality {
    /// (target compatibility, half-width of the reward window)
    pub fn window(&self) -> (f64, f64) {
        match self {
            Originality::Subtle => (0.45, 0.15),
            Originality::Balanced => (0.35, 0.2),
            Originality::Bold => (0.25, 0.25),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Originality::Subtle => "subtle",
            Originality::Balanced => "balanced",
            Originality::Bold => "bold",
        }
    }

    /// Lenient parse: unknown values fall back to balanced.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Originality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Originality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "subtle" => Ok(Originality::Subtle),
            "balanced" => Ok(Originality::Balanced),
            "bold" => Ok(Originality::Bold),
            other => Err(Error::invalid_profile(
                "originality",
                format!("'{}' (expected subtle, balanced or bold)", other),
            )),
        }
    }
}

/// Triangular reward for compatibility near the preference's target.
///
/// Inside the window: `(width - |c - target|) / width * 0.25`; outside:
/// -0.05. Compatibility under 0.1 costs a further 0.15.
pub fn originality_bonus(compatibility: f64, preference: Originality) -> f64 {
    let (target, width) = preference.window();
    let delta = (compatibility - target).abs();
    let mut bonus = if delta >= width {
        -0.05
    } else {
        (width - delta) / width * 0.25
    };
    if compatibility < 0.1 {
        bonus -= 0.15;
    }
    bonus
}
