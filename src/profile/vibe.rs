//! CEO vibe profile: eight ordinal axes and the targets derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest and highest value on every ordinal axis
pub const AXIS_MIN: u8 = 1;
pub const AXIS_MAX: u8 = 5;

/// At or above: the high-side tag applies
const HIGH_THRESHOLD: u8 = 4;
/// At or below: the low-side tag applies
const LOW_THRESHOLD: u8 = 2;

// ─────────────────────────────────────────────────────────────────
// Axes
// ─────────────────────────────────────────────────────────────────

/// Behavioral axes shared by the vibe target and candidate personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VibeAxis {
    Pleasantness,
    Directness,
    Conflict,
    Decisiveness,
    Structure,
    EmotionalTone,
    Humor,
    Coaching,
}

impl VibeAxis {
    pub const ALL: [VibeAxis; 8] = [
        VibeAxis::Pleasantness,
        VibeAxis::Directness,
        VibeAxis::Conflict,
        VibeAxis::Decisiveness,
        VibeAxis::Structure,
        VibeAxis::EmotionalTone,
        VibeAxis::Humor,
        VibeAxis::Coaching,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VibeAxis::Pleasantness => "pleasantness",
            VibeAxis::Directness => "directness",
            VibeAxis::Conflict => "conflict",
            VibeAxis::Decisiveness => "decisiveness",
            VibeAxis::Structure => "structure",
            VibeAxis::EmotionalTone => "emotional_tone",
            VibeAxis::Humor => "humor",
            VibeAxis::Coaching => "coaching",
        }
    }

    /// (high-side tag, low-side tag)
    fn tags(&self) -> (&'static str, &'static str) {
        match self {
            VibeAxis::Pleasantness => ("pleasant", "reserved"),
            VibeAxis::Directness => ("direct", "tactful"),
            VibeAxis::Conflict => ("conflict-forward", "conflict-averse"),
            VibeAxis::Decisiveness => ("decisive", "deliberate"),
            VibeAxis::Structure => ("structured", "flexible"),
            VibeAxis::EmotionalTone => ("validating", "no-nonsense"),
            VibeAxis::Humor => ("playful", "serious"),
            VibeAxis::Coaching => ("supportive", "challenging"),
        }
    }
}

impl fmt::Display for VibeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One 1-5 value per [`VibeAxis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AxisFields", into = "AxisFields")]
pub struct AxisScores([u8; 8]);

impl AxisScores {
    /// Validated constructor; values are in [`VibeAxis::ALL`] order.
    pub fn new(values: [u8; 8]) -> Result<Self> {
        for (axis, value) in VibeAxis::ALL.iter().zip(values) {
            if !(AXIS_MIN..=AXIS_MAX).contains(&value) {
                return Err(Error::InvalidAnswer {
                    question: axis.to_string(),
                    value: i64::from(value),
                    min: i64::from(AXIS_MIN),
                    max: i64::from(AXIS_MAX),
                });
            }
        }
        Ok(Self(values))
    }

    /// Every axis at the same value, clamped into range.
    pub fn uniform(value: u8) -> Self {
        Self([value.clamp(AXIS_MIN, AXIS_MAX); 8])
    }

    pub fn from_fn(f: impl FnMut(VibeAxis) -> u8) -> Self {
        Self(VibeAxis::ALL.map(f))
    }

    pub fn get(&self, axis: VibeAxis) -> u8 {
        self.0[axis.index()]
    }

    /// Copy with one axis replaced, clamped into range.
    pub fn with(mut self, axis: VibeAxis, value: u8) -> Self {
        self.0[axis.index()] = value.clamp(AXIS_MIN, AXIS_MAX);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (VibeAxis, u8)> + '_ {
        VibeAxis::ALL.iter().map(move |axis| (*axis, self.get(*axis)))
    }
}

impl Default for AxisScores {
    fn default() -> Self {
        Self::uniform(3)
    }
}

/// Named-field form used in TOML and JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AxisFields {
    pleasantness: u8,
    directness: u8,
    conflict: u8,
    decisiveness: u8,
    structure: u8,
    emotional_tone: u8,
    humor: u8,
    coaching: u8,
}

impl TryFrom<AxisFields> for AxisScores {
    type Error = Error;

    fn try_from(f: AxisFields) -> Result<Self> {
        AxisScores::new([
            f.pleasantness,
            f.directness,
            f.conflict,
            f.decisiveness,
            f.structure,
            f.emotional_tone,
            f.humor,
            f.coaching,
        ])
    }
}

impl From<AxisScores> for AxisFields {
    fn from(s: AxisScores) -> Self {
        let [pleasantness, directness, conflict, decisiveness, structure, emotional_tone, humor, coaching] = s.0;
        AxisFields {
            pleasantness,
            directness,
            conflict,
            decisiveness,
            structure,
            emotional_tone,
            humor,
            coaching,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Challenge preference
// ─────────────────────────────────────────────────────────────────

/// How much the human wants the CEO to push back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChallengePreference {
    #[serde(rename = "mostly calm", alias = "mostly_calm")]
    MostlyCalm,
    #[default]
    #[serde(rename = "balanced")]
    Balanced,
    #[serde(rename = "often challenge", alias = "often_challenge")]
    OftenChallenge,
}

impl ChallengePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengePreference::MostlyCalm => "mostly calm",
            ChallengePreference::Balanced => "balanced",
            ChallengePreference::OftenChallenge => "often challenge",
        }
    }
}

impl fmt::Display for ChallengePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "mostly calm" | "calm" => Ok(ChallengePreference::MostlyCalm),
            "balanced" => Ok(ChallengePreference::Balanced),
            "often challenge" | "challenge" => Ok(ChallengePreference::OftenChallenge),
            _ => Err(Error::invalid_profile(
                "challenge_preference",
                format!("'{}' (expected mostly calm, balanced or often challenge)", s),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// MBTI families
// ─────────────────────────────────────────────────────────────────

/// Temperament pairs targeted by the vibe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MbtiFamily {
    NF,
    SF,
    NT,
    ST,
}

impl MbtiFamily {
    pub const ALL: [MbtiFamily; 4] = [MbtiFamily::NF, MbtiFamily::SF, MbtiFamily::NT, MbtiFamily::ST];
}

impl fmt::Display for MbtiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Enneagram types eligible as targets, in tie-break order
const ENNEAGRAM_TARGETS: [u8; 6] = [1, 2, 3, 8, 9, 7];

// ─────────────────────────────────────────────────────────────────
// Vibe Profile
// ─────────────────────────────────────────────────────────────────

/// Desired CEO behavior, derived once from the vibe answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VibeProfile {
    pub axes: AxisScores,
    pub tags: Vec<&'static str>,
    pub target_mbti_family: Vec<MbtiFamily>,
    pub target_enneagram_family: Vec<u8>,
    pub challenge_preference: ChallengePreference,
}

impl VibeProfile {
    /// Derive tags and target families from axis answers.
    pub fn synthesize(axes: AxisScores, challenge_preference: ChallengePreference) -> Self {
        let high = |axis: VibeAxis| axes.get(axis) >= HIGH_THRESHOLD;
        let low = |axis: VibeAxis| axes.get(axis) <= LOW_THRESHOLD;

        let tags = VibeAxis::ALL
            .iter()
            .filter_map(|axis| {
                let (high_tag, low_tag) = axis.tags();
                if high(*axis) {
                    Some(high_tag)
                } else if low(*axis) {
                    Some(low_tag)
                } else {
                    None
                }
            })
            .collect();

        // NF, SF, NT, ST
        let mut mbti = [0u32; 4];
        if high(VibeAxis::Pleasantness) || high(VibeAxis::EmotionalTone) {
            mbti[0] += 2;
            mbti[1] += 1;
        }
        if high(VibeAxis::Directness) || high(VibeAxis::Decisiveness) {
            mbti[2] += 2;
            mbti[3] += 1;
        }
        if high(VibeAxis::Structure) {
            mbti[3] += 1;
            mbti[2] += 1;
        }
        if low(VibeAxis::Structure) {
            mbti[0] += 1;
            mbti[2] += 1;
        }
        let target_mbti_family = top_by_score(&MbtiFamily::ALL, &mbti, 2);

        // 1, 2, 3, 8, 9, 7
        let mut ennea = [0u32; 6];
        if high(VibeAxis::Pleasantness) {
            ennea[1] += 2;
            ennea[4] += 2;
        }
        if high(VibeAxis::Directness) || high(VibeAxis::Conflict) {
            ennea[3] += 2;
            ennea[0] += 1;
        }
        if high(VibeAxis::Structure) {
            ennea[0] += 2;
        }
        if high(VibeAxis::Humor) {
            ennea[5] += 2;
        }
        if high(VibeAxis::Decisiveness) {
            ennea[2] += 2;
        }
        let target_enneagram_family = top_by_score(&ENNEAGRAM_TARGETS, &ennea, 3);

        Self {
            axes,
            tags,
            target_mbti_family,
            target_enneagram_family,
            challenge_preference,
        }
    }

    pub fn targets_mbti(&self, family: MbtiFamily) -> bool {
        self.target_mbti_family.contains(&family)
    }

    pub fn targets_enneagram(&self, core: u8) -> bool {
        self.target_enneagram_family.contains(&core)
    }
}

/// Top `n` keys by descending score; ties keep declaration order.
fn top_by_score<T: Copy>(keys: &[T], scores: &[u32], n: usize) -> Vec<T> {
    let mut ranked: Vec<(T, u32)> = keys.iter().copied().zip(scores.iter().copied()).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(n).map(|(key, _)| key).collect()
}
