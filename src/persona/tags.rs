//! Trait-tag lookup tables.
//!
//! Tags are the only persona attribute that feeds culture fit, candidate
//! vibe axes and team coverage. The tables live in a [`TraitCatalog`] value
//! that is handed to the library builder and the scoring context.

use std::collections::BTreeMap;

use super::types::{CultureFit, CultureMode, PersonaBundle};
use crate::profile::{AxisScores, VibeAxis};

/// Floor applied to every culture mode before tag weights are added
pub const CULTURE_FIT_FLOOR: f64 = 0.1;

/// Axis value for a candidate with no tag on that axis
pub const NEUTRAL_AXIS_VALUE: u8 = 3;

type TagWeights = &'static [(&'static str, &'static [(CultureMode, f64)])];
type AxisTags = &'static [(VibeAxis, &'static [(&'static str, u8)])];
type Families = &'static [(CoverageFamily, &'static [&'static str])];

const STANDARD_CULTURE_WEIGHTS: TagWeights = &[
    ("pleasant", &[(CultureMode::FriendlySafe, 0.4)]),
    ("supportive", &[(CultureMode::FriendlySafe, 0.3)]),
    ("diplomatic", &[(CultureMode::FriendlySafe, 0.3)]),
    ("execution", &[(CultureMode::PerformanceDriven, 0.4)]),
    (
        "operator",
        &[
            (CultureMode::PerformanceDriven, 0.2),
            (CultureMode::RegulatedEnterprise, 0.2),
        ],
    ),
    ("structured", &[(CultureMode::RegulatedEnterprise, 0.4)]),
    ("governance", &[(CultureMode::RegulatedEnterprise, 0.5)]),
    ("risk", &[(CultureMode::RegulatedEnterprise, 0.3)]),
    ("innovator", &[(CultureMode::HighVelocityStartup, 0.4)]),
    ("creative", &[(CultureMode::HighVelocityStartup, 0.3)]),
    ("experimental", &[(CultureMode::HighVelocityStartup, 0.3)]),
    (
        "intense",
        &[
            (CultureMode::HighTurnover, 0.4),
            (CultureMode::IntentionallyToxicSimulation, 0.3),
        ],
    ),
    (
        "direct",
        &[(CultureMode::PerformanceDriven, 0.2), (CultureMode::HighTurnover, 0.2)],
    ),
    ("adaptive", &[(CultureMode::HighVelocityStartup, 0.2)]),
];

const STANDARD_AXIS_TAGS: AxisTags = &[
    (
        VibeAxis::Pleasantness,
        &[("pleasant", 5), ("supportive", 5), ("diplomatic", 4), ("reserved", 2), ("blunt", 1)],
    ),
    (
        VibeAxis::Directness,
        &[("direct", 5), ("blunt", 5), ("tactful", 2), ("diplomatic", 3)],
    ),
    (
        VibeAxis::Conflict,
        &[("conflict-forward", 5), ("assertive", 4), ("conflict-averse", 2)],
    ),
    (VibeAxis::Decisiveness, &[("decisive", 5), ("deliberate", 2)]),
    (
        VibeAxis::Structure,
        &[("structured", 5), ("process", 4), ("flexible", 2), ("adaptive", 2)],
    ),
    (
        VibeAxis::EmotionalTone,
        &[("validating", 5), ("supportive", 4), ("no-nonsense", 2)],
    ),
    (VibeAxis::Humor, &[("playful", 5), ("serious", 2)]),
    (VibeAxis::Coaching, &[("supportive", 5), ("challenging", 2)]),
];

const STANDARD_FAMILIES: Families = &[
    (
        CoverageFamily::Integrator,
        &["integrator", "diplomatic", "supportive", "people"],
    ),
    (
        CoverageFamily::Operator,
        &["operator", "execution", "process", "structured"],
    ),
    (CoverageFamily::Governance, &["governance", "risk", "compliance"]),
    (
        CoverageFamily::Innovator,
        &["innovator", "creative", "vision", "experimental"],
    ),
];

/// Trait families a well-rounded team should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverageFamily {
    Integrator,
    Operator,
    Governance,
    Innovator,
}

/// Read-only tag tables shared by the library builder and the scorer.
#[derive(Debug, Clone, Copy)]
pub struct TraitCatalog {
    culture_weights: TagWeights,
    axis_tags: AxisTags,
    families: Families,
}

impl Default for TraitCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TraitCatalog {
    /// The tables the bundled persona catalog was tuned against.
    pub const fn standard() -> Self {
        Self {
            culture_weights: STANDARD_CULTURE_WEIGHTS,
            axis_tags: STANDARD_AXIS_TAGS,
            families: STANDARD_FAMILIES,
        }
    }

    /// Culture-fit vector for a tag set.
    ///
    /// Every mode starts at the floor; each matching tag adds its weights,
    /// clamped to 1.0 after every addition.
    pub fn culture_fit<S: AsRef<str>>(&self, tags: &[S]) -> CultureFit {
        let mut vector: BTreeMap<CultureMode, f64> = CultureMode::ALL
            .iter()
            .map(|mode| (*mode, CULTURE_FIT_FLOOR))
            .collect();

        for tag in tags {
            let Some((_, weights)) = self
                .culture_weights
                .iter()
                .find(|(name, _)| *name == tag.as_ref())
            else {
                continue;
            };
            for (mode, weight) in weights.iter() {
                let entry = vector.entry(*mode).or_insert(CULTURE_FIT_FLOOR);
                *entry = (*entry + weight).min(1.0);
            }
        }

        CultureFit::new(vector)
    }

    /// Value of one vibe axis implied by a tag set.
    ///
    /// Mean of the mapped values of matching tags, rounded half to even;
    /// [`NEUTRAL_AXIS_VALUE`] when none match.
    pub fn axis_value<S: AsRef<str>>(&self, tags: &[S], axis: VibeAxis) -> u8 {
        let Some((_, mapping)) = self.axis_tags.iter().find(|(a, _)| *a == axis) else {
            return NEUTRAL_AXIS_VALUE;
        };

        let values: Vec<f64> = tags
            .iter()
            .filter_map(|tag| {
                mapping
                    .iter()
                    .find(|(name, _)| *name == tag.as_ref())
                    .map(|(_, value)| f64::from(*value))
            })
            .collect();

        if values.is_empty() {
            return NEUTRAL_AXIS_VALUE;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        mean.round_ties_even() as u8
    }

    /// All eight axis values of a persona.
    pub fn candidate_axes(&self, bundle: &PersonaBundle) -> AxisScores {
        AxisScores::from_fn(|axis| self.axis_value(&bundle.trait_tags, axis))
    }

    pub fn families(&self) -> impl Iterator<Item = (CoverageFamily, &'static [&'static str])> {
        let families = self.families;
        families.iter().copied()
    }

    /// Whether any tag belongs to the family.
    pub fn covers<S: AsRef<str>>(&self, tags: &[S], family: CoverageFamily) -> bool {
        self.families
            .iter()
            .filter(|(f, _)| *f == family)
            .any(|(_, members)| {
                tags.iter()
                    .any(|tag| members.iter().any(|member| *member == tag.as_ref()))
            })
    }
}
