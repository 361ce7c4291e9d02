//! Named score terms for an assignment.
//!
//! The breakdown is the single source of an assignment's total: the score
//! is always `Breakdown::sum()`, so the two can never drift apart.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::persona::Role;

/// Value of the CEO gate indicator when the candidate passed
pub const VIBE_GATE_PASSED: f64 = 1.0;
/// Charged when a failing CEO is scored directly instead of being pruned
pub const VIBE_GATE_PENALTY: f64 = -2.0;

/// CEO-only terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CeoTerms {
    /// 1.0 when the pleasantness gate passed, else 0.0. Not additive.
    pub vibe_gate: f64,
    pub vibe_gate_penalty: f64,
    pub vibe_match_score: f64,
    pub human_ceo_bonus: f64,
    pub ceo_originality_bonus: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chairman_ceo_bonus: Option<f64>,
}

impl CeoTerms {
    fn accumulate(&self, mut total: f64) -> f64 {
        total += self.vibe_match_score;
        total += self.vibe_gate_penalty;
        total += self.human_ceo_bonus;
        total += self.ceo_originality_bonus;
        if let Some(chairman) = self.chairman_ceo_bonus {
            total += chairman;
        }
        total
    }
}

/// Terms contributed by one assigned role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoleTerms {
    pub role_fit_weight: f64,
    pub culture_fit: f64,
    #[serde(flatten)]
    pub ceo: Option<CeoTerms>,
}

impl RoleTerms {
    fn accumulate(&self, mut total: f64) -> f64 {
        total += self.role_fit_weight + self.culture_fit;
        match &self.ceo {
            Some(ceo) => ceo.accumulate(total),
            None => total,
        }
    }

    pub fn sum(&self) -> f64 {
        self.accumulate(0.0)
    }
}

/// Terms computed over the whole team.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TeamTerms {
    pub pair_synergy: f64,
    /// Magnitude; subtracted from the total
    pub diversity_penalty: f64,
    pub coverage_bonus: f64,
    pub conflict_adjustment: f64,
}

impl TeamTerms {
    fn accumulate(&self, mut total: f64) -> f64 {
        total += self.pair_synergy;
        total -= self.diversity_penalty;
        total += self.coverage_bonus;
        total += self.conflict_adjustment;
        total
    }
}

/// Per-role and team terms, in assignment order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Breakdown {
    roles: Vec<(Role, RoleTerms)>,
    team: TeamTerms,
}

impl Breakdown {
    pub fn new(roles: Vec<(Role, RoleTerms)>, team: TeamTerms) -> Self {
        Self { roles, team }
    }

    pub fn role(&self, role: Role) -> Option<&RoleTerms> {
        self.roles.iter().find(|(r, _)| *r == role).map(|(_, terms)| terms)
    }

    pub fn roles(&self) -> impl Iterator<Item = (Role, &RoleTerms)> {
        self.roles.iter().map(|(role, terms)| (*role, terms))
    }

    pub fn team(&self) -> &TeamTerms {
        &self.team
    }

    /// Total score: role terms in assignment order, then team terms.
    pub fn sum(&self) -> f64 {
        let total = self
            .roles
            .iter()
            .fold(0.0, |total, (_, terms)| terms.accumulate(total));
        self.team.accumulate(total)
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.roles.len() + 1))?;
        for (role, terms) in &self.roles {
            map.serialize_entry(role.as_str(), terms)?;
        }
        map.serialize_entry("team", &self.team)?;
        map.end()
    }
}
