//! Compatibility scoring engine
//!
//! Scores a (partial or complete) role assignment against the culture, the
//! CEO vibe target and the acting human. Scoring is pure: the same members
//! and context always produce the same [`Breakdown`].

pub mod breakdown;
pub mod compat;
pub mod team;

use std::sync::Arc;

use tracing::trace;

use crate::persona::{PersonaBundle, Role, TraitCatalog};
use crate::profile::{CultureProfile, HumanProfile, Position, VibeProfile};

pub use breakdown::{Breakdown, CeoTerms, RoleTerms, TeamTerms, VIBE_GATE_PASSED, VIBE_GATE_PENALTY};
pub use compat::{
    ceo_vibe_match, enneagram_compatibility, human_ceo_compatibility, mbti_compatibility,
    originality_bonus, pleasantness_gate, Originality, VibeMatch,
};
pub use team::{conflict_adjustment, coverage_bonus, diversity_penalty, pair_synergy};

/// Multiplier on raw human/CEO compatibility
pub const HUMAN_CEO_WEIGHT: f64 = 2.5;
/// Extra multiplier when the acting human is the Chairman
pub const CHAIRMAN_CEO_WEIGHT: f64 = 1.5;

/// Everything scoring reads besides the members themselves.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub catalog: &'a TraitCatalog,
    pub culture: &'a CultureProfile,
    pub vibe: &'a VibeProfile,
    pub human: &'a HumanProfile,
    pub position: Position,
    pub originality: Originality,
}

impl<'a> ScoringContext<'a> {
    /// Whether a CEO candidate survives the pleasantness gate.
    pub fn ceo_passes(&self, candidate: &PersonaBundle) -> bool {
        ceo_vibe_match(self.catalog, candidate, self.vibe).passed
    }

    /// Terms for a single assigned role.
    pub fn role_terms(&self, role: Role, bundle: &PersonaBundle) -> RoleTerms {
        let ceo = (role == Role::Ceo).then(|| self.ceo_terms(bundle));
        RoleTerms {
            role_fit_weight: bundle.role_fit_weight,
            culture_fit: bundle.culture_fit.get(self.culture.culture_mode),
            ceo,
        }
    }

    fn ceo_terms(&self, bundle: &PersonaBundle) -> CeoTerms {
        let vibe = ceo_vibe_match(self.catalog, bundle, self.vibe);
        let compatibility = human_ceo_compatibility(self.human, bundle);
        CeoTerms {
            vibe_gate: if vibe.passed { VIBE_GATE_PASSED } else { 0.0 },
            vibe_gate_penalty: if vibe.passed { 0.0 } else { VIBE_GATE_PENALTY },
            vibe_match_score: vibe.score,
            human_ceo_bonus: compatibility * HUMAN_CEO_WEIGHT,
            ceo_originality_bonus: originality_bonus(compatibility, self.originality),
            chairman_ceo_bonus: (self.position == Position::Chairman)
                .then_some(compatibility * CHAIRMAN_CEO_WEIGHT),
        }
    }

    /// Full breakdown for an assignment's members, in assignment order.
    pub fn score(&self, members: &[(Role, Arc<PersonaBundle>)]) -> Breakdown {
        let roles = members
            .iter()
            .map(|(role, bundle)| (*role, self.role_terms(*role, bundle)))
            .collect();

        let bundles: Vec<&PersonaBundle> = members.iter().map(|(_, bundle)| bundle.as_ref()).collect();
        let team = TeamTerms {
            pair_synergy: pair_synergy(&bundles),
            diversity_penalty: diversity_penalty(&bundles),
            coverage_bonus: coverage_bonus(self.catalog, &bundles),
            conflict_adjustment: conflict_adjustment(&bundles, self.culture),
        };

        let breakdown = Breakdown::new(roles, team);
        trace!(members = members.len(), total = breakdown.sum(), "Scored assignment");
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunar::{ChineseZodiac, WesternZodiac};
    use crate::persona::PersonaLibrary;
    use crate::profile::{AxisScores, ChallengePreference, CultureCard, VibeAxis};

    struct Fixture {
        catalog: TraitCatalog,
        library: PersonaLibrary,
        culture: CultureProfile,
        vibe: VibeProfile,
        human: HumanProfile,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = TraitCatalog::standard();
            let library = PersonaLibrary::standard(&catalog).unwrap();
            let axes = AxisScores::uniform(3)
                .with(VibeAxis::Directness, 5)
                .with(VibeAxis::Conflict, 5)
                .with(VibeAxis::Decisiveness, 5);
            Self {
                catalog,
                library,
                culture: CultureCard::find("Competitive Drive").unwrap().profile,
                vibe: VibeProfile::synthesize(axes, ChallengePreference::Balanced),
                human: HumanProfile::with_types(
                    "INTJ".parse().unwrap(),
                    5,
                    WesternZodiac::Leo,
                    ChineseZodiac::Unknown,
                ),
            }
        }

        fn context(&self, position: Position) -> ScoringContext<'_> {
            ScoringContext {
                catalog: &self.catalog,
                culture: &self.culture,
                vibe: &self.vibe,
                human: &self.human,
                position,
                originality: Originality::Balanced,
            }
        }

        fn members(&self, ids: &[(Role, &str)]) -> Vec<(Role, Arc<PersonaBundle>)> {
            ids.iter()
                .map(|(role, id)| (*role, Arc::clone(self.library.get(id).unwrap())))
                .collect()
        }
    }

    #[test]
    fn test_reference_team_total() {
        let fx = Fixture::new();
        let members = fx.members(&[(Role::Ceo, "CEO-Strategist"), (Role::Cfo, "CFO-Guardian")]);
        let breakdown = fx.context(Position::Ceo).score(&members);

        assert!((breakdown.sum() - 4.815).abs() < 1e-9);
        let ceo = breakdown.role(Role::Ceo).unwrap().ceo.unwrap();
        assert_eq!(ceo.vibe_gate, 1.0);
        assert!((ceo.human_ceo_bonus - 1.375).abs() < 1e-9);
        assert!((ceo.ceo_originality_bonus + 0.05).abs() < 1e-9);
        assert!(ceo.chairman_ceo_bonus.is_none());
    }

    #[test]
    fn test_chairman_bonus() {
        let fx = Fixture::new();
        let members = fx.members(&[(Role::Ceo, "CEO-Strategist"), (Role::Cfo, "CFO-Guardian")]);
        let breakdown = fx.context(Position::Chairman).score(&members);
        let ceo = breakdown.role(Role::Ceo).unwrap().ceo.unwrap();
        assert!((ceo.chairman_ceo_bonus.unwrap() - 0.825).abs() < 1e-9);
        assert!((breakdown.sum() - 5.64).abs() < 1e-9);
    }

    #[test]
    fn test_failing_ceo_scored_directly_is_penalized() {
        let fx = Fixture::new();
        let warm = VibeProfile::synthesize(AxisScores::uniform(4), ChallengePreference::Balanced);
        let ctx = ScoringContext { vibe: &warm, ..fx.context(Position::Other) };
        let strategist = fx.library.get("CEO-Strategist").unwrap();
        assert!(!ctx.ceo_passes(strategist));

        let terms = ctx.role_terms(Role::Ceo, strategist).ceo.unwrap();
        assert_eq!(terms.vibe_gate, 0.0);
        assert_eq!(terms.vibe_gate_penalty, VIBE_GATE_PENALTY);
        assert_eq!(terms.vibe_match_score, 0.0);
    }

    #[test]
    fn test_scoring_is_deterministic_and_order_independent_in_total() {
        let fx = Fixture::new();
        let ctx = fx.context(Position::Other);
        let forward = fx.members(&[
            (Role::Ceo, "CEO-Diplomat"),
            (Role::Cfo, "CFO-Analyst"),
            (Role::Cto, "CTO-Explorer"),
        ]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let first = ctx.score(&forward);
        assert_eq!(first, ctx.score(&forward));
        assert_eq!(first.sum().to_bits(), ctx.score(&forward).sum().to_bits());
        assert!((first.sum() - ctx.score(&reversed).sum()).abs() < 1e-9);
    }

    #[test]
    fn test_non_ceo_roles_have_no_ceo_terms() {
        let fx = Fixture::new();
        let members = fx.members(&[(Role::Cfo, "CFO-Guardian"), (Role::Chairman, "Chairman-Steward")]);
        let breakdown = fx.context(Position::Chairman).score(&members);
        assert!(breakdown.roles().all(|(_, terms)| terms.ceo.is_none()));
    }
}
