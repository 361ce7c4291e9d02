//! Team selection
//!
//! Beam search over the role order followed by a seeded softmax draw from
//! the best few complete assignments. The session generator inside
//! [`SelectionConfig`] is the only source of randomness and is threaded
//! through both steps.

pub mod assignment;
pub mod beam;
pub mod notes;
pub mod sampling;

use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::error::{Error, Result};
use crate::persona::{PersonaLibrary, Role, TraitCatalog};
use crate::profile::{CultureProfile, HumanProfile, Position, VibeProfile};
use crate::scoring::{Originality, ScoringContext};

pub use assignment::Assignment;
pub use beam::{BeamSearch, DEFAULT_BEAM_WIDTH};
pub use notes::rationale;
pub use sampling::{auto_seed_label, build_rng, seed_from_label, softmax_sample, RandomnessLevel, Tuning};

/// Randomness, originality, the session generator and its audit label.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub randomness: RandomnessLevel,
    pub originality: Originality,
    pub beam_width: usize,
    seed_label: String,
    rng: ChaCha8Rng,
}

impl SelectionConfig {
    /// Seed from `seed_label`, or from a fresh label when it is missing or
    /// blank.
    pub fn new(randomness: RandomnessLevel, originality: Originality, seed_label: Option<&str>) -> Self {
        let (rng, seed_label) = build_rng(seed_label);
        Self {
            randomness,
            originality,
            beam_width: DEFAULT_BEAM_WIDTH,
            seed_label,
            rng,
        }
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    /// Label that reproduces this run.
    pub fn seed_label(&self) -> &str {
        &self.seed_label
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Scoring context for these profiles under this config's originality.
    pub fn context<'a>(
        &self,
        catalog: &'a TraitCatalog,
        culture: &'a CultureProfile,
        vibe: &'a VibeProfile,
        human: &'a HumanProfile,
        position: Position,
    ) -> ScoringContext<'a> {
        ScoringContext {
            catalog,
            culture,
            vibe,
            human,
            position,
            originality: self.originality,
        }
    }
}

/// Run beam search over `roles` and finalize one complete assignment.
pub fn select_team(
    roles: &[Role],
    library: &PersonaLibrary,
    context: ScoringContext<'_>,
    config: &mut SelectionConfig,
) -> Result<Assignment> {
    let tuning = config.randomness.tuning();
    let search = BeamSearch::new(library, context).with_beam_width(config.beam_width);
    let beam = search.run(roles, tuning.jitter, &mut config.rng)?;

    let chosen = finalize(beam, tuning, &mut config.rng)?;
    info!(
        seed = %config.seed_label,
        randomness = %config.randomness,
        score = chosen.score(),
        roles = chosen.len(),
        "Team selected"
    );
    Ok(chosen)
}

/// Top assignment when the pool or beam holds one; otherwise a softmax draw
/// over the first `pool_size`.
fn finalize(mut beam: Vec<Assignment>, tuning: Tuning, rng: &mut ChaCha8Rng) -> Result<Assignment> {
    if beam.is_empty() {
        return Err(Error::EmptyBeam);
    }
    if tuning.pool_size <= 1 || beam.len() <= 1 {
        return Ok(beam.swap_remove(0));
    }

    beam.truncate(tuning.pool_size);
    let chosen = softmax_sample(&beam, Assignment::score, tuning.temperature, rng)?;
    Ok(chosen.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunar::{ChineseZodiac, WesternZodiac};
    use crate::profile::{AxisScores, ChallengePreference, CultureCard, VibeAxis};

    fn direct_vibe() -> VibeProfile {
        VibeProfile::synthesize(
            AxisScores::uniform(3)
                .with(VibeAxis::Directness, 5)
                .with(VibeAxis::Conflict, 5)
                .with(VibeAxis::Decisiveness, 5),
            ChallengePreference::Balanced,
        )
    }

    fn ids(assignment: &Assignment) -> Vec<String> {
        assignment.members().iter().map(|(_, b)| b.persona_id.clone()).collect()
    }

    #[test]
    fn test_low_randomness_is_deterministic_top() {
        let catalog = TraitCatalog::standard();
        let library = PersonaLibrary::standard(&catalog).unwrap();
        let culture = CultureCard::find("Competitive Drive").unwrap().profile;
        let vibe = direct_vibe();
        let human = HumanProfile::with_types("INTJ".parse().unwrap(), 5, WesternZodiac::Leo, ChineseZodiac::Unknown);

        let mut config = SelectionConfig::new(RandomnessLevel::Low, Originality::Balanced, Some("any"));
        let ctx = config.context(&catalog, &culture, &vibe, &human, Position::Ceo);
        let team = select_team(&[Role::Ceo, Role::Cfo], &library, ctx, &mut config).unwrap();

        assert_eq!(ids(&team), vec!["CEO-Strategist", "CFO-Guardian"]);
        assert!((team.score() - 4.815).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_team_at_high_randomness() {
        let catalog = TraitCatalog::standard();
        let library = PersonaLibrary::standard(&catalog).unwrap();
        let culture = CultureProfile::default();
        let vibe = VibeProfile::synthesize(AxisScores::default(), ChallengePreference::Balanced);
        let human = HumanProfile::with_types("ESFJ".parse().unwrap(), 2, WesternZodiac::Cancer, ChineseZodiac::Unknown);

        let run = |label: &str| {
            let mut config = SelectionConfig::new(RandomnessLevel::High, Originality::Bold, Some(label));
            let ctx = config.context(&catalog, &culture, &vibe, &human, Position::Other);
            let team = select_team(Role::executive_order(), &library, ctx, &mut config).unwrap();
            (ids(&team), team.score().to_bits())
        };
        assert_eq!(run("board-retreat"), run("board-retreat"));
    }

    #[test]
    fn test_finalize_empty_beam() {
        let mut rng = build_rng(Some("x")).0;
        let err = finalize(Vec::new(), RandomnessLevel::High.tuning(), &mut rng).unwrap_err();
        assert!(matches!(err, Error::EmptyBeam));
    }
}
