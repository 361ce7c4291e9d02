//! Bounded-width beam search over the role sequence.

use std::cmp::Ordering;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::persona::{PersonaLibrary, Role};
use crate::scoring::ScoringContext;

use super::assignment::Assignment;

/// Assignments kept after each step unless configured otherwise
pub const DEFAULT_BEAM_WIDTH: usize = 8;

/// Extends partial assignments one role at a time, keeping the best
/// `beam_width` after every step.
pub struct BeamSearch<'a> {
    library: &'a PersonaLibrary,
    context: ScoringContext<'a>,
    beam_width: usize,
}

impl<'a> BeamSearch<'a> {
    pub fn new(library: &'a PersonaLibrary, context: ScoringContext<'a>) -> Self {
        Self {
            library,
            context,
            beam_width: DEFAULT_BEAM_WIDTH,
        }
    }

    /// Width below 1 is treated as 1.
    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width.max(1);
        self
    }

    pub fn beam_width(&self) -> usize {
        self.beam_width
    }

    /// Run every step and return the terminal beam, best first.
    ///
    /// With `jitter > 0` each extension draws one uniform perturbation in
    /// `[-jitter, jitter]` that affects sort order only; stored scores are
    /// never perturbed.
    pub fn run<R: Rng + ?Sized>(&self, roles: &[Role], jitter: f64, rng: &mut R) -> Result<Vec<Assignment>> {
        let mut beam = vec![Assignment::empty()];

        for (step, &role) in roles.iter().enumerate() {
            let candidates = self.library.candidates(role);
            if candidates.is_empty() {
                return Err(Error::NoCandidates { role, step });
            }

            let eligible: Vec<_> = if role == Role::Ceo {
                candidates
                    .iter()
                    .filter(|candidate| {
                        let passed = self.context.ceo_passes(candidate);
                        if !passed {
                            warn!(persona = %candidate.persona_id, "CEO candidate vetoed by pleasantness gate");
                        }
                        passed
                    })
                    .collect()
            } else {
                candidates.iter().collect()
            };
            if eligible.is_empty() {
                return Err(Error::VetoExhausted { role, step });
            }

            let mut extended = Vec::with_capacity(beam.len() * eligible.len());
            for assignment in &beam {
                for &candidate in &eligible {
                    let next = assignment.extend(role, Arc::clone(candidate), &self.context)?;
                    let key = if jitter > 0.0 {
                        next.score() + rng.gen_range(-jitter..=jitter)
                    } else {
                        next.score()
                    };
                    extended.push((key, next));
                }
            }

            extended.sort_by(|(key_a, a), (key_b, b)| descending(*key_a, a, *key_b, b));
            extended.truncate(self.beam_width);
            beam = extended.into_iter().map(|(_, assignment)| assignment).collect();

            debug!(
                step,
                role = %role,
                kept = beam.len(),
                best = ?beam.first().map(Assignment::score),
                "Beam step complete"
            );
        }

        Ok(beam)
    }
}

/// Higher key first; equal keys by the just-placed persona id, higher first.
fn descending(key_a: f64, a: &Assignment, key_b: f64, b: &Assignment) -> Ordering {
    fn id(assignment: &Assignment) -> &str {
        assignment.last().map_or("", |(_, bundle)| bundle.persona_id.as_str())
    }
    key_b.total_cmp(&key_a).then_with(|| id(b).cmp(&id(a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunar::{ChineseZodiac, WesternZodiac};
    use crate::persona::{PersonaBundle, TraitCatalog};
    use crate::profile::{
        AxisScores, ChallengePreference, CultureCard, CultureProfile, HumanProfile, Position, VibeAxis,
        VibeProfile,
    };
    use crate::scoring::Originality;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Inputs {
        catalog: TraitCatalog,
        library: PersonaLibrary,
        culture: CultureProfile,
        vibe: VibeProfile,
        human: HumanProfile,
    }

    fn inputs(axes: AxisScores) -> Inputs {
        let catalog = TraitCatalog::standard();
        Inputs {
            library: PersonaLibrary::standard(&catalog).unwrap(),
            catalog,
            culture: CultureCard::find("Competitive Drive").unwrap().profile,
            vibe: VibeProfile::synthesize(axes, ChallengePreference::Balanced),
            human: HumanProfile::with_types("INTJ".parse().unwrap(), 5, WesternZodiac::Leo, ChineseZodiac::Unknown),
        }
    }

    fn context(inputs: &Inputs) -> ScoringContext<'_> {
        ScoringContext {
            catalog: &inputs.catalog,
            culture: &inputs.culture,
            vibe: &inputs.vibe,
            human: &inputs.human,
            position: Position::Ceo,
            originality: Originality::Balanced,
        }
    }

    #[test]
    fn test_beam_bounded_and_sorted() {
        let inputs = inputs(AxisScores::default());
        let search = BeamSearch::new(&inputs.library, context(&inputs)).with_beam_width(4);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let beam = search
            .run(&[Role::Ceo, Role::Cfo, Role::Coo], 0.0, &mut rng)
            .unwrap();

        assert_eq!(beam.len(), 4);
        assert!(beam.windows(2).all(|w| w[0].score() >= w[1].score()));
        for assignment in &beam {
            assert_eq!(assignment.len(), 3);
            assert!((assignment.score() - assignment.breakdown().sum()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_veto_prunes_before_extension() {
        let inputs = inputs(AxisScores::uniform(4).with(VibeAxis::Conflict, 5));
        let search = BeamSearch::new(&inputs.library, context(&inputs));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let beam = search.run(&[Role::Ceo], 0.0, &mut rng).unwrap();

        // Only the diplomat clears a warm pleasantness target
        assert_eq!(beam.len(), 1);
        assert_eq!(beam[0].persona(Role::Ceo).unwrap().persona_id, "CEO-Diplomat");
    }

    #[test]
    fn test_veto_exhausted_reports_step() {
        let catalog = TraitCatalog::standard();
        let library = PersonaLibrary::standard(&catalog).unwrap();
        let cold_only: Vec<PersonaBundle> = library
            .iter()
            .filter(|b| b.persona_id != "CEO-Diplomat")
            .map(|b| b.as_ref().clone())
            .collect();
        let library = PersonaLibrary::from_bundles(cold_only);

        let inputs = inputs(AxisScores::uniform(5));
        let search = BeamSearch::new(&library, context(&inputs));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = search.run(&[Role::Cfo, Role::Ceo], 0.0, &mut rng).unwrap_err();
        assert!(matches!(err, Error::VetoExhausted { role: Role::Ceo, step: 1 }));
    }

    #[test]
    fn test_missing_role_fails_fast() {
        let catalog = TraitCatalog::standard();
        let full = PersonaLibrary::standard(&catalog).unwrap();
        let library = PersonaLibrary::from_bundles(
            full.iter().filter(|b| b.role != Role::Cto).map(|b| b.as_ref().clone()),
        );

        let inputs = inputs(AxisScores::default());
        let search = BeamSearch::new(&library, context(&inputs));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = search
            .run(&[Role::Ceo, Role::Cfo, Role::Cto], 0.0, &mut rng)
            .unwrap_err();
        assert_eq!(err.failed_step(), Some((Role::Cto, 2)));
        assert!(matches!(err, Error::NoCandidates { .. }));
    }

    #[test]
    fn test_jitter_reproducible_with_seed() {
        let inputs = inputs(AxisScores::default());
        let search = BeamSearch::new(&inputs.library, context(&inputs));
        let roles = Role::executive_order();

        let ids = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            search
                .run(roles, 0.12, &mut rng)
                .unwrap()
                .iter()
                .map(|a| a.members().iter().map(|(_, b)| b.persona_id.clone()).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(99), ids(99));
    }

    #[test]
    fn test_equal_scores_break_ties_by_persona_id_descending() {
        let catalog = TraitCatalog::standard();
        let full = PersonaLibrary::standard(&catalog).unwrap();
        let mut twin = full.get("CFO-Guardian").unwrap().as_ref().clone();
        twin.persona_id = "CFO-Zeta".to_string();
        let library = PersonaLibrary::from_bundles(vec![full.get("CFO-Guardian").unwrap().as_ref().clone(), twin]);

        let inputs = inputs(AxisScores::default());
        let search = BeamSearch::new(&library, context(&inputs));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let beam = search.run(&[Role::Cfo], 0.0, &mut rng).unwrap();
        assert_eq!(beam[0].persona(Role::Cfo).unwrap().persona_id, "CFO-Zeta");
        assert_eq!(beam[1].persona(Role::Cfo).unwrap().persona_id, "CFO-Guardian");
    }
}
