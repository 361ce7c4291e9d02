//! Team-level terms computed over every assigned persona.

use std::collections::HashMap;

use crate::persona::{PersonaBundle, TraitCatalog};
use crate::profile::{CultureProfile, Level};

use super::compat::{enneagram_compatibility, mbti_compatibility};

/// Scale applied to each pair's MBTI + Enneagram compatibility
pub const PAIR_SYNERGY_WEIGHT: f64 = 0.4;
/// Cost of each duplicate MBTI code or Enneagram core
pub const DUPLICATE_PENALTY: f64 = 0.2;
/// Reward for a covered trait family
pub const FAMILY_PRESENT_BONUS: f64 = 0.2;
/// Cost of a trait family nobody covers
pub const FAMILY_MISSING_PENALTY: f64 = 0.4;

/// Sum over unordered pairs of 0.4 * (MBTI + Enneagram compatibility).
pub fn pair_synergy(members: &[&PersonaBundle]) -> f64 {
    let mut total = 0.0;
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            let pair = mbti_compatibility(a.mbti, b.mbti)
                + enneagram_compatibility(a.enneagram_core, b.enneagram_core);
            total += pair * PAIR_SYNERGY_WEIGHT;
        }
    }
    total
}

/// Penalty magnitude: 0.2 per repeat of an MBTI code plus 0.2 per repeat
/// of an Enneagram core. Zero when everything is distinct.
pub fn diversity_penalty(members: &[&PersonaBundle]) -> f64 {
    let mut mbti_counts = HashMap::new();
    let mut ennea_counts = HashMap::new();
    for bundle in members {
        *mbti_counts.entry(bundle.mbti).or_insert(0usize) += 1;
        *ennea_counts.entry(bundle.enneagram_core).or_insert(0usize) += 1;
    }

    (repeats(&mbti_counts) + repeats(&ennea_counts)) as f64 * DUPLICATE_PENALTY
}

/// Occurrences beyond the first, summed over every key.
fn repeats<K>(counts: &HashMap<K, usize>) -> usize {
    counts.values().map(|count| count.saturating_sub(1)).sum()
}

/// +0.2 for each covered trait family, -0.4 for each uncovered one.
pub fn coverage_bonus(catalog: &TraitCatalog, members: &[&PersonaBundle]) -> f64 {
    let tags: Vec<&str> = members
        .iter()
        .flat_map(|bundle| bundle.trait_tags.iter().map(String::as_str))
        .collect();

    catalog
        .families()
        .map(|(family, _)| {
            if catalog.covers(&tags, family) {
                FAMILY_PRESENT_BONUS
            } else {
                -FAMILY_MISSING_PENALTY
            }
        })
        .sum()
}

fn bonus_multiplier(emphasis: Level) -> f64 {
    match emphasis {
        Level::Low => 0.5,
        Level::Medium => 1.0,
        Level::High => 1.4,
    }
}

fn penalty_multiplier(emphasis: Level) -> f64 {
    match emphasis {
        Level::Low => 1.4,
        Level::Medium => 1.0,
        Level::High => 0.7,
    }
}

/// Pairwise conflict-style adjustment under the culture's tolerances.
pub fn conflict_adjustment(members: &[&PersonaBundle], culture: &CultureProfile) -> f64 {
    let bonus = bonus_multiplier(culture.conflict_emphasis);
    let penalty = penalty_multiplier(culture.conflict_emphasis);

    let mut adjust = 0.0;
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            let either = |tag: &str| a.has_tag(tag) || b.has_tag(tag);
            if culture.tolerance_for_conflict == Level::High && either("direct") {
                adjust += 0.05 * bonus;
            }
            if culture.tolerance_for_conflict == Level::Low && either("conflict-forward") {
                adjust -= 0.2 * penalty;
            }
            if culture.tolerance_for_burnout == Level::Low && either("intense") {
                adjust -= 0.15 * penalty;
            }
        }
    }
    adjust
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaLibrary;
    use crate::profile::CultureCard;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn library() -> PersonaLibrary {
        PersonaLibrary::standard(&TraitCatalog::standard()).unwrap()
    }

    fn pick<'a>(library: &'a PersonaLibrary, ids: &[&str]) -> Vec<&'a PersonaBundle> {
        ids.iter().map(|id| library.get(id).unwrap().as_ref()).collect()
    }

    #[test]
    fn test_diversity_penalty_zero_when_distinct() {
        let lib = library();
        let members = pick(&lib, &["CEO-Diplomat", "CFO-Analyst", "COO-Executor"]);
        assert_eq!(diversity_penalty(&members), 0.0);
    }

    #[test]
    fn test_diversity_penalty_counts_repeats() {
        let lib = library();
        // CEO-Architect, CFO-Analyst and CIO-Governor are all INTJ; Architect
        // and Governor share core 1
        let members = pick(&lib, &["CEO-Architect", "CFO-Analyst", "CIO-Governor"]);
        assert!(approx(diversity_penalty(&members), 0.6));
        assert!(diversity_penalty(&members) > 0.0);
    }

    #[test]
    fn test_repeats_over_any_key() {
        let by_code: HashMap<&str, usize> = [("INTJ", 3), ("ENFP", 1)].into_iter().collect();
        let by_core: HashMap<u8, usize> = [(1, 2), (5, 1)].into_iter().collect();
        assert_eq!(repeats(&by_code), 2);
        assert_eq!(repeats(&by_core), 1);
        assert_eq!(repeats(&HashMap::<u8, usize>::new()), 0);
    }

    #[test]
    fn test_coverage_bonus_range() {
        let lib = library();
        let catalog = TraitCatalog::standard();
        assert!(approx(coverage_bonus(&catalog, &[]), -1.6));

        let members = pick(&lib, &["CEO-Diplomat", "CFO-Guardian", "CTO-Explorer"]);
        assert!(approx(coverage_bonus(&catalog, &members), 0.8));
    }

    #[test]
    fn test_pair_synergy() {
        let lib = library();
        let members = pick(&lib, &["CEO-Strategist", "CFO-Guardian"]);
        // ENTJ/ISTJ: 0.25 + 0.2 + 0.2 + 0.1 = 0.75; 8/1: 0.15
        assert!(approx(pair_synergy(&members), 0.36));
        assert_eq!(pair_synergy(&members[..1]), 0.0);
    }

    #[test]
    fn test_conflict_adjustment_by_culture() {
        let lib = library();
        let members = pick(&lib, &["CEO-Strategist", "CFO-Guardian"]);

        let competitive = CultureCard::find("Competitive Drive").unwrap().profile;
        assert!(approx(conflict_adjustment(&members, &competitive), 0.05 * 1.4));

        let calm = CultureCard::find("Calm Craft").unwrap().profile;
        assert!(approx(conflict_adjustment(&members, &calm), -0.2 * 1.4));

        let neutral = CultureProfile::default();
        assert_eq!(conflict_adjustment(&members, &neutral), 0.0);
    }
}
