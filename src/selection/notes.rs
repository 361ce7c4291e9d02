//! Human-readable rationale for each placement.

use crate::persona::{PersonaBundle, Role};
use crate::profile::Position;
use crate::scoring::{ceo_vibe_match, human_ceo_compatibility, ScoringContext};

/// Tags that earn a named mention, with their phrase
const TAG_NOTES: [(&str, &str); 3] = [
    ("integrator", "integrator buffer"),
    ("governance", "governance anchor"),
    ("innovator", "innovation lift"),
];

/// Why this candidate holds this role, e.g.
/// `role fit 0.86; culture 0.30; governance anchor`.
pub fn rationale(role: Role, candidate: &PersonaBundle, ctx: &ScoringContext<'_>) -> String {
    let mut parts = vec![
        format!("role fit {:.2}", candidate.role_fit_weight),
        format!("culture {:.2}", candidate.culture_fit.get(ctx.culture.culture_mode)),
    ];

    if role == Role::Ceo {
        let vibe = ceo_vibe_match(ctx.catalog, candidate, ctx.vibe);
        parts.push(format!("vibe score {:.2}", vibe.score));
        parts.push(format!("human match {:.2}", human_ceo_compatibility(ctx.human, candidate)));
        parts.push(format!("originality {}", ctx.originality));
        if ctx.position == Position::Chairman {
            parts.push("chairman priority".to_string());
        }
    }

    for (tag, phrase) in TAG_NOTES {
        if candidate.has_tag(tag) {
            parts.push(phrase.to_string());
        }
    }

    parts.join("; ")
}
