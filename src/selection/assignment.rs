//! Immutable role assignments built by extension.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::persona::{PersonaBundle, Role};
use crate::scoring::{Breakdown, ScoringContext};

use super::notes::rationale;

/// A role→persona mapping with its score, breakdown and rationale.
///
/// Never mutated after construction; [`Assignment::extend`] returns a new
/// value so sibling beam branches sharing a prefix stay independent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignment {
    members: Vec<(Role, Arc<PersonaBundle>)>,
    score: f64,
    breakdown: Breakdown,
    notes: BTreeMap<Role, String>,
}

impl Assignment {
    /// The beam's initial state: no roles, score 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy of this assignment with `candidate` placed in `role`, fully
    /// rescored.
    pub fn extend(&self, role: Role, candidate: Arc<PersonaBundle>, ctx: &ScoringContext<'_>) -> Result<Self> {
        if self.persona(role).is_some() {
            return Err(Error::DuplicateRole { role });
        }

        let mut notes = self.notes.clone();
        notes.insert(role, rationale(role, &candidate, ctx));

        let mut members = Vec::with_capacity(self.members.len() + 1);
        members.extend(self.members.iter().cloned());
        members.push((role, candidate));

        let breakdown = ctx.score(&members);
        Ok(Self {
            score: breakdown.sum(),
            members,
            breakdown,
            notes,
        })
    }

    pub fn members(&self) -> &[(Role, Arc<PersonaBundle>)] {
        &self.members
    }

    pub fn persona(&self, role: Role) -> Option<&Arc<PersonaBundle>> {
        self.members.iter().find(|(r, _)| *r == role).map(|(_, bundle)| bundle)
    }

    /// Most recently placed member.
    pub fn last(&self) -> Option<&(Role, Arc<PersonaBundle>)> {
        self.members.last()
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.members.iter().map(|(role, _)| *role)
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn breakdown(&self) -> &Breakdown {
        &self.breakdown
    }

    pub fn note(&self, role: Role) -> Option<&str> {
        self.notes.get(&role).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

struct MembersView<'a>(&'a [(Role, Arc<PersonaBundle>)]);

impl Serialize for MembersView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (role, bundle) in self.0 {
            map.serialize_entry(role.as_str(), bundle.as_ref())?;
        }
        map.end()
    }
}

impl Serialize for Assignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Assignment", 4)?;
        state.serialize_field("score", &self.score)?;
        state.serialize_field("roles", &MembersView(&self.members))?;
        state.serialize_field("breakdown", &self.breakdown)?;
        state.serialize_field("notes", &self.notes)?;
        state.end()
    }
}
