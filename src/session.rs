//! End-to-end onboarding session.
//!
//! A session answers file carries everything the interactive survey would
//! have collected. [`Session::run`] turns it into profiles, runs selection
//! and returns the chosen team together with the inputs that produced it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::logging::run_span;
use crate::lunar::BoundaryAnswer;
use crate::persona::{PersonaLibrary, Role, TraitCatalog};
use crate::profile::{
    AxisScores, ChallengePreference, CultureProfile, CultureSettings, HumanProfile, Position, VibeProfile,
};
use crate::scoring::Originality;
use crate::selection::{select_team, Assignment, RandomnessLevel, SelectionConfig, DEFAULT_BEAM_WIDTH};

// ─────────────────────────────────────────────────────────────────
// Session file
// ─────────────────────────────────────────────────────────────────

/// Birth date (quoted `"YYYY-MM-DD"`) and the optional answer to "were you
/// born before Chinese New Year?" for years the calendar does not cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BirthInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub boundary: Option<BoundaryAnswer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VibeInput {
    #[serde(default)]
    pub axes: AxisScores,
    #[serde(default)]
    pub challenge_preference: ChallengePreference,
}

/// Raw 1-5 Likert answers in question order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyAnswers {
    pub mbti: Vec<u8>,
    pub enneagram: Vec<u8>,
}

/// Parsed session answers file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionInput {
    #[serde(default)]
    pub position: Position,
    /// Role order; the default order when unset
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
    #[serde(default)]
    pub randomness: Option<RandomnessLevel>,
    /// Unknown values fall back to balanced
    #[serde(default)]
    pub originality: Option<String>,
    #[serde(default)]
    pub seed: Option<String>,
    pub birth: BirthInput,
    #[serde(default)]
    pub vibe: VibeInput,
    #[serde(default)]
    pub culture: CultureSettings,
    pub answers: SurveyAnswers,
}

impl SessionInput {
    /// Roles in selection order.
    ///
    /// Default: CEO through CXA, then Chairman unless the acting human
    /// already holds that seat.
    pub fn role_order(&self) -> Result<Vec<Role>> {
        let roles = match &self.roles {
            Some(roles) => roles.clone(),
            None => default_role_order(self.position),
        };
        if roles.is_empty() {
            return Err(Error::invalid_profile("roles", "at least one role is required"));
        }
        for (i, role) in roles.iter().enumerate() {
            if roles[..i].contains(role) {
                return Err(Error::DuplicateRole { role: *role });
            }
        }
        Ok(roles)
    }

    fn settings(&self) -> RunSettings {
        let originality = self.originality.as_deref().map(|value| {
            let parsed = Originality::parse_or_default(value);
            if value.parse::<Originality>().is_err() {
                warn!(value, fallback = %parsed, "Unknown originality preference");
            }
            parsed
        });
        RunSettings {
            seed: self.seed.clone(),
            randomness: self.randomness,
            originality,
            beam_width: None,
        }
    }
}

/// CEO through CXA, with Chairman appended unless `position` is Chairman.
pub fn default_role_order(position: Position) -> Vec<Role> {
    let mut roles = Role::executive_order().to_vec();
    if position != Position::Chairman {
        roles.push(Role::Chairman);
    }
    roles
}

// ─────────────────────────────────────────────────────────────────
// Run settings
// ─────────────────────────────────────────────────────────────────

/// Selection knobs that can come from the CLI, the session file or the
/// config file. Unset fields defer to the next layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSettings {
    pub seed: Option<String>,
    pub randomness: Option<RandomnessLevel>,
    pub originality: Option<Originality>,
    pub beam_width: Option<usize>,
}

impl RunSettings {
    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: RunSettings) -> RunSettings {
        RunSettings {
            seed: self.seed.or(fallback.seed),
            randomness: self.randomness.or(fallback.randomness),
            originality: self.originality.or(fallback.originality),
            beam_width: self.beam_width.or(fallback.beam_width),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub seed_label: String,
    pub randomness: RandomnessLevel,
    pub originality: Originality,
    pub position: Position,
    pub roles: Vec<Role>,
    pub human: HumanProfile,
    pub vibe: VibeProfile,
    pub culture: CultureProfile,
    pub assignment: Assignment,
}

#[derive(Debug, Clone)]
pub struct Session {
    input: SessionInput,
    source: Option<PathBuf>,
}

impl Session {
    pub fn new(input: SessionInput) -> Self {
        Self { input, source: None }
    }

    /// Read and parse a session answers file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let input: SessionInput = toml::from_str(&content).map_err(|e| Error::SessionParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        debug!(path = %path.display(), "Session file loaded");
        Ok(Self {
            input,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn input(&self) -> &SessionInput {
        &self.input
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Build profiles and select a team.
    ///
    /// Settings resolve as `cli`, then the session file, then `defaults`.
    pub fn run(
        &self,
        library: &PersonaLibrary,
        catalog: &TraitCatalog,
        cli: &RunSettings,
        defaults: &RunSettings,
    ) -> Result<SessionOutcome> {
        let input = &self.input;
        let roles = input.role_order()?;
        let settings = cli.clone().or(input.settings()).or(defaults.clone());

        let human = HumanProfile::from_answers(
            &input.answers.mbti,
            &input.answers.enneagram,
            input.birth.date,
            input.birth.boundary,
        )?;
        let vibe = VibeProfile::synthesize(input.vibe.axes, input.vibe.challenge_preference);
        let culture = input.culture.resolve()?;
        debug!(
            mbti = %human.mbti_summary(),
            enneagram = %human.enneagram_summary(),
            culture = %culture.summary(),
            "Profiles built"
        );

        let randomness = settings.randomness.unwrap_or_default();
        let originality = settings.originality.unwrap_or_default();
        let mut config = SelectionConfig::new(randomness, originality, settings.seed.as_deref())
            .with_beam_width(settings.beam_width.unwrap_or(DEFAULT_BEAM_WIDTH));
        let _span = run_span(config.seed_label()).entered();
        let context = config.context(catalog, &culture, &vibe, &human, input.position);
        let assignment = select_team(&roles, library, context, &mut config)?;

        info!(
            position = %input.position,
            score = assignment.score(),
            "Session complete"
        );

        Ok(SessionOutcome {
            seed_label: config.seed_label().to_string(),
            randomness,
            originality,
            position: input.position,
            roles,
            human,
            vibe,
            culture,
            assignment,
        })
    }
}
