//! csuite-onboard
//!
//! Executive persona assignment for simulated company onboarding: pure lunar
//! calendar and zodiac math, survey-driven personality inference, a
//! multi-term compatibility scorer and a seeded beam-search team selector.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod lunar;
pub mod persona;
pub mod profile;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod version;

pub use error::{Error, ErrorCode, Result};
pub use persona::{PersonaBundle, PersonaLibrary, Role, TraitCatalog};
pub use selection::{select_team, Assignment, RandomnessLevel, SelectionConfig};
pub use session::{RunSettings, Session, SessionInput, SessionOutcome};
