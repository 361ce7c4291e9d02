//! Persona catalog: executive roles, candidate bundles and the trait-tag
//! tables that derive culture fit and vibe axes from tags.

pub mod library;
pub mod tags;
pub mod types;

pub use library::PersonaLibrary;
pub use tags::{CoverageFamily, TraitCatalog};
pub use types::{CultureFit, CultureMode, MbtiAxis, MbtiType, PersonaBundle, Role};
