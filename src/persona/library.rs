//! Persona library: load, validate and index the candidate catalog.
//!
//! The standard catalog is bundled into the binary. An alternative catalog
//! in the same TOML shape can be loaded from disk.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::lunar::WesternZodiac;

use super::tags::TraitCatalog;
use super::types::{MbtiType, PersonaBundle, Role};

/// Catalog shipped with the binary
pub const BUNDLED_CATALOG: &str = include_str!("../../config/personas.toml");

// ─────────────────────────────────────────────────────────────────
// Catalog file format
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    persona: Vec<PersonaRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersonaRecord {
    id: String,
    role: String,
    enneagram: u8,
    wing: String,
    mbti: String,
    western_zodiac: String,
    chinese_zodiac: String,
    #[serde(default)]
    tags: Vec<String>,
    weight: f64,
}

impl PersonaRecord {
    fn into_bundle(self, catalog: &TraitCatalog) -> Result<PersonaBundle> {
        let context = |message: String| Error::library_invalid(format!("persona '{}': {}", self.id, message));

        if self.id.trim().is_empty() {
            return Err(Error::library_invalid("persona id must not be empty"));
        }
        let role: Role = self.role.parse().map_err(|e: Error| context(e.to_string()))?;
        if !(1..=9).contains(&self.enneagram) {
            return Err(context(format!("enneagram core {} is outside 1-9", self.enneagram)));
        }
        let mbti: MbtiType = self.mbti.parse().map_err(|e: Error| context(e.to_string()))?;
        let western_zodiac: WesternZodiac = self
            .western_zodiac
            .parse()
            .map_err(|e: Error| context(e.to_string()))?;
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(context(format!("weight {} is outside [0, 1]", self.weight)));
        }

        let culture_fit = catalog.culture_fit(&self.tags);
        Ok(PersonaBundle {
            persona_id: self.id,
            role,
            enneagram_core: self.enneagram,
            wing: self.wing,
            mbti,
            western_zodiac,
            chinese_zodiac: self.chinese_zodiac,
            trait_tags: self.tags,
            role_fit_weight: self.weight,
            culture_fit,
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Library
// ─────────────────────────────────────────────────────────────────

/// Role-indexed, read-only candidate catalog.
#[derive(Debug, Clone, Default)]
pub struct PersonaLibrary {
    by_role: BTreeMap<Role, Vec<Arc<PersonaBundle>>>,
}

impl PersonaLibrary {
    /// The bundled standard catalog.
    pub fn standard(catalog: &TraitCatalog) -> Result<Self> {
        Self::from_toml_str(BUNDLED_CATALOG, catalog)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path, catalog: &TraitCatalog) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let library = Self::from_toml_str(&content, catalog)?;
        info!(path = %path.display(), personas = library.len(), "Loaded persona library");
        Ok(library)
    }

    /// Parse and validate a catalog. Culture fit is derived here, once.
    pub fn from_toml_str(content: &str, catalog: &TraitCatalog) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::library_invalid(format!("Failed to parse TOML: {}", e)))?;

        let mut seen = HashSet::new();
        let mut by_role: BTreeMap<Role, Vec<Arc<PersonaBundle>>> = BTreeMap::new();
        for record in file.persona {
            if !seen.insert(record.id.clone()) {
                return Err(Error::library_invalid(format!("duplicate persona id '{}'", record.id)));
            }
            let bundle = record.into_bundle(catalog)?;
            by_role.entry(bundle.role).or_default().push(Arc::new(bundle));
        }

        debug!(roles = by_role.len(), personas = seen.len(), "Built persona library");
        Ok(Self { by_role })
    }

    /// Build directly from bundles, e.g. for a reduced test catalog.
    pub fn from_bundles(bundles: impl IntoIterator<Item = PersonaBundle>) -> Self {
        let mut by_role: BTreeMap<Role, Vec<Arc<PersonaBundle>>> = BTreeMap::new();
        for bundle in bundles {
            by_role.entry(bundle.role).or_default().push(Arc::new(bundle));
        }
        Self { by_role }
    }

    /// Candidates for a role in catalog order; empty when none exist.
    pub fn candidates(&self, role: Role) -> &[Arc<PersonaBundle>] {
        self.by_role.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a persona by id.
    pub fn get(&self, persona_id: &str) -> Option<&Arc<PersonaBundle>> {
        self.iter().find(|bundle| bundle.persona_id == persona_id)
    }

    /// All personas, grouped by role in role order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PersonaBundle>> {
        self.by_role.values().flatten()
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.by_role.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_role.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the bundled catalog to `path` as a starting point for edits.
    pub fn export_bundled(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        fs::write(path, BUNDLED_CATALOG).map_err(|e| Error::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(path = %path.display(), "Persona catalog exported");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
