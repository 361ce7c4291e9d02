//! Build information embedded by `build.rs`.
//!
//! A seed label only reproduces a team on the same catalog and scoring
//! rules, so reports carry [`BuildInfo::stamp`]: the package version, the
//! commit and a digest of the bundled persona catalog.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::persona::library::BUNDLED_CATALOG;

/// Hex digits of the catalog digest shown in stamps
const DIGEST_LEN: usize = 12;

/// Where the binary came from.
#[derive(Debug, Clone, Serialize)]
pub struct GitInfo {
    /// Short commit hash, or "unknown" outside a git checkout
    pub hash: &'static str,
    pub branch: &'static str,
    pub dirty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub git: GitInfo,
    pub built_at: &'static str,
    pub target: &'static str,
    pub host: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
    /// Leading SHA-256 hex digits of the bundled persona catalog
    pub catalog_digest: String,
}

impl BuildInfo {
    /// "0.1.0-abc1234", with "-dirty" for uncommitted builds
    pub fn full_version(&self) -> String {
        let dirty = if self.git.dirty { "-dirty" } else { "" };
        format!("{}-{}{}", self.version, self.git.hash, dirty)
    }

    /// One-line provenance for report footers
    pub fn stamp(&self) -> String {
        format!(
            "{} {} catalog {} ({})",
            self.name,
            self.full_version(),
            self.catalog_digest,
            self.profile
        )
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f)?;
        writeln!(f, "  Branch:   {}{}", self.git.branch, if self.git.dirty { " (dirty)" } else { "" })?;
        writeln!(f, "  Catalog:  {}", self.catalog_digest)?;
        writeln!(f, "  Built:    {} ({})", self.built_at, self.profile)?;
        writeln!(f, "  Target:   {} on {}", self.target, self.host)?;
        writeln!(f, "  Compiler: {}", self.rustc)
    }
}

/// SHA-256 of a catalog's text, truncated for display.
pub fn catalog_digest(catalog: &str) -> String {
    let mut digest = hex::encode(Sha256::digest(catalog.as_bytes()));
    digest.truncate(DIGEST_LEN);
    digest
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        git: GitInfo {
            hash: env!("CSUITE_GIT_HASH"),
            branch: env!("CSUITE_GIT_BRANCH"),
            dirty: env!("CSUITE_GIT_DIRTY") == "true",
        },
        built_at: env!("CSUITE_BUILD_TIMESTAMP"),
        target: env!("CSUITE_TARGET"),
        host: env!("CSUITE_HOST"),
        profile: env!("CSUITE_PROFILE"),
        rustc: env!("CSUITE_RUSTC_VERSION"),
        catalog_digest: catalog_digest(BUNDLED_CATALOG),
    }
}
