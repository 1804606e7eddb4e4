// =============================================================================
// PROGRAM MANIFEST - Load shader program definitions from shaders.toml
// =============================================================================
//
// Each [[program]] table names a program and lists its stages in attach
// order. Relative stage paths are resolved against the manifest's directory.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::stage::StageSource;

/// Default manifest location, relative to the working directory
pub const DEFAULT_MANIFEST: &str = "shaders.toml";

/// Root manifest structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ProgramManifest {
    #[serde(rename = "program")]
    pub programs: Vec<ProgramEntry>,
}

/// One named program and its stages
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramEntry {
    pub name: String,
    pub stages: Vec<StageSource>,
}

impl ProgramManifest {
    /// Load the manifest from shaders.toml, falling back to an empty one
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_MANIFEST).unwrap_or_else(|e| {
            log::warn!("Failed to load {}: {:#}. No shader programs defined.", DEFAULT_MANIFEST, e);
            ProgramManifest::default()
        })
    }

    /// Load the manifest from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Shader manifest not found at {:?}, no programs defined", path);
            return Ok(ProgramManifest::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shader manifest: {:?}", path))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let manifest = Self::from_toml_str(&content, base_dir)
            .with_context(|| format!("Failed to parse shader manifest: {:?}", path))?;

        log::info!("Loaded {} shader program(s) from {:?}", manifest.programs.len(), path);
        log::debug!("Manifest: {:?}", manifest);

        Ok(manifest)
    }

    /// Parse manifest text, resolving relative stage paths against `base_dir`
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: ProgramManifest = toml::from_str(content)?;

        for stage in manifest.programs.iter_mut().flat_map(|p| p.stages.iter_mut()) {
            if stage.path.is_relative() {
                stage.path = base_dir.join(&stage.path);
            }
        }

        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for program in &self.programs {
            if program.name.is_empty() {
                bail!("Shader program with an empty name");
            }
            if !names.insert(program.name.as_str()) {
                bail!("Shader program '{}' is defined more than once", program.name);
            }
            if program.stages.is_empty() {
                bail!("Shader program '{}' has no stages", program.name);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ProgramEntry> {
        self.programs.iter().find(|p| p.name == name)
    }

    /// Every stage source path, in manifest order
    pub fn source_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.programs.iter().flat_map(|p| p.stages.iter().map(|s| &s.path))
    }
}
