// Named shader programs built from a manifest
//
// The library keeps each program's stage list so it can be rebuilt in place
// when its sources change. A failed rebuild keeps the previous program.

use anyhow::{anyhow, Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

use crate::driver::GlDriver;
use crate::error::ShaderError;
use crate::manifest::ProgramManifest;
use crate::program::ShaderProgram;
use crate::stage::StageSource;
use crate::watch::normalize_path;

struct LibraryEntry<D: GlDriver> {
    stages: Vec<StageSource>,
    program: ShaderProgram<D>,
}

/// Outcome of [`ShaderLibrary::reload_changed`]
#[derive(Debug, Default)]
pub struct ReloadReport {
    pub reloaded: Vec<String>,
    pub failed: Vec<(String, ShaderError)>,
}

impl ReloadReport {
    pub fn is_empty(&self) -> bool {
        self.reloaded.is_empty() && self.failed.is_empty()
    }
}

/// A set of programs sharing one driver, addressed by name
pub struct ShaderLibrary<D: GlDriver> {
    driver: Rc<D>,
    entries: BTreeMap<String, LibraryEntry<D>>,
}

impl<D: GlDriver> ShaderLibrary<D> {
    pub fn new(driver: Rc<D>) -> Self {
        Self { driver, entries: BTreeMap::new() }
    }

    /// Build every program in the manifest
    pub fn from_manifest(driver: Rc<D>, manifest: &ProgramManifest) -> Result<Self> {
        let mut library = Self::new(driver);
        for entry in &manifest.programs {
            library
                .insert(&entry.name, entry.stages.clone())
                .with_context(|| format!("Failed to build shader program '{}'", entry.name))?;
        }

        log::info!("Built {} shader program(s)", library.entries.len());
        Ok(library)
    }

    /// Build a program and store it under `name`, replacing any previous one
    pub fn insert(&mut self, name: &str, stages: Vec<StageSource>) -> Result<(), ShaderError> {
        let program = ShaderProgram::from_stages(Rc::clone(&self.driver), &stages)?;
        log::debug!("Program '{}' -> {}", name, program.id());
        self.entries.insert(name.to_string(), LibraryEntry { stages, program });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ShaderProgram<D>> {
        self.entries.get(name).map(|entry| &entry.program)
    }

    /// Bind the named program
    pub fn bind(&self, name: &str) -> Result<()> {
        let program = self.get(name).ok_or_else(|| anyhow!("Unknown shader program '{}'", name))?;
        program.bind();
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every stage source path used by the library
    pub fn source_paths(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.entries
            .values()
            .flat_map(|entry| entry.stages.iter())
            .filter(|stage| seen.insert(stage.path.clone()))
            .map(|stage| stage.path.clone())
            .collect()
    }

    /// Rebuild one program from its stage files.
    ///
    /// On success the old program is released; on failure it stays in place.
    pub fn reload(&mut self, name: &str) -> Result<(), ShaderError> {
        let Some(entry) = self.entries.get_mut(name) else {
            log::warn!("Reload requested for unknown shader program '{}'", name);
            return Ok(());
        };

        let program = ShaderProgram::from_stages(Rc::clone(&self.driver), &entry.stages)?;
        log::info!("Reloaded shader program '{}' ({} -> {})", name, entry.program.id(), program.id());
        entry.program = program;
        Ok(())
    }

    /// Rebuild every program that uses one of the changed files
    pub fn reload_changed(&mut self, changed: &HashSet<PathBuf>) -> ReloadReport {
        let mut report = ReloadReport::default();
        if changed.is_empty() {
            return report;
        }

        let changed: HashSet<PathBuf> = changed.iter().map(|p| normalize_path(p)).collect();
        let affected: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.stages.iter().any(|s| changed.contains(&normalize_path(&s.path))))
            .map(|(name, _)| name.clone())
            .collect();

        for name in affected {
            match self.reload(&name) {
                Ok(()) => report.reloaded.push(name),
                Err(e) => {
                    log::warn!("Keeping previous '{}' program: {}", name, e);
                    report.failed.push((name, e));
                }
            }
        }

        report
    }
}
