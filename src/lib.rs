//! Generates Vulkan dispatch-table boilerplate and splices it into marked
//! regions of a hand-maintained header and source file.

use std::path::PathBuf;

pub mod condition;
pub mod entry;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod splice;
pub mod tables;

pub use condition::ConditionTracker;
pub use entry::{wrap_predicate, Entry, Item};
pub use error::GenError;
pub use generate::{CheckOptions, Extension};
pub use pipeline::{ArtifactKind, ArtifactResult, Mode, Outcome, Pipeline, Region, Report};
pub use splice::{render_document, splice, Sentinels};
pub use tables::Tables;

/// Where the artifacts live and how the generated code refers to its surroundings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the artifact paths are relative to
    pub root: PathBuf,
    /// Dispatch table header (default: "src/xrt/auxiliary/vk/vk_helpers.h")
    pub header: PathBuf,
    /// Loader source (default: "src/xrt/auxiliary/vk/vk_helpers.c")
    pub source: PathBuf,
    /// Macro resolving instance-level commands
    pub instance_macro: String,
    /// Macro resolving device-level commands
    pub device_macro: String,
    /// Pointer to the dispatch table inside the generated loader code
    pub target_var: String,
    /// Runtime array of enabled extension names scanned by the generated checks
    pub extension_names_var: String,
    pub extension_count_var: String,
}

impl Default for Config {
    fn default() -> Self {
        let check = CheckOptions::default();
        Self {
            root: PathBuf::from("."),
            header: PathBuf::from("src/xrt/auxiliary/vk/vk_helpers.h"),
            source: PathBuf::from("src/xrt/auxiliary/vk/vk_helpers.c"),
            instance_macro: "GET_INS_PROC".to_string(),
            device_macro: "GET_DEV_PROC".to_string(),
            target_var: check.target,
            extension_names_var: check.names_var,
            extension_count_var: check.count_var,
        }
    }
}

impl Config {
    /// Config rooted at `root` with default artifact locations
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn artifact_path(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Header => self.root.join(&self.header),
            ArtifactKind::Source => self.root.join(&self.source),
        }
    }

    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            target: self.target_var.clone(),
            names_var: self.extension_names_var.clone(),
            count_var: self.extension_count_var.clone(),
        }
    }
}

/// Regenerate both artifacts under `config.root` from the built-in tables
pub fn regenerate(config: Config, mode: Mode) -> Result<Vec<ArtifactResult>, GenError> {
    let pipeline = Pipeline::new(config, Tables::builtin())?;
    Ok(pipeline.run(mode))
}
