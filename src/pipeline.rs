use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::GenError;
use crate::generate::{emit_items, extension_checks, extension_flag_fields, LoaderEmitter, MemberEmitter};
use crate::splice::{render_document, splice, Sentinels};
use crate::tables::Tables;
use crate::Config;

/// A generated region inside an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Instance,
    Device,
    Extensions,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Instance, Region::Device, Region::Extensions];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Instance => "instance",
            Region::Device => "device",
            Region::Extensions => "extensions",
        }
    }

    pub fn sentinels(&self) -> Sentinels<'static> {
        match self {
            Region::Instance => Sentinels {
                begin: "\t// beginning of GENERATED instance loader code - do not modify - used by scripts",
                end: "\t// end of GENERATED instance loader code - do not modify - used by scripts",
            },
            Region::Device => Sentinels {
                begin: "\t// beginning of GENERATED device loader code - do not modify - used by scripts",
                end: "\t// end of GENERATED device loader code - do not modify - used by scripts",
            },
            Region::Extensions => Sentinels {
                begin: "\t// beginning of GENERATED extension code - do not modify - used by scripts",
                end: "\t// end of GENERATED extension code - do not modify - used by scripts",
            },
        }
    }
}

/// The two hand-maintained files that receive generated regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Dispatch table declaration: fields and extension flags
    Header,
    /// Loader implementation: address resolution and extension checks
    Source,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Header, ArtifactKind::Source];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Header => "header",
            ArtifactKind::Source => "source",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite artifacts whose generated regions changed
    Write,
    /// Only report artifacts that would change
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Written,
    Unchanged,
    Stale,
}

/// Result of processing one artifact
#[derive(Debug)]
pub struct ArtifactResult {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub result: Result<Outcome, GenError>,
}

/// Serializable summary of a run
#[derive(Debug, Serialize)]
pub struct Report {
    pub artifacts: Vec<ArtifactReport>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactReport {
    pub artifact: ArtifactKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn from_results(results: &[ArtifactResult]) -> Self {
        let artifacts = results
            .iter()
            .map(|r| ArtifactReport {
                artifact: r.kind,
                path: r.path.display().to_string(),
                outcome: r.result.as_ref().ok().copied(),
                error: r.result.as_ref().err().map(ToString::to_string),
            })
            .collect();
        Self { artifacts }
    }
}

/// Generates every region and splices it into the artifacts
pub struct Pipeline {
    config: Config,
    tables: Tables,
}

impl Pipeline {
    /// Build a pipeline, rejecting tables with duplicate fields before anything is touched
    pub fn new(config: Config, tables: Tables) -> Result<Self, GenError> {
        tables.validate()?;
        Ok(Self { config, tables })
    }

    /// Default layout with the built-in dispatch lists
    pub fn standard() -> Result<Self, GenError> {
        Self::new(Config::default(), Tables::builtin())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generated bodies for each region of an artifact
    pub fn regions(&self, kind: ArtifactKind) -> Vec<(Region, Vec<String>)> {
        let tables = &self.tables;
        match kind {
            ArtifactKind::Header => vec![
                (Region::Instance, emit_items(&tables.instance, &MemberEmitter)),
                (Region::Device, emit_items(&tables.device, &MemberEmitter)),
                (Region::Extensions, extension_flag_fields(&tables.extensions)),
            ],
            ArtifactKind::Source => {
                let config = &self.config;
                let instance =
                    LoaderEmitter::for_items(&config.instance_macro, &config.target_var, &tables.instance);
                let device =
                    LoaderEmitter::for_items(&config.device_macro, &config.target_var, &tables.device);
                vec![
                    (Region::Instance, emit_items(&tables.instance, &instance)),
                    (Region::Device, emit_items(&tables.device, &device)),
                    (
                        Region::Extensions,
                        extension_checks(&tables.extensions, &config.check_options()),
                    ),
                ]
            }
        }
    }

    /// Splice all regions into `text` in memory. Nothing is returned unless every region succeeds.
    pub fn render(&self, kind: ArtifactKind, text: &str, artifact: &Path) -> Result<String, GenError> {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

        for (region, body) in self.regions(kind) {
            lines = splice(&lines, region.sentinels(), &body, artifact)?;
            tracing::debug!(region = region.as_str(), lines = body.len(), "spliced region");
        }

        Ok(render_document(&lines))
    }

    /// Read, regenerate and (in write mode) rewrite one artifact
    #[tracing::instrument(level = "debug", skip(self), fields(artifact = kind.as_str()))]
    pub fn process(&self, kind: ArtifactKind, mode: Mode) -> Result<Outcome, GenError> {
        let path = self.config.artifact_path(kind);
        let text = fs::read_to_string(&path).map_err(|source| GenError::Read {
            path: path.clone(),
            source,
        })?;

        let rendered = self.render(kind, &text, &path)?;
        if rendered == text {
            tracing::debug!(path = %path.display(), "artifact up to date");
            return Ok(Outcome::Unchanged);
        }

        match mode {
            Mode::Check => {
                tracing::warn!(path = %path.display(), "artifact is stale");
                Ok(Outcome::Stale)
            }
            Mode::Write => {
                fs::write(&path, &rendered).map_err(|source| GenError::Write {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "wrote artifact");
                Ok(Outcome::Written)
            }
        }
    }

    /// Process the header, then the source. A failure on one does not affect the other.
    pub fn run(&self, mode: Mode) -> Vec<ArtifactResult> {
        ArtifactKind::ALL
            .into_iter()
            .map(|kind| ArtifactResult {
                kind,
                path: self.config.artifact_path(kind),
                result: self.process(kind, mode),
            })
            .collect()
    }
}
