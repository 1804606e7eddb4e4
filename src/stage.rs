// Shader stage descriptors
//
// A stage is one unit of GLSL compiled on its own before linking. The
// descriptor is only consumed during program construction.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ShaderError;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    #[serde(alias = "vert")]
    Vertex,
    #[serde(alias = "tesc")]
    TessControl,
    #[serde(alias = "tese")]
    TessEvaluation,
    #[serde(alias = "geom")]
    Geometry,
    #[serde(alias = "frag")]
    Fragment,
    #[serde(alias = "comp")]
    Compute,
}

impl StageKind {
    /// All stage kinds, in pipeline order
    pub const ALL: [StageKind; 6] = [
        StageKind::Vertex,
        StageKind::TessControl,
        StageKind::TessEvaluation,
        StageKind::Geometry,
        StageKind::Fragment,
        StageKind::Compute,
    ];

    /// Tag used in compilation error messages
    pub fn tag(self) -> &'static str {
        match self {
            StageKind::Vertex => "VERTEX_SHADER",
            StageKind::TessControl => "TESSELLATION_CONTROL_SHADER",
            StageKind::TessEvaluation => "TESSELLATION_EVALUATION_SHADER",
            StageKind::Geometry => "GEOMETRY_SHADER",
            StageKind::Fragment => "FRAGMENT_SHADER",
            StageKind::Compute => "COMPUTE_SHADER",
        }
    }

    /// OpenGL shader type enum (`GL_VERTEX_SHADER` etc.)
    pub fn gl_enum(self) -> u32 {
        match self {
            StageKind::Vertex => 0x8B31,
            StageKind::TessControl => 0x8E88,
            StageKind::TessEvaluation => 0x8E87,
            StageKind::Geometry => 0x8DD9,
            StageKind::Fragment => 0x8B30,
            StageKind::Compute => 0x91B9,
        }
    }
}

impl TryFrom<u32> for StageKind {
    type Error = ShaderError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        StageKind::ALL
            .into_iter()
            .find(|kind| kind.gl_enum() == raw)
            .ok_or(ShaderError::UnknownStage(raw))
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A (stage kind, source file) pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageSource {
    pub kind: StageKind,
    pub path: PathBuf,
}

impl StageSource {
    pub fn new(kind: StageKind, path: impl Into<PathBuf>) -> Self {
        Self { kind, path: path.into() }
    }

    pub fn vertex(path: impl Into<PathBuf>) -> Self {
        Self::new(StageKind::Vertex, path)
    }

    pub fn fragment(path: impl Into<PathBuf>) -> Self {
        Self::new(StageKind::Fragment, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
