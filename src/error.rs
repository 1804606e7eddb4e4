// Error taxonomy for shader program construction
//
// Every failure while loading, compiling or linking ends up here. The
// messages keep the stage tags drivers and tooling grep for.

use std::path::PathBuf;
use thiserror::Error;

use crate::stage::StageKind;

/// Result type for shader program operations
pub type Result<T> = std::result::Result<T, ShaderError>;

/// Shader program errors
#[derive(Debug, Error)]
pub enum ShaderError {
    /// A stage source file could not be opened or read
    #[error("Filename {} does not exist!", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The driver rejected one stage's source
    #[error("{}::FAILED_COMPILATION. ERROR MESSAGE: {log}", stage.tag())]
    Compilation { stage: StageKind, log: String },

    /// The driver rejected the attached stage combination
    #[error("Program linkage error. Error message: {log}")]
    Link { log: String },

    /// Construction was requested with an empty stage list
    #[error("No shader stages specified. Shader creation failed!")]
    NoStages,

    /// The driver refused to create a shader or program object
    #[error("Unexpected error during shader validation stage. Shader creation failed! ({0})")]
    Driver(String),

    /// A raw stage enum that is not one of the six known kinds
    #[error("INCORRECT_SHADER_SPECIFIED::{0:#06x}")]
    UnknownStage(u32),
}

impl ShaderError {
    /// Stage that failed to compile, if this is a compilation error
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            ShaderError::Compilation { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Driver diagnostic log attached to compile and link failures
    pub fn driver_log(&self) -> Option<&str> {
        match self {
            ShaderError::Compilation { log, .. } | ShaderError::Link { log } => Some(log),
            _ => None,
        }
    }
}
