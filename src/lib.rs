// =============================================================================
// GLSHADER - OpenGL shader program loading with scoped ownership
// =============================================================================
//
// Loads GLSL stage sources from disk, compiles and links them into a program
// object and releases everything when the owner goes away.
//
// LAYOUT:
// ┌─────────────────────────────────────────────────────────────────┐
// │  ShaderLibrary (named programs from shaders.toml, hot reload)   │
// │    └── ShaderProgram (one linked program, released on drop)     │
// │          └── GlDriver (glow::Context or a test double)          │
// │  ShaderWatcher (notify thread, records changed sources)         │
// └─────────────────────────────────────────────────────────────────┘
//
// All GL calls happen on the thread that owns the context. The watcher only
// records paths; the owner drains them and calls reload_changed().
//
// =============================================================================

pub mod driver;
mod error;
pub mod library;
pub mod manifest;
pub mod program;
pub mod stage;
pub mod watch;

pub use driver::GlDriver;
pub use error::{Result, ShaderError};
pub use library::{ReloadReport, ShaderLibrary};
pub use manifest::{ProgramEntry, ProgramManifest};
pub use program::ShaderProgram;
pub use stage::{StageKind, StageSource};
pub use watch::ShaderWatcher;

#[cfg(feature = "glow")]
pub use glow;
