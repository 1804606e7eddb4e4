// Driver module - the narrow OpenGL call surface
//
// ShaderProgram never talks to OpenGL directly. Everything it needs goes
// through GlDriver so the lifecycle can run against glow or a test double.

#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
mod glow_context;

#[cfg(test)]
pub mod mock;

use crate::stage::StageKind;

/// Driver operations needed to build, bind and release shader programs.
///
/// Handles are the raw integer names the driver issues; `0` means "no
/// object". All calls assume the owning context is current on the calling
/// thread. Implementations are not expected to be thread safe.
pub trait GlDriver {
    /// Create an empty shader object of the given stage
    fn create_shader(&self, kind: StageKind) -> Result<u32, String>;

    /// Replace the shader object's source text
    fn shader_source(&self, shader: u32, source: &str);

    fn compile_shader(&self, shader: u32);

    /// `GL_COMPILE_STATUS` of the shader object
    fn compile_status(&self, shader: u32) -> bool;

    fn shader_info_log(&self, shader: u32) -> String;

    fn delete_shader(&self, shader: u32);

    /// Create an empty program object
    fn create_program(&self) -> Result<u32, String>;

    fn attach_shader(&self, program: u32, shader: u32);

    fn detach_shader(&self, program: u32, shader: u32);

    fn link_program(&self, program: u32);

    /// `GL_LINK_STATUS` of the program object
    fn link_status(&self, program: u32) -> bool;

    fn program_info_log(&self, program: u32) -> String;

    fn delete_program(&self, program: u32);

    /// Make the program current; `0` clears the slot
    fn use_program(&self, program: u32);

    /// `GL_CURRENT_PROGRAM` of the context
    fn current_program(&self) -> u32;
}
