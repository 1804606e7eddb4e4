// GlDriver for glow::Context
//
// glow wraps the GL entry points as unsafe methods taking NonZeroU32
// newtypes. Handle 0 has no glow representation, so calls that receive it
// are skipped, matching the no-op OpenGL defines for name 0.

use glow::HasContext;
use std::num::NonZeroU32;

use super::GlDriver;
use crate::stage::StageKind;

fn native_shader(handle: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(handle).map(glow::NativeShader)
}

fn native_program(handle: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(handle).map(glow::NativeProgram)
}

// Safety (all blocks below): the trait contract requires the context to be
// current on this thread, and every handle passed in was issued by it.
impl GlDriver for glow::Context {
    fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
        unsafe { HasContext::create_shader(self, kind.gl_enum()) }.map(|shader| shader.0.get())
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(shader) = native_shader(shader) {
            unsafe { HasContext::shader_source(self, shader, source) }
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(shader) = native_shader(shader) {
            unsafe { HasContext::compile_shader(self, shader) }
        }
    }

    fn compile_status(&self, shader: u32) -> bool {
        native_shader(shader)
            .map(|shader| unsafe { self.get_shader_compile_status(shader) })
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        native_shader(shader)
            .map(|shader| unsafe { self.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        if let Some(shader) = native_shader(shader) {
            unsafe { HasContext::delete_shader(self, shader) }
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        unsafe { HasContext::create_program(self) }.map(|program| program.0.get())
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { HasContext::attach_shader(self, program, shader) }
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { HasContext::detach_shader(self, program, shader) }
        }
    }

    fn link_program(&self, program: u32) {
        if let Some(program) = native_program(program) {
            unsafe { HasContext::link_program(self, program) }
        }
    }

    fn link_status(&self, program: u32) -> bool {
        native_program(program)
            .map(|program| unsafe { self.get_program_link_status(program) })
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: u32) -> String {
        native_program(program)
            .map(|program| unsafe { self.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        if let Some(program) = native_program(program) {
            unsafe { HasContext::delete_program(self, program) }
        }
    }

    fn use_program(&self, program: u32) {
        unsafe { HasContext::use_program(self, native_program(program)) }
    }

    fn current_program(&self) -> u32 {
        let current = unsafe { self.get_parameter_i32(glow::CURRENT_PROGRAM) };
        u32::try_from(current).unwrap_or(0)
    }
}
