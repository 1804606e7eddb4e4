// Shader program loading and lifetime management
//
// A ShaderProgram owns one linked GL program object. Construction reads the
// stage sources, compiles each stage, links them and releases the
// intermediate stage objects. Every object created along the way is owned by
// a guard, so an early return from any failure branch cannot leak it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::driver::GlDriver;
use crate::error::{Result, ShaderError};
use crate::stage::{StageKind, StageSource};

/// Driver info logs are cut to this many bytes
pub const MAX_INFO_LOG_LEN: usize = 512;

/// A linked, bindable GL program.
///
/// The handle is either 0 (empty, e.g. after [`ShaderProgram::take`]) or a
/// program that linked successfully. It is released when the value drops.
/// There is no `Clone`: a program has exactly one owner.
pub struct ShaderProgram<D: GlDriver> {
    driver: Rc<D>,
    handle: u32,
}

impl<D: GlDriver> ShaderProgram<D> {
    /// A program that owns nothing
    pub fn empty(driver: Rc<D>) -> Self {
        Self { driver, handle: 0 }
    }

    /// Build a program from a vertex and a fragment shader file.
    ///
    /// Both files are read before any driver object is created.
    pub fn from_files(
        driver: Rc<D>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let vertex = read_source(vertex_path.as_ref())?;
        let fragment = read_source(fragment_path.as_ref())?;

        Self::from_sources(
            driver,
            &[(StageKind::Vertex, vertex.as_str()), (StageKind::Fragment, fragment.as_str())],
        )
    }

    /// Build a program from an ordered list of stage files.
    ///
    /// Stages are compiled in order and attached in the same order. Repeated
    /// kinds are passed through; the driver rejects them at link time.
    pub fn from_stages(driver: Rc<D>, stages: &[StageSource]) -> Result<Self> {
        if stages.is_empty() {
            return Err(ShaderError::NoStages);
        }

        let mut compiled = Vec::with_capacity(stages.len());
        for stage in stages {
            let source = read_source(&stage.path)?;
            compiled.push(CompiledStage::compile(&*driver, stage.kind, &source)?);
        }

        Self::link(&driver, &compiled)
    }

    /// Build a program from in-memory stage sources
    pub fn from_sources(driver: Rc<D>, sources: &[(StageKind, &str)]) -> Result<Self> {
        if sources.is_empty() {
            return Err(ShaderError::NoStages);
        }

        let compiled = sources
            .iter()
            .map(|&(kind, source)| CompiledStage::compile(&*driver, kind, source))
            .collect::<Result<Vec<_>>>()?;

        Self::link(&driver, &compiled)
    }

    fn link(driver: &Rc<D>, stages: &[CompiledStage<'_, D>]) -> Result<Self> {
        let handle = driver.create_program().map_err(ShaderError::Driver)?;
        // Owned from here on: any early return deletes the program
        let program = Self { driver: Rc::clone(driver), handle };

        for stage in stages {
            driver.attach_shader(handle, stage.handle);
        }
        driver.link_program(handle);
        for stage in stages {
            driver.detach_shader(handle, stage.handle);
        }

        if !driver.link_status(handle) {
            let log = truncate_info_log(driver.program_info_log(handle));
            log::error!("Program {} failed to link: {}", handle, log);
            return Err(ShaderError::Link { log });
        }

        log::debug!("Linked program {} from {} stage(s)", handle, stages.len());
        Ok(program)
    }

    /// Make this the current program of the context
    pub fn bind(&self) {
        self.driver.use_program(self.handle);
    }

    /// Raw program handle, for setting uniforms against the driver directly
    pub fn id(&self) -> u32 {
        self.handle
    }

    pub fn is_empty(&self) -> bool {
        self.handle == 0
    }

    /// Move the handle out into a new value, leaving this one empty
    pub fn take(&mut self) -> Self {
        Self {
            driver: Rc::clone(&self.driver),
            handle: std::mem::take(&mut self.handle),
        }
    }

    pub fn driver(&self) -> &Rc<D> {
        &self.driver
    }
}

impl<D: GlDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        if self.handle != 0 {
            log::trace!("Releasing program {}", self.handle);
            self.driver.delete_program(self.handle);
        }
    }
}

impl<D: GlDriver> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram").field("handle", &self.handle).finish()
    }
}

/// A compiled stage object, deleted when the guard goes out of scope
struct CompiledStage<'d, D: GlDriver> {
    driver: &'d D,
    handle: u32,
}

impl<'d, D: GlDriver> CompiledStage<'d, D> {
    fn compile(driver: &'d D, kind: StageKind, source: &str) -> Result<Self> {
        let handle = driver.create_shader(kind).map_err(ShaderError::Driver)?;
        let stage = Self { driver, handle };

        driver.shader_source(handle, source);
        driver.compile_shader(handle);

        if !driver.compile_status(handle) {
            let log = truncate_info_log(driver.shader_info_log(handle));
            log::error!("{} failed to compile: {}", kind.tag(), log);
            return Err(ShaderError::Compilation { stage: kind, log });
        }

        Ok(stage)
    }
}

impl<D: GlDriver> Drop for CompiledStage<'_, D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.handle);
    }
}

/// Read a stage source file as-is.
///
/// Bytes are not validated; anything that is not UTF-8 is replaced since the
/// driver entry point takes text.
fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ShaderError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Cut a driver log to [`MAX_INFO_LOG_LEN`] bytes without splitting a character
fn truncate_info_log(mut log: String) -> String {
    if log.len() > MAX_INFO_LOG_LEN {
        let mut end = MAX_INFO_LOG_LEN;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}

/// Build a program from shader files embedded at compile time
///
/// ```ignore
/// let program = glshader::include_program!(gl,
///     Vertex => "../shaders/triangle.vert",
///     Fragment => "../shaders/triangle.frag",
/// )?;
/// ```
#[macro_export]
macro_rules! include_program {
    ($driver:expr, $($kind:ident => $path:expr),+ $(,)?) => {
        $crate::ShaderProgram::from_sources(
            $driver,
            &[$(($crate::StageKind::$kind, include_str!($path))),+],
        )
    };
}
