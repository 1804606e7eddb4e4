/// Recording driver for unit tests (no GPU required)
///
/// Issues handles, records every call and tracks which objects are still
/// alive, so tests can check call order and look for leaks. Compile and link
/// outcomes are scripted from marker text in the stage source.

use std::cell::RefCell;
use std::collections::HashMap;

use super::GlDriver;
use crate::stage::StageKind;

/// Source containing this marker fails to compile
pub const FAIL_COMPILE: &str = "#mock fail_compile";

/// Program with a stage containing this marker fails to link
pub const FAIL_LINK: &str = "#mock fail_link";

pub const COMPILE_LOG: &str = "0:1(1): error: syntax error, unexpected end of file";
pub const LINK_LOG: &str = "error: vertex shader output `v_color' not consumed";

#[derive(Debug)]
pub struct MockShader {
    pub kind: StageKind,
    pub source: String,
    pub compiled: Option<bool>,
}

#[derive(Debug, Default)]
pub struct MockProgram {
    pub attached: Vec<u32>,
    pub linked_kinds: Vec<StageKind>,
    pub linked: Option<bool>,
}

#[derive(Debug, Default)]
struct MockState {
    next_handle: u32,
    shaders: HashMap<u32, MockShader>,
    programs: HashMap<u32, MockProgram>,
    current: u32,
    calls: Vec<String>,
    shaders_created: usize,
    shaders_deleted: usize,
    programs_created: usize,
    programs_deleted: usize,
}

#[derive(Debug, Default)]
pub struct RecordingDriver {
    state: RefCell<MockState>,
    refuse_programs: bool,
    info_log_override: Option<String>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose `create_program` always fails
    pub fn refusing_programs() -> Self {
        Self { refuse_programs: true, ..Self::default() }
    }

    /// A driver that answers every info log query with `log`
    pub fn with_info_log(log: impl Into<String>) -> Self {
        Self { info_log_override: Some(log.into()), ..Self::default() }
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn issue_handle(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        state.next_handle
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state.borrow().calls.iter().filter(|call| call.starts_with(prefix)).count()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_objects(&self) -> usize {
        self.live_shaders() + self.live_programs()
    }

    pub fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub fn shaders_deleted(&self) -> usize {
        self.state.borrow().shaders_deleted
    }

    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs_created
    }

    pub fn programs_deleted(&self) -> usize {
        self.state.borrow().programs_deleted
    }

    /// Stage kinds attached to the program at the moment it was linked
    pub fn linked_kinds(&self, program: u32) -> Vec<StageKind> {
        self.state.borrow().programs.get(&program).map(|p| p.linked_kinds.clone()).unwrap_or_default()
    }

    pub fn attached_count(&self, program: u32) -> usize {
        self.state.borrow().programs.get(&program).map_or(0, |p| p.attached.len())
    }

    pub fn is_linked(&self, program: u32) -> bool {
        self.state.borrow().programs.get(&program).and_then(|p| p.linked).unwrap_or(false)
    }
}

impl GlDriver for RecordingDriver {
    fn create_shader(&self, kind: StageKind) -> Result<u32, String> {
        let handle = self.issue_handle();
        let mut state = self.state.borrow_mut();
        state.shaders.insert(handle, MockShader { kind, source: String::new(), compiled: None });
        state.shaders_created += 1;
        state.calls.push(format!("create_shader {} -> {}", kind.tag(), handle));
        Ok(handle)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
        self.record(format!("shader_source {}", shader));
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.compiled = Some(!s.source.contains(FAIL_COMPILE));
        }
        self.record(format!("compile_shader {}", shader));
    }

    fn compile_status(&self, shader: u32) -> bool {
        self.record(format!("compile_status {}", shader));
        self.state.borrow().shaders.get(&shader).and_then(|s| s.compiled).unwrap_or(false)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.record(format!("shader_info_log {}", shader));
        self.info_log_override.clone().unwrap_or_else(|| COMPILE_LOG.to_string())
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader).is_some() {
            state.shaders_deleted += 1;
        }
        state.calls.push(format!("delete_shader {}", shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        if self.refuse_programs {
            self.record("create_program -> refused".to_string());
            return Err("GL_OUT_OF_MEMORY".to_string());
        }
        let handle = self.issue_handle();
        let mut state = self.state.borrow_mut();
        state.programs.insert(handle, MockProgram::default());
        state.programs_created += 1;
        state.calls.push(format!("create_program -> {}", handle));
        Ok(handle)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
        self.record(format!("attach_shader {} {}", program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
        self.record(format!("detach_shader {} {}", program, shader));
    }

    fn link_program(&self, program: u32) {
        {
            let mut state = self.state.borrow_mut();
            let kinds: Vec<StageKind> = state
                .programs
                .get(&program)
                .map(|p| p.attached.iter().filter_map(|s| state.shaders.get(s)).map(|s| s.kind).collect())
                .unwrap_or_default();
            let verdict = state.programs.get(&program).map(|p| {
                let mut seen = Vec::new();
                p.attached.iter().all(|s| match state.shaders.get(s) {
                    Some(shader) if shader.compiled == Some(true) && !shader.source.contains(FAIL_LINK) => {
                        // Two stages of the same kind never link
                        let fresh = !seen.contains(&shader.kind);
                        seen.push(shader.kind);
                        fresh
                    }
                    _ => false,
                }) && !p.attached.is_empty()
            });
            if let (Some(linked), Some(p)) = (verdict, state.programs.get_mut(&program)) {
                p.linked = Some(linked);
                p.linked_kinds = kinds;
            }
        }
        self.record(format!("link_program {}", program));
    }

    fn link_status(&self, program: u32) -> bool {
        self.record(format!("link_status {}", program));
        self.state.borrow().programs.get(&program).and_then(|p| p.linked).unwrap_or(false)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.record(format!("program_info_log {}", program));
        self.info_log_override.clone().unwrap_or_else(|| LINK_LOG.to_string())
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_some() {
            state.programs_deleted += 1;
        }
        state.calls.push(format!("delete_program {}", program));
    }

    fn use_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.current = program;
        state.calls.push(format!("use_program {}", program));
    }

    fn current_program(&self) -> u32 {
        self.state.borrow().current
    }
}
