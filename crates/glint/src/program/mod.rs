//! Shader programs.
//!
//! A [`Program`] moves through a small lifecycle: empty, shaders attached,
//! linked, in use. [`Program::flush_shaders`] returns it to empty for the
//! destructive rebuild path; [`Program::reload`] is the safe hot-reload path
//! that keeps the old linked program until a replacement fully compiles and
//! links.

mod uniform;

pub use uniform::{MatData, MatShape, Scalar, VecData, VecDim};

use std::ffi::CString;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};

use crate::error::{Error, Result};
use crate::loader;

/// One stage of the graphics pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
    Compute,
}

impl ShaderStage {
    pub(crate) fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
            ShaderStage::Geometry => gl::GEOMETRY_SHADER,
            ShaderStage::TessControl => gl::TESS_CONTROL_SHADER,
            ShaderStage::TessEvaluation => gl::TESS_EVALUATION_SHADER,
            ShaderStage::Compute => gl::COMPUTE_SHADER,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
            ShaderStage::TessControl => "tess control",
            ShaderStage::TessEvaluation => "tess evaluation",
            ShaderStage::Compute => "compute",
        }
    }
}

/// Shader source: either literal GLSL or a path resolved through the loader
/// (deferred to worker threads under the `background-load` feature).
#[derive(Debug, Copy, Clone)]
pub enum ShaderSource<'a> {
    Code(&'a str),
    Path(&'a Path),
}

/// A shader program and the stage objects attached to it.
///
/// Created through [`Window::create_program`](crate::Window); only valid
/// while the creating window's context is current on the calling thread.
pub struct Program<'g> {
    id: GLuint,
    shaders: Vec<GLuint>,
    linked: bool,
    _ctx: PhantomData<&'g ()>,
}

impl<'g> Program<'g> {
    pub(crate) fn create() -> Result<Self> {
        let id = unsafe { gl::CreateProgram() };

        if id == 0 {
            log::error!("failed to create program");
            return Err(Error::ObjectCreation { kind: "program" });
        }

        log::debug!("created program #{id}");

        Ok(Self {
            id,
            shaders: Vec::new(),
            linked: false,
            _ctx: PhantomData,
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Compiles one stage from `source` and attaches it.
    ///
    /// On compile failure the driver info log is captured in the returned
    /// error, the failed shader object is deleted, and already-attached
    /// stages are left untouched.
    pub fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        let shader_id = unsafe { gl::CreateShader(stage.gl_enum()) };

        if shader_id == 0 {
            log::error!("program #{}: failed to create {} shader", self.id, stage.name());
            return Err(Error::ObjectCreation { kind: "shader" });
        }

        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe {
            gl::ShaderSource(shader_id, 1, &ptr, &len);
            gl::CompileShader(shader_id);
        }

        let mut status = 0;
        unsafe { gl::GetShaderiv(shader_id, gl::COMPILE_STATUS, &mut status) };

        if status == 0 {
            let info = shader_info_log(shader_id);
            unsafe { gl::DeleteShader(shader_id) };
            log::error!(
                "program #{}: failed to compile {} shader #{shader_id}: {info}",
                self.id,
                stage.name()
            );
            return Err(Error::ShaderCompile {
                log: format!("{}: {info}", stage.name()),
            });
        }

        unsafe { gl::AttachShader(self.id, shader_id) };
        self.shaders.push(shader_id);
        self.linked = false;

        log::debug!(
            "program #{}: compiled and attached {} shader #{shader_id}",
            self.id,
            stage.name()
        );

        Ok(())
    }

    /// Links all currently attached stages.
    ///
    /// On failure the program stays attached-but-unlinked and the driver
    /// info log is carried in the error.
    pub fn link_shaders(&mut self) -> Result<()> {
        unsafe { gl::LinkProgram(self.id) };

        let mut status = 0;
        unsafe { gl::GetProgramiv(self.id, gl::LINK_STATUS, &mut status) };

        if status == 0 {
            let info = program_info_log(self.id);
            log::error!("program #{}: failed to link: {info}", self.id);
            return Err(Error::ProgramLink { log: info });
        }

        self.linked = true;
        log::debug!("linked program #{}", self.id);
        Ok(())
    }

    /// Compiles every stage in `stages` (resolving `Path` entries through the
    /// loader) and links.
    ///
    /// Failure accumulates in two phases. Every source read is attempted
    /// even after one fails; read failures come back together as
    /// [`Error::ShaderLoad`] and nothing is compiled. With all sources in
    /// hand, every stage is compiled even after one fails and compile
    /// failures come back as a single [`Error::ShaderCompile`]; the link
    /// only runs when every stage compiled. Under `background-load` the
    /// file reads overlap on worker threads and are joined here before
    /// compilation.
    pub fn quick(&mut self, stages: &[(ShaderStage, ShaderSource<'_>)]) -> Result<()> {
        let sources = resolve_sources(stages)?;

        let mut failures = Vec::new();
        for (stage, code) in sources {
            if let Err(err) = self.create_shader(stage, &code) {
                failures.push(err.to_string());
            }
        }

        if !failures.is_empty() {
            return Err(Error::ShaderCompile {
                log: failures.join("\n"),
            });
        }

        self.link_shaders()
    }

    /// Hot reload: builds a replacement program from `stages` off to the side
    /// and swaps it in only on full compile + link success.
    ///
    /// On failure the current linked program stays usable and the error from
    /// the replacement build is returned. After a successful reload every
    /// caller-held uniform location is stale and must be looked up again;
    /// the program does not invalidate caller caches.
    pub fn reload(&mut self, stages: &[(ShaderStage, ShaderSource<'_>)]) -> Result<()> {
        let mut replacement = Program::create()?;
        replacement.quick(stages)?;

        std::mem::swap(self, &mut replacement);
        log::debug!(
            "program #{}: hot swapped in for #{}",
            self.id,
            replacement.id
        );

        // `replacement` now holds the old ids; dropping it releases them.
        Ok(())
    }

    /// Detaches and deletes every attached shader object and resets the
    /// program to empty, without touching the program id.
    ///
    /// This is the destructive rebuild path: after a flush the program is not
    /// usable until a fresh compile + link cycle succeeds. Prefer
    /// [`Program::reload`] when the old program should survive a failed
    /// rebuild.
    pub fn flush_shaders(&mut self) {
        for shader_id in self.shaders.drain(..) {
            unsafe {
                gl::DetachShader(self.id, shader_id);
                gl::DeleteShader(shader_id);
            }
            log::debug!("program #{}: deleted shader #{shader_id}", self.id);
        }
        self.linked = false;
    }

    /// Binds this program for subsequent draw calls.
    pub fn use_program(&self) {
        if !self.linked {
            log::warn!("using program #{} before a successful link", self.id);
        }
        unsafe { gl::UseProgram(self.id) };
    }

    /// Location of uniform `name`, or -1 when absent or optimized out by the
    /// compiler (not an error; GL silently ignores sets at -1).
    ///
    /// Location lookup is comparatively heavy; cache the result when the
    /// uniform is set every frame.
    pub fn uniform_location(&self, name: &str) -> i32 {
        let Ok(name) = CString::new(name) else {
            log::warn!("uniform name contains an interior nul byte");
            return -1;
        };
        unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) }
    }

    /// Locations for several uniforms, in argument order.
    pub fn uniform_locations(&self, names: &[&str]) -> Vec<i32> {
        names.iter().map(|name| self.uniform_location(name)).collect()
    }

    /// Sets a scalar uniform.
    pub fn set_uniform(&self, loc: i32, value: Scalar) {
        uniform::set_scalar(self.id, loc, value);
    }

    /// Sets `count` consecutive vector uniforms of `dim` components read
    /// from `data`.
    pub fn set_uniform_vec(&self, loc: i32, dim: VecDim, data: VecData<'_>, count: usize) {
        uniform::set_vec(self.id, loc, dim, data, count);
    }

    /// Sets `count` consecutive matrix uniforms of `shape` read from `data`.
    pub fn set_uniform_mat(
        &self,
        loc: i32,
        shape: MatShape,
        data: MatData<'_>,
        count: usize,
        transpose: bool,
    ) {
        uniform::set_mat(self.id, loc, shape, data, count, transpose);
    }
}

impl Drop for Program<'_> {
    fn drop(&mut self) {
        for shader_id in &self.shaders {
            unsafe { gl::DeleteShader(*shader_id) };
            log::debug!("program #{}: deleted shader #{shader_id}", self.id);
        }

        unsafe { gl::DeleteProgram(self.id) };
        log::debug!("deleted program #{}", self.id);
    }
}

enum SourceSlot {
    Ready(String),
    Deferred(loader::Pending<Result<String>>),
}

/// Resolves every stage's source text, dispatching all file reads first so
/// they overlap under `background-load`, then joining in input order.
///
/// Every read is attempted even after one fails; failures accumulate into
/// one [`Error::ShaderLoad`] with one line per failed stage, keeping the
/// file-load failure class separate from compile failures.
fn resolve_sources(
    stages: &[(ShaderStage, ShaderSource<'_>)],
) -> Result<Vec<(ShaderStage, String)>> {
    let slots: Vec<(ShaderStage, SourceSlot)> = stages
        .iter()
        .map(|&(stage, source)| {
            let slot = match source {
                ShaderSource::Code(code) => SourceSlot::Ready(code.to_string()),
                ShaderSource::Path(path) => {
                    let path: PathBuf = path.to_path_buf();
                    SourceSlot::Deferred(loader::defer(move || loader::read_to_string(&path)))
                }
            };
            (stage, slot)
        })
        .collect();

    let mut sources = Vec::with_capacity(slots.len());
    let mut failures = Vec::new();

    for (stage, slot) in slots {
        match slot {
            SourceSlot::Ready(code) => sources.push((stage, code)),
            SourceSlot::Deferred(pending) => match pending.wait() {
                Ok(code) => sources.push((stage, code)),
                Err(err) => {
                    log::error!("failed to load {} shader source: {err}", stage.name());
                    failures.push(format!("{}: {err}", stage.name()));
                }
            },
        }
    }

    if !failures.is_empty() {
        return Err(Error::ShaderLoad {
            log: failures.join("\n"),
        });
    }

    Ok(sources)
}

fn shader_info_log(shader_id: GLuint) -> String {
    let mut len = 0;
    unsafe { gl::GetShaderiv(shader_id, gl::INFO_LOG_LENGTH, &mut len) };

    let mut buf = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    unsafe {
        gl::GetShaderInfoLog(shader_id, buf.len() as GLsizei, &mut written, buf.as_mut_ptr().cast());
    }
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).trim_end().to_string()
}

fn program_info_log(program_id: GLuint) -> String {
    let mut len = 0;
    unsafe { gl::GetProgramiv(program_id, gl::INFO_LOG_LENGTH, &mut len) };

    let mut buf = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    unsafe {
        gl::GetProgramInfoLog(program_id, buf.len() as GLsizei, &mut written, buf.as_mut_ptr().cast());
    }
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_gl_enums() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Compute.gl_enum(), gl::COMPUTE_SHADER);
    }

    #[test]
    fn stage_names_are_stable() {
        // Names appear in accumulated load/compile failure logs.
        assert_eq!(ShaderStage::Vertex.name(), "vertex");
        assert_eq!(ShaderStage::TessControl.name(), "tess control");
    }

    // ── source resolution ───────────────────────────────────────────────

    #[test]
    fn missing_sources_are_all_reported() {
        let stages = [
            (
                ShaderStage::Vertex,
                ShaderSource::Path(Path::new("/no/such/dir/a.vert")),
            ),
            (
                ShaderStage::Fragment,
                ShaderSource::Path(Path::new("/no/such/dir/b.frag")),
            ),
        ];

        // Both reads are attempted; both failures land in one load error,
        // not a compile error.
        let err = resolve_sources(&stages).unwrap_err();
        match err {
            Error::ShaderLoad { log } => {
                assert!(log.contains("vertex"), "missing vertex line in: {log}");
                assert!(log.contains("fragment"), "missing fragment line in: {log}");
            }
            other => panic!("expected ShaderLoad, got {other:?}"),
        }
    }

    #[test]
    fn sources_resolve_in_input_order() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#version 460 core\nvoid main() {{}}\n").unwrap();

        let stages = [
            (ShaderStage::Vertex, ShaderSource::Code("// vertex body")),
            (ShaderStage::Fragment, ShaderSource::Path(file.path())),
        ];

        let sources = resolve_sources(&stages).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].0, ShaderStage::Vertex);
        assert_eq!(sources[0].1, "// vertex body");
        assert_eq!(sources[1].0, ShaderStage::Fragment);
        assert!(sources[1].1.starts_with("#version 460 core"));
    }

    #[test]
    fn one_bad_path_fails_the_whole_resolve() {
        let stages = [
            (ShaderStage::Vertex, ShaderSource::Code("// fine")),
            (
                ShaderStage::Fragment,
                ShaderSource::Path(Path::new("/no/such/dir/b.frag")),
            ),
        ];

        let err = resolve_sources(&stages).unwrap_err();
        match err {
            Error::ShaderLoad { log } => {
                assert!(log.contains("fragment"));
                assert!(!log.contains("vertex"));
            }
            other => panic!("expected ShaderLoad, got {other:?}"),
        }
    }
}
