use std::path::PathBuf;

/// Library result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside the wrapper.
///
/// Each variant maps to one class of failure from the underlying libraries.
/// Every `Err` return is also logged at the point of failure, so scene code
/// that only wants the original "check and bail" style can `?` straight out
/// of its function and still leave a trail in the log.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A second live [`Glint`](crate::Glint) was requested while one exists.
    #[error("a glint context is already live in this process")]
    AlreadyInitialized,

    /// GLFW itself refused to initialize.
    #[error("failed to initialize glfw: {0:?}")]
    Init(glfw::InitError),

    /// Native window or GL context creation failed.
    #[error("failed to create window \"{title}\"")]
    WindowCreation { title: String },

    /// The GL function-pointer table did not load for the new context.
    #[error("opengl function pointers failed to load (is the context current?)")]
    FunctionLoad,

    /// A GL object factory returned id 0.
    #[error("failed to create {kind} object")]
    ObjectCreation { kind: &'static str },

    /// One or more shader sources failed to load from disk; `log` carries
    /// one line per failed stage. Distinct from [`Error::ShaderCompile`]:
    /// nothing reached the compiler.
    #[error("shader source load failed:\n{log}")]
    ShaderLoad { log: String },

    /// One or more shader stages failed to compile; `log` carries the
    /// driver info logs, one line per failed stage.
    #[error("shader compilation failed:\n{log}")]
    ShaderCompile { log: String },

    /// Program link failed; `log` carries the driver info log.
    #[error("program link failed:\n{log}")]
    ProgramLink { log: String },

    /// `define_texture2d` was called twice on the same texture id.
    /// Immutable storage cannot be redefined; call `recreate()` first.
    #[error("texture storage already defined; call recreate() first")]
    StorageAlreadyDefined,

    /// A file read failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image failed to decode.
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
