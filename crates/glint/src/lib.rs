//! Thin, safe wrapper over OpenGL 4.5+ direct state access and GLFW.
//!
//! `glint` owns the boilerplate of real-time GL work — context and window
//! lifecycle, buffer and vertex-array management, shader compilation and
//! linking, uniform setting, texture upload — and leaves the rendering
//! algorithm to the caller. Draw calls themselves stay raw: the `gl` crate is
//! re-exported and callers issue `gl::DrawArrays` and friends directly.
//!
//! The ownership story is deliberately simple. A [`Glint`] context is created
//! once per process; windows and every GPU resource borrow it, so nothing can
//! outlive the library teardown. Within a scene, destroying resources before
//! their window is ordinary declaration-order discipline — locals drop in
//! reverse order, which is exactly the order GL wants.
//!
//! ```no_run
//! # fn main() -> glint::Result<()> {
//! let ctx = glint::Glint::init(glint::ContextConfig::default())?;
//! let mut win = ctx.create_window(800, 600, "demo", false)?;
//! let mut vao = win.create_vertex_array()?;
//! let mut prog = win.create_program()?;
//! # Ok(()) }
//! ```

pub mod context;
pub mod loader;
pub mod logging;
pub mod program;
pub mod texture;
pub mod time;
pub mod vertex;
pub mod window;

mod error;

pub use context::{ContextConfig, Glint};
pub use error::{Error, Result};
pub use program::{MatData, MatShape, Program, Scalar, ShaderSource, ShaderStage, VecData, VecDim};
pub use texture::{ParamValue, ParamVec, Texture, TextureTarget};
pub use vertex::{AttribType, BufferFlags, VertexArray};
pub use window::Window;

// Callers need the raw APIs for draw calls, GL constants, and input types.
pub use gl;
pub use glfw;
