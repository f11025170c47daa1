//! Global library lifecycle.
//!
//! [`Glint`] owns the one-per-process GLFW state: it applies the context
//! version/profile hints before any window exists, registers the error
//! callback, and is the factory for [`Window`]s. Windows and every GPU
//! resource borrow the context, so the borrow checker guarantees nothing
//! survives teardown.

use std::cell::{RefCell, RefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use glfw::{Glfw, OpenGlProfileHint, WindowHint};

use crate::error::{Error, Result};
use crate::window::Window;

/// Context creation parameters.
///
/// The GL version is applied as a window hint and therefore fixed for every
/// window created through this context.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// OpenGL major version. The wrapper's buffer/texture paths use direct
    /// state access, so anything below 4.5 will fail the function-pointer
    /// check at window creation.
    pub gl_major: u32,

    /// OpenGL minor version.
    pub gl_minor: u32,

    /// Request a debug context and install a GL debug-message callback that
    /// forwards driver messages to the log.
    pub debug_context: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            gl_major: 4,
            gl_minor: 6,
            debug_context: cfg!(debug_assertions),
        }
    }
}

// One live context per process. GLFW init/terminate is global state; a second
// concurrent init attempt is rejected rather than silently shared.
static CONTEXT_LIVE: AtomicBool = AtomicBool::new(false);

/// The global graphics/windowing context.
///
/// Construct exactly one per process (or per test run) with [`Glint::init`].
/// Dropping it tears the library down; the context lifetime threaded through
/// [`Window`] and the GPU resource types ensures all of them are gone first.
pub struct Glint {
    glfw: RefCell<Glfw>,
    config: ContextConfig,
}

impl Glint {
    /// Initializes GLFW and applies the version/profile/debug hints.
    ///
    /// Failure is non-fatal to the process: the caller gets an `Err`, the
    /// failure is logged, and no global state is left behind.
    pub fn init(config: ContextConfig) -> Result<Self> {
        if CONTEXT_LIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::error!("context init rejected: another glint context is live");
            return Err(Error::AlreadyInitialized);
        }

        let mut glfw = match glfw::init(error_callback) {
            Ok(glfw) => glfw,
            Err(err) => {
                CONTEXT_LIVE.store(false, Ordering::SeqCst);
                log::error!("failed to initialize glfw: {err:?}");
                return Err(Error::Init(err));
            }
        };

        // Hints apply to every window created afterwards.
        glfw.window_hint(WindowHint::ContextVersion(config.gl_major, config.gl_minor));
        glfw.window_hint(WindowHint::OpenGlProfile(OpenGlProfileHint::Core));
        if config.debug_context {
            glfw.window_hint(WindowHint::OpenGlDebugContext(true));
        }
        #[cfg(target_os = "macos")]
        glfw.window_hint(WindowHint::OpenGlForwardCompat(true));

        log::debug!(
            "initialized glfw for opengl {}.{} core",
            config.gl_major,
            config.gl_minor
        );

        Ok(Self {
            glfw: RefCell::new(glfw),
            config,
        })
    }

    /// Creates a window with its own GL context.
    ///
    /// `fullscreen` targets the primary monitor. The new window's context is
    /// made current on the calling thread and its function-pointer table is
    /// loaded before this returns.
    pub fn create_window(
        &self,
        width: u32,
        height: u32,
        title: &str,
        fullscreen: bool,
    ) -> Result<Window<'_>> {
        Window::create(self, width, height, title, fullscreen, None)
    }

    /// Creates a window whose GL objects are shared with `share`'s context.
    ///
    /// Beyond what the native API guarantees for shared contexts, the two
    /// windows' command streams are not synchronized with each other.
    pub fn create_window_shared<'g>(
        &'g self,
        width: u32,
        height: u32,
        title: &str,
        fullscreen: bool,
        share: &Window<'_>,
    ) -> Result<Window<'g>> {
        Window::create(self, width, height, title, fullscreen, Some(share))
    }

    pub(crate) fn glfw_mut(&self) -> RefMut<'_, Glfw> {
        self.glfw.borrow_mut()
    }

    pub(crate) fn config(&self) -> &ContextConfig {
        &self.config
    }
}

impl Drop for Glint {
    fn drop(&mut self) {
        // The glfw handle terminates the library when it drops below; this
        // just releases the process-wide guard and leaves a trail.
        CONTEXT_LIVE.store(false, Ordering::SeqCst);
        log::debug!("terminated glfw");
    }
}

/// GLFW error callback: `[error-code]: message`.
fn error_callback(err: glfw::Error, description: String) {
    log::error!("[{err:?}]: {description}");
}
