//! Window + context ownership.
//!
//! A [`Window`] owns one native window/GL-context pair and is the factory for
//! the GPU resources that live against that context. Input is exposed both as
//! direct polling (`get_key`, `get_cursor_position`) and as native callbacks
//! that run synchronously inside [`Window::poll_events`].

use std::ffi::c_void;

use gl::types::{GLchar, GLenum, GLsizei, GLuint};
use glfw::{Action, Context as _, GlfwReceiver, Key, Modifiers, MouseButton, PWindow, Scancode,
           SwapInterval, WindowEvent, WindowMode};

use crate::context::Glint;
use crate::error::{Error, Result};
use crate::program::Program;
use crate::texture::{Texture, TextureTarget};
use crate::vertex::VertexArray;

/// One native window and its GL context.
///
/// GPU resources created through this window are valid only while its context
/// is current on the calling thread; context currency is thread-local and
/// transferred with [`Window::make_current`].
pub struct Window<'g> {
    ctx: &'g Glint,
    win: PWindow,

    // Unbuffered callbacks are used for input, so the receiver stays empty;
    // it is kept alive because glfw hands it out alongside the window.
    _events: GlfwReceiver<(f64, WindowEvent)>,

    width: u32,
    height: u32,
    title: String,
}

impl<'g> Window<'g> {
    pub(crate) fn create(
        ctx: &'g Glint,
        width: u32,
        height: u32,
        title: &str,
        fullscreen: bool,
        share: Option<&Window<'_>>,
    ) -> Result<Self> {
        let mut glfw = ctx.glfw_mut();

        let created = match (share, fullscreen) {
            (Some(share), true) => glfw.with_primary_monitor(|_, monitor| {
                let mode = monitor.as_deref().map_or(WindowMode::Windowed, WindowMode::FullScreen);
                share.win.create_shared(width, height, title, mode)
            }),
            (Some(share), false) => share.win.create_shared(width, height, title, WindowMode::Windowed),
            (None, true) => glfw.with_primary_monitor(|glfw, monitor| {
                let mode = monitor.as_deref().map_or(WindowMode::Windowed, WindowMode::FullScreen);
                glfw.create_window(width, height, title, mode)
            }),
            (None, false) => glfw.create_window(width, height, title, WindowMode::Windowed),
        };
        drop(glfw);

        let (mut win, events) = match created {
            Some(pair) => pair,
            None => {
                log::error!("failed to create window \"{title}\"");
                return Err(Error::WindowCreation {
                    title: title.to_string(),
                });
            }
        };

        // Exactly one thread may hold a context; the creating thread takes it.
        win.make_current();
        gl::load_with(|symbol| win.get_proc_address(symbol) as *const _);

        // The buffer/texture paths are written against direct state access,
        // so probe a couple of 4.5 entry points instead of trusting the load.
        if !gl::CreateVertexArrays::is_loaded() || !gl::NamedBufferStorage::is_loaded() {
            log::error!("opengl 4.5 function pointers failed to load for \"{title}\"");
            return Err(Error::FunctionLoad);
        }

        if ctx.config().debug_context && gl::DebugMessageCallback::is_loaded() {
            unsafe {
                gl::Enable(gl::DEBUG_OUTPUT);
                gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
                gl::DebugMessageCallback(Some(gl_debug_callback), std::ptr::null());
            }
        }

        log::debug!("created window \"{title}\" ({width}x{height})");

        Ok(Self {
            ctx,
            win,
            _events: events,
            width,
            height,
            title: title.to_string(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Cooperative shutdown flag, polled once per frame by the caller's loop.
    pub fn should_close(&self) -> bool {
        self.win.should_close()
    }

    pub fn set_should_close(&mut self, close: bool) {
        self.win.set_should_close(close);
    }

    /// Rebinds this window's context to the calling thread.
    ///
    /// Required before issuing GL calls from a thread that does not already
    /// hold the context; exactly one thread may hold it at a time.
    pub fn make_current(&mut self) {
        self.win.make_current();
    }

    /// Processes pending events, running registered callbacks synchronously
    /// on the calling thread.
    pub fn poll_events(&mut self) {
        self.ctx.glfw_mut().poll_events();
    }

    /// Presents the completed frame.
    pub fn swap_buffers(&mut self) {
        self.win.swap_buffers();
    }

    /// Sets the presentation interval for the current context.
    ///
    /// 0 requests immediate swaps; n > 0 requests presentation synced to
    /// every n-th vertical refresh. Drivers may override either; this is a
    /// request, not a guarantee.
    pub fn set_swap_interval(&mut self, interval: u32) {
        let interval = match interval {
            0 => SwapInterval::None,
            n => SwapInterval::Sync(n),
        };
        self.ctx.glfw_mut().set_swap_interval(interval);
    }

    /// Current cursor position in screen coordinates.
    pub fn get_cursor_position(&self) -> (f64, f64) {
        self.win.get_cursor_pos()
    }

    pub fn get_key(&self, key: Key) -> Action {
        self.win.get_key(key)
    }

    pub fn get_mouse_button(&self, button: MouseButton) -> Action {
        self.win.get_mouse_button(button)
    }

    /// Registers the framebuffer-resize callback. One callback per slot is
    /// active at a time; registering again replaces the previous one.
    pub fn set_framebuffer_size_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut glfw::Window, i32, i32) + 'static,
    {
        self.win.set_framebuffer_size_callback(callback);
    }

    /// Registers the key callback. Last registration wins.
    pub fn set_key_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut glfw::Window, Key, Scancode, Action, Modifiers) + 'static,
    {
        self.win.set_key_callback(callback);
    }

    /// Registers the cursor-position callback. Last registration wins.
    pub fn set_cursor_position_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut glfw::Window, f64, f64) + 'static,
    {
        self.win.set_cursor_pos_callback(callback);
    }

    /// Registers the mouse-button callback. Last registration wins.
    pub fn set_mouse_button_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut glfw::Window, MouseButton, Action, Modifiers) + 'static,
    {
        self.win.set_mouse_button_callback(callback);
    }

    /// Creates a vertex array against this window's context.
    ///
    /// Declare attribute formats with `define_attrib` before creating the
    /// array buffer for the same binding index; the underlying API requires
    /// format-then-data ordering.
    pub fn create_vertex_array(&self) -> Result<VertexArray<'g>> {
        VertexArray::create()
    }

    /// Creates an empty shader program against this window's context.
    pub fn create_program(&self) -> Result<Program<'g>> {
        Program::create()
    }

    /// Creates a texture object for `target` against this window's context.
    pub fn create_texture(&self, target: TextureTarget) -> Result<Texture<'g>> {
        Texture::create(target)
    }
}

impl Drop for Window<'_> {
    fn drop(&mut self) {
        log::debug!("destroyed window \"{}\"", self.title);
    }
}

/// Forwards GL debug messages to the log, mapped by severity.
extern "system" fn gl_debug_callback(
    source: GLenum,
    _gltype: GLenum,
    id: GLuint,
    severity: GLenum,
    _length: GLsizei,
    message: *const GLchar,
    _user: *mut c_void,
) {
    let message = unsafe { std::ffi::CStr::from_ptr(message) }.to_string_lossy();

    let source = match source {
        gl::DEBUG_SOURCE_API => "api",
        gl::DEBUG_SOURCE_WINDOW_SYSTEM => "window system",
        gl::DEBUG_SOURCE_SHADER_COMPILER => "shader compiler",
        gl::DEBUG_SOURCE_THIRD_PARTY => "third party",
        gl::DEBUG_SOURCE_APPLICATION => "application",
        _ => "other",
    };

    match severity {
        gl::DEBUG_SEVERITY_HIGH => log::error!("[gl {source}] #{id}: {message}"),
        gl::DEBUG_SEVERITY_MEDIUM => log::warn!("[gl {source}] #{id}: {message}"),
        gl::DEBUG_SEVERITY_LOW => log::info!("[gl {source}] #{id}: {message}"),
        _ => log::debug!("[gl {source}] #{id}: {message}"),
    }
}
