//! Minimal scene: one colored triangle in an 800x600 window.
//!
//! Escape closes the window; resizing adjusts the viewport.

use anyhow::{Context, Result};
use glint::gl;
use glint::glfw::{Action, Key};
use glint::time::Stopwatch;
use glint::{
    AttribType, BufferFlags, ContextConfig, Glint, ShaderSource, ShaderStage, VecData, VecDim,
};

const VERT_SRC: &str = r#"
#version 460 core
layout (location = 0) in vec3 a_pos;

void main() {
    gl_Position = vec4(a_pos, 1.0);
}
"#;

const FRAG_SRC: &str = r#"
#version 460 core
uniform vec4 u_color;
out vec4 frag_color;

void main() {
    frag_color = u_color;
}
"#;

fn main() -> Result<()> {
    glint::logging::init_logging(Default::default());

    let setup = Stopwatch::start();
    let ctx = Glint::init(ContextConfig::default()).context("initializing graphics context")?;
    let mut win = ctx
        .create_window(800, 600, "triangle", false)
        .context("creating window")?;
    win.set_swap_interval(1);

    win.set_key_callback(|win, key, _scancode, action, _mods| {
        if key == Key::Escape && action == Action::Press {
            win.set_should_close(true);
        }
    });
    win.set_framebuffer_size_callback(|_win, width, height| unsafe {
        gl::Viewport(0, 0, width, height);
    });

    let positions: [[f32; 3]; 3] = [
        [-0.5, -0.5, 0.0],
        [0.5, -0.5, 0.0],
        [0.0, 0.5, 0.0],
    ];

    let mut vao = win.create_vertex_array()?;
    vao.define_attrib(0, 0, 3, AttribType::F32, false, 0);
    vao.create_array_buffer(0, &positions, BufferFlags::NONE)?;

    let mut prog = win.create_program()?;
    prog.quick(&[
        (ShaderStage::Vertex, ShaderSource::Code(VERT_SRC)),
        (ShaderStage::Fragment, ShaderSource::Code(FRAG_SRC)),
    ])
    .context("building triangle shaders")?;

    let color_loc = prog.uniform_location("u_color");
    prog.set_uniform_vec(color_loc, VecDim::V4, VecData::F32(&[0.9, 0.4, 0.1, 1.0]), 1);
    log::info!("triangle scene ready in {:?}", setup.elapsed());

    while !win.should_close() {
        win.poll_events();

        unsafe {
            gl::ClearColor(0.1, 0.1, 0.12, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        prog.use_program();
        vao.bind();
        unsafe { gl::DrawArrays(gl::TRIANGLES, 0, 3) };

        win.swap_buffers();
    }

    Ok(())
}
