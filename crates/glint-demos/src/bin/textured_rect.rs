//! Rotating textured quad with live shader reload.
//!
//! Shaders live on disk next to this crate; edit them and press R while the
//! window is focused to see the change without restarting. A failed reload
//! keeps the last working program on screen.

use std::path::Path;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glint::gl;
use glint::glfw::{Action, Key};
use glint::time::{FrameClock, Stopwatch};
use glint::{
    AttribType, BufferFlags, ContextConfig, Glint, MatData, MatShape, ParamValue, Scalar,
    ShaderSource, ShaderStage, TextureTarget,
};

const VERT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/rect.vert");
const FRAG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/rect.frag");

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    pos: [f32; 3],
    uv: [f32; 2],
}

const VERTICES: [Vertex; 4] = [
    Vertex { pos: [-0.5, -0.5, 0.0], uv: [0.0, 0.0] },
    Vertex { pos: [0.5, -0.5, 0.0], uv: [1.0, 0.0] },
    Vertex { pos: [0.5, 0.5, 0.0], uv: [1.0, 1.0] },
    Vertex { pos: [-0.5, 0.5, 0.0], uv: [0.0, 1.0] },
];

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// An 8x8 two-tone checkerboard, tightly packed RGBA.
fn checkerboard() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(8 * 8 * 4);
    for y in 0..8u32 {
        for x in 0..8u32 {
            let white = (x + y) % 2 == 0;
            let v = if white { 230 } else { 40 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

fn main() -> Result<()> {
    glint::logging::init_logging(Default::default());

    let ctx = Glint::init(ContextConfig::default()).context("initializing graphics context")?;
    let mut win = ctx
        .create_window(800, 600, "textured rect", false)
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

    let mut vao = win.create_vertex_array()?;
    vao.define_attrib(0, 0, 3, AttribType::F32, false, 0);
    vao.define_attrib(0, 1, 2, AttribType::F32, false, 12);
    vao.create_array_buffer(0, &VERTICES, BufferFlags::NONE)?;
    vao.create_element_buffer(&INDICES, BufferFlags::NONE)?;

    let stages = [
        (ShaderStage::Vertex, ShaderSource::Path(Path::new(VERT_PATH))),
        (ShaderStage::Fragment, ShaderSource::Path(Path::new(FRAG_PATH))),
    ];
    let mut prog = win.create_program()?;
    let build = Stopwatch::start();
    prog.quick(&stages).context("building rect shaders")?;
    log::info!("built rect shaders in {:?}", build.elapsed());

    let mut tex = win.create_texture(TextureTarget::T2d)?;
    tex.set_param(gl::TEXTURE_WRAP_S, ParamValue::I32(gl::REPEAT as i32));
    tex.set_param(gl::TEXTURE_WRAP_T, ParamValue::I32(gl::REPEAT as i32));
    tex.set_param(
        gl::TEXTURE_MIN_FILTER,
        ParamValue::I32(gl::NEAREST_MIPMAP_LINEAR as i32),
    );
    tex.set_param(gl::TEXTURE_MAG_FILTER, ParamValue::I32(gl::NEAREST as i32));
    tex.define_texture2d(4, gl::RGBA8, 8, 8)?;
    tex.sub_image2d(0, 0, 0, 8, 8, gl::RGBA, gl::UNSIGNED_BYTE, &checkerboard());
    tex.gen_mipmap();
    tex.bind_unit(0);

    prog.set_uniform(prog.uniform_location("u_tex"), Scalar::I32(0));
    let mut transform_loc = prog.uniform_location("u_transform");

    let mut clock = FrameClock::new();
    let mut r_was_down = false;

    while !win.should_close() {
        win.poll_events();

        // Edge-triggered reload so holding R does not rebuild every frame.
        let r_down = win.get_key(Key::R) == Action::Press;
        if r_down && !r_was_down {
            let rebuild = Stopwatch::start();
            match prog.reload(&stages) {
                Ok(()) => {
                    log::info!("reloaded rect shaders in {:?}", rebuild.elapsed());
                    // Locations may move across a relink.
                    prog.set_uniform(prog.uniform_location("u_tex"), Scalar::I32(0));
                    transform_loc = prog.uniform_location("u_transform");
                    clock.reset();
                }
                Err(err) => log::warn!("shader reload failed, keeping old program: {err}"),
            }
        }
        r_was_down = r_down;

        let ft = clock.tick();
        let transform = glam::Mat4::from_rotation_z(ft.elapsed * 0.8);
        prog.set_uniform_mat(
            transform_loc,
            MatShape::M4,
            MatData::F32(&transform.to_cols_array()),
            1,
            false,
        );

        unsafe {
            gl::ClearColor(0.1, 0.1, 0.12, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        prog.use_program();
        vao.bind();
        unsafe { gl::DrawElements(gl::TRIANGLES, 6, gl::UNSIGNED_INT, std::ptr::null()) };

        win.swap_buffers();
    }

    Ok(())
}
