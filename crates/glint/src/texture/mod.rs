//! Texture objects.
//!
//! Lifecycle: created → parameterized → storage defined → data uploaded →
//! (mipmapped). Storage is immutable once defined; [`Texture::recreate`]
//! rebuilds the id in place for callers that need to start over.

use std::marker::PhantomData;

use gl::types::{GLenum, GLfloat, GLint, GLsizei, GLuint};

use crate::error::{Error, Result};

/// Texture target / dimensionality.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureTarget {
    T1d,
    T2d,
    T3d,
    T1dArray,
    T2dArray,
    CubeMap,
    Rectangle,
}

impl TextureTarget {
    pub(crate) fn gl_enum(self) -> GLenum {
        match self {
            TextureTarget::T1d => gl::TEXTURE_1D,
            TextureTarget::T2d => gl::TEXTURE_2D,
            TextureTarget::T3d => gl::TEXTURE_3D,
            TextureTarget::T1dArray => gl::TEXTURE_1D_ARRAY,
            TextureTarget::T2dArray => gl::TEXTURE_2D_ARRAY,
            TextureTarget::CubeMap => gl::TEXTURE_CUBE_MAP,
            TextureTarget::Rectangle => gl::TEXTURE_RECTANGLE,
        }
    }
}

/// A scalar texture parameter value; the variant picks the integer or float
/// native call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParamValue {
    /// `glTextureParameteri`. GL enum values (e.g. `gl::LINEAR`) are passed
    /// here cast to `i32`.
    I32(GLint),
    /// `glTextureParameterf`.
    F32(GLfloat),
}

/// A vector texture parameter value (e.g. `gl::TEXTURE_BORDER_COLOR`).
#[derive(Debug, Copy, Clone)]
pub enum ParamVec<'a> {
    /// `glTextureParameteriv`: integers converted to the parameter's type.
    I32(&'a [GLint]),
    /// `glTextureParameterIiv`: integers stored as integers.
    I32Strict(&'a [GLint]),
    /// `glTextureParameterIuiv`.
    U32(&'a [GLuint]),
    /// `glTextureParameterfv`.
    F32(&'a [GLfloat]),
}

/// One GPU texture object of a fixed target.
///
/// Created through [`Window::create_texture`](crate::Window); only valid
/// while the creating window's context is current on the calling thread.
/// Texture unit indices are caller-managed and must agree with the sampler
/// uniform values set on the program.
pub struct Texture<'g> {
    id: GLuint,
    target: TextureTarget,
    storage_defined: bool,
    _ctx: PhantomData<&'g ()>,
}

impl<'g> Texture<'g> {
    pub(crate) fn create(target: TextureTarget) -> Result<Self> {
        let id = new_texture_id(target)?;
        Ok(Self {
            id,
            target,
            storage_defined: false,
            _ctx: PhantomData,
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// Deletes and rebuilds the texture id in place, preserving only the
    /// target. Parameters, storage, and data must all be redefined.
    pub fn recreate(&mut self) -> Result<()> {
        unsafe { gl::DeleteTextures(1, &self.id) };
        log::debug!("deleted texture #{}", self.id);

        self.id = new_texture_id(self.target)?;
        self.storage_defined = false;
        Ok(())
    }

    /// Binds this texture to `unit` for subsequent draw calls.
    ///
    /// GL guarantees at least 16 units; the actual maximum is
    /// driver-dependent.
    pub fn bind_unit(&self, unit: u32) {
        unsafe { gl::BindTextureUnit(unit, self.id) };
    }

    /// Sets a scalar filtering/wrap parameter.
    pub fn set_param(&mut self, param: GLenum, value: ParamValue) {
        unsafe {
            match value {
                ParamValue::I32(v) => gl::TextureParameteri(self.id, param, v),
                ParamValue::F32(v) => gl::TextureParameterf(self.id, param, v),
            }
        }
    }

    /// Sets a vector parameter.
    pub fn set_param_vec(&mut self, param: GLenum, value: ParamVec<'_>) {
        unsafe {
            match value {
                ParamVec::I32(v) => gl::TextureParameteriv(self.id, param, v.as_ptr()),
                ParamVec::I32Strict(v) => gl::TextureParameterIiv(self.id, param, v.as_ptr()),
                ParamVec::U32(v) => gl::TextureParameterIuiv(self.id, param, v.as_ptr()),
                ParamVec::F32(v) => gl::TextureParameterfv(self.id, param, v.as_ptr()),
            }
        }
    }

    /// Allocates immutable storage for a 2D texture.
    ///
    /// Storage cannot be redefined: a second call returns
    /// [`Error::StorageAlreadyDefined`] instead of hitting native undefined
    /// behavior. Use [`Texture::recreate`] to start over.
    pub fn define_texture2d(
        &mut self,
        levels: u32,
        internal_format: GLenum,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if self.storage_defined {
            log::error!(
                "texture #{}: storage already defined; recreate() first",
                self.id
            );
            return Err(Error::StorageAlreadyDefined);
        }

        unsafe {
            gl::TextureStorage2D(
                self.id,
                levels as GLsizei,
                internal_format,
                width as GLsizei,
                height as GLsizei,
            );
        }
        self.storage_defined = true;

        log::debug!(
            "texture #{}: defined {width}x{height} storage, {levels} level(s)",
            self.id
        );
        Ok(())
    }

    /// Uploads pixel data into previously allocated storage.
    ///
    /// No bounds checking against the declared storage size happens at this
    /// layer; an out-of-range upload is a native error, surfaced through the
    /// debug callback when a debug context is active. GL's default unpack
    /// alignment (4 bytes per row) is left untouched; tightly packed RGB
    /// rows of odd width need `gl::PixelStorei` from the caller.
    pub fn sub_image2d(
        &mut self,
        level: u32,
        xoffset: i32,
        yoffset: i32,
        width: u32,
        height: u32,
        format: GLenum,
        pixel_type: GLenum,
        pixels: &[u8],
    ) {
        unsafe {
            gl::TextureSubImage2D(
                self.id,
                level as GLint,
                xoffset,
                yoffset,
                width as GLsizei,
                height as GLsizei,
                format,
                pixel_type,
                pixels.as_ptr().cast(),
            );
        }
    }

    /// Generates the mip chain from level 0.
    pub fn gen_mipmap(&mut self) {
        unsafe { gl::GenerateTextureMipmap(self.id) };
    }
}

impl Drop for Texture<'_> {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.id) };
        log::debug!("deleted texture #{}", self.id);
    }
}

fn new_texture_id(target: TextureTarget) -> Result<GLuint> {
    let mut id = 0;
    unsafe { gl::CreateTextures(target.gl_enum(), 1, &mut id) };

    if id == 0 {
        log::error!("failed to create texture");
        return Err(Error::ObjectCreation { kind: "texture" });
    }

    log::debug!("created texture #{id} ({target:?})");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_gl_enums() {
        assert_eq!(TextureTarget::T2d.gl_enum(), gl::TEXTURE_2D);
        assert_eq!(TextureTarget::CubeMap.gl_enum(), gl::TEXTURE_CUBE_MAP);
        assert_eq!(TextureTarget::Rectangle.gl_enum(), gl::TEXTURE_RECTANGLE);
    }
}
