//! Vertex arrays and the buffers they own.
//!
//! A [`VertexArray`] owns its GL array buffers and the optional element
//! buffer; dropping it releases everything in dependency order (buffers, then
//! element buffer, then the array object itself).

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use gl::types::{GLbitfield, GLenum, GLintptr, GLsizei, GLsizeiptr, GLuint};

use crate::error::{Error, Result};

/// Per-component data type of a vertex attribute.
///
/// The variant decides which attribute-format path is used: integer types are
/// decoded integer-preserving, `F64` double-precision, and `F32` as floats
/// (optionally normalized). Exactly one path per variant.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttribType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl AttribType {
    pub(crate) fn gl_enum(self) -> GLenum {
        match self {
            AttribType::I8 => gl::BYTE,
            AttribType::U8 => gl::UNSIGNED_BYTE,
            AttribType::I16 => gl::SHORT,
            AttribType::U16 => gl::UNSIGNED_SHORT,
            AttribType::I32 => gl::INT,
            AttribType::U32 => gl::UNSIGNED_INT,
            AttribType::F32 => gl::FLOAT,
            AttribType::F64 => gl::DOUBLE,
        }
    }

    /// Whether the attribute is decoded through the integer-preserving path.
    pub(crate) fn is_integer(self) -> bool {
        !matches!(self, AttribType::F32 | AttribType::F64)
    }
}

/// Storage flags for immutable buffer allocation, forwarded to
/// `glNamedBufferStorage`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferFlags(pub GLbitfield);

impl BufferFlags {
    pub const NONE: BufferFlags = BufferFlags(0);
    pub const MAP_READ: BufferFlags = BufferFlags(gl::MAP_READ_BIT);
    pub const MAP_WRITE: BufferFlags = BufferFlags(gl::MAP_WRITE_BIT);
    pub const DYNAMIC_STORAGE: BufferFlags = BufferFlags(gl::DYNAMIC_STORAGE_BIT);
    pub const CLIENT_STORAGE: BufferFlags = BufferFlags(gl::CLIENT_STORAGE_BIT);
}

impl std::ops::BitOr for BufferFlags {
    type Output = BufferFlags;

    fn bitor(self, rhs: BufferFlags) -> BufferFlags {
        BufferFlags(self.0 | rhs.0)
    }
}

struct ArrayBuffer {
    id: GLuint,
    stride: GLsizei,
}

/// A vertex array object plus the GL buffers bound into it.
///
/// Created through [`Window::create_vertex_array`](crate::Window); only valid
/// while the creating window's context is current on the calling thread.
pub struct VertexArray<'g> {
    id: GLuint,
    array_buffers: HashMap<u32, ArrayBuffer>,
    element_buffer: Option<GLuint>,

    // Binding indices with a declared attribute format, so buffer creation
    // can flag format-then-data ordering violations.
    declared: HashSet<u32>,

    _ctx: PhantomData<&'g ()>,
}

impl<'g> VertexArray<'g> {
    pub(crate) fn create() -> Result<Self> {
        let mut id = 0;
        unsafe { gl::CreateVertexArrays(1, &mut id) };

        if id == 0 {
            log::error!("failed to create vertex array");
            return Err(Error::ObjectCreation {
                kind: "vertex array",
            });
        }

        log::debug!("created vao #{id}");

        Ok(Self {
            id,
            array_buffers: HashMap::new(),
            element_buffer: None,
            declared: HashSet::new(),
            _ctx: PhantomData,
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Declares how attribute `attrib_index` is decoded from the buffer bound
    /// at `binding_index`.
    ///
    /// `count` is components per vertex (e.g. 3 for a position vec3) and
    /// `relative_offset` the attribute's byte offset within one vertex.
    /// `normalized` only applies to the `F32` path.
    ///
    /// Must be called before `create_array_buffer` for the same binding
    /// index; the reverse order is undefined at the native level.
    pub fn define_attrib(
        &mut self,
        binding_index: u32,
        attrib_index: u32,
        count: i32,
        data_type: AttribType,
        normalized: bool,
        relative_offset: u32,
    ) {
        unsafe {
            gl::EnableVertexArrayAttrib(self.id, attrib_index);

            if data_type.is_integer() {
                gl::VertexArrayAttribIFormat(
                    self.id,
                    attrib_index,
                    count,
                    data_type.gl_enum(),
                    relative_offset,
                );
            } else if data_type == AttribType::F64 {
                gl::VertexArrayAttribLFormat(
                    self.id,
                    attrib_index,
                    count,
                    data_type.gl_enum(),
                    relative_offset,
                );
            } else {
                gl::VertexArrayAttribFormat(
                    self.id,
                    attrib_index,
                    count,
                    data_type.gl_enum(),
                    normalized as u8,
                    relative_offset,
                );
            }

            gl::VertexArrayAttribBinding(self.id, attrib_index, binding_index);
        }

        self.declared.insert(binding_index);

        log::debug!(
            "vao #{}: defined attribute {attrib_index} on binding {binding_index}",
            self.id
        );
    }

    /// Allocates immutable storage for `data`, uploads it, and binds the
    /// buffer at `binding_index` with a per-vertex stride of `size_of::<T>()`.
    pub fn create_array_buffer<T: bytemuck::Pod>(
        &mut self,
        binding_index: u32,
        data: &[T],
        flags: BufferFlags,
    ) -> Result<()> {
        self.create_array_buffer_strided(binding_index, data, size_of::<T>() as GLsizei, 0, flags)
    }

    /// Like [`create_array_buffer`](Self::create_array_buffer) with an
    /// explicit stride and byte offset into the buffer.
    ///
    /// A stride of 0 makes every vertex read the same data (e.g. a constant
    /// color). Reusing a binding index deletes the displaced GL buffer.
    pub fn create_array_buffer_strided<T: bytemuck::Pod>(
        &mut self,
        binding_index: u32,
        data: &[T],
        stride: GLsizei,
        offset: GLintptr,
        flags: BufferFlags,
    ) -> Result<()> {
        if !self.declared.contains(&binding_index) {
            log::warn!(
                "vao #{}: buffer created for binding {binding_index} before any attribute format \
                 was declared for it",
                self.id
            );
        }

        let bytes: &[u8] = bytemuck::cast_slice(data);
        let id = create_storage_buffer(self.id, "array", bytes, flags)?;

        unsafe {
            gl::VertexArrayVertexBuffer(self.id, binding_index, id, offset, stride);
        }

        if let Some(prev) = self.array_buffers.insert(binding_index, ArrayBuffer { id, stride }) {
            unsafe { gl::DeleteBuffers(1, &prev.id) };
            log::debug!(
                "vao #{}: deleted displaced array buffer #{} from binding {binding_index}",
                self.id,
                prev.id
            );
        }

        log::debug!(
            "vao #{}: created array buffer #{id} on binding {binding_index} ({} bytes)",
            self.id,
            bytes.len()
        );

        Ok(())
    }

    /// Allocates and uploads the index buffer. At most one per vertex array;
    /// a second call deletes the previous GL buffer before recording the new
    /// one.
    pub fn create_element_buffer<T: bytemuck::Pod>(
        &mut self,
        data: &[T],
        flags: BufferFlags,
    ) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let id = create_storage_buffer(self.id, "element", bytes, flags)?;

        unsafe {
            gl::VertexArrayElementBuffer(self.id, id);
        }

        if let Some(prev) = self.element_buffer.replace(id) {
            unsafe { gl::DeleteBuffers(1, &prev) };
            log::debug!("vao #{}: deleted displaced element buffer #{prev}", self.id);
        }

        log::debug!(
            "vao #{}: created element buffer #{id} ({} bytes)",
            self.id,
            bytes.len()
        );

        Ok(())
    }

    /// Makes this vertex array active for subsequent draw calls on the
    /// current thread's context.
    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id) };
    }
}

impl Drop for VertexArray<'_> {
    fn drop(&mut self) {
        for (binding_index, buffer) in &self.array_buffers {
            unsafe { gl::DeleteBuffers(1, &buffer.id) };
            log::debug!(
                "vao #{}: deleted array buffer #{} (binding {binding_index})",
                self.id,
                buffer.id
            );
        }

        if let Some(id) = self.element_buffer {
            unsafe { gl::DeleteBuffers(1, &id) };
            log::debug!("vao #{}: deleted element buffer #{id}", self.id);
        }

        unsafe { gl::DeleteVertexArrays(1, &self.id) };
        log::debug!("deleted vao #{}", self.id);
    }
}

/// Creates a GL buffer with immutable storage holding `bytes`.
fn create_storage_buffer(
    vao_id: GLuint,
    kind: &'static str,
    bytes: &[u8],
    flags: BufferFlags,
) -> Result<GLuint> {
    let mut id = 0;
    unsafe { gl::CreateBuffers(1, &mut id) };

    if id == 0 {
        log::error!("vao #{vao_id}: failed to create {kind} buffer");
        return Err(Error::ObjectCreation { kind: "buffer" });
    }

    unsafe {
        gl::NamedBufferStorage(
            id,
            bytes.len() as GLsizeiptr,
            bytes.as_ptr().cast(),
            flags.0,
        );
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_types_use_integer_path() {
        for ty in [
            AttribType::I8,
            AttribType::U8,
            AttribType::I16,
            AttribType::U16,
            AttribType::I32,
            AttribType::U32,
        ] {
            assert!(ty.is_integer(), "{ty:?} should decode integer-preserving");
        }
    }

    #[test]
    fn float_types_do_not_use_integer_path() {
        assert!(!AttribType::F32.is_integer());
        assert!(!AttribType::F64.is_integer());
    }

    #[test]
    fn gl_enum_mapping() {
        assert_eq!(AttribType::F32.gl_enum(), gl::FLOAT);
        assert_eq!(AttribType::F64.gl_enum(), gl::DOUBLE);
        assert_eq!(AttribType::U8.gl_enum(), gl::UNSIGNED_BYTE);
        assert_eq!(AttribType::I32.gl_enum(), gl::INT);
    }

    #[test]
    fn buffer_flags_combine() {
        let flags = BufferFlags::MAP_READ | BufferFlags::DYNAMIC_STORAGE;
        assert_eq!(flags.0, gl::MAP_READ_BIT | gl::DYNAMIC_STORAGE_BIT);
        assert_eq!(BufferFlags::NONE.0, 0);
    }
}
