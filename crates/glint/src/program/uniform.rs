//! Closed uniform-value variants and their GL dispatch.
//!
//! The wrapper targets GL 4.1+ program-targeted uniforms
//! (`glProgramUniform*`), so no program bind is required before setting.
//! Dispatch is a total match over (shape, element type): exactly one native
//! call per arm, no runtime type tagging beyond the variant itself.

use gl::types::{GLsizei, GLuint};

/// A scalar uniform value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Scalar {
    U32(u32),
    I32(i32),
    /// Booleans are set through the signed-integer call, as GLSL requires.
    Bool(bool),
    F32(f32),
    F64(f64),
}

/// Component count of a vector uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VecDim {
    V1,
    V2,
    V3,
    V4,
}

impl VecDim {
    /// Components per vector.
    pub fn len(self) -> usize {
        match self {
            VecDim::V1 => 1,
            VecDim::V2 => 2,
            VecDim::V3 => 3,
            VecDim::V4 => 4,
        }
    }
}

/// Element data for a vector uniform; `count` consecutive vectors are read
/// from the slice.
#[derive(Debug, Copy, Clone)]
pub enum VecData<'a> {
    U32(&'a [u32]),
    I32(&'a [i32]),
    F32(&'a [f32]),
    F64(&'a [f64]),
}

impl VecData<'_> {
    fn len(&self) -> usize {
        match self {
            VecData::U32(v) => v.len(),
            VecData::I32(v) => v.len(),
            VecData::F32(v) => v.len(),
            VecData::F64(v) => v.len(),
        }
    }
}

/// Row × column shape of a matrix uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MatShape {
    M2,
    M2x3,
    M2x4,
    M3x2,
    M3,
    M3x4,
    M4x2,
    M4x3,
    M4,
}

impl MatShape {
    /// Elements per matrix.
    pub fn len(self) -> usize {
        let (rows, cols) = self.dims();
        rows * cols
    }

    pub fn dims(self) -> (usize, usize) {
        match self {
            MatShape::M2 => (2, 2),
            MatShape::M2x3 => (2, 3),
            MatShape::M2x4 => (2, 4),
            MatShape::M3x2 => (3, 2),
            MatShape::M3 => (3, 3),
            MatShape::M3x4 => (3, 4),
            MatShape::M4x2 => (4, 2),
            MatShape::M4x3 => (4, 3),
            MatShape::M4 => (4, 4),
        }
    }
}

/// Element data for a matrix uniform, column-major as GL expects (pass
/// `transpose` for row-major input).
#[derive(Debug, Copy, Clone)]
pub enum MatData<'a> {
    F32(&'a [f32]),
    F64(&'a [f64]),
}

impl MatData<'_> {
    fn len(&self) -> usize {
        match self {
            MatData::F32(m) => m.len(),
            MatData::F64(m) => m.len(),
        }
    }
}

pub(super) fn set_scalar(program: GLuint, loc: i32, value: Scalar) {
    unsafe {
        match value {
            Scalar::U32(v) => gl::ProgramUniform1ui(program, loc, v),
            Scalar::I32(v) => gl::ProgramUniform1i(program, loc, v),
            Scalar::Bool(v) => gl::ProgramUniform1i(program, loc, v as i32),
            Scalar::F32(v) => gl::ProgramUniform1f(program, loc, v),
            Scalar::F64(v) => gl::ProgramUniform1d(program, loc, v),
        }
    }
}

pub(super) fn set_vec(program: GLuint, loc: i32, dim: VecDim, data: VecData<'_>, count: usize) {
    debug_assert!(
        data.len() >= dim.len() * count,
        "uniform vector data too short: {} elements for {count} x {:?}",
        data.len(),
        dim
    );

    let n = count as GLsizei;
    unsafe {
        match (dim, data) {
            (VecDim::V1, VecData::U32(v)) => gl::ProgramUniform1uiv(program, loc, n, v.as_ptr()),
            (VecDim::V1, VecData::I32(v)) => gl::ProgramUniform1iv(program, loc, n, v.as_ptr()),
            (VecDim::V1, VecData::F32(v)) => gl::ProgramUniform1fv(program, loc, n, v.as_ptr()),
            (VecDim::V1, VecData::F64(v)) => gl::ProgramUniform1dv(program, loc, n, v.as_ptr()),

            (VecDim::V2, VecData::U32(v)) => gl::ProgramUniform2uiv(program, loc, n, v.as_ptr()),
            (VecDim::V2, VecData::I32(v)) => gl::ProgramUniform2iv(program, loc, n, v.as_ptr()),
            (VecDim::V2, VecData::F32(v)) => gl::ProgramUniform2fv(program, loc, n, v.as_ptr()),
            (VecDim::V2, VecData::F64(v)) => gl::ProgramUniform2dv(program, loc, n, v.as_ptr()),

            (VecDim::V3, VecData::U32(v)) => gl::ProgramUniform3uiv(program, loc, n, v.as_ptr()),
            (VecDim::V3, VecData::I32(v)) => gl::ProgramUniform3iv(program, loc, n, v.as_ptr()),
            (VecDim::V3, VecData::F32(v)) => gl::ProgramUniform3fv(program, loc, n, v.as_ptr()),
            (VecDim::V3, VecData::F64(v)) => gl::ProgramUniform3dv(program, loc, n, v.as_ptr()),

            (VecDim::V4, VecData::U32(v)) => gl::ProgramUniform4uiv(program, loc, n, v.as_ptr()),
            (VecDim::V4, VecData::I32(v)) => gl::ProgramUniform4iv(program, loc, n, v.as_ptr()),
            (VecDim::V4, VecData::F32(v)) => gl::ProgramUniform4fv(program, loc, n, v.as_ptr()),
            (VecDim::V4, VecData::F64(v)) => gl::ProgramUniform4dv(program, loc, n, v.as_ptr()),
        }
    }
}

pub(super) fn set_mat(
    program: GLuint,
    loc: i32,
    shape: MatShape,
    data: MatData<'_>,
    count: usize,
    transpose: bool,
) {
    debug_assert!(
        data.len() >= shape.len() * count,
        "uniform matrix data too short: {} elements for {count} x {:?}",
        data.len(),
        shape
    );

    let n = count as GLsizei;
    let t = transpose as u8;
    unsafe {
        match (shape, data) {
            (MatShape::M2, MatData::F32(m)) => {
                gl::ProgramUniformMatrix2fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M2x3, MatData::F32(m)) => {
                gl::ProgramUniformMatrix2x3fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M2x4, MatData::F32(m)) => {
                gl::ProgramUniformMatrix2x4fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M3x2, MatData::F32(m)) => {
                gl::ProgramUniformMatrix3x2fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M3, MatData::F32(m)) => {
                gl::ProgramUniformMatrix3fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M3x4, MatData::F32(m)) => {
                gl::ProgramUniformMatrix3x4fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M4x2, MatData::F32(m)) => {
                gl::ProgramUniformMatrix4x2fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M4x3, MatData::F32(m)) => {
                gl::ProgramUniformMatrix4x3fv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M4, MatData::F32(m)) => {
                gl::ProgramUniformMatrix4fv(program, loc, n, t, m.as_ptr())
            }

            (MatShape::M2, MatData::F64(m)) => {
                gl::ProgramUniformMatrix2dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M2x3, MatData::F64(m)) => {
                gl::ProgramUniformMatrix2x3dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M2x4, MatData::F64(m)) => {
                gl::ProgramUniformMatrix2x4dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M3x2, MatData::F64(m)) => {
                gl::ProgramUniformMatrix3x2dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M3, MatData::F64(m)) => {
                gl::ProgramUniformMatrix3dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M3x4, MatData::F64(m)) => {
                gl::ProgramUniformMatrix3x4dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M4x2, MatData::F64(m)) => {
                gl::ProgramUniformMatrix4x2dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M4x3, MatData::F64(m)) => {
                gl::ProgramUniformMatrix4x3dv(program, loc, n, t, m.as_ptr())
            }
            (MatShape::M4, MatData::F64(m)) => {
                gl::ProgramUniformMatrix4dv(program, loc, n, t, m.as_ptr())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_dims() {
        assert_eq!(VecDim::V1.len(), 1);
        assert_eq!(VecDim::V4.len(), 4);
    }

    #[test]
    fn mat_shapes() {
        assert_eq!(MatShape::M2.dims(), (2, 2));
        assert_eq!(MatShape::M3x4.dims(), (3, 4));
        assert_eq!(MatShape::M4x2.len(), 8);
        // Square shapes use the single-number name; M4 is the 4x4 variant
        // callers pair with a 16-element column-major slice.
        assert_eq!(MatShape::M4.dims(), (4, 4));
        assert_eq!(MatShape::M4.len(), 16);
    }

    #[test]
    fn vec_data_len_ignores_variant() {
        assert_eq!(VecData::F32(&[0.0; 8]).len(), 8);
        assert_eq!(VecData::U32(&[0; 3]).len(), 3);
    }
}
