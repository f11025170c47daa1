//! File and image loading, with optional background workers.
//!
//! [`defer`] runs a producer on a worker thread when the `background-load`
//! feature is enabled (the default) and inline otherwise, always handing back
//! a [`Pending`] handle so call sites stay feature-agnostic.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "background-load")]
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use gl::types::GLenum;

use crate::error::{Error, Result};

/// Reads a text file, tagging the error with the path.
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a binary file, tagging the error with the path.
pub fn read_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A value that may still be in flight on a worker thread.
///
/// Obtained from [`defer`] or [`Image::load_deferred`]. Consume with
/// [`Pending::wait`], or poll with [`Pending::is_ready`] to overlap loading
/// with other startup work.
pub struct Pending<T> {
    #[cfg(feature = "background-load")]
    rx: Option<Receiver<T>>,
    value: Option<T>,
}

impl<T> Pending<T> {
    /// Wraps an already-computed value.
    pub fn ready(value: T) -> Self {
        Self {
            #[cfg(feature = "background-load")]
            rx: None,
            value: Some(value),
        }
    }

    #[cfg(feature = "background-load")]
    fn waiting(rx: Receiver<T>) -> Self {
        Self {
            rx: Some(rx),
            value: None,
        }
    }

    /// Returns whether the value has arrived, without blocking.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread died before sending its value.
    pub fn is_ready(&mut self) -> bool {
        if self.value.is_some() {
            return true;
        }

        #[cfg(feature = "background-load")]
        if let Some(rx) = &self.rx {
            match rx.try_recv() {
                Ok(value) => {
                    self.value = Some(value);
                    self.rx = None;
                    return true;
                }
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => panic!("loader worker thread died"),
            }
        }

        false
    }

    /// Blocks until the value arrives and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread died before sending its value.
    pub fn wait(self) -> T {
        if let Some(value) = self.value {
            return value;
        }

        #[cfg(feature = "background-load")]
        if let Some(rx) = self.rx {
            return rx.recv().unwrap_or_else(|_| panic!("loader worker thread died"));
        }

        unreachable!("Pending holds either a value or a receiver")
    }
}

/// [`read_to_string`] through [`defer`].
pub fn read_to_string_deferred(path: impl Into<PathBuf>) -> Pending<Result<String>> {
    let path = path.into();
    defer(move || read_to_string(&path))
}

/// [`read_bytes`] through [`defer`].
pub fn read_bytes_deferred(path: impl Into<PathBuf>) -> Pending<Result<Vec<u8>>> {
    let path = path.into();
    defer(move || read_bytes(&path))
}

/// Runs `f` on a worker thread (or inline without `background-load`) and
/// returns a handle to its result.
pub fn defer<T, F>(f: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    #[cfg(feature = "background-load")]
    {
        let (tx, rx) = bounded(1);
        std::thread::spawn(move || {
            // The handle may have been dropped without waiting.
            let _ = tx.send(f());
        });
        Pending::waiting(rx)
    }
    #[cfg(not(feature = "background-load"))]
    {
        Pending::ready(f())
    }
}

/// Waits for every handle, preserving input order.
pub fn join_all<T>(pending: Vec<Pending<T>>) -> Vec<T> {
    pending.into_iter().map(Pending::wait).collect()
}

/// A decoded image in one of GL's tightly packed 8-bit layouts.
pub struct Image {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Channels per pixel, 1 through 4.
    pub channels: u8,
}

impl Image {
    /// Decodes an image from disk, preserving its channel count.
    ///
    /// `flip_vertical` flips rows so the first pixel lands at GL's
    /// bottom-left origin; most assets authored top-left want `true`.
    pub fn load(path: impl AsRef<Path>, flip_vertical: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut img = image::open(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;

        if flip_vertical {
            img = img.flipv();
        }

        let width = img.width();
        let height = img.height();
        let channels = img.color().channel_count();

        let pixels = match channels {
            1 => img.into_luma8().into_raw(),
            2 => img.into_luma_alpha8().into_raw(),
            3 => img.into_rgb8().into_raw(),
            _ => img.into_rgba8().into_raw(),
        };

        Ok(Self {
            pixels,
            width,
            height,
            channels: channels.min(4),
        })
    }

    /// [`Image::load`] through [`defer`].
    pub fn load_deferred(path: impl Into<PathBuf>, flip_vertical: bool) -> Pending<Result<Self>> {
        let path = path.into();
        defer(move || Self::load(path, flip_vertical))
    }

    /// The GL pixel format matching this image's channel count, for
    /// [`Texture::sub_image2d`](crate::Texture::sub_image2d).
    pub fn gl_format(&self) -> GLenum {
        match self.channels {
            1 => gl::RED,
            2 => gl::RG,
            3 => gl::RGB,
            _ => gl::RGBA,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn read_to_string_tags_path() {
        let err = read_to_string("/definitely/not/here.vert").unwrap_err();
        match err {
            Error::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.vert"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn deferred_read_matches_sync_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#version 460 core\nvoid main() {{}}\n").unwrap();
        let path = file.path().to_path_buf();

        let sync = read_to_string(&path).unwrap();
        let deferred = read_to_string_deferred(&path).wait().unwrap();
        assert_eq!(sync, deferred);

        let sync_bytes = read_bytes(&path).unwrap();
        let deferred_bytes = read_bytes_deferred(&path).wait().unwrap();
        assert_eq!(sync_bytes, deferred_bytes);
    }

    #[test]
    fn join_all_preserves_order() {
        let handles = vec![
            defer(|| 1),
            defer(|| 2),
            Pending::ready(3),
            defer(|| 4),
        ];
        assert_eq!(join_all(handles), vec![1, 2, 3, 4]);
    }

    #[test]
    fn ready_is_immediately_available() {
        let mut pending = Pending::ready("done");
        assert!(pending.is_ready());
        assert_eq!(pending.wait(), "done");
    }

    // ── image decoding ──────────────────────────────────────────────────

    fn write_test_png(pixels: &[u8], width: u32, height: u32) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let buf: image::RgbaImage =
            image::ImageBuffer::from_raw(width, height, pixels.to_vec()).unwrap();
        buf.save(file.path()).unwrap();
        file
    }

    #[test]
    fn load_decodes_rgba() {
        let pixels: Vec<u8> = vec![
            255, 0, 0, 255, /* */ 0, 255, 0, 255, // top row
            0, 0, 255, 255, /* */ 255, 255, 255, 255, // bottom row
        ];
        let file = write_test_png(&pixels, 2, 2);

        let img = Image::load(file.path(), false).unwrap();
        assert_eq!((img.width, img.height, img.channels), (2, 2, 4));
        assert_eq!(img.pixels, pixels);
        assert_eq!(img.gl_format(), gl::RGBA);
    }

    #[test]
    fn load_flips_rows() {
        let pixels: Vec<u8> = vec![
            255, 0, 0, 255, /* */ 0, 255, 0, 255, //
            0, 0, 255, 255, /* */ 255, 255, 255, 255, //
        ];
        let file = write_test_png(&pixels, 2, 2);

        let img = Image::load(file.path(), true).unwrap();
        assert_eq!(&img.pixels[..8], &pixels[8..]);
        assert_eq!(&img.pixels[8..], &pixels[..8]);
    }

    #[test]
    fn gl_format_by_channel_count() {
        let fmt = |channels| Image {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            channels,
        }
        .gl_format();

        assert_eq!(fmt(1), gl::RED);
        assert_eq!(fmt(2), gl::RG);
        assert_eq!(fmt(3), gl::RGB);
        assert_eq!(fmt(4), gl::RGBA);
    }
}
