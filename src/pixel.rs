//! Owned image buffers passed between the cascade stages.
//!
//! Every transform reads a `PixelBuffer` and returns a new one, so a frame
//! can be shared by reference across strategies without copies or locks.

use std::borrow::Cow;

use crate::error::{CascadeError, Result};
use crate::luma::rgba_to_greyscale;

/// Channel layout of a `PixelBuffer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One byte per pixel (luminance or binary 0/255).
    Gray,
    /// Interleaved R, G, B, A.
    Rgba,
}

impl Layout {
    pub fn channels(self) -> usize {
        match self {
            Layout::Gray => 1,
            Layout::Rgba => 4,
        }
    }
}

/// Contiguous image with `data.len() == width * height * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    layout: Layout,
    data: Vec<u8>,
}

/// Byte length implied by the dimensions, or `None` on overflow.
pub(crate) fn expected_len(width: usize, height: usize, layout: Layout) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(layout.channels())
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, layout: Layout, data: Vec<u8>) -> Result<Self> {
        match expected_len(width, height, layout) {
            Some(expected) if expected == data.len() => Ok(Self {
                width,
                height,
                layout,
                data,
            }),
            Some(expected) => Err(CascadeError::DimensionMismatch {
                expected,
                actual: data.len(),
            }),
            None => Err(CascadeError::DimensionMismatch {
                expected: usize::MAX,
                actual: data.len(),
            }),
        }
    }

    /// Copy an RGBA slice into a validated buffer.
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, Layout::Rgba, rgba.to_vec())
    }

    pub fn from_gray(gray: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, Layout::Gray, gray)
    }

    /// Build a buffer from a plane whose length the caller computed from
    /// the same dimensions. Internal transforms always satisfy this.
    pub(crate) fn gray_unchecked(gray: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(gray.len(), width * height);
        Self {
            width,
            height,
            layout: Layout::Gray,
            data: gray,
        }
    }

    /// Expand a luminance plane into RGBA with R=G=B and opaque alpha.
    pub(crate) fn gray_to_rgba(gray: &[u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(gray.len(), width * height);
        let mut data = Vec::with_capacity(gray.len() * 4);
        for &v in gray {
            data.extend_from_slice(&[v, v, v, 255]);
        }
        Self {
            width,
            height,
            layout: Layout::Rgba,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Single-channel view: borrowed for `Gray`, converted for `Rgba`.
    pub fn luma(&self) -> Cow<'_, [u8]> {
        match self.layout {
            Layout::Gray => Cow::Borrowed(&self.data),
            Layout::Rgba => Cow::Owned(rgba_to_greyscale(&self.data, self.width, self.height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_and_long_buffers() {
        for len in [0usize, 15, 17, 64] {
            let err = PixelBuffer::new(2, 2, Layout::Rgba, vec![0; len]).unwrap_err();
            match err {
                CascadeError::DimensionMismatch { expected, actual } => {
                    assert_eq!(expected, 16);
                    assert_eq!(actual, len);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn overflowing_dimensions_are_a_mismatch() {
        let err = PixelBuffer::new(usize::MAX, 2, Layout::Rgba, vec![]).unwrap_err();
        assert!(matches!(err, CascadeError::DimensionMismatch { .. }));
    }

    #[test]
    fn zero_area_buffer_is_valid_and_empty() {
        let buf = PixelBuffer::from_rgba(&[], 0, 0).unwrap();
        assert!(buf.is_empty());
        let buf = PixelBuffer::from_gray(vec![], 5, 0).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn gray_to_rgba_is_opaque_grey() {
        let buf = PixelBuffer::gray_to_rgba(&[0, 200], 2, 1);
        assert_eq!(buf.layout(), Layout::Rgba);
        assert_eq!(buf.data(), &[0, 0, 0, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn luma_of_expanded_grey_is_identity() {
        // 77 + 150 + 29 == 256, so R=G=B survives the fixed-point weights
        let grey: Vec<u8> = (0..=255).collect();
        let rgba = PixelBuffer::gray_to_rgba(&grey, 256, 1);
        assert_eq!(rgba.luma().as_ref(), grey.as_slice());
    }

    #[test]
    fn luma_of_gray_borrows() {
        let buf = PixelBuffer::from_gray(vec![1, 2, 3], 3, 1).unwrap();
        assert!(matches!(buf.luma(), Cow::Borrowed(_)));
    }
}
