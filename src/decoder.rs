//! rqrr decode adapter.
//!
//! The cascade only prepares candidate images; locating finder patterns,
//! sampling the grid and Reed-Solomon correction are rqrr's job.

use rqrr::PreparedImage;

use crate::error::Result;
use crate::pixel::PixelBuffer;

/// Locate-and-decode capability consumed by the cascade.
///
/// Implementations return `None` for anything they cannot read, including
/// malformed content; they never panic on well-formed buffers.
pub trait SymbolDecoder {
    fn decode(&self, candidate: &PixelBuffer) -> Option<String>;
}

/// Decoder backed by `rqrr`. Takes the first grid that decodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl SymbolDecoder for RqrrDecoder {
    fn decode(&self, candidate: &PixelBuffer) -> Option<String> {
        if candidate.is_empty() {
            return None;
        }
        let w = candidate.width();
        let grey = candidate.luma();
        let mut img =
            PreparedImage::prepare_from_greyscale(w, candidate.height(), |x, y| grey[y * w + x]);
        img.detect_grids()
            .iter()
            .find_map(|grid| match grid.decode() {
                Ok((_, content)) if !content.is_empty() => Some(content),
                Ok(_) => None,
                Err(err) => {
                    tracing::trace!(?err, "grid located but not decodable");
                    None
                }
            })
    }
}

/// Decode raw RGBA bytes with the given decoder, validating the buffer
/// length first so a wrong size can never read out of bounds.
pub fn decode_rgba<D: SymbolDecoder>(
    decoder: &D,
    rgba: &[u8],
    width: usize,
    height: usize,
) -> Result<Option<String>> {
    let buf = PixelBuffer::from_rgba(rgba, width, height)?;
    Ok(decoder.decode(&buf))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::CascadeError;

    #[test]
    fn decodes_clean_rendered_symbol() {
        let (rgba, w, h) = render_qr_rgba("https://kpks.us/brox_the_defiant", 4, 0, 255);
        let text = decode_rgba(&RqrrDecoder, &rgba, w, h).unwrap();
        assert_eq!(text.as_deref(), Some("https://kpks.us/brox_the_defiant"));
    }

    #[test]
    fn decodes_greyscale_candidate() {
        let (grey, w, h) = render_qr("kipukas", 4, 0, 255);
        let buf = PixelBuffer::from_gray(grey, w, h).unwrap();
        assert_eq!(RqrrDecoder.decode(&buf).as_deref(), Some("kipukas"));
    }

    #[test]
    fn blank_image_is_not_a_symbol() {
        let buf = PixelBuffer::from_gray(vec![128; 64 * 64], 64, 64).unwrap();
        assert!(RqrrDecoder.decode(&buf).is_none());
    }

    #[test]
    fn empty_buffer_is_not_a_symbol() {
        assert_eq!(decode_rgba(&RqrrDecoder, &[], 0, 0).unwrap(), None);
    }

    #[test]
    fn size_mismatch_fails_fast() {
        let err = decode_rgba(&RqrrDecoder, &[0; 10], 4, 4).unwrap_err();
        assert!(matches!(
            err,
            CascadeError::DimensionMismatch { expected: 64, actual: 10 }
        ));
    }
}
