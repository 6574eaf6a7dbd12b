//! Adaptive threshold: per-pixel threshold based on local mean.
//!
//! Much better than a global cut for uneven lighting from glossy surfaces:
//! a uniform brightness offset moves the local mean with the pixel, so the
//! black/white decision is unchanged.

use crate::luma::IntegralImage;
use crate::pixel::PixelBuffer;

/// Window half-size and bias for one member of the threshold family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveParams {
    /// Half-size of the neighbourhood; the window is `2r+1` wide before clamping.
    pub radius: usize,
    /// Subtracted from the local mean (bias toward dark = QR modules).
    pub c: i32,
}

impl AdaptiveParams {
    pub const FINE: Self = Self { radius: 11, c: 6 };
    pub const STANDARD: Self = Self { radius: 15, c: 8 };
    pub const COARSE: Self = Self { radius: 21, c: 10 };
}

/// Binarize `grey` against its local means. Output is 0 where the pixel is
/// strictly darker than `mean - c`, 255 elsewhere.
///
/// Windows are clamped at the borders, so edge pixels average over fewer
/// neighbours.
pub fn adaptive_threshold(
    grey: &[u8],
    integral: &IntegralImage,
    params: AdaptiveParams,
) -> Vec<u8> {
    let w = integral.width();
    let h = integral.height();
    let r = params.radius;
    let mut result = vec![0u8; w * h];
    for y in 0..h {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r + 1).min(w);
            let area = ((y1 - y0) * (x1 - x0)) as u32;
            let local_mean = (integral.window_sum(x0, y0, x1, y1) / area) as i32;
            let thresh = local_mean - params.c;
            result[y * w + x] = if (grey[y * w + x] as i32) < thresh { 0 } else { 255 };
        }
    }
    result
}

/// Threshold a plane that has no integral image yet.
pub fn adaptive_threshold_plane(
    grey: &[u8],
    width: usize,
    height: usize,
    params: AdaptiveParams,
) -> Vec<u8> {
    let integral = IntegralImage::new(grey, width, height);
    adaptive_threshold(grey, &integral, params)
}

/// Threshold and emit RGBA (R=G=B=bit, A=255), the format the decode
/// adapter takes for camera crops.
pub fn adaptive_threshold_rgba(
    grey: &[u8],
    integral: &IntegralImage,
    params: AdaptiveParams,
) -> PixelBuffer {
    let binary = adaptive_threshold(grey, integral, params);
    PixelBuffer::gray_to_rgba(&binary, integral.width(), integral.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Layout;
    use proptest::prelude::*;

    #[test]
    fn uniform_mid_grey_is_all_white_under_coarse() {
        let grey = vec![128u8; 21 * 21];
        let ii = IntegralImage::new(&grey, 21, 21);
        let out = adaptive_threshold_rgba(&grey, &ii, AdaptiveParams::COARSE);
        assert_eq!(out.layout(), Layout::Rgba);
        assert!(out.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn adaptive_threshold_dimensions() {
        let grey = vec![128; 10 * 10];
        let result = adaptive_threshold_plane(&grey, 10, 10, AdaptiveParams { radius: 3, c: 5 });
        assert_eq!(result.len(), 100);
    }

    #[test]
    fn adaptive_threshold_separates_bimodal() {
        // Left half dark (30), right half bright (220)
        let mut grey = vec![0u8; 10 * 10];
        for y in 0..10 {
            for x in 0..10 {
                grey[y * 10 + x] = if x < 5 { 30 } else { 220 };
            }
        }
        let result = adaptive_threshold_plane(&grey, 10, 10, AdaptiveParams { radius: 3, c: 5 });
        assert_eq!(result[9], 255);
        // window straddles the edge: mean > 35 so the dark side goes black
        assert_eq!(result[5 * 10 + 4], 0);
        assert_eq!(result[5 * 10 + 5], 255);
    }

    #[test]
    fn brightness_offset_keeps_dark_modules_dark() {
        // 3×3 dark block in a light field, then lifted by +40
        let mut grey = vec![255u8; 9 * 9];
        for y in 3..6 {
            for x in 3..6 {
                grey[y * 9 + x] = 0;
            }
        }
        let lifted: Vec<u8> = grey.iter().map(|&p| p.saturating_add(40)).collect();
        let a = adaptive_threshold_plane(&grey, 9, 9, AdaptiveParams::STANDARD);
        let b = adaptive_threshold_plane(&lifted, 9, 9, AdaptiveParams::STANDARD);
        assert_eq!(a, b);
        assert_eq!(b[4 * 9 + 4], 0);
        assert_eq!(b[0], 255);
    }

    #[test]
    fn empty_plane_yields_empty_output() {
        assert!(adaptive_threshold_plane(&[], 0, 0, AdaptiveParams::FINE).is_empty());
    }

    fn plane() -> impl Strategy<Value = (usize, usize, Vec<u8>)> {
        (1usize..32, 1usize..32).prop_flat_map(|(w, h)| {
            (Just(w), Just(h), prop::collection::vec(any::<u8>(), w * h))
        })
    }

    proptest! {
        #[test]
        fn output_is_strictly_binary_and_opaque(
            (w, h, grey) in plane(),
            radius in 0usize..25,
            c in -20i32..20,
        ) {
            let ii = IntegralImage::new(&grey, w, h);
            let out = adaptive_threshold_rgba(&grey, &ii, AdaptiveParams { radius, c });
            prop_assert_eq!(out.data().len(), w * h * 4);
            for px in out.data().chunks_exact(4) {
                prop_assert!(px[0] == 0 || px[0] == 255);
                prop_assert_eq!(px[0], px[1]);
                prop_assert_eq!(px[1], px[2]);
                prop_assert_eq!(px[3], 255);
            }
        }

        #[test]
        fn threshold_is_deterministic((w, h, grey) in plane()) {
            let ii = IntegralImage::new(&grey, w, h);
            let first = adaptive_threshold_rgba(&grey, &ii, AdaptiveParams::STANDARD);
            let second = adaptive_threshold_rgba(&grey, &ii, AdaptiveParams::STANDARD);
            prop_assert_eq!(first, second);
        }
    }
}
