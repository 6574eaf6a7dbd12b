//! Luminance extraction and the integral image used for local means.

/// Convert RGBA pixel buffer to greyscale using standard luminance weights.
/// Black = 0, yellow ≈ 226, excellent separation for Kipukas cards.
///
/// The weights are fixed: every threshold downstream is tuned against them.
pub fn rgba_to_greyscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let len = width * height;
    let mut grey = Vec::with_capacity(len);
    for px in rgba[..len * 4].chunks_exact(4) {
        let r = px[0] as u32;
        let g = px[1] as u32;
        let b = px[2] as u32;
        // ITU-R BT.601 in 8.8 fixed point: (77R + 150G + 29B) >> 8
        grey.push(((77 * r + 150 * g + 29 * b) >> 8) as u8);
    }
    grey
}

/// Yellow-aware greyscale for black-on-yellow codes: `max(R,G) - B`.
///
/// black → 0, yellow (255,255,0) → 255, white or blue glare → 0.
pub fn rgba_to_yellow_aware(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let len = width * height;
    let mut out = Vec::with_capacity(len);
    for px in rgba[..len * 4].chunks_exact(4) {
        out.push(px[0].max(px[1]).saturating_sub(px[2]));
    }
    out
}

/// Summed-area table over a greyscale plane, `(width+1) × (height+1)` cells
/// with a zero first row and column.
///
/// Cells are `u32` with wrapping arithmetic. A full 4096×4096 frame of 255s
/// sums to just under `u32::MAX`, and the four-corner difference stays exact
/// modulo 2^32 for any window whose true sum fits, which is every window of
/// a frame that size.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    sums: Vec<u32>,
}

impl IntegralImage {
    pub fn new(grey: &[u8], width: usize, height: usize) -> Self {
        let iw = width + 1;
        let mut sums = vec![0u32; iw * (height + 1)];
        for y in 0..height {
            let mut row_sum = 0u32;
            for x in 0..width {
                row_sum = row_sum.wrapping_add(grey[y * width + x] as u32);
                sums[(y + 1) * iw + (x + 1)] = row_sum.wrapping_add(sums[y * iw + (x + 1)]);
            }
        }
        Self {
            width,
            height,
            sums,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Padded cell `(x, y)`, i.e. the sum of all pixels above and left of it.
    pub fn at(&self, x: usize, y: usize) -> u32 {
        self.sums[y * (self.width + 1) + x]
    }

    /// Sum over the half-open window `[x0, x1) × [y0, y1)`.
    pub fn window_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u32 {
        self.at(x1, y1)
            .wrapping_sub(self.at(x1, y0))
            .wrapping_sub(self.at(x0, y1))
            .wrapping_add(self.at(x0, y0))
    }
}
