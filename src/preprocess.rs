//! Auxiliary preprocessing transforms.
//!
//! Each takes a greyscale plane and returns a fresh one; none of them keep
//! state between calls, so the cascade may run them in any order.

/// Stretch pixel values to fill the full [0, 255] range.
/// Handles washed-out images from glossy surface reflections.
pub fn contrast_stretch(grey: &[u8]) -> Vec<u8> {
    let (Some(&lo), Some(&hi)) = (grey.iter().min(), grey.iter().max()) else {
        return Vec::new();
    };
    let range = (hi - lo) as u32;
    if range == 0 {
        return grey.to_vec();
    }
    grey.iter()
        .map(|&p| (((p - lo) as u32 * 255) / range) as u8)
        .collect()
}

/// Separable 5-tap Gaussian approximation, kernel `[1, 4, 6, 4, 1] / 16`,
/// edge pixels clamped. One pass ≈ σ 1.5, two passes ≈ σ 3.
pub fn gaussian_blur(grey: &[u8], width: usize, height: usize, passes: usize) -> Vec<u8> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut current = grey.to_vec();
    let mut temp = vec![0u8; width * height];
    for _ in 0..passes {
        for y in 0..height {
            let row = &current[y * width..(y + 1) * width];
            for x in 0..width {
                temp[y * width + x] = kernel5(|dx| row[clamp_offset(x, dx, width)]);
            }
        }
        for y in 0..height {
            for x in 0..width {
                current[y * width + x] =
                    kernel5(|dy| temp[clamp_offset(y, dy, height) * width + x]);
            }
        }
    }
    current
}

fn clamp_offset(pos: usize, delta: isize, len: usize) -> usize {
    pos.saturating_add_signed(delta).min(len - 1)
}

fn kernel5(sample: impl Fn(isize) -> u8) -> u8 {
    const TAPS: [(isize, u32); 5] = [(-2, 1), (-1, 4), (0, 6), (1, 4), (2, 1)];
    let sum: u32 = TAPS.iter().map(|&(d, k)| k * sample(d) as u32).sum();
    (sum >> 4) as u8
}

/// Median filter: removes salt-and-pepper texture while preserving edges.
/// `radius` 1 = 3×3 window, `radius` 2 = 5×5 window. Edges are clamped.
pub fn median_filter(grey: &[u8], width: usize, height: usize, radius: usize) -> Vec<u8> {
    let side = 2 * radius + 1;
    let mut window = Vec::with_capacity(side * side);
    let mut result = Vec::with_capacity(width * height);
    let r = radius as isize;
    for y in 0..height {
        for x in 0..width {
            window.clear();
            for dy in -r..=r {
                let sy = clamp_offset(y, dy, height);
                for dx in -r..=r {
                    window.push(grey[sy * width + clamp_offset(x, dx, width)]);
                }
            }
            window.sort_unstable();
            result.push(window[window.len() / 2]);
        }
    }
    result
}

/// Per-block min–max stretch against specular hotspots. Blocks whose range
/// is 10 or less are left untouched so flat regions are not amplified.
pub fn local_normalize(grey: &[u8], width: usize, height: usize, block: usize) -> Vec<u8> {
    let mut result = grey.to_vec();
    for by in (0..height).step_by(block) {
        let rows = by..(by + block).min(height);
        for bx in (0..width).step_by(block) {
            let cols = bx..(bx + block).min(width);
            let mut lo = u8::MAX;
            let mut hi = u8::MIN;
            for row in rows.clone() {
                for &p in &grey[row * width + cols.start..row * width + cols.end] {
                    lo = lo.min(p);
                    hi = hi.max(p);
                }
            }
            let range = hi.saturating_sub(lo) as u32;
            if range <= 10 {
                continue;
            }
            for row in rows.clone() {
                for col in cols.clone() {
                    let idx = row * width + col;
                    result[idx] = (((grey[idx] - lo) as u32 * 255) / range) as u8;
                }
            }
        }
    }
    result
}

/// Area-average downscale by an integer `factor`. Returns the plane and its
/// dimensions `(width / factor, height / factor)`; trailing rows and columns
/// that do not fill a whole cell are dropped.
pub fn downscale(
    grey: &[u8],
    width: usize,
    height: usize,
    factor: usize,
) -> (Vec<u8>, usize, usize) {
    let dw = width / factor;
    let dh = height / factor;
    let cell = (factor * factor) as u32;
    let mut out = Vec::with_capacity(dw * dh);
    for dy in 0..dh {
        for dx in 0..dw {
            let mut sum = 0u32;
            for row in dy * factor..(dy + 1) * factor {
                let start = row * width + dx * factor;
                sum += grey[start..start + factor].iter().map(|&p| p as u32).sum::<u32>();
            }
            out.push(((sum + cell / 2) / cell) as u8);
        }
    }
    (out, dw, dh)
}

/// Add a white quiet zone of `pad` pixels on every side.
pub fn add_quiet_zone(
    grey: &[u8],
    width: usize,
    height: usize,
    pad: usize,
) -> (Vec<u8>, usize, usize) {
    let nw = width + 2 * pad;
    let nh = height + 2 * pad;
    let mut out = vec![255u8; nw * nh];
    for y in 0..height {
        let dst = (y + pad) * nw + pad;
        out[dst..dst + width].copy_from_slice(&grey[y * width..(y + 1) * width]);
    }
    (out, nw, nh)
}

/// Quiet-zone width for a detector crop that may clip the symbol edge.
pub fn crop_quiet_zone(width: usize, height: usize) -> usize {
    (width.min(height) / 10).max(4)
}

/// Otsu's threshold: the global cut maximising between-class variance.
pub fn otsu_threshold(grey: &[u8]) -> u8 {
    let mut hist = [0u64; 256];
    for &p in grey {
        hist[p as usize] += 1;
    }
    let total = grey.len() as f64;
    let sum_all: f64 = hist.iter().enumerate().map(|(i, &n)| i as f64 * n as f64).sum();

    let mut best = (0u8, 0.0f64);
    let mut weight_bg = 0.0;
    let mut sum_bg = 0.0;
    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);
        if between > best.1 {
            best = (t as u8, between);
        }
    }
    best.0
}

/// Global binarization: 0 below `threshold`, 255 otherwise.
pub fn binarize(grey: &[u8], threshold: u8) -> Vec<u8> {
    grey.iter().map(|&p| if p < threshold { 0 } else { 255 }).collect()
}

/// Morphological closing on a binary image (dilation → erosion).
/// Fills small gaps in QR modules that texture creates.
pub fn morphological_close(binary: &[u8], width: usize, height: usize, radius: usize) -> Vec<u8> {
    let dilated = morph(binary, width, height, radius, u8::max, 0);
    morph(&dilated, width, height, radius, u8::min, 255)
}

fn morph(img: &[u8], w: usize, h: usize, r: usize, pick: fn(u8, u8) -> u8, init: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        let rows = y.saturating_sub(r)..=(y + r).min(h - 1);
        for x in 0..w {
            let cols = x.saturating_sub(r)..=(x + r).min(w - 1);
            let mut acc = init;
            for row in rows.clone() {
                for &v in &img[row * w + cols.start()..=row * w + cols.end()] {
                    acc = pick(acc, v);
                }
            }
            out.push(acc);
        }
    }
    out
}

/// Bilinear stretch along X and/or Y to undo foreshortening from a tilted
/// card. Scales are percentages; anything below 100 is treated as 100.
pub fn anisotropic_stretch(
    grey: &[u8],
    w: usize,
    h: usize,
    scale_x_pct: usize,
    scale_y_pct: usize,
) -> (Vec<u8>, usize, usize) {
    let sx = scale_x_pct.max(100);
    let sy = scale_y_pct.max(100);
    let nw = (w * sx + 50) / 100;
    let nh = (h * sy + 50) / 100;
    if (sx == 100 && sy == 100) || nw == 0 || nh == 0 {
        return (grey.to_vec(), w, h);
    }

    let map = |n: usize, src: usize, dst: usize| -> (usize, usize, f32) {
        let pos = n as f32 * (src as f32 - 1.0) / (dst as f32 - 1.0).max(1.0);
        let lo = (pos as usize).min(src - 1);
        (lo, (lo + 1).min(src - 1), pos - lo as f32)
    };

    let mut out = Vec::with_capacity(nw * nh);
    for ny in 0..nh {
        let (y0, y1, fy) = map(ny, h, nh);
        for nx in 0..nw {
            let (x0, x1, fx) = map(nx, w, nw);
            let lerp = |a: u8, b: u8, t: f32| a as f32 * (1.0 - t) + b as f32 * t;
            let top = lerp(grey[y0 * w + x0], grey[y0 * w + x1], fx);
            let bot = lerp(grey[y1 * w + x0], grey[y1 * w + x1], fx);
            let val = top * (1.0 - fy) + bot * fy;
            out.push(val.round().clamp(0.0, 255.0) as u8);
        }
    }
    (out, nw, nh)
}

/// Contrast Limited Adaptive Histogram Equalization.
///
/// Each tile gets a clipped-histogram CDF lookup table; pixels blend the
/// four nearest tables bilinearly so tile seams do not show.
pub fn clahe(
    grey: &[u8],
    w: usize,
    h: usize,
    tiles_x: usize,
    tiles_y: usize,
    clip_limit: f32,
) -> Vec<u8> {
    if tiles_x == 0 || tiles_y == 0 || w / tiles_x == 0 || h / tiles_y == 0 {
        return grey.to_vec();
    }
    let tile_w = w / tiles_x;
    let tile_h = h / tiles_y;

    let mut maps = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = if tx == tiles_x - 1 { w } else { x0 + tile_w };
            let y1 = if ty == tiles_y - 1 { h } else { y0 + tile_h };
            maps.push(tile_lut(grey, w, (x0, y0, x1, y1), clip_limit));
        }
    }

    let locate = |p: usize, tile: usize, tiles: usize| -> (usize, usize, f32) {
        let f = (p as f32 + 0.5) / tile as f32 - 0.5;
        let base = f.floor();
        let last = tiles as i32 - 1;
        let i0 = (base as i32).clamp(0, last) as usize;
        let i1 = (base as i32 + 1).clamp(0, last) as usize;
        (i0, i1, f - base)
    };

    let mut result = Vec::with_capacity(w * h);
    for y in 0..h {
        let (ty0, ty1, ay) = locate(y, tile_h, tiles_y);
        for x in 0..w {
            let (tx0, tx1, ax) = locate(x, tile_w, tiles_x);
            let p = grey[y * w + x] as usize;
            let v = |ty: usize, tx: usize| maps[ty * tiles_x + tx][p] as f32;
            let top = v(ty0, tx0) * (1.0 - ax) + v(ty0, tx1) * ax;
            let bot = v(ty1, tx0) * (1.0 - ax) + v(ty1, tx1) * ax;
            let val = top * (1.0 - ay) + bot * ay;
            result.push(val.round().clamp(0.0, 255.0) as u8);
        }
    }
    result
}

fn tile_lut(
    grey: &[u8],
    w: usize,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    clip_limit: f32,
) -> [u8; 256] {
    let mut hist = [0u32; 256];
    for row in y0..y1 {
        for &p in &grey[row * w + x0..row * w + x1] {
            hist[p as usize] += 1;
        }
    }

    let pixels = ((x1 - x0) * (y1 - y0)) as f32;
    let clip = ((clip_limit * pixels / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }
    let per_bin = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += per_bin + u32::from(i < remainder);
    }

    let mut cdf = [0u32; 256];
    let mut running = 0u32;
    for (slot, &n) in cdf.iter_mut().zip(hist.iter()) {
        running += n;
        *slot = running;
    }
    let cdf_min = cdf.iter().copied().find(|&v| v > 0).unwrap_or(0);
    let denom = cdf[255].saturating_sub(cdf_min);

    let mut lut = [0u8; 256];
    for (i, out) in lut.iter_mut().enumerate() {
        *out = if denom == 0 {
            i as u8
        } else {
            let scaled = cdf[i].saturating_sub(cdf_min) as f32 / denom as f32 * 255.0;
            (scaled as u32).min(255) as u8
        };
    }
    lut
}
