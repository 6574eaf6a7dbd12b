//! Frame accumulator (ring buffer for temporal averaging).
//!
//! Only the full-frame scanning mode feeds it. Averaging consecutive frames
//! of a static card reinforces the code and washes out texture shimmer.

#[derive(Debug, Clone)]
pub struct FrameHistory {
    frames: Vec<Vec<u8>>,
    width: usize,
    height: usize,
    depth: usize,
    count: usize,
}

impl FrameHistory {
    pub fn new(depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            width: 0,
            height: 0,
            depth: depth.max(1),
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Store a greyscale frame, overwriting the oldest once full. A size
    /// change invalidates everything held so far.
    pub fn push(&mut self, grey: &[u8], width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.frames.clear();
            self.width = width;
            self.height = height;
            self.count = 0;
        }
        if self.frames.len() < self.depth {
            self.frames.push(grey.to_vec());
        } else {
            let slot = self.count % self.depth;
            self.frames[slot].copy_from_slice(grey);
        }
        self.count += 1;
    }

    /// Per-pixel mean; needs at least two frames.
    pub fn average(&self) -> Option<Vec<u8>> {
        if self.frames.len() < 2 {
            return None;
        }
        let n = self.frames.len() as u32;
        Some(
            (0..self.width * self.height)
                .map(|i| (self.frames.iter().map(|f| f[i] as u32).sum::<u32>() / n) as u8)
                .collect(),
        )
    }

    /// Per-pixel median; needs at least three frames.
    pub fn median(&self) -> Option<Vec<u8>> {
        let n = self.frames.len();
        if n < 3 {
            return None;
        }
        let mut vals = vec![0u8; n];
        let mut med = Vec::with_capacity(self.width * self.height);
        for i in 0..self.width * self.height {
            for (v, f) in vals.iter_mut().zip(&self.frames) {
                *v = f[i];
            }
            vals.sort_unstable();
            med.push(vals[n / 2]);
        }
        Some(med)
    }

    pub fn reset(&mut self) {
        self.frames.clear();
        self.count = 0;
    }
}
