//! Strategy registry.
//!
//! Ids are the small integers the scanner UI sends in `set_qr_strategy_order`
//! and reads back from `get_qr_stats`; they must stay stable.

use std::cell::OnceCell;

use crate::error::CascadeError;
use crate::frames::FrameHistory;
use crate::luma::{IntegralImage, rgba_to_yellow_aware};
use crate::pixel::{Layout, PixelBuffer};
use crate::preprocess::{
    add_quiet_zone, anisotropic_stretch, binarize, clahe, contrast_stretch, crop_quiet_zone,
    downscale, gaussian_blur, local_normalize, median_filter, morphological_close, otsu_threshold,
};
use crate::threshold::{AdaptiveParams, adaptive_threshold_plane, adaptive_threshold_rgba};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum StrategyId {
    Raw = 0,
    Yellow = 1,
    YellowBlur = 2,
    BlurLight = 3,
    BlurHeavy = 4,
    Median3 = 5,
    Median5 = 6,
    TemporalAvg = 7,
    TemporalAvgBlur = 8,
    TemporalMedian = 9,
    Clahe2 = 10,
    Clahe3 = 11,
    ClaheBlur = 12,
    ContrastStretch = 13,
    AdaptiveStandard = 14,
    BlurOtsu = 15,
    Downscale2x = 16,
    Downscale4x = 17,
    MorphClose = 18,
    QuietZone = 19,
    LocalNorm = 20,
    Otsu = 21,
    AdaptiveFine = 22,
    AdaptiveCoarse = 23,
    StretchX10 = 24,
    StretchX20 = 25,
    StretchY10 = 26,
    StretchY20 = 27,
    BlurAdaptive = 28,
    StretchAdaptive = 29,
    QuietZoneAdaptive = 30,
    QuietZoneFine = 31,
    QuietZoneCoarse = 32,
}

pub const NUM_STRATEGIES: usize = 33;

/// Cheap, broad strategies first; camouflage- and noise-specific passes later.
pub const DEFAULT_ORDER: [StrategyId; NUM_STRATEGIES] = {
    use StrategyId::*;
    [
        Raw,
        AdaptiveStandard,
        AdaptiveFine,
        AdaptiveCoarse,
        QuietZoneAdaptive,
        QuietZoneFine,
        QuietZoneCoarse,
        BlurAdaptive,
        StretchAdaptive,
        Yellow,
        YellowBlur,
        StretchX10,
        StretchX20,
        StretchY10,
        StretchY20,
        ContrastStretch,
        BlurLight,
        BlurHeavy,
        Median3,
        Median5,
        TemporalAvg,
        TemporalAvgBlur,
        TemporalMedian,
        Clahe2,
        Clahe3,
        ClaheBlur,
        BlurOtsu,
        Downscale2x,
        Downscale4x,
        MorphClose,
        QuietZone,
        LocalNorm,
        Otsu,
    ]
};

impl StrategyId {
    pub const ALL: [StrategyId; NUM_STRATEGIES] = {
        use StrategyId::*;
        [
            Raw, Yellow, YellowBlur, BlurLight, BlurHeavy, Median3, Median5, TemporalAvg,
            TemporalAvgBlur, TemporalMedian, Clahe2, Clahe3, ClaheBlur, ContrastStretch,
            AdaptiveStandard, BlurOtsu, Downscale2x, Downscale4x, MorphClose, QuietZone, LocalNorm,
            Otsu, AdaptiveFine, AdaptiveCoarse, StretchX10, StretchX20, StretchY10, StretchY20,
            BlurAdaptive, StretchAdaptive, QuietZoneAdaptive, QuietZoneFine, QuietZoneCoarse,
        ]
    };

    pub fn index(self) -> usize {
        self as usize
    }

    /// Telemetry key.
    pub fn name(self) -> &'static str {
        STRATEGIES[self.index()].name
    }

    pub fn strategy(self) -> &'static Strategy {
        &STRATEGIES[self.index()]
    }
}

impl TryFrom<u8> for StrategyId {
    type Error = CascadeError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        StrategyId::ALL
            .get(id as usize)
            .copied()
            .ok_or(CascadeError::InvalidStrategyId(id))
    }
}

/// Everything a strategy may read about the current frame or crop.
///
/// Greyscale, yellow plane and integral image are derived lazily and at most
/// once, then shared by every strategy in the run.
pub struct FrameContext<'a> {
    rgba: &'a PixelBuffer,
    history: Option<&'a FrameHistory>,
    grey: OnceCell<Vec<u8>>,
    yellow: OnceCell<Vec<u8>>,
    integral: OnceCell<IntegralImage>,
}

impl<'a> FrameContext<'a> {
    pub fn new(rgba: &'a PixelBuffer, history: Option<&'a FrameHistory>) -> Self {
        Self {
            rgba,
            history,
            grey: OnceCell::new(),
            yellow: OnceCell::new(),
            integral: OnceCell::new(),
        }
    }

    /// Seed the context with a luminance plane the caller already holds
    /// for this input, so it is not derived a second time.
    pub fn with_grey(
        rgba: &'a PixelBuffer,
        history: Option<&'a FrameHistory>,
        grey: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(grey.len(), rgba.width() * rgba.height());
        Self {
            grey: OnceCell::from(grey),
            ..Self::new(rgba, history)
        }
    }

    pub fn input(&self) -> &PixelBuffer {
        self.rgba
    }

    pub fn width(&self) -> usize {
        self.rgba.width()
    }

    pub fn height(&self) -> usize {
        self.rgba.height()
    }

    pub fn grey(&self) -> &[u8] {
        self.grey.get_or_init(|| self.rgba.luma().into_owned())
    }

    pub fn yellow(&self) -> &[u8] {
        self.yellow.get_or_init(|| match self.rgba.layout() {
            Layout::Rgba => rgba_to_yellow_aware(self.rgba.data(), self.width(), self.height()),
            Layout::Gray => self.rgba.data().to_vec(),
        })
    }

    pub fn integral(&self) -> &IntegralImage {
        self.integral
            .get_or_init(|| IntegralImage::new(self.grey(), self.width(), self.height()))
    }

    /// Temporal history, present only in full-frame mode and only once it
    /// holds frames of this frame's size.
    fn history(&self) -> Option<&FrameHistory> {
        self.history
            .filter(|h| h.width() == self.width() && h.height() == self.height())
    }
}

/// One named transform in the cascade. `None` means the strategy has
/// nothing to offer for this input and the decoder is skipped.
pub struct Strategy {
    pub id: StrategyId,
    pub name: &'static str,
    pub transform: fn(&FrameContext<'_>) -> Option<PixelBuffer>,
}

impl Strategy {
    pub fn apply(&self, ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
        (self.transform)(ctx)
    }
}

fn grey_out(plane: Vec<u8>, w: usize, h: usize) -> Option<PixelBuffer> {
    Some(PixelBuffer::gray_unchecked(plane, w, h))
}

fn threshold_plane(
    plane: &[u8],
    w: usize,
    h: usize,
    params: AdaptiveParams,
) -> Option<PixelBuffer> {
    let binary = adaptive_threshold_plane(plane, w, h, params);
    Some(PixelBuffer::gray_to_rgba(&binary, w, h))
}

/// The decoder only reads luminance, so the shared grey plane stands in
/// for the untouched input.
fn raw(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(ctx.grey().to_vec(), ctx.width(), ctx.height())
}

fn yellow(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    Some(PixelBuffer::gray_to_rgba(ctx.yellow(), ctx.width(), ctx.height()))
}

fn yellow_blur(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(gaussian_blur(ctx.yellow(), ctx.width(), ctx.height(), 1), ctx.width(), ctx.height())
}

fn blur_light(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(gaussian_blur(ctx.grey(), ctx.width(), ctx.height(), 1), ctx.width(), ctx.height())
}

fn blur_heavy(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(gaussian_blur(ctx.grey(), ctx.width(), ctx.height(), 2), ctx.width(), ctx.height())
}

fn median3(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(median_filter(ctx.grey(), ctx.width(), ctx.height(), 1), ctx.width(), ctx.height())
}

fn median5(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(median_filter(ctx.grey(), ctx.width(), ctx.height(), 2), ctx.width(), ctx.height())
}

fn temporal_avg(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let avg = ctx.history()?.average()?;
    grey_out(avg, ctx.width(), ctx.height())
}

fn temporal_avg_blur(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let avg = ctx.history()?.average()?;
    grey_out(gaussian_blur(&avg, ctx.width(), ctx.height(), 1), ctx.width(), ctx.height())
}

fn temporal_median(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let med = ctx.history()?.median()?;
    grey_out(med, ctx.width(), ctx.height())
}

fn clahe_2(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(clahe(ctx.grey(), ctx.width(), ctx.height(), 8, 8, 2.0), ctx.width(), ctx.height())
}

fn clahe_3(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(clahe(ctx.grey(), ctx.width(), ctx.height(), 8, 8, 3.0), ctx.width(), ctx.height())
}

fn clahe_blur(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let (w, h) = (ctx.width(), ctx.height());
    let enhanced = clahe(ctx.grey(), w, h, 8, 8, 2.0);
    grey_out(gaussian_blur(&enhanced, w, h, 1), w, h)
}

fn stretch(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(contrast_stretch(ctx.grey()), ctx.width(), ctx.height())
}

fn adaptive(ctx: &FrameContext<'_>, params: AdaptiveParams) -> Option<PixelBuffer> {
    Some(adaptive_threshold_rgba(ctx.grey(), ctx.integral(), params))
}

fn adaptive_standard(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    adaptive(ctx, AdaptiveParams::STANDARD)
}

fn adaptive_fine(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    adaptive(ctx, AdaptiveParams::FINE)
}

fn adaptive_coarse(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    adaptive(ctx, AdaptiveParams::COARSE)
}

fn blur_otsu(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let blurred = gaussian_blur(ctx.grey(), ctx.width(), ctx.height(), 2);
    let t = otsu_threshold(&blurred);
    grey_out(binarize(&blurred, t), ctx.width(), ctx.height())
}

fn downscale_2x(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let (plane, w, h) = downscale(ctx.grey(), ctx.width(), ctx.height(), 2);
    if w == 0 || h == 0 {
        return None;
    }
    grey_out(plane, w, h)
}

fn downscale_4x(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    if ctx.width() / 4 <= 20 || ctx.height() / 4 <= 20 {
        return None;
    }
    let (plane, w, h) = downscale(ctx.grey(), ctx.width(), ctx.height(), 4);
    grey_out(plane, w, h)
}

fn morph_close(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let binary = binarize(ctx.grey(), otsu_threshold(ctx.grey()));
    grey_out(morphological_close(&binary, ctx.width(), ctx.height(), 1), ctx.width(), ctx.height())
}

fn quiet_zone(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let (plane, w, h) = add_quiet_zone(ctx.grey(), ctx.width(), ctx.height(), 20);
    grey_out(plane, w, h)
}

fn local_norm(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(local_normalize(ctx.grey(), ctx.width(), ctx.height(), 64), ctx.width(), ctx.height())
}

fn otsu(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    grey_out(binarize(ctx.grey(), otsu_threshold(ctx.grey())), ctx.width(), ctx.height())
}

fn stretched_adaptive(ctx: &FrameContext<'_>, sx: usize, sy: usize) -> Option<PixelBuffer> {
    let (plane, w, h) = anisotropic_stretch(ctx.grey(), ctx.width(), ctx.height(), sx, sy);
    threshold_plane(&plane, w, h, AdaptiveParams::STANDARD)
}

fn stretch_x10(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    stretched_adaptive(ctx, 110, 100)
}

fn stretch_x20(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    stretched_adaptive(ctx, 120, 100)
}

fn stretch_y10(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    stretched_adaptive(ctx, 100, 110)
}

fn stretch_y20(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    stretched_adaptive(ctx, 100, 120)
}

fn blur_adaptive(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let blurred = gaussian_blur(ctx.grey(), ctx.width(), ctx.height(), 1);
    threshold_plane(&blurred, ctx.width(), ctx.height(), AdaptiveParams::STANDARD)
}

fn stretch_adaptive(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    let stretched = contrast_stretch(ctx.grey());
    threshold_plane(&stretched, ctx.width(), ctx.height(), AdaptiveParams::STANDARD)
}

/// Detector crops often clip the white margin around the symbol; restore
/// one before thresholding.
fn padded_adaptive(ctx: &FrameContext<'_>, params: AdaptiveParams) -> Option<PixelBuffer> {
    let pad = crop_quiet_zone(ctx.width(), ctx.height());
    let (plane, w, h) = add_quiet_zone(ctx.grey(), ctx.width(), ctx.height(), pad);
    threshold_plane(&plane, w, h, params)
}

fn quiet_zone_adaptive(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    padded_adaptive(ctx, AdaptiveParams::STANDARD)
}

fn quiet_zone_fine(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    padded_adaptive(ctx, AdaptiveParams::FINE)
}

fn quiet_zone_coarse(ctx: &FrameContext<'_>) -> Option<PixelBuffer> {
    padded_adaptive(ctx, AdaptiveParams::COARSE)
}

macro_rules! strategy {
    ($id:ident, $name:literal, $f:ident) => {
        Strategy {
            id: StrategyId::$id,
            name: $name,
            transform: $f,
        }
    };
}

/// Indexed by `StrategyId as usize`.
pub static STRATEGIES: [Strategy; NUM_STRATEGIES] = [
    strategy!(Raw, "raw", raw),
    strategy!(Yellow, "yellow", yellow),
    strategy!(YellowBlur, "yellow_blur", yellow_blur),
    strategy!(BlurLight, "blur_light", blur_light),
    strategy!(BlurHeavy, "blur_heavy", blur_heavy),
    strategy!(Median3, "med3x3", median3),
    strategy!(Median5, "med5x5", median5),
    strategy!(TemporalAvg, "temporal_avg", temporal_avg),
    strategy!(TemporalAvgBlur, "temporal_avg_blur", temporal_avg_blur),
    strategy!(TemporalMedian, "temporal_med", temporal_median),
    strategy!(Clahe2, "clahe_2", clahe_2),
    strategy!(Clahe3, "clahe_3", clahe_3),
    strategy!(ClaheBlur, "clahe_blur", clahe_blur),
    strategy!(ContrastStretch, "contrast_stretch", stretch),
    strategy!(AdaptiveStandard, "adaptive_thresh", adaptive_standard),
    strategy!(BlurOtsu, "blur_otsu", blur_otsu),
    strategy!(Downscale2x, "downscale_2x", downscale_2x),
    strategy!(Downscale4x, "downscale_4x", downscale_4x),
    strategy!(MorphClose, "morph_close", morph_close),
    strategy!(QuietZone, "quiet_zone", quiet_zone),
    strategy!(LocalNorm, "local_norm", local_norm),
    strategy!(Otsu, "otsu", otsu),
    strategy!(AdaptiveFine, "at_fine", adaptive_fine),
    strategy!(AdaptiveCoarse, "at_coarse", adaptive_coarse),
    strategy!(StretchX10, "at_stretch_x10", stretch_x10),
    strategy!(StretchX20, "at_stretch_x20", stretch_x20),
    strategy!(StretchY10, "at_stretch_y10", stretch_y10),
    strategy!(StretchY20, "at_stretch_y20", stretch_y20),
    strategy!(BlurAdaptive, "blur_at", blur_adaptive),
    strategy!(StretchAdaptive, "stretch_at", stretch_adaptive),
    strategy!(QuietZoneAdaptive, "quiet_zone_at", quiet_zone_adaptive),
    strategy!(QuietZoneFine, "quiet_zone_at_fine", quiet_zone_fine),
    strategy!(QuietZoneCoarse, "quiet_zone_at_coarse", quiet_zone_coarse),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn noisy_rgba(w: usize, h: usize) -> PixelBuffer {
        let data = (0..w * h * 4)
            .map(|i| if i % 4 == 3 { 255 } else { ((i * 37 + i / 7) % 251) as u8 })
            .collect();
        PixelBuffer::new(w, h, Layout::Rgba, data).unwrap()
    }

    #[test]
    fn registry_is_indexed_by_id() {
        for (i, s) in STRATEGIES.iter().enumerate() {
            assert_eq!(s.id.index(), i);
            assert_eq!(StrategyId::ALL[i], s.id);
        }
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), NUM_STRATEGIES);
    }

    #[test]
    fn default_order_is_a_permutation() {
        let ids: HashSet<_> = DEFAULT_ORDER.iter().collect();
        assert_eq!(ids.len(), NUM_STRATEGIES);
        assert_eq!(DEFAULT_ORDER[0], StrategyId::Raw);
        assert_eq!(DEFAULT_ORDER[1], StrategyId::AdaptiveStandard);
    }

    #[test]
    fn try_from_rejects_unknown_ids() {
        assert_eq!(StrategyId::try_from(14).unwrap(), StrategyId::AdaptiveStandard);
        assert_eq!(StrategyId::try_from(30).unwrap(), StrategyId::QuietZoneAdaptive);
        assert_eq!(StrategyId::try_from(32).unwrap(), StrategyId::QuietZoneCoarse);
        assert!(matches!(
            StrategyId::try_from(33),
            Err(CascadeError::InvalidStrategyId(33))
        ));
    }

    #[test]
    fn known_names() {
        assert_eq!(StrategyId::AdaptiveStandard.name(), "adaptive_thresh");
        assert_eq!(StrategyId::AdaptiveFine.name(), "at_fine");
        assert_eq!(StrategyId::AdaptiveCoarse.name(), "at_coarse");
        assert_eq!(StrategyId::Yellow.name(), "yellow");
    }

    #[test]
    fn every_strategy_is_total_and_does_not_touch_input() {
        let input = noisy_rgba(96, 90);
        let before = input.clone();
        let mut history = FrameHistory::new(4);
        for _ in 0..3 {
            history.push(&input.luma(), 96, 90);
        }
        let ctx = FrameContext::new(&input, Some(&history));
        for s in &STRATEGIES {
            let out = s.apply(&ctx).unwrap_or_else(|| panic!("{} produced nothing", s.name));
            assert!(!out.is_empty(), "{}", s.name);
        }
        assert_eq!(input, before);
    }

    #[test]
    fn strategies_are_order_independent() {
        let input = noisy_rgba(48, 40);
        let forward = FrameContext::new(&input, None);
        let a: Vec<_> = STRATEGIES.iter().map(|s| s.apply(&forward)).collect();
        let backward = FrameContext::new(&input, None);
        let mut b: Vec<_> = STRATEGIES.iter().rev().map(|s| s.apply(&backward)).collect();
        b.reverse();
        assert_eq!(a, b);
    }

    #[test]
    fn temporal_strategies_need_history() {
        let input = noisy_rgba(16, 16);
        let ctx = FrameContext::new(&input, None);
        assert!(StrategyId::TemporalAvg.strategy().apply(&ctx).is_none());
        assert!(StrategyId::TemporalMedian.strategy().apply(&ctx).is_none());

        let mut history = FrameHistory::new(4);
        history.push(&input.luma(), 16, 16);
        history.push(&input.luma(), 16, 16);
        let ctx = FrameContext::new(&input, Some(&history));
        assert!(StrategyId::TemporalAvg.strategy().apply(&ctx).is_some());
        assert!(StrategyId::TemporalMedian.strategy().apply(&ctx).is_none());
    }

    #[test]
    fn stale_history_size_is_ignored() {
        let input = noisy_rgba(16, 16);
        let mut history = FrameHistory::new(4);
        history.push(&[0; 64], 8, 8);
        history.push(&[0; 64], 8, 8);
        let ctx = FrameContext::new(&input, Some(&history));
        assert!(StrategyId::TemporalAvg.strategy().apply(&ctx).is_none());
    }

    #[test]
    fn downscale_4x_requires_room() {
        let input = noisy_rgba(80, 80);
        let ctx = FrameContext::new(&input, None);
        assert!(StrategyId::Downscale4x.strategy().apply(&ctx).is_none());
        assert!(StrategyId::Downscale2x.strategy().apply(&ctx).is_some());
    }

    #[test]
    fn yellow_emits_rgba() {
        let input = PixelBuffer::from_rgba(&[255, 255, 0, 255, 20, 20, 200, 255], 2, 1).unwrap();
        let out = StrategyId::Yellow.strategy().apply(&FrameContext::new(&input, None)).unwrap();
        assert_eq!(out.data(), &[255, 255, 255, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn threshold_family_emits_binary_rgba() {
        let input = noisy_rgba(40, 30);
        let ctx = FrameContext::new(&input, None);
        for id in [
            StrategyId::AdaptiveStandard,
            StrategyId::AdaptiveFine,
            StrategyId::AdaptiveCoarse,
            StrategyId::BlurAdaptive,
            StrategyId::StretchAdaptive,
            StrategyId::QuietZoneAdaptive,
            StrategyId::QuietZoneFine,
            StrategyId::QuietZoneCoarse,
            StrategyId::StretchY20,
        ] {
            let out = id.strategy().apply(&ctx).unwrap();
            assert_eq!(out.layout(), Layout::Rgba);
            for px in out.data().chunks_exact(4) {
                assert!(px[0] == 0 || px[0] == 255, "{}", id.name());
                assert_eq!(&px[1..], &[px[0], px[0], 255]);
            }
        }
    }

    #[test]
    fn padded_threshold_family_pads_the_crop() {
        let input = noisy_rgba(100, 60);
        let ctx = FrameContext::new(&input, None);
        for id in [
            StrategyId::QuietZoneAdaptive,
            StrategyId::QuietZoneFine,
            StrategyId::QuietZoneCoarse,
        ] {
            let out = id.strategy().apply(&ctx).unwrap();
            assert_eq!((out.width(), out.height()), (112, 72), "{}", id.name());
            // 6 px border on every side stays white
            assert!(out.data()[..112 * 6 * 4].iter().all(|&v| v == 255));
        }
    }

    #[test]
    fn padded_variants_follow_padded_standard() {
        let pos = |id: StrategyId| DEFAULT_ORDER.iter().position(|&o| o == id).unwrap();
        assert_eq!(pos(StrategyId::QuietZoneFine), pos(StrategyId::QuietZoneAdaptive) + 1);
        assert_eq!(pos(StrategyId::QuietZoneCoarse), pos(StrategyId::QuietZoneAdaptive) + 2);
        assert!(pos(StrategyId::QuietZoneCoarse) < pos(StrategyId::BlurAdaptive));
    }

    #[test]
    fn raw_candidate_is_input_luminance() {
        let input = noisy_rgba(12, 9);
        let out = StrategyId::Raw.strategy().apply(&FrameContext::new(&input, None)).unwrap();
        assert_eq!(out.layout(), Layout::Gray);
        assert_eq!(out.data(), &*input.luma());
    }

    #[test]
    fn seeded_grey_plane_is_reused() {
        let input = noisy_rgba(4, 2);
        let seeded = vec![7; 8];
        let ctx = FrameContext::with_grey(&input, None, seeded.clone());
        assert_eq!(ctx.grey(), seeded.as_slice());
        let raw = StrategyId::Raw.strategy().apply(&ctx).unwrap();
        assert_eq!(raw.data(), seeded.as_slice());
    }
}
