//! Per-mode cascade sessions for the wasm worker.
//!
//! Crop decoding (detector boxes) and full-frame decoding each get their own
//! `Cascade`, so their orders, hit counters and frame history never mix.
//! Uses `thread_local!` + `RefCell`: the worker is single-threaded and keeps
//! the module alive for the whole scanning session.

use std::cell::RefCell;
use std::thread::LocalKey;

use crate::cascade::{Cascade, DecodeResult};
use crate::config::CascadeConfig;
use crate::error::Result;
use crate::stats::StatsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Detector crops. No temporal history.
    Crop,
    /// Whole camera frames, with temporal strategies enabled.
    Frame,
}

thread_local! {
    static CROP: RefCell<Cascade> = RefCell::new(Cascade::default());
    static FRAME: RefCell<Cascade> = RefCell::new(Cascade::default());
}

impl Mode {
    fn session(self) -> &'static LocalKey<RefCell<Cascade>> {
        match self {
            Mode::Crop => &CROP,
            Mode::Frame => &FRAME,
        }
    }
}

/// Execute a closure with read access to a session.
pub fn with_cascade<F, R>(mode: Mode, f: F) -> R
where
    F: FnOnce(&Cascade) -> R,
{
    mode.session().with(|c| f(&c.borrow()))
}

/// Execute a closure with mutable access to a session.
pub fn with_cascade_mut<F, R>(mode: Mode, f: F) -> R
where
    F: FnOnce(&mut Cascade) -> R,
{
    mode.session().with(|c| f(&mut c.borrow_mut()))
}

/// Decode one buffer in the given mode. A length that disagrees with the
/// dimensions is logged and returned to the caller untouched.
pub fn decode(mode: Mode, rgba: &[u8], width: usize, height: usize) -> Result<DecodeResult> {
    with_cascade_mut(mode, |cascade| match mode {
        Mode::Crop => cascade.decode(rgba, width, height),
        Mode::Frame => cascade.decode_frame(rgba, width, height),
    })
    .inspect_err(|err| tracing::warn!(?mode, width, height, %err, "rejecting frame"))
}

/// Snapshot of one session's hit counters.
pub fn stats(mode: Mode) -> StatsSnapshot {
    with_cascade(mode, Cascade::stats)
}

pub fn set_order_csv(mode: Mode, csv: &str) {
    with_cascade_mut(mode, |cascade| cascade.set_order_csv(csv));
}

pub fn reset_order(mode: Mode) {
    with_cascade_mut(mode, Cascade::reset_order);
}

pub fn reset_stats(mode: Mode) {
    with_cascade_mut(mode, Cascade::reset_stats);
}

pub fn reset_frames() {
    with_cascade_mut(Mode::Frame, Cascade::reset_frames);
}

/// Rebuild both sessions from a JSON config. On a parse error the current
/// sessions are left untouched.
pub fn configure(json: &str) -> Result<()> {
    let config = CascadeConfig::from_json(json)?;
    tracing::info!(
        auto_reorder_every = config.auto_reorder_every,
        history_depth = config.history_depth,
        "reconfiguring decode sessions"
    );
    for mode in [Mode::Crop, Mode::Frame] {
        with_cascade_mut(mode, |cascade| *cascade = Cascade::new(config.clone()));
    }
    Ok(())
}
