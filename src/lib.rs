//! Kipukas QR decode cascade.
//!
//! The camera worker hands over either a detector crop or a whole frame as
//! RGBA bytes. A cascade of preprocessing strategies (adaptive thresholds,
//! yellow-aware luminance, blurs, temporal averaging, CLAHE, ...) prepares
//! candidate images, and `rqrr` tries each one until a symbol decodes.
//! The cards carry deliberately camouflaged codes, so no single
//! preprocessing step reads them all.
//!
//! Results cross the JS boundary as `"<id>|<name>|<text>"`, or `""` when
//! nothing decoded, so the worker can collect per-strategy telemetry
//! without a JSON round trip on every frame.

use wasm_bindgen::prelude::*;

pub mod cascade;
pub mod config;
pub mod decoder;
pub mod error;
pub mod frames;
pub mod luma;
pub mod pixel;
pub mod preprocess;
pub mod session;
pub mod stats;
pub mod strategy;
pub mod threshold;

pub use cascade::{Cascade, DecodeResult, parse_wire};
pub use config::CascadeConfig;
pub use decoder::{RqrrDecoder, SymbolDecoder};
pub use error::{CascadeError, Result};
pub use pixel::{Layout, PixelBuffer};
pub use stats::{DecodeStats, StatsSnapshot};
pub use strategy::{DEFAULT_ORDER, StrategyId};

use session::Mode;

// ── Decoding ───────────────────────────────────────────────────────

/// Decode a detector crop. Returns the pipe-delimited result or `""`.
///
/// Throws only when `rgba.length != width * height * 4`.
#[wasm_bindgen]
pub fn decode_qr_crop(rgba: &[u8], width: u32, height: u32) -> Result<String, JsError> {
    let result = session::decode(Mode::Crop, rgba, width as usize, height as usize)?;
    Ok(result.to_wire())
}

/// Decode a whole camera frame, accumulating it for the temporal strategies.
#[wasm_bindgen]
pub fn decode_qr_frame(rgba: &[u8], width: u32, height: u32) -> Result<String, JsError> {
    let result = session::decode(Mode::Frame, rgba, width as usize, height as usize)?;
    Ok(result.to_wire())
}

/// Reset the frame accumulator (call when scanner closes).
#[wasm_bindgen]
pub fn reset_qr_frames() {
    session::reset_frames();
}

// ── Telemetry ──────────────────────────────────────────────────────

/// Crop-mode hit counters as `{"total":N,"strategies":{...}}`.
#[wasm_bindgen]
pub fn get_qr_stats() -> String {
    session::stats(Mode::Crop).to_json()
}

/// Full-frame hit counters, same shape as `get_qr_stats`.
#[wasm_bindgen]
pub fn get_qr_frame_stats() -> String {
    session::stats(Mode::Frame).to_json()
}

/// Zero the counters of both sessions. Orders are kept.
#[wasm_bindgen]
pub fn reset_qr_stats() {
    session::reset_stats(Mode::Crop);
    session::reset_stats(Mode::Frame);
}

// ── Ordering and configuration ─────────────────────────────────────

/// Comma-separated strategy ids to try first, e.g. `"22,14,1"`. Unknown ids
/// are ignored; unlisted strategies follow in default order.
#[wasm_bindgen]
pub fn set_qr_strategy_order(csv: &str) {
    session::set_order_csv(Mode::Crop, csv);
}

/// Full-frame counterpart of `set_qr_strategy_order`.
#[wasm_bindgen]
pub fn set_qr_frame_strategy_order(csv: &str) {
    session::set_order_csv(Mode::Frame, csv);
}

/// Restore the default crop order and clear its counters.
#[wasm_bindgen]
pub fn reset_qr_strategy_order() {
    session::reset_order(Mode::Crop);
}

/// Restore the default full-frame order and clear its counters.
#[wasm_bindgen]
pub fn reset_qr_frame_strategy_order() {
    session::reset_order(Mode::Frame);
}

/// Replace both sessions with fresh ones built from a JSON `CascadeConfig`.
#[wasm_bindgen]
pub fn configure_qr_cascade(json: &str) -> Result<(), JsError> {
    session::configure(json)?;
    Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn mismatched_buffer_throws() {
        assert!(decode_qr_crop(&[0; 10], 4, 4).is_err());
        assert!(decode_qr_frame(&[0; 10], 4, 4).is_err());
    }

    #[wasm_bindgen_test]
    fn bad_config_throws() {
        assert!(configure_qr_cascade("not json").is_err());
    }

    #[wasm_bindgen_test]
    fn stats_json_is_well_formed() {
        reset_qr_stats();
        assert_eq!(get_qr_stats(), r#"{"total":0,"strategies":{}}"#);
    }
}
