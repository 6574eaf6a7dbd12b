//! Cascade orchestrator.
//!
//! Runs strategies in the active order against one crop or frame and stops
//! at the first candidate the decoder reads. Owns the order, the hit
//! counters and (for full-frame scanning) the temporal frame history.

use std::cmp::Reverse;

use crate::config::CascadeConfig;
use crate::decoder::{RqrrDecoder, SymbolDecoder};
use crate::error::{CascadeError, Result};
use crate::frames::FrameHistory;
use crate::pixel::PixelBuffer;
use crate::stats::{DecodeStats, StatsSnapshot};
use crate::strategy::{DEFAULT_ORDER, FrameContext, StrategyId};

/// Outcome of one cascade run. `NotFound` is the normal result on most frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    Found {
        strategy: StrategyId,
        name: &'static str,
        text: String,
    },
    NotFound,
}

impl DecodeResult {
    pub fn is_found(&self) -> bool {
        matches!(self, DecodeResult::Found { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DecodeResult::Found { text, .. } => Some(text),
            DecodeResult::NotFound => None,
        }
    }

    /// Boundary form: `"<id>|<name>|<text>"`, or `""` when nothing decoded.
    pub fn to_wire(&self) -> String {
        match self {
            DecodeResult::Found { strategy, name, text } => {
                format!("{}|{}|{}", *strategy as u8, name, text)
            }
            DecodeResult::NotFound => String::new(),
        }
    }
}

/// Split a wire string on its first two `|`. The payload keeps any further
/// `|` characters. Returns `None` for the empty (not found) form or a
/// malformed id.
pub fn parse_wire(wire: &str) -> Option<(u8, &str, &str)> {
    let mut parts = wire.splitn(3, '|');
    let id = parts.next()?.parse().ok()?;
    let name = parts.next()?;
    let text = parts.next()?;
    Some((id, name, text))
}

/// Parse a comma-separated id list. Unknown or malformed tokens are
/// skipped, never fatal.
pub fn parse_order_csv(csv: &str) -> Vec<StrategyId> {
    csv.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u8>() {
            Ok(raw) => match StrategyId::try_from(raw) {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::debug!(%err, "skipping strategy id");
                    None
                }
            },
            Err(_) => {
                tracing::debug!(token, "skipping malformed strategy id");
                None
            }
        })
        .collect()
}

/// One decoding session: a strategy order, its hit counters and the
/// greyscale history for full-frame scanning.
///
/// Not internally synchronised. Hosts that decode from several threads
/// wrap it in a `Mutex`.
pub struct Cascade<D = RqrrDecoder> {
    decoder: D,
    config: CascadeConfig,
    order: Vec<StrategyId>,
    stats: DecodeStats,
    history: FrameHistory,
}

impl Cascade<RqrrDecoder> {
    pub fn new(config: CascadeConfig) -> Self {
        Self::with_decoder(config, RqrrDecoder)
    }
}

impl Default for Cascade<RqrrDecoder> {
    fn default() -> Self {
        Self::new(CascadeConfig::default())
    }
}

impl<D: SymbolDecoder> Cascade<D> {
    pub fn with_decoder(config: CascadeConfig, decoder: D) -> Self {
        let history = FrameHistory::new(config.history_depth);
        Self {
            decoder,
            config,
            order: DEFAULT_ORDER.to_vec(),
            stats: DecodeStats::new(),
            history,
        }
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn order(&self) -> &[StrategyId] {
        &self.order
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Decode a detector crop (or any standalone image). Never touches the
    /// frame history.
    pub fn decode(&mut self, rgba: &[u8], width: usize, height: usize) -> Result<DecodeResult> {
        let input = PixelBuffer::from_rgba(rgba, width, height)?;
        Ok(self.run(&input, false, None))
    }

    /// Full-frame mode: remember this frame for the temporal strategies,
    /// then run the cascade with them enabled.
    pub fn decode_frame(
        &mut self,
        rgba: &[u8],
        width: usize,
        height: usize,
    ) -> Result<DecodeResult> {
        let input = PixelBuffer::from_rgba(rgba, width, height)?;
        if input.is_empty() {
            return Ok(DecodeResult::NotFound);
        }
        let grey = input.luma().into_owned();
        self.history.push(&grey, width, height);
        Ok(self.run(&input, true, Some(grey)))
    }

    /// Run the cascade on an already validated buffer.
    pub fn decode_buffer(&mut self, input: &PixelBuffer) -> DecodeResult {
        self.run(input, false, None)
    }

    fn run(&mut self, input: &PixelBuffer, temporal: bool, grey: Option<Vec<u8>>) -> DecodeResult {
        if input.is_empty() {
            return DecodeResult::NotFound;
        }
        let hit = {
            let history = temporal.then_some(&self.history);
            let ctx = match grey {
                Some(grey) => FrameContext::with_grey(input, history, grey),
                None => FrameContext::new(input, history),
            };
            self.order.iter().find_map(|&id| {
                let strategy = id.strategy();
                let Some(candidate) = strategy.apply(&ctx) else {
                    tracing::trace!(strategy = strategy.name, "no candidate");
                    return None;
                };
                tracing::trace!(
                    strategy = strategy.name,
                    width = candidate.width(),
                    height = candidate.height(),
                    "attempting decode"
                );
                self.decoder.decode(&candidate).map(|text| (id, text))
            })
        };

        match hit {
            Some((strategy, text)) => {
                let name = strategy.name();
                tracing::debug!(id = strategy as u8, name, len = text.len(), "decoded");
                self.record_hit(name);
                DecodeResult::Found { strategy, name, text }
            }
            None => DecodeResult::NotFound,
        }
    }

    fn record_hit(&mut self, name: &'static str) {
        self.stats.record_hit(name);
        let every = u64::from(self.config.auto_reorder_every);
        if every > 0 && self.stats.total() % every == 0 {
            self.reorder_by_hits();
        }
    }

    /// Sort by hit count descending; equal counts keep their current
    /// relative order.
    fn reorder_by_hits(&mut self) {
        let stats = &self.stats;
        self.order.sort_by_key(|id| Reverse(stats.hits(id.name())));
        tracing::info!(first = self.order[0].name(), "strategy order re-sorted by hits");
    }

    /// Move `ids` to the front in the given sequence (first occurrence wins),
    /// then append every remaining strategy in default order.
    pub fn set_order(&mut self, ids: &[StrategyId]) {
        let mut order = Vec::with_capacity(DEFAULT_ORDER.len());
        for &id in ids.iter().chain(DEFAULT_ORDER.iter()) {
            if !order.contains(&id) {
                order.push(id);
            }
        }
        self.order = order;
    }

    /// Raw-id form of `set_order`; ids outside the registry are dropped.
    pub fn set_order_ids(&mut self, ids: &[u8]) {
        let ids: Vec<StrategyId> = ids
            .iter()
            .filter_map(|&raw| {
                StrategyId::try_from(raw)
                    .map_err(|err: CascadeError| tracing::debug!(%err, "skipping strategy id"))
                    .ok()
            })
            .collect();
        self.set_order(&ids);
    }

    pub fn set_order_csv(&mut self, csv: &str) {
        self.set_order(&parse_order_csv(csv));
    }

    /// Restore the built-in order and clear the counters.
    pub fn reset_order(&mut self) {
        self.order = DEFAULT_ORDER.to_vec();
        self.stats.reset();
        tracing::info!("strategy order and stats reset");
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
        tracing::info!("decode stats reset");
    }

    pub fn reset_frames(&mut self) {
        self.history.reset();
    }
}
