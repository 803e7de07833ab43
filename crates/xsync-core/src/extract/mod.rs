//! Channel extractor
//!
//! Turns a compressed media file into a single mono [`Signal`] at a requested
//! sample rate:
//!
//! ```text
//! path ─► DecodeSession ─► selected channel ─► ResampleSession ─► SampleAccumulator ─► Signal
//!          (symphonia)      (direct remap)       (rubato)           (doubling growth)
//! ```
//!
//! Extraction is all-or-nothing: any open, decode, conversion or allocation
//! failure drops the sessions and the partial buffer and returns the error.

mod buffer;
mod resample;
mod session;

use std::path::Path;

pub use buffer::SampleAccumulator;
pub use resample::ResampleSession;
pub use session::{DecodeSession, StreamInfo};

use crate::config::ExtractConfig;
use crate::error::{Result, SyncError};
use crate::types::{ChannelSelector, Signal};

/// Read what the container declares about its best audio stream
///
/// Opens the codec but decodes nothing.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<StreamInfo> {
    let session = DecodeSession::open(path)?;
    Ok(session.info().clone())
}

/// Native sample rate of the best audio stream
pub fn probe_sample_rate<P: AsRef<Path>>(path: P) -> Result<u32> {
    Ok(probe(path)?.sample_rate)
}

/// Decode one channel of `path` at `target_rate` with default settings
pub fn extract<P: AsRef<Path>>(
    path: P,
    selector: ChannelSelector,
    target_rate: u32,
) -> Result<Signal> {
    extract_with_config(path, selector, target_rate, &ExtractConfig::default())
}

/// Decode one channel of `path` at `target_rate`
pub fn extract_with_config<P: AsRef<Path>>(
    path: P,
    selector: ChannelSelector,
    target_rate: u32,
    config: &ExtractConfig,
) -> Result<Signal> {
    let path = path.as_ref();
    if target_rate == 0 {
        return Err(SyncError::ArgumentsInvalid(
            "target sample rate must be greater than zero".to_string(),
        ));
    }

    let mut session = DecodeSession::open(path)?;
    let native_rate = session.info().sample_rate;

    match session.info().channels {
        Some(count) => selector.validate(count)?,
        None => log::warn!(
            "{:?} declares no channel layout; validating channel {} on first frame",
            path,
            selector.index()
        ),
    }

    let mut resampler = ResampleSession::new(native_rate, target_rate, &config.resampler)?;
    let mut out = SampleAccumulator::with_capacity(config.initial_capacity)?;

    let frames = session.decode(selector, |mono| resampler.push(mono, &mut out))?;
    resampler.finish(&mut out)?;

    log::info!(
        "Extracted channel {} of {:?}: {} frames at {} Hz -> {} samples at {} Hz ({} buffer growths)",
        selector.index(),
        path,
        frames,
        native_rate,
        out.len(),
        target_rate,
        out.growths()
    );

    out.into_signal(target_rate)
}
