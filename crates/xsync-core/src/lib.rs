//! xsync core - audio lag estimation
//!
//! Decodes audio files to mono `f64` signals at a common sample rate and
//! estimates the signed sample offset between them from the peak of their
//! FFT cross-correlation.
//!
//! - [`extract`]: decode + channel remap + resample (symphonia, rubato)
//! - [`correlate`]: zero-padded FFT cross-correlation (realfft)
//! - [`analysis`]: one-file and two-file lag reports

pub mod analysis;
pub mod config;
pub mod correlate;
pub mod error;
pub mod extract;
pub mod types;

#[cfg(test)]
mod test_util;

pub use analysis::{analyze_channels, analyze_files, LagReport};
pub use config::{ExtractConfig, Quality, ResamplerConfig};
pub use correlate::{cross_correlate, cross_correlate_samples, CorrelationPeak, Correlator};
pub use error::{Result, ReturnCode, SyncError};
pub use extract::{extract, extract_with_config, probe, probe_sample_rate, StreamInfo};
pub use types::*;
