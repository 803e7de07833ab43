//! Common types for xsync
//!
//! Fundamental signal types shared by the extractor and the correlator.

use crate::error::{Result, SyncError};

/// Audio sample type (64-bit float end to end)
pub type Sample = f64;

/// A decoded mono signal at a fixed sample rate
///
/// Samples and rate are set together at construction and never change
/// afterwards; the correlator only borrows them.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<Sample>,
    sample_rate: u32,
}

impl Signal {
    /// Create a signal from owned samples
    ///
    /// Fails with `ArgumentsInvalid` for a zero sample rate.
    pub fn new(samples: Vec<Sample>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SyncError::ArgumentsInvalid(
                "sample rate must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds at this signal's sample rate
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Give the samples back to the caller
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

/// Which input channel is routed to the mono output
///
/// The selected channel is copied as-is; channels are never averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelSelector(usize);

impl ChannelSelector {
    /// Left / first channel
    pub const FIRST: ChannelSelector = ChannelSelector(0);
    /// Right / second channel
    pub const SECOND: ChannelSelector = ChannelSelector(1);

    /// Select an arbitrary zero-based channel index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }

    /// Check the selector against a stream's channel count
    pub fn validate(&self, channel_count: usize) -> Result<()> {
        if self.0 >= channel_count {
            return Err(SyncError::ChannelInvalid {
                requested: self.0,
                available: channel_count,
            });
        }
        Ok(())
    }
}

impl Default for ChannelSelector {
    fn default() -> Self {
        Self::FIRST
    }
}
