//! FFT cross-correlation lag estimation
//!
//! Both signals are zero-padded to `n = len1 + len2 - 1`, the shortest length
//! at which circular correlation equals linear correlation. The cross-power
//! spectrum is formed per bin, transformed back, and the position of the
//! maximum is converted to a signed lag:
//!
//! ```text
//! index:  0 ........ len2-1 | len2 ............ n-1
//! lag:    0 ........ len2-1 | -(len1-1) ........ -1
//! ```
//!
//! A positive lag means signal 2 is delayed relative to signal 1. Swapping
//! the inputs negates the lag.
//!
//! The inverse transform is left unnormalized; only the peak position is
//! used, never its magnitude across signal pairs.

use realfft::num_complex::Complex;
use realfft::RealFftPlanner;

use crate::error::{Result, SyncError};
use crate::types::{Sample, Signal};

/// Location and height of the correlation maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationPeak {
    /// Index into the length-`n` correlation sequence
    pub index: usize,
    /// Unnormalized correlation value at `index`
    pub value: f64,
    /// Signed lag in samples
    pub lag: i64,
}

/// Reusable correlator holding FFT plans across calls
pub struct Correlator {
    planner: RealFftPlanner<Sample>,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}

impl Correlator {
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::new(),
        }
    }

    /// Lag between two signals at the same sample rate
    pub fn correlate(&mut self, signal1: &Signal, signal2: &Signal) -> Result<i64> {
        if signal1.sample_rate() != signal2.sample_rate() {
            return Err(SyncError::ArgumentsInvalid(format!(
                "sample rates differ: {} Hz vs {} Hz",
                signal1.sample_rate(),
                signal2.sample_rate()
            )));
        }
        Ok(self.peak(signal1.samples(), signal2.samples())?.lag)
    }

    /// Full peak information for two sample sequences
    pub fn peak(&mut self, signal1: &[Sample], signal2: &[Sample]) -> Result<CorrelationPeak> {
        if signal1.is_empty() || signal2.is_empty() {
            return Err(SyncError::EmptySignal);
        }

        let n = signal1.len() + signal2.len() - 1;
        let num_bins = n / 2 + 1;

        log::debug!(
            "Correlating {} x {} samples (n={}, {} bins)",
            signal1.len(),
            signal2.len(),
            n,
            num_bins
        );

        let mut padded1 = zero_padded(signal1, n)?;
        let mut padded2 = zero_padded(signal2, n)?;

        // Forward transforms
        let fft = self.planner.plan_fft_forward(n);
        let mut spectrum1 = zeroed(num_bins, Complex::new(0.0, 0.0))?;
        let mut spectrum2 = zeroed(num_bins, Complex::new(0.0, 0.0))?;
        let mut scratch = zeroed(fft.get_scratch_len(), Complex::new(0.0, 0.0))?;

        fft.process_with_scratch(&mut padded1, &mut spectrum1, &mut scratch)
            .map_err(|e| SyncError::Unsupported(format!("FFT failed: {:?}", e)))?;
        fft.process_with_scratch(&mut padded2, &mut spectrum2, &mut scratch)
            .map_err(|e| SyncError::Unsupported(format!("FFT failed: {:?}", e)))?;
        drop(padded2);

        // Cross-power spectrum, a * conj(b) with a = spectrum2, b = spectrum1.
        // Written into spectrum2 to spare another allocation.
        for (a, b) in spectrum2.iter_mut().zip(&spectrum1) {
            let re = a.re * b.re + a.im * b.im;
            let im = -a.re * b.im + a.im * b.re;
            *a = Complex::new(re, im);
        }
        drop(spectrum1);
        let mut cross = spectrum2;

        // DC and Nyquist bins of a real signal are purely real
        cross[0].im = 0.0;
        if n % 2 == 0 {
            cross[num_bins - 1].im = 0.0;
        }

        // Inverse transform into the (now clobbered) first input buffer
        let ifft = self.planner.plan_fft_inverse(n);
        if ifft.get_scratch_len() > scratch.len() {
            scratch = zeroed(ifft.get_scratch_len(), Complex::new(0.0, 0.0))?;
        }
        let correlation = &mut padded1;
        ifft.process_with_scratch(&mut cross, correlation, &mut scratch[..ifft.get_scratch_len()])
            .map_err(|e| SyncError::Unsupported(format!("inverse FFT failed: {:?}", e)))?;

        let (index, value) = find_peak(correlation);
        if !value.is_finite() {
            return Err(SyncError::DataInvalid(
                "correlation is not finite; input contains NaN or infinity".to_string(),
            ));
        }

        let lag = peak_to_lag(index, signal2.len(), n);
        log::debug!("Correlation peak at index {} (value {:.3e}) -> lag {}", index, value, lag);

        Ok(CorrelationPeak { index, value, lag })
    }
}

/// Estimate the lag between two signals
pub fn cross_correlate(signal1: &Signal, signal2: &Signal) -> Result<i64> {
    Correlator::new().correlate(signal1, signal2)
}

/// Estimate the lag between two raw sample sequences
pub fn cross_correlate_samples(signal1: &[Sample], signal2: &[Sample]) -> Result<i64> {
    Ok(Correlator::new().peak(signal1, signal2)?.lag)
}

/// First index holding the strict maximum
fn find_peak(data: &[Sample]) -> (usize, Sample) {
    let mut max_index = 0;
    let mut max_value = data[0];
    for (i, &v) in data.iter().enumerate().skip(1) {
        if v > max_value {
            max_value = v;
            max_index = i;
        }
    }
    (max_index, max_value)
}

/// Indices past the last non-negative lag wrap around to negative lags
fn peak_to_lag(index: usize, len2: usize, n: usize) -> i64 {
    if index >= len2 {
        index as i64 - n as i64
    } else {
        index as i64
    }
}

fn zeroed<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, value);
    Ok(v)
}

fn zero_padded(signal: &[Sample], n: usize) -> Result<Vec<Sample>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)?;
    v.extend_from_slice(signal);
    v.resize(n, 0.0);
    Ok(v)
}
