//! Lag analysis entry points
//!
//! Two modes:
//! - one file: channel 0 against channel 1 at the file's native rate
//! - two files: channel 0 of each, both at the larger native rate
//!
//! Extraction of every input completes before correlation starts.

use std::path::Path;

use serde::Serialize;

use crate::config::ExtractConfig;
use crate::correlate::Correlator;
use crate::error::Result;
use crate::extract::{extract_with_config, probe_sample_rate};
use crate::types::ChannelSelector;

/// Outcome of one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LagReport {
    /// Signed lag in samples (positive: second input is delayed)
    pub delta_samples: i64,
    /// Rate both signals were compared at
    pub sample_rate: u32,
    /// Lag in milliseconds, truncated toward zero
    pub delta_ms: i64,
}

impl LagReport {
    pub fn new(delta_samples: i64, sample_rate: u32) -> Self {
        // Integer division truncates toward zero for negative lags too
        let delta_ms = delta_samples * 1000 / sample_rate.max(1) as i64;
        Self {
            delta_samples,
            sample_rate,
            delta_ms,
        }
    }
}

/// Compare the first two channels of a single file
pub fn analyze_channels<P: AsRef<Path>>(path: P, config: &ExtractConfig) -> Result<LagReport> {
    let path = path.as_ref();
    let sample_rate = probe_sample_rate(path)?;
    log::info!("Single-file mode: {:?} at {} Hz", path, sample_rate);

    let first = extract_with_config(path, ChannelSelector::FIRST, sample_rate, config)?;
    let second = extract_with_config(path, ChannelSelector::SECOND, sample_rate, config)?;

    let lag = Correlator::new().correlate(&first, &second)?;
    Ok(LagReport::new(lag, sample_rate))
}

/// Compare the first channel of two files
pub fn analyze_files<P: AsRef<Path>, Q: AsRef<Path>>(
    path1: P,
    path2: Q,
    config: &ExtractConfig,
) -> Result<LagReport> {
    let (path1, path2) = (path1.as_ref(), path2.as_ref());
    let rate1 = probe_sample_rate(path1)?;
    let rate2 = probe_sample_rate(path2)?;
    let sample_rate = rate1.max(rate2);
    log::info!(
        "Two-file mode: {:?} ({} Hz) vs {:?} ({} Hz), comparing at {} Hz",
        path1,
        rate1,
        path2,
        rate2,
        sample_rate
    );

    let first = extract_with_config(path1, ChannelSelector::FIRST, sample_rate, config)?;
    let second = extract_with_config(path2, ChannelSelector::FIRST, sample_rate, config)?;

    let lag = Correlator::new().correlate(&first, &second)?;
    Ok(LagReport::new(lag, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReturnCode, SyncError};
    use crate::test_util::{chirp, delayed, mono_wav, tone, write_wav};

    #[test]
    fn test_report_truncates_toward_zero() {
        assert_eq!(LagReport::new(400, 8000).delta_ms, 50);
        assert_eq!(LagReport::new(-400, 8000).delta_ms, -50);
        assert_eq!(LagReport::new(7, 8000).delta_ms, 0);
        assert_eq!(LagReport::new(-7, 8000).delta_ms, 0);
        assert_eq!(LagReport::new(-441, 44100).delta_ms, -10);
        assert_eq!(LagReport::new(-450, 44100).delta_ms, -10);
    }

    #[test]
    fn test_two_files_delayed_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let a = chirp(200.0, 1000.0, 8000, 8000);
        let b = delayed(&a, 400);
        let path1 = mono_wav(dir.path(), "a.wav", 8000, &a);
        let path2 = mono_wav(dir.path(), "b.wav", 8000, &b);

        let report = analyze_files(&path1, &path2, &ExtractConfig::default()).unwrap();
        assert_eq!(
            report,
            LagReport {
                delta_samples: 400,
                sample_rate: 8000,
                delta_ms: 50,
            }
        );

        let reversed = analyze_files(&path2, &path1, &ExtractConfig::default()).unwrap();
        assert_eq!(reversed.delta_samples, -400);
        assert_eq!(reversed.delta_ms, -50);
    }

    #[test]
    fn test_single_file_two_channels() {
        let dir = tempfile::tempdir().unwrap();
        let left = chirp(200.0, 1000.0, 8000, 8000);
        let right = delayed(&left, 400);
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 8000, &[&left, &right]);

        let report = analyze_channels(&path, &ExtractConfig::default()).unwrap();
        assert_eq!(report.delta_samples, 400);
        assert_eq!(report.sample_rate, 8000);
        assert_eq!(report.delta_ms, 50);
    }

    #[test]
    fn test_single_file_needs_two_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = mono_wav(dir.path(), "mono.wav", 8000, &tone(440.0, 8000, 800));

        let err = analyze_channels(&path, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, SyncError::ChannelInvalid { .. }));
        assert_eq!(err.return_code(), ReturnCode::FormatInvalid);
    }

    #[test]
    fn test_two_files_use_larger_rate() {
        let dir = tempfile::tempdir().unwrap();
        // Irregular decaying bursts: broadband, and only one alignment lines them all up
        let mut a = vec![0.0f32; 8000];
        for &start in &[137usize, 1020, 2210, 2900, 4440, 5123, 6600, 7300] {
            for t in 0..40 {
                a[start + t] = ((t as f32) * 0.7).sin() * (1.0 - t as f32 / 40.0);
            }
        }
        let a_hi: Vec<f32> = (0..16000).map(|i| a[i / 2]).collect();
        let b_hi = delayed(&a_hi, 800);

        let path1 = mono_wav(dir.path(), "lo.wav", 8000, &a);
        let path2 = mono_wav(dir.path(), "hi.wav", 16000, &b_hi);

        let report = analyze_files(&path1, &path2, &ExtractConfig::default()).unwrap();
        assert_eq!(report.sample_rate, 16000);
        assert!(
            (report.delta_samples - 800).abs() <= 2,
            "delta {} samples",
            report.delta_samples
        );
        assert_eq!(report.delta_ms, report.delta_samples * 1000 / 16000);
    }

    #[test]
    fn test_missing_second_file() {
        let dir = tempfile::tempdir().unwrap();
        let path1 = mono_wav(dir.path(), "a.wav", 8000, &tone(440.0, 8000, 800));

        let err = analyze_files(&path1, dir.path().join("missing.wav"), &ExtractConfig::default())
            .unwrap_err();
        assert_eq!(err.return_code(), ReturnCode::CannotOpenFile);
    }
}
