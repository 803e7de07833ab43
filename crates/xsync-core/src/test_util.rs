//! WAV fixtures for tests

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Write interleaved channels as a 32-bit float WAV
///
/// All channels must have the same length.
pub fn write_wav(path: &Path, sample_rate: u32, channels: &[&[f32]]) {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let len = channels[0].len();
    for i in 0..len {
        for ch in channels {
            writer.write_sample(ch[i]).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// Write a mono WAV into `dir` and return its path
pub fn mono_wav(dir: &Path, name: &str, sample_rate: u32, samples: &[f32]) -> PathBuf {
    let path = dir.join(name);
    write_wav(&path, sample_rate, &[samples]);
    path
}

/// Sine tone of `len` samples
pub fn tone(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect()
}

/// Linear sweep from `f0` to `f1` Hz over `len` samples
///
/// Unlike a steady tone, a sweep has a single correlation maximum, so any
/// delay up to its length is unambiguous.
pub fn chirp(f0: f32, f1: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    let duration = len as f32 / sample_rate as f32;
    let slope = (f1 - f0) / duration;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * (f0 * t + 0.5 * slope * t * t)).sin() * 0.5
        })
        .collect()
}

/// Delay a signal by `delay` samples, zero-filling the head and keeping its length
pub fn delayed(signal: &[f32], delay: usize) -> Vec<f32> {
    let mut out = vec![0.0; signal.len()];
    if delay < signal.len() {
        out[delay..].copy_from_slice(&signal[..signal.len() - delay]);
    }
    out
}
