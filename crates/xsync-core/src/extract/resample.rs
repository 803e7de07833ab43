//! Mono sample rate conversion
//!
//! Wraps rubato's `SincFixedIn` for a single channel. Input arrives in
//! decoder-sized frames of arbitrary length, so samples are staged until a
//! full resampler chunk is available. On `finish` the residue is flushed and
//! the tail is cut to `ceil(input_frames * output_rate / input_rate)` so the
//! output length tracks the input duration.
//!
//! In this push/flush scheme the chunks `SincFixedIn` returns are already
//! aligned with the input: output frame `k` sits at input time
//! `k / ratio`. Nothing is dropped from the head.
//!
//! When input and output rates match the session is a pass-through and the
//! sample count is exact.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::buffer::SampleAccumulator;
use crate::config::{Interpolation, ResamplerConfig};
use crate::error::{Result, SyncError};
use crate::types::Sample;

/// Upper bound on zero-fed flush calls; guards against a resampler that
/// never reports progress
const MAX_FLUSH_ROUNDS: usize = 64;

/// Transient converter state for one extraction call
pub struct ResampleSession {
    mode: Mode,
    input_frames: u64,
}

enum Mode {
    Passthrough,
    Sinc(SincState),
}

struct SincState {
    resampler: SincFixedIn<Sample>,
    input_rate: u64,
    output_rate: u64,
    pending: Vec<Sample>,
}

impl ResampleSession {
    /// Build a converter from `input_rate` to `output_rate`
    pub fn new(input_rate: u32, output_rate: u32, config: &ResamplerConfig) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(SyncError::FormatInvalid(format!(
                "cannot resample {} Hz -> {} Hz",
                input_rate, output_rate
            )));
        }

        if input_rate == output_rate {
            log::debug!("Resampler pass-through at {} Hz", input_rate);
            return Ok(Self {
                mode: Mode::Passthrough,
                input_frames: 0,
            });
        }

        let ratio = output_rate as f64 / input_rate as f64;
        let params = SincInterpolationParameters {
            sinc_len: config.sinc_len,
            f_cutoff: config.f_cutoff,
            interpolation: match config.interpolation {
                Interpolation::Nearest => SincInterpolationType::Nearest,
                Interpolation::Linear => SincInterpolationType::Linear,
                Interpolation::Cubic => SincInterpolationType::Cubic,
            },
            oversampling_factor: config.oversampling_factor,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedIn::<Sample>::new(ratio, 1.0, params, config.chunk_size, 1)
            .map_err(|e| SyncError::FormatInvalid(format!("cannot build resampler: {}", e)))?;

        log::debug!(
            "Resampler {} Hz -> {} Hz (ratio {:.5}, chunk {})",
            input_rate,
            output_rate,
            ratio,
            config.chunk_size
        );

        let mut pending = Vec::new();
        pending.try_reserve_exact(config.chunk_size)?;

        Ok(Self {
            mode: Mode::Sinc(SincState {
                resampler,
                input_rate: input_rate as u64,
                output_rate: output_rate as u64,
                pending,
            }),
            input_frames: 0,
        })
    }

    /// Convert one decoded frame's worth of mono samples
    pub fn push(&mut self, input: &[Sample], out: &mut SampleAccumulator) -> Result<()> {
        self.input_frames += input.len() as u64;

        let state = match &mut self.mode {
            Mode::Passthrough => return out.extend(input),
            Mode::Sinc(state) => state,
        };

        let mut input = input;
        while !input.is_empty() {
            let needed = state.resampler.input_frames_next() - state.pending.len();
            let take = needed.min(input.len());
            state.pending.try_reserve(take)?;
            state.pending.extend_from_slice(&input[..take]);
            input = &input[take..];

            if state.pending.len() == state.resampler.input_frames_next() {
                let chunk = state
                    .resampler
                    .process(&[state.pending.as_slice()][..], None)
                    .map_err(|e| SyncError::Unknown(format!("resampling failed: {}", e)))?;
                state.pending.clear();
                out.extend(&chunk[0])?;
            }
        }
        Ok(())
    }

    /// Flush buffered input and fix up the output length
    ///
    /// `out` must hold only this session's output.
    pub fn finish(self, out: &mut SampleAccumulator) -> Result<()> {
        let mut state = match self.mode {
            Mode::Passthrough => return Ok(()),
            Mode::Sinc(state) => state,
        };

        let expected = state.output_len(self.input_frames);

        if !state.pending.is_empty() {
            let chunk = state
                .resampler
                .process_partial(Some(&[state.pending.as_slice()][..]), None)
                .map_err(|e| SyncError::Unknown(format!("resampling failed: {}", e)))?;
            state.pending.clear();
            out.extend(&chunk[0])?;
        }

        let mut rounds = 0;
        while out.len() < expected && rounds < MAX_FLUSH_ROUNDS {
            let chunk = state
                .resampler
                .process_partial(None::<&[&[Sample]]>, None)
                .map_err(|e| SyncError::Unknown(format!("resampling failed: {}", e)))?;
            out.extend(&chunk[0])?;
            rounds += 1;
        }

        if out.len() < expected {
            log::warn!(
                "Resampler flush produced {} of {} expected samples",
                out.len(),
                expected
            );
        }
        out.truncate(expected);
        Ok(())
    }
}

impl SincState {
    /// Output frames covering `input_frames` of input, rounded up
    fn output_len(&self, input_frames: u64) -> usize {
        (input_frames * self.output_rate).div_ceil(self.input_rate) as usize
    }
}
