//! Extraction configuration
//!
//! There are no configuration files; the CLI builds an [`ExtractConfig`] from
//! flags and environment.

/// Initial capacity of the extraction output buffer (samples)
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Root extraction configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    /// Starting capacity of the growable sample buffer
    pub initial_capacity: usize,
    /// Sample rate conversion settings
    pub resampler: ResamplerConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            resampler: ResamplerConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Config using a resampler quality preset
    pub fn with_quality(quality: Quality) -> Self {
        Self {
            resampler: ResamplerConfig::for_quality(quality),
            ..Self::default()
        }
    }

    /// Clamp values to workable ranges
    pub fn validate(&mut self) {
        self.initial_capacity = self.initial_capacity.max(1);
        self.resampler.validate();
    }
}

/// Resampler quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    Fast,
    #[default]
    Balanced,
    Best,
}

/// Interpolation between oversampled sinc points
///
/// Mirrors `rubato::SincInterpolationType` so callers need not depend on rubato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
    Cubic,
}

/// Sinc resampler configuration
///
/// These values map directly to rubato's `SincInterpolationParameters`,
/// plus the fixed input chunk size fed to `SincFixedIn`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResamplerConfig {
    /// Length of the windowed sinc kernel (taps)
    pub sinc_len: usize,
    /// Relative cutoff frequency (fraction of the lower Nyquist)
    pub f_cutoff: f32,
    /// Number of intermediate sinc tables
    pub oversampling_factor: usize,
    /// Interpolation between sinc tables
    pub interpolation: Interpolation,
    /// Input frames per processing call
    pub chunk_size: usize,
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self::for_quality(Quality::Balanced)
    }
}

impl ResamplerConfig {
    /// Preset parameters for a quality level
    pub fn for_quality(quality: Quality) -> Self {
        match quality {
            Quality::Fast => Self {
                sinc_len: 64,
                f_cutoff: 0.915,
                oversampling_factor: 128,
                interpolation: Interpolation::Nearest,
                chunk_size: 1024,
            },
            Quality::Balanced => Self {
                sinc_len: 256,
                f_cutoff: 0.95,
                oversampling_factor: 256,
                interpolation: Interpolation::Linear,
                chunk_size: 1024,
            },
            Quality::Best => Self {
                sinc_len: 512,
                f_cutoff: 0.97,
                oversampling_factor: 512,
                interpolation: Interpolation::Cubic,
                chunk_size: 2048,
            },
        }
    }

    /// Clamp values to ranges rubato accepts
    pub fn validate(&mut self) {
        // rubato rounds sinc_len up to a multiple of 8
        self.sinc_len = self.sinc_len.clamp(8, 2048);
        self.f_cutoff = self.f_cutoff.clamp(0.5, 0.99);
        self.oversampling_factor = self.oversampling_factor.clamp(16, 1024);
        self.chunk_size = self.chunk_size.clamp(64, 1 << 16);
    }
}
