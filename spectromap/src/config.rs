use crate::constellation::Axis;
use crate::error::{Error, Result};
use crate::window::Window;

/// Per-frame trend removal applied before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detrend {
    #[default]
    None,
    /// Subtract the frame mean.
    Constant,
}

/// Scaling of the squared FFT magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scaling {
    /// Raw `|X|²`.
    #[default]
    Power,
    /// One-sided power spectral density, `V²/Hz`.
    Density,
    /// One-sided power spectrum, `V²`.
    Spectrum,
}

/// Structure containing configuration for a [SpectroMap](crate::SpectroMap).
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    sample_rate: f64,
    window: Window,
    frame_size: usize,
    frame_overlap: usize,
    fft_size: usize,
    detrend: Detrend,
    scaling: Scaling,
    log_scale: bool,
    fraction: f64,
    axis: Axis,
}

impl Configuration {
    /// Creates a configuration for a signal sampled at `sample_rate` Hz, other
    /// values are defaults.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Sets number of samples in a single frame (`nperseg`).
    ///
    /// Overlap and FFT size are not adjusted, set them afterwards if needed.
    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Sets number of samples overlapping between two consecutive frames (`noverlap`).
    pub fn with_frame_overlap(mut self, frame_overlap: usize) -> Self {
        self.frame_overlap = frame_overlap;
        self
    }

    /// Sets length of the FFT (`nfft`), frames are zero-padded up to it.
    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    pub fn with_detrend(mut self, detrend: Detrend) -> Self {
        self.detrend = detrend;
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Enables or disables the `20·log10(S / min(S))` transform.
    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }

    /// Sets the fraction of an axis length used as minimum peak separation.
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn frame_overlap(&self) -> usize {
        self.frame_overlap
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn detrend(&self) -> Detrend {
        self.detrend
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    pub fn log_scale(&self) -> bool {
        self.log_scale
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of samples between the starts of two consecutive frames.
    pub fn hop_size(&self) -> usize {
        self.frame_size.saturating_sub(self.frame_overlap)
    }

    /// Number of frequency bins of the resulting spectrogram.
    pub fn frequency_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Checks the spectrogram parameters.
    pub fn validate_spectrogram(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::invalid("sample_rate", format!("must be positive, got {}", self.sample_rate)));
        }
        if self.frame_size == 0 {
            return Err(Error::invalid("frame_size", "must be at least 1"));
        }
        if self.frame_overlap >= self.frame_size {
            return Err(Error::invalid(
                "frame_overlap",
                format!("must be less than frame size {}, got {}", self.frame_size, self.frame_overlap),
            ));
        }
        if self.fft_size < self.frame_size {
            return Err(Error::invalid(
                "fft_size",
                format!("must be at least frame size {}, got {}", self.frame_size, self.fft_size),
            ));
        }
        Ok(())
    }

    /// Checks every parameter, so nothing is computed with a bad configuration.
    pub fn validate(&self) -> Result<()> {
        self.validate_spectrogram()?;
        crate::constellation::check_fraction(self.fraction)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window: Window::default(),
            frame_size: DEFAULT_FRAME_SIZE,
            frame_overlap: DEFAULT_FRAME_OVERLAP,
            fft_size: DEFAULT_FRAME_SIZE,
            detrend: Detrend::default(),
            scaling: Scaling::default(),
            log_scale: false,
            fraction: DEFAULT_FRACTION,
            axis: Axis::default(),
        }
    }
}

const DEFAULT_SAMPLE_RATE: f64 = 1.0;
const DEFAULT_FRAME_SIZE: usize = 256;
const DEFAULT_FRAME_OVERLAP: usize = DEFAULT_FRAME_SIZE / 8;
pub(crate) const DEFAULT_FRACTION: f64 = 0.1;
