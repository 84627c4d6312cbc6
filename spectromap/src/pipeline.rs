use crate::config::Configuration;
use crate::constellation::{landmarks, peak_search, Landmark, PeakMap};
use crate::error::Result;
use crate::spectrogram::{compute_spectrogram, Spectrogram};

/// Computes constellation maps of complete sample buffers.
///
/// Holds nothing but the validated configuration, every call starts from
/// scratch, so one instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct SpectroMap {
    config: Configuration,
}

impl SpectroMap {
    /// Creates a new [SpectroMap] with the given [Configuration].
    ///
    /// The configuration is checked here, so later calls only fail because of
    /// their input.
    pub fn new(config: &Configuration) -> Result<Self> {
        config.validate()?;
        Ok(Self { config: config.clone() })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Returns the spectrogram of a single channel of samples.
    pub fn spectrogram(&self, samples: &[f64]) -> Result<Spectrogram> {
        compute_spectrogram(samples, &self.config)
    }

    /// Finds peaks of a spectrogram along the configured axis.
    pub fn peak_matrix(&self, spectrogram: &Spectrogram) -> Result<PeakMap> {
        peak_search(&spectrogram.power, self.config.fraction(), self.config.axis())
    }

    /// Runs the whole pipeline: spectrogram, peaks, landmarks.
    pub fn constellation(&self, samples: &[f64]) -> Result<Vec<Landmark>> {
        let spectrogram = self.spectrogram(samples)?;
        let peaks = self.peak_matrix(&spectrogram)?;
        let landmarks = landmarks(&spectrogram, &peaks)?;

        log::debug!(
            "{} landmarks from {} bins x {} frames",
            landmarks.len(),
            spectrogram.frequencies.len(),
            spectrogram.times.len()
        );
        Ok(landmarks)
    }
}

/// Shortcut for `SpectroMap::new(config)?.constellation(samples)`.
pub fn constellation(samples: &[f64], config: &Configuration) -> Result<Vec<Landmark>> {
    SpectroMap::new(config)?.constellation(samples)
}
