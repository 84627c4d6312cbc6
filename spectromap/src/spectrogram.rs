use rustfft::num_complex::Complex64;
use rustfft::num_traits::Zero;

use crate::config::{Configuration, Detrend, Scaling};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::utils::{is_strictly_increasing, min_value};

/// Time-frequency energy surface of a signal.
///
/// `power` has one row per frequency bin and one column per frame, so its
/// shape is always `(frequencies.len(), times.len())`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    pub frequencies: Vec<f64>,
    pub times: Vec<f64>,
    pub power: Matrix<f64>,
}

impl Spectrogram {
    /// `(frequency bins, time frames)`
    pub fn shape(&self) -> (usize, usize) {
        self.power.shape()
    }
}

/// Computes the spectrogram of `samples` using the frame, window and FFT
/// settings of `config`.
///
/// The log scale setting is honored, see [to_log_scale].
pub fn compute_spectrogram(samples: &[f64], config: &Configuration) -> Result<Spectrogram> {
    config.validate_spectrogram()?;

    let frame_size = config.frame_size();
    if samples.len() < frame_size {
        return Err(Error::InsufficientData {
            samples: samples.len(),
            frame_size,
        });
    }

    if let Some(i) = samples.iter().position(|s| !s.is_finite()) {
        return Err(Error::invalid("samples", format!("sample #{i} is not finite")));
    }

    let window = config.window().coefficients(frame_size)?;
    let fft_size = config.fft_size();
    let hop_size = config.hop_size();
    let bins = config.frequency_bins();
    let frames = (samples.len() - frame_size) / hop_size + 1;
    let scale = scale_factors(config, &window);

    log::debug!(
        "computing spectrogram: {} samples, {} frames of {} (hop {}), {} bins",
        samples.len(),
        frames,
        frame_size,
        hop_size,
        bins
    );

    let fft_plan = rustfft::FftPlanner::<f64>::new().plan_fft_forward(fft_size);
    let mut fft_buffer = vec![Complex64::zero(); fft_size];
    let mut fft_scratch = vec![Complex64::zero(); fft_plan.get_inplace_scratch_len()];

    let mut columns = Vec::with_capacity(frames);
    for frame in samples.windows(frame_size).step_by(hop_size) {
        let mean = match config.detrend() {
            Detrend::None => 0.0,
            Detrend::Constant => frame.iter().sum::<f64>() / frame_size as f64,
        };

        for (output, (input, w)) in fft_buffer.iter_mut().zip(frame.iter().zip(&window)) {
            output.re = (input - mean) * w;
            output.im = 0.0;
        }
        for output in &mut fft_buffer[frame_size..] {
            *output = Complex64::zero();
        }

        fft_plan.process_with_scratch(&mut fft_buffer, &mut fft_scratch);

        let column: Vec<f64> = fft_buffer[..bins]
            .iter()
            .zip(&scale)
            .map(|(x, s)| x.norm_sqr() * s)
            .collect();
        columns.push(column);
    }
    debug_assert_eq!(columns.len(), frames);

    let sample_rate = config.sample_rate();
    let frequencies: Vec<f64> = (0..bins).map(|i| i as f64 * sample_rate / fft_size as f64).collect();
    let times: Vec<f64> = (0..frames)
        .map(|j| ((j * hop_size) as f64 + frame_size as f64 / 2.0) / sample_rate)
        .collect();
    debug_assert!(is_strictly_increasing(&frequencies) && is_strictly_increasing(&times));

    let mut power = Matrix::from_columns(bins, &columns);
    if config.log_scale() {
        power = to_log_scale(&power)?;
    }

    Ok(Spectrogram { frequencies, times, power })
}

/// Per-bin multipliers for the requested scaling.
fn scale_factors(config: &Configuration, window: &[f64]) -> Vec<f64> {
    let bins = config.frequency_bins();
    let base = match config.scaling() {
        Scaling::Power => return vec![1.0; bins],
        Scaling::Density => 1.0 / (config.sample_rate() * window.iter().map(|w| w * w).sum::<f64>()),
        Scaling::Spectrum => 1.0 / window.iter().sum::<f64>().powi(2),
    };

    // One-sided: fold the negative frequencies onto their positive twins.
    let mut scale = vec![2.0 * base; bins];
    scale[0] = base;
    if config.fft_size() % 2 == 0 {
        scale[bins - 1] = base;
    }
    scale
}

/// Maps every value to `20·log10(v / min)`, where `min` is the global minimum.
///
/// Fails if the minimum is not positive, because the result would contain
/// infinities or NaNs. Non-finite input values are rejected as well.
pub fn to_log_scale(power: &Matrix<f64>) -> Result<Matrix<f64>> {
    if let Some(value) = power.as_row_major().iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid("power", format!("log scale needs finite values, got {value}")));
    }

    let minimum = match min_value(power.as_row_major()) {
        Some(minimum) => minimum,
        None => return Ok(power.clone()),
    };

    if !(minimum > 0.0) {
        return Err(Error::Domain { minimum });
    }

    Ok(power.map(|v| 20.0 * f64::log10(v / minimum)))
}
