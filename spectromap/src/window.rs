use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Window applied to every frame before the FFT.
///
/// Built-in shapes are generated in their periodic form, i.e. an `N + 1` point
/// symmetric window with the last point dropped, which is what spectral
/// analysis expects.
#[derive(Debug, Clone, PartialEq)]
pub enum Window {
    Rectangular,
    Hann,
    Hamming,
    Blackman,
    /// Tapered cosine window; `alpha` is the tapered fraction, between 0 and 1.
    Tukey(f64),
    /// Precomputed coefficients, must be exactly one frame long.
    Custom(Vec<f64>),
}

impl Default for Window {
    fn default() -> Self {
        Window::Tukey(0.25)
    }
}

impl Window {
    /// Returns `size` window coefficients.
    pub fn coefficients(&self, size: usize) -> Result<Vec<f64>> {
        if let Window::Tukey(alpha) = self {
            if !(0.0..=1.0).contains(alpha) {
                return Err(Error::invalid("window", format!("tukey alpha must be in [0, 1], got {alpha}")));
            }
        }

        if size <= 1 {
            if let Window::Custom(values) = self {
                check_custom_len(values, size)?;
                return Ok(values.clone());
            }
            return Ok(vec![1.0; size]);
        }

        let window = match self {
            Window::Rectangular => vec![1.0; size],
            Window::Hann => cosine_sum(size, &[0.5, 0.5]),
            Window::Hamming => cosine_sum(size, &[0.54, 0.46]),
            Window::Blackman => cosine_sum(size, &[0.42, 0.5, 0.08]),
            Window::Tukey(alpha) => {
                let mut window = tukey_symmetric(size + 1, *alpha);
                window.truncate(size);
                window
            }
            Window::Custom(values) => {
                check_custom_len(values, size)?;
                values.clone()
            }
        };

        Ok(window)
    }
}

fn check_custom_len(values: &[f64], size: usize) -> Result<()> {
    if values.len() != size {
        return Err(Error::invalid(
            "window",
            format!("custom window has {} coefficients, frame size is {}", values.len(), size),
        ));
    }
    Ok(())
}

/// Periodic generalized cosine window: `w[n] = Σ (-1)^k a[k] cos(2πkn / size)`.
fn cosine_sum(size: usize, a: &[f64]) -> Vec<f64> {
    (0..size)
        .map(|n| {
            let phase = 2.0 * PI * n as f64 / size as f64;
            a.iter()
                .enumerate()
                .map(|(k, &ak)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * ak * f64::cos(k as f64 * phase)
                })
                .sum()
        })
        .collect()
}

fn tukey_symmetric(size: usize, alpha: f64) -> Vec<f64> {
    if alpha <= 0.0 {
        return vec![1.0; size];
    }

    let m = (size - 1) as f64;
    if alpha >= 1.0 {
        return (0..size).map(|n| 0.5 - 0.5 * f64::cos(2.0 * PI * n as f64 / m)).collect();
    }

    let width = (alpha * m / 2.0).floor() as usize;
    (0..size)
        .map(|n| {
            let x = n as f64;
            if n <= width {
                0.5 * (1.0 + f64::cos(PI * (-1.0 + 2.0 * x / alpha / m)))
            } else if n < size - width - 1 {
                1.0
            } else {
                0.5 * (1.0 + f64::cos(PI * (-2.0 / alpha + 1.0 + 2.0 * x / alpha / m)))
            }
        })
        .collect()
}

impl FromStr for Window {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boxcar" | "rectangular" | "rect" => Ok(Window::Rectangular),
            "hann" | "hanning" => Ok(Window::Hann),
            "hamming" => Ok(Window::Hamming),
            "blackman" => Ok(Window::Blackman),
            "tukey" => Ok(Window::default()),
            _ => Err(Error::invalid("window", format!("unknown window `{s}`"))),
        }
    }
}
