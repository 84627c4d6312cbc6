//! Constellation maps of audio signals.
//!
//! A signal is turned into a spectrogram, then only the cells that are local
//! maxima along time, frequency or both are kept and returned as
//! `(time, frequency, amplitude)` landmarks, ready for fingerprint hashing.

pub use config::{Configuration, Detrend, Scaling};
pub use constellation::{landmarks, peak_search, separation, Axis, Landmark, PeakMap};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use peaks::{find_peaks, local_maxima};
pub use pipeline::{constellation, SpectroMap};
pub use spectrogram::{compute_spectrogram, to_log_scale, Spectrogram};
pub use window::Window;

mod config;
mod constellation;
mod error;
mod matrix;
mod peaks;
mod pipeline;
mod spectrogram;
mod utils;
mod window;
