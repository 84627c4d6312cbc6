use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use spectromap::{Axis, Configuration, Detrend, Landmark, SpectroMap, Window};
use tracing_subscriber::EnvFilter;

mod audio;

/// Compute constellation maps (spectrogram peaks) of audio files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Resample the input audio to this rate before the analysis
    #[arg(short, long)]
    rate: Option<u32>,

    /// Restrict the duration of the processed input audio, in seconds (0 means no limit)
    #[arg(short, long, default_value_t = 120)]
    length: u32,

    /// Number of samples in a frame
    #[arg(long, default_value_t = 256)]
    nperseg: usize,

    /// Number of samples shared by consecutive frames [default: nperseg / 8]
    #[arg(long)]
    noverlap: Option<usize>,

    /// Length of the FFT [default: nperseg]
    #[arg(long)]
    nfft: Option<usize>,

    /// Window function (boxcar, hann, hamming, blackman, tukey)
    #[arg(short, long, default_value = "tukey")]
    window: Window,

    /// Remove the mean of every frame before the FFT
    #[arg(short, long)]
    detrend: bool,

    /// Convert the spectrogram to decibels relative to its minimum
    #[arg(short = 'L', long)]
    log_scale: bool,

    /// Fraction of an axis length used as minimum distance between peaks
    #[arg(short, long, default_value_t = 0.1)]
    fraction: f64,

    /// Axis to search for peaks (time, frequency, both or 0, 1, 2)
    #[arg(short, long, default_value = "both")]
    mode: Axis,

    /// Print the output in JSON format
    #[arg(short, long)]
    json: bool,

    /// File to analyze
    file: PathBuf,
}

impl Args {
    fn configuration(&self, sample_rate: u32) -> Configuration {
        Configuration::new(f64::from(sample_rate))
            .with_window(self.window.clone())
            .with_frame_size(self.nperseg)
            .with_frame_overlap(self.noverlap.unwrap_or(self.nperseg / 8))
            .with_fft_size(self.nfft.unwrap_or(self.nperseg))
            .with_detrend(if self.detrend { Detrend::Constant } else { Detrend::None })
            .with_log_scale(self.log_scale)
            .with_fraction(self.fraction)
            .with_axis(self.mode)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    file: &'a str,
    sample_rate: u32,
    duration: f64,
    landmarks: &'a [Landmark],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut audio = audio::decode_mono(&args.file, args.length)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    if let Some(rate) = args.rate {
        audio = audio::resample(audio, rate)?;
    }
    tracing::info!("{} samples at {} Hz ({:.2} s)", audio.samples.len(), audio.sample_rate, audio.duration());

    let map = SpectroMap::new(&args.configuration(audio.sample_rate)).context("invalid analysis parameters")?;
    let landmarks = map.constellation(&audio.samples).context("analysis failed")?;
    tracing::info!("{} landmarks", landmarks.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let report = Report {
            file: &args.file.to_string_lossy(),
            sample_rate: audio.sample_rate,
            duration: audio.duration(),
            landmarks: &landmarks,
        };
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        for landmark in &landmarks {
            writeln!(out, "{:.6}\t{:.3}\t{:.6}", landmark.time, landmark.frequency, landmark.amplitude)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use spectromap::{Axis, Window};

    use crate::Args;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_follow_frame_size() {
        let args = Args::try_parse_from(["smcalc", "--nperseg", "512", "song.flac"]).unwrap();
        let config = args.configuration(22050);
        assert_eq!(config.frame_size(), 512);
        assert_eq!(config.frame_overlap(), 64);
        assert_eq!(config.fft_size(), 512);
        assert_eq!(config.window(), &Window::Tukey(0.25));
        assert_eq!(config.axis(), Axis::Both);
        assert_eq!(config.sample_rate(), 22050.0);
    }

    #[test]
    fn parses_mode_and_window() {
        let args = Args::try_parse_from(["smcalc", "-m", "0", "-w", "hann", "-L", "a.wav"]).unwrap();
        assert_eq!(args.mode, Axis::Time);
        assert_eq!(args.window, Window::Hann);
        assert!(args.log_scale);

        assert!(Args::try_parse_from(["smcalc", "-m", "diagonal", "a.wav"]).is_err());
        assert!(Args::try_parse_from(["smcalc", "-w", "kaiser", "a.wav"]).is_err());
    }
}
