use std::path::Path;

use anyhow::Context;
use rubato::{FftFixedIn, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

const RESAMPLER_CHUNK_SIZE: usize = 1024 * 8;

/// One channel of decoded audio.
pub struct Mono {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

impl Mono {
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Decodes the first audio track of a file, averaging all channels.
///
/// Decoding stops after `max_seconds` of audio unless it is zero.
pub fn decode_mono(path: impl AsRef<Path>, max_seconds: u32) -> anyhow::Result<Mono> {
    let path = path.as_ref();
    let src = std::fs::File::open(path).context("failed to open file")?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .context("unsupported format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("no supported audio tracks")?;

    let dec_opts: DecoderOptions = Default::default();

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .context("unsupported codec")?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.context("missing sample rate")?;
    let channels = track.codec_params.channels.context("missing audio channels")?.count();
    anyhow::ensure!(channels > 0, "no audio channels");
    tracing::debug!("decoding {}: {} Hz, {} channels", path.display(), sample_rate, channels);

    let limit = if max_seconds == 0 {
        usize::MAX
    } else {
        max_seconds as usize * sample_rate as usize
    };

    let mut samples = Vec::new();
    let mut sample_buf = None;

    while samples.len() < limit {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(_) => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                if sample_buf.is_none() {
                    let spec = *audio_buf.spec();
                    let duration = audio_buf.capacity() as u64;
                    sample_buf = Some(SampleBuffer::<f32>::new(duration, spec));
                }

                if let Some(buf) = &mut sample_buf {
                    buf.copy_interleaved_ref(audio_buf);
                    for frame in buf.samples().chunks_exact(channels) {
                        let sum: f64 = frame.iter().copied().map(f64::from).sum();
                        samples.push(sum / channels as f64);
                    }
                }
            }
            Err(Error::DecodeError(e)) => tracing::warn!("skipping undecodable packet: {}", e),
            Err(_) => break,
        }
    }

    samples.truncate(limit);
    Ok(Mono { samples, sample_rate })
}

/// Converts audio to `target_rate` Hz, returns it unchanged if it is already there.
pub fn resample(audio: Mono, target_rate: u32) -> anyhow::Result<Mono> {
    if audio.sample_rate == target_rate {
        return Ok(audio);
    }

    let mut resampler = FftFixedIn::<f64>::new(
        audio.sample_rate as usize,
        target_rate as usize,
        RESAMPLER_CHUNK_SIZE,
        2,
        1,
    )
    .context("cannot create resampler")?;

    let expected = (audio.samples.len() as f64 * f64::from(target_rate) / f64::from(audio.sample_rate)).round() as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(delay + expected + RESAMPLER_CHUNK_SIZE);
    let mut chunk = Vec::with_capacity(RESAMPLER_CHUNK_SIZE);

    // Keep feeding silence past the end until the delayed tail has come out.
    let mut position = 0;
    while position < audio.samples.len() || output.len() < delay + expected {
        let needed = resampler.input_frames_next();
        let end = usize::min(position + needed, audio.samples.len());

        chunk.clear();
        chunk.extend_from_slice(&audio.samples[position..end]);
        chunk.resize(needed, 0.0);

        let processed = resampler.process(&[&chunk], None).context("resampling failed")?;
        output.extend_from_slice(&processed[0]);
        position = end;
    }
    output.drain(..usize::min(delay, output.len()));
    output.truncate(expected);

    tracing::debug!("resampled {} Hz -> {} Hz, {} samples", audio.sample_rate, target_rate, output.len());
    Ok(Mono {
        samples: output,
        sample_rate: target_rate,
    })
}
