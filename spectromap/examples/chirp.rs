use std::f64::consts::PI;

use spectromap::{Axis, Configuration, SpectroMap, Window};

fn main() {
    let sample_rate = 11025.0;
    // Two seconds sweeping from 200 Hz to 3 kHz.
    let samples: Vec<f64> = (0..22050)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let freq = 200.0 + 700.0 * t;
            f64::sin(2.0 * PI * freq * t)
        })
        .collect();

    let config = Configuration::new(sample_rate)
        .with_window(Window::Hann)
        .with_frame_size(1024)
        .with_frame_overlap(512)
        .with_fft_size(1024)
        .with_axis(Axis::Both);

    let map = SpectroMap::new(&config).unwrap();
    for landmark in map.constellation(&samples).unwrap() {
        println!("{:.3} s\t{:.1} Hz\t{:.3}", landmark.time, landmark.frequency, landmark.amplitude);
    }
}
