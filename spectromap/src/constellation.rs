use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::peaks::find_peaks;
use crate::spectrogram::Spectrogram;

/// Direction in which the spectrogram is scanned for peaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Scan frame by frame, separation derived from the number of frames.
    Time,
    /// Scan bin by bin, separation derived from the number of bins.
    Frequency,
    /// Keep only cells that are peaks in both scans.
    #[default]
    Both,
}

impl TryFrom<u8> for Axis {
    type Error = Error;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Axis::Time),
            1 => Ok(Axis::Frequency),
            2 => Ok(Axis::Both),
            _ => Err(Error::invalid("axis", format!("unknown axis {value}, expected 0, 1 or 2"))),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "time" | "0" => Ok(Axis::Time),
            "frequency" | "freq" | "1" => Ok(Axis::Frequency),
            "both" | "2" => Ok(Axis::Both),
            _ => Err(Error::invalid("axis", format!("unknown axis `{s}`"))),
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Time => f.write_str("time"),
            Axis::Frequency => f.write_str("frequency"),
            Axis::Both => f.write_str("both"),
        }
    }
}

/// A prominent point of the spectrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Landmark {
    /// Frame centre in seconds.
    pub time: f64,
    /// Bin frequency in Hz.
    pub frequency: f64,
    pub amplitude: f64,
}

/// Peaks found in a spectrogram.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakMap {
    /// `true` at every peak.
    pub mask: Matrix<bool>,
    /// Spectrogram values at peaks, zero elsewhere.
    pub amplitudes: Matrix<f64>,
}

impl PeakMap {
    pub fn count(&self) -> usize {
        self.mask.as_row_major().iter().filter(|&&m| m).count()
    }
}

pub(crate) fn check_fraction(fraction: f64) -> Result<()> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(Error::invalid("fraction", format!("must be in (0, 1], got {fraction}")))
    }
}

/// Minimum peak separation for an axis of `len` elements, never less than 1.
pub fn separation(fraction: f64, len: usize) -> usize {
    ((fraction * len as f64).floor() as usize).max(1)
}

/// Finds the peaks of `power` (frequency bins × time frames) along `axis`.
///
/// A single axis flattens the matrix into one sequence and looks for peaks
/// across the whole of it:
/// * [Axis::Time] walks every bin of frame 0, then every bin of frame 1 and so
///   on, with separation `fraction` of the number of frames;
/// * [Axis::Frequency] walks every frame of bin 0, then of bin 1 and so on,
///   with separation `fraction` of the number of bins.
///
/// [Axis::Both] intersects the two.
pub fn peak_search(power: &Matrix<f64>, fraction: f64, axis: Axis) -> Result<PeakMap> {
    check_fraction(fraction)?;

    let mask = match axis {
        Axis::Time => time_mask(power, fraction)?,
        Axis::Frequency => frequency_mask(power, fraction)?,
        Axis::Both => {
            let time = time_mask(power, fraction)?;
            let frequency = frequency_mask(power, fraction)?;
            let both: Vec<bool> = std::iter::zip(time.as_row_major(), frequency.as_row_major())
                .map(|(&t, &f)| t && f)
                .collect();
            Matrix::from_row_major(power.rows(), power.columns(), both)
        }
    };

    let values: Vec<f64> = std::iter::zip(power.as_row_major(), mask.as_row_major())
        .map(|(&value, &is_peak)| if is_peak { value } else { 0.0 })
        .collect();
    let amplitudes = Matrix::from_row_major(power.rows(), power.columns(), values);

    let peaks = PeakMap { mask, amplitudes };
    log::debug!("{} peaks along {} axis (fraction {})", peaks.count(), axis, fraction);
    Ok(peaks)
}

fn time_mask(power: &Matrix<f64>, fraction: f64) -> Result<Matrix<bool>> {
    let (rows, columns) = power.shape();
    let distance = separation(fraction, columns);
    log::trace!("time axis: {} frames, distance {}", columns, distance);
    let hits = hits(&power.to_column_major(), distance)?;
    Ok(Matrix::from_column_major(rows, columns, &hits))
}

fn frequency_mask(power: &Matrix<f64>, fraction: f64) -> Result<Matrix<bool>> {
    let (rows, columns) = power.shape();
    let distance = separation(fraction, rows);
    log::trace!("frequency axis: {} bins, distance {}", rows, distance);
    let hits = hits(power.as_row_major(), distance)?;
    Ok(Matrix::from_row_major(rows, columns, hits))
}

fn hits(flat: &[f64], distance: usize) -> Result<Vec<bool>> {
    let mut hits = vec![false; flat.len()];
    for i in find_peaks(flat, distance)? {
        hits[i] = true;
    }
    Ok(hits)
}

/// Lists the peaks as landmarks, frame by frame and bin by bin within a frame.
pub fn landmarks(spectrogram: &Spectrogram, peaks: &PeakMap) -> Result<Vec<Landmark>> {
    let shape = spectrogram.shape();
    if peaks.mask.shape() != shape || peaks.amplitudes.shape() != shape {
        return Err(Error::invalid(
            "peaks",
            format!("peak map shape {:?} does not match spectrogram shape {:?}", peaks.mask.shape(), shape),
        ));
    }

    let (rows, columns) = shape;
    let mut out = Vec::with_capacity(peaks.count());
    for column in 0..columns {
        for row in 0..rows {
            if peaks.mask[(row, column)] {
                out.push(Landmark {
                    time: spectrogram.times[column],
                    frequency: spectrogram.frequencies[row],
                    amplitude: peaks.amplitudes[(row, column)],
                });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::constellation::{landmarks, peak_search, separation, Axis, Landmark};
    use crate::error::Error;
    use crate::matrix::Matrix;
    use crate::spectrogram::Spectrogram;

    // 2 bins x 3 frames:
    //   [1 3 2]
    //   [4 0 6]
    // frame by frame: 1 4 3 0 2 6 -> peak at 1 (bin 1, frame 0)
    // bin by bin:     1 3 2 4 0 6 -> peaks at 1 (bin 0, frame 1) and 3 (bin 1, frame 0)
    fn small() -> Matrix<f64> {
        Matrix::from_row_major(2, 3, vec![1.0, 3.0, 2.0, 4.0, 0.0, 6.0])
    }

    fn cells(mask: &Matrix<bool>) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for row in 0..mask.rows() {
            for column in 0..mask.columns() {
                if mask[(row, column)] {
                    out.push((row, column));
                }
            }
        }
        out
    }

    fn textured(rows: usize, columns: usize) -> Matrix<f64> {
        let data = (0..rows * columns)
            .map(|i| {
                let x = i as f64;
                (f64::sin(x * 0.61) + f64::cos(x * 0.173) * 2.0 + (i % 5) as f64 * 0.3).abs()
            })
            .collect();
        Matrix::from_row_major(rows, columns, data)
    }

    #[test]
    fn time_axis_flattens_frame_by_frame() {
        let peaks = peak_search(&small(), 0.1, Axis::Time).unwrap();
        assert_eq!(cells(&peaks.mask), vec![(1, 0)]);
    }

    #[test]
    fn frequency_axis_flattens_bin_by_bin() {
        let peaks = peak_search(&small(), 0.1, Axis::Frequency).unwrap();
        assert_eq!(cells(&peaks.mask), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn both_axes_intersect() {
        let peaks = peak_search(&small(), 0.1, Axis::Both).unwrap();
        assert_eq!(cells(&peaks.mask), vec![(1, 0)]);
        assert_eq!(peaks.amplitudes.as_row_major(), &[0.0, 0.0, 0.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn both_is_subset_of_each_axis() {
        let power = textured(17, 23);
        for fraction in [0.05, 0.1, 0.3, 1.0] {
            let time = peak_search(&power, fraction, Axis::Time).unwrap();
            let frequency = peak_search(&power, fraction, Axis::Frequency).unwrap();
            let both = peak_search(&power, fraction, Axis::Both).unwrap();

            assert_eq!(both.mask.shape(), power.shape());
            assert_eq!(both.amplitudes.shape(), power.shape());
            for i in 0..power.as_row_major().len() {
                let b = both.mask.as_row_major()[i];
                assert_eq!(b, time.mask.as_row_major()[i] && frequency.mask.as_row_major()[i]);
            }
            assert!(both.count() <= time.count().min(frequency.count()));
        }
    }

    #[test]
    fn amplitudes_follow_mask() {
        let power = textured(9, 11);
        let peaks = peak_search(&power, 0.2, Axis::Frequency).unwrap();
        assert!(peaks.count() > 0);
        for row in 0..power.rows() {
            for column in 0..power.columns() {
                let expected = if peaks.mask[(row, column)] { power[(row, column)] } else { 0.0 };
                assert_eq!(peaks.amplitudes[(row, column)], expected);
            }
        }
    }

    #[test]
    fn full_fraction_keeps_global_maximum() {
        // One bin, ten frames: d = 10, longer than the whole sequence.
        let power = Matrix::from_row_major(1, 10, vec![0.0, 3.0, 0.0, 5.0, 0.0, 4.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(separation(1.0, 10), 10);
        let peaks = peak_search(&power, 1.0, Axis::Time).unwrap();
        assert_eq!(cells(&peaks.mask), vec![(0, 3)]);
    }

    #[test]
    fn frequency_separation_uses_bin_count() {
        // Ten bins, two frames: d = 10 from the bins. Using frames would give d = 2
        // and keep all four maxima.
        let mut data = vec![0.0; 20];
        for (row, value) in [(1, 3.0), (3, 5.0), (5, 4.0), (7, 1.0)] {
            data[row * 2] = value;
        }
        let power = Matrix::from_row_major(10, 2, data);
        let peaks = peak_search(&power, 1.0, Axis::Frequency).unwrap();
        assert_eq!(cells(&peaks.mask), vec![(3, 0)]);
    }

    #[test]
    fn separation_is_at_least_one() {
        assert_eq!(separation(0.1, 3), 1);
        assert_eq!(separation(0.1, 0), 1);
        assert_eq!(separation(0.25, 129), 32);
    }

    #[test]
    fn invalid_fraction() {
        for fraction in [0.0, -0.5, 1.01, f64::NAN] {
            let err = peak_search(&small(), fraction, Axis::Both).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { name: "fraction", .. }));
        }
    }

    #[test]
    fn axis_codes() {
        assert_eq!(Axis::try_from(0u8).unwrap(), Axis::Time);
        assert_eq!(Axis::try_from(1u8).unwrap(), Axis::Frequency);
        assert_eq!(Axis::try_from(2u8).unwrap(), Axis::Both);
        assert!(matches!(Axis::try_from(3u8), Err(Error::InvalidArgument { name: "axis", .. })));

        assert_eq!("Time".parse::<Axis>().unwrap(), Axis::Time);
        assert_eq!("freq".parse::<Axis>().unwrap(), Axis::Frequency);
        assert_eq!("both".parse::<Axis>().unwrap(), Axis::Both);
        assert!("diagonal".parse::<Axis>().is_err());
        assert_eq!(Axis::default(), Axis::Both);
    }

    #[test]
    fn landmarks_in_frame_order() {
        let spectrogram = Spectrogram {
            frequencies: vec![0.0, 10.0],
            times: vec![0.5, 1.5, 2.5],
            power: small(),
        };

        let peaks = peak_search(&spectrogram.power, 0.1, Axis::Frequency).unwrap();
        let found = landmarks(&spectrogram, &peaks).unwrap();
        assert_eq!(
            found,
            vec![
                Landmark { time: 0.5, frequency: 10.0, amplitude: 4.0 },
                Landmark { time: 1.5, frequency: 0.0, amplitude: 3.0 },
            ]
        );
    }

    #[test]
    fn landmarks_shape_mismatch() {
        let spectrogram = Spectrogram {
            frequencies: vec![0.0, 10.0],
            times: vec![0.5, 1.5, 2.5],
            power: small(),
        };
        let peaks = peak_search(&Matrix::filled(3, 3, 0.0), 0.5, Axis::Both).unwrap();
        assert!(landmarks(&spectrogram, &peaks).is_err());
    }

    #[test]
    fn repeated_search_is_identical() {
        let power = textured(12, 40);
        let first = peak_search(&power, 0.1, Axis::Both).unwrap();
        let second = peak_search(&power, 0.1, Axis::Both).unwrap();
        assert_eq!(first, second);
    }
}
