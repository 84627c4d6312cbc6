use crate::error::{Error, Result};

/// Returns indices of strict local maxima: values greater than both neighbours.
///
/// The first and the last element never qualify, and neither does any point of
/// a plateau.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    if x.len() < 3 {
        return Vec::new();
    }

    (1..x.len() - 1).filter(|&i| x[i] > x[i - 1] && x[i] > x[i + 1]).collect()
}

/// Finds strict local maxima that are more than `distance` indices apart.
///
/// Candidates are accepted greedily from the highest to the lowest; on equal
/// values the earlier index goes first. A candidate closer than or exactly
/// `distance` to an accepted one is dropped. Returned indices are ascending.
pub fn find_peaks(x: &[f64], distance: usize) -> Result<Vec<usize>> {
    if distance == 0 {
        return Err(Error::invalid("distance", "must be at least 1"));
    }

    let peaks = local_maxima(x);

    // Stable sort, so equal values stay in index order.
    let mut priority: Vec<usize> = (0..peaks.len()).collect();
    priority.sort_by(|&a, &b| x[peaks[b]].total_cmp(&x[peaks[a]]));

    let mut keep = vec![true; peaks.len()];
    for i in priority {
        if !keep[i] {
            continue;
        }

        let mut j = i;
        while j > 0 && peaks[i] - peaks[j - 1] <= distance {
            j -= 1;
            keep[j] = false;
        }

        let mut j = i + 1;
        while j < peaks.len() && peaks[j] - peaks[i] <= distance {
            keep[j] = false;
            j += 1;
        }
    }

    let accepted: Vec<usize> = peaks.iter().zip(&keep).filter(|&(_, &k)| k).map(|(&p, _)| p).collect();
    log::trace!("{} local maxima, {} kept with distance {}", peaks.len(), accepted.len(), distance);
    Ok(accepted)
}
