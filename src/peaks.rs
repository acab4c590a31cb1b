//! Peak detection
//!
//! Local-maximum search with a minimum spacing between accepted peaks.
//!
//! A candidate is a strict local maximum at or above `min_height`. Candidates
//! are scanned left to right. A candidate at least `min_distance` samples past
//! the last kept peak is appended. A closer candidate replaces the last kept
//! peak only when strictly higher, and then becomes the reference for the
//! next distance test. Equal-height candidates inside the window never
//! replace.

/// Find peak indices in ascending order
///
/// # Arguments
/// * `signal` - Input series
/// * `min_height` - Minimum value a peak must reach (inclusive)
/// * `min_distance` - Minimum index distance between kept peaks
pub fn find_peaks(signal: &[f64], min_height: f64, min_distance: usize) -> Vec<usize> {
    let mut peaks: Vec<usize> = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    for i in 1..signal.len() - 1 {
        let value = signal[i];
        let is_local_max = signal[i - 1] < value && value > signal[i + 1];
        if !is_local_max || value < min_height {
            continue;
        }

        match peaks.last_mut() {
            Some(last) if i - *last < min_distance => {
                if value > signal[*last] {
                    *last = i;
                }
            }
            _ => peaks.push(i),
        }
    }

    peaks
}
