//! Interval Extractor: half-open time windows over the RAW samples.

use contracts::Sample;

/// Sample times of one RAW trace, built once per run
#[derive(Debug, Clone, Default)]
pub struct SampleIndex {
    times: Vec<f64>,
}

impl SampleIndex {
    pub fn new(samples: &[Sample]) -> Self {
        Self {
            times: samples.iter().map(|sample| sample.time).collect(),
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Samples with `start <= time < end`
    pub fn window<'a>(&self, samples: &'a [Sample], start: f64, end: f64) -> &'a [Sample] {
        get_interval(samples, &self.times, start, end)
    }
}

/// Contiguous run of `samples` whose time lies in `[start, end)`
///
/// `times` must be the non-decreasing sample times, parallel to `samples`.
/// Returns an empty slice when `start >= end` or nothing falls inside.
pub fn get_interval<'a>(
    samples: &'a [Sample],
    times: &[f64],
    start: f64,
    end: f64,
) -> &'a [Sample] {
    if start >= end || start.is_nan() || end.is_nan() {
        return &[];
    }
    let lower = times.partition_point(|&t| t < start);
    let upper = times.partition_point(|&t| t < end);
    &samples[lower..upper]
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::PinState;

    fn samples() -> Vec<Sample> {
        (0..5)
            .map(|i| Sample::new(f64::from(i), i64::from(i) * 10, PinState::Low))
            .collect()
    }

    #[test]
    fn half_open_window() {
        let samples = samples();
        let index = SampleIndex::new(&samples);

        let window = index.window(&samples, 1.0, 3.0);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].time, 1.0);
        assert_eq!(window[1].time, 2.0);
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let samples = samples();
        let index = SampleIndex::new(&samples);
        assert!(index.window(&samples, 5.0, 6.0).is_empty());
    }

    #[test]
    fn degenerate_windows_are_empty() {
        let samples = samples();
        let index = SampleIndex::new(&samples);
        assert!(index.window(&samples, 0.0, 0.0).is_empty());
        assert!(index.window(&samples, 3.0, 1.0).is_empty());
        assert!(index.window(&samples, f64::NAN, 2.0).is_empty());
    }

    #[test]
    fn window_between_samples() {
        let samples = samples();
        let index = SampleIndex::new(&samples);
        assert!(index.window(&samples, 1.2, 1.8).is_empty());
        assert_eq!(index.window(&samples, 0.5, 4.5).len(), 4);
        assert_eq!(index.window(&samples, -10.0, 10.0).len(), 5);
    }

    #[test]
    fn no_samples() {
        assert!(get_interval(&[], &[], 0.0, 1.0).is_empty());
        assert!(SampleIndex::new(&[]).is_empty());
    }
}
