//! Section Aggregator: power statistics over one extracted window.

use contracts::{csv_safe, Sample, SectionRow};

/// Samples belonging to one logged operation
///
/// Borrows the slice produced by the interval extractor.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    entries: &'a [Sample],
    name: &'a str,
    extras: &'a str,
}

impl<'a> Section<'a> {
    pub fn new(entries: &'a [Sample], name: &'a str, extras: &'a str) -> Self {
        Self {
            entries,
            name,
            extras,
        }
    }

    pub fn entries(&self) -> &'a [Sample] {
        self.entries
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.entries.first().map(|sample| sample.time)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.entries.last().map(|sample| sample.time)
    }

    /// `end_time - start_time`; zero for a single sample
    pub fn duration(&self) -> Option<f64> {
        Some(self.end_time()? - self.start_time()?)
    }

    /// Arithmetic mean of the sample powers
    pub fn power_avg(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(|sample| sample.power as f64).sum();
        Some(sum / self.entries.len() as f64)
    }

    /// `power_avg * duration`
    pub fn energy(&self) -> Option<f64> {
        Some(self.power_avg()? * self.duration()?)
    }

    /// Output row; an empty section becomes the zeroed row
    pub fn to_row(&self) -> SectionRow {
        let name = csv_safe(self.name);
        match (self.start_time(), self.end_time(), self.power_avg(), self.energy()) {
            (Some(start), Some(end), Some(power_avg), Some(energy)) => SectionRow {
                start,
                end,
                name,
                power_avg,
                energy,
                debug: csv_safe(self.extras),
                empty: false,
            },
            _ => SectionRow::empty(name),
        }
    }
}
