/// Point and axis-label reduction for chart consumption
use crate::models::{Metric, SensorReading, SENTINEL_MISSING};

/// Plotted points kept when the series is longer
pub const DEFAULT_MAX_DATA_POINTS: usize = 30;
/// Axis labels aimed for across the plotted points
pub const DEFAULT_MAX_LABEL_COUNT: usize = 4;
/// Fewest entries a chart can be drawn from
pub const MIN_CHART_POINTS: usize = 2;

/// Bounds applied when preparing a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub max_data_points: usize,
    pub max_label_count: usize,
    /// Leave out entries whose charted metric holds the missing sentinel
    pub exclude_missing: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            max_data_points: DEFAULT_MAX_DATA_POINTS,
            max_label_count: DEFAULT_MAX_LABEL_COUNT,
            exclude_missing: false,
        }
    }
}

/// A chart ready to draw, or the reason it cannot be.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView<'a> {
    /// Fewer than [`MIN_CHART_POINTS`] entries
    InsufficientData,
    Ready {
        points: &'a [SensorReading],
        /// Indices into `points` whose axis label is shown, ascending
        labels: Vec<usize>,
    },
}

/// Keep the most recent `max_points` entries.
///
/// Shorter inputs come back unchanged. Order is never altered.
pub fn reduce_points<T>(points: &[T], max_points: usize) -> &[T] {
    if points.len() <= max_points {
        points
    } else {
        &points[points.len() - max_points..]
    }
}

/// Spacing between labelled positions: `ceil(len / (max_labels - 1))`.
///
/// `max_labels` below 2 is treated as 2. Never returns 0.
pub fn tick_interval(len: usize, max_labels: usize) -> usize {
    let divisor = max_labels.max(2) - 1;
    len.div_ceil(divisor).max(1)
}

/// Indices whose label is shown.
///
/// Every multiple of the tick interval, plus the last index so the most
/// recent timestamp is always labelled.
pub fn label_indices(len: usize, max_labels: usize) -> Vec<usize> {
    let interval = tick_interval(len, max_labels);
    (0..len)
        .filter(|&i| i % interval == 0 || i + 1 == len)
        .collect()
}

/// Entries whose `metric` carries a real reading, in series order.
pub fn present_points(series: &[SensorReading], metric: Metric) -> Vec<SensorReading> {
    series
        .iter()
        .filter(|reading| metric.value(reading) != SENTINEL_MISSING)
        .cloned()
        .collect()
}

/// Point-reduce then label-reduce an ordered series.
pub fn chart_window<'a>(series: &'a [SensorReading], options: &ChartOptions) -> ChartView<'a> {
    if series.len() < MIN_CHART_POINTS {
        return ChartView::InsufficientData;
    }

    let points = reduce_points(series, options.max_data_points);
    let labels = label_indices(points.len(), options.max_label_count);
    ChartView::Ready { points, labels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn series(len: usize) -> Vec<SensorReading> {
        (1..=len)
            .map(|i| SensorReading {
                timestamp: format!("2024-05-01T{:02}:{:02}:00.000Z", i / 60, i % 60),
                temperature: i as f64,
                humidity: 50.0,
            })
            .collect()
    }

    #[test]
    fn test_reduce_keeps_trailing_window() {
        let input = series(35);
        let reduced = reduce_points(&input, 30);

        assert_eq!(reduced.len(), 30);
        assert_eq!(reduced.first().unwrap().temperature, 6.0);
        assert_eq!(reduced.last().unwrap().temperature, 35.0);
    }

    #[test]
    fn test_reduce_short_series_unchanged() {
        let input = series(12);
        assert_eq!(reduce_points(&input, 30), &input[..]);
        assert_eq!(reduce_points(&input, 12), &input[..]);
    }

    #[test]
    fn test_reduce_length_property() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let n = rng.gen_range(0..80);
            let m = rng.gen_range(0..60);
            let input = series(n);
            let reduced = reduce_points(&input, m);

            assert_eq!(reduced.len(), n.min(m));
            if n > m && m > 0 {
                assert_eq!(reduced.last(), input.last());
            }
        }
    }

    #[test]
    fn test_label_scenario() {
        assert_eq!(tick_interval(30, 4), 10);
        assert_eq!(label_indices(30, 4), vec![0, 10, 20, 29]);
    }

    #[test]
    fn test_last_label_always_shown() {
        for len in 1..100 {
            for max_labels in 0..8 {
                let labels = label_indices(len, max_labels);
                assert_eq!(labels.last(), Some(&(len - 1)));
                assert_eq!(labels.first(), Some(&0));
                assert!(labels.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_label_interval_edges() {
        assert_eq!(label_indices(0, 4), Vec::<usize>::new());
        assert_eq!(label_indices(2, 4), vec![0, 1]);
        assert_eq!(tick_interval(31, 4), 11);
        assert_eq!(label_indices(31, 4), vec![0, 11, 22, 30]);
        assert_eq!(label_indices(5, 1), vec![0, 4]);
    }

    #[test]
    fn test_present_points_skips_sentinel() {
        let mut input = series(4);
        input[1].temperature = 0.0;
        input[3].humidity = 0.0;

        let temps: Vec<f64> = present_points(&input, Metric::Temperature)
            .iter()
            .map(|r| r.temperature)
            .collect();
        assert_eq!(temps, vec![1.0, 3.0, 4.0]);
        assert_eq!(present_points(&input, Metric::Humidity).len(), 3);
    }

    #[test]
    fn test_chart_window() {
        assert_eq!(chart_window(&[], &ChartOptions::default()), ChartView::InsufficientData);
        assert_eq!(
            chart_window(&series(1), &ChartOptions::default()),
            ChartView::InsufficientData
        );

        let input = series(35);
        match chart_window(&input, &ChartOptions::default()) {
            ChartView::Ready { points, labels } => {
                assert_eq!(points, &input[5..]);
                assert_eq!(labels, vec![0, 10, 20, 29]);
            }
            ChartView::InsufficientData => panic!("expected a chart"),
        }
    }
}
