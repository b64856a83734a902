use crate::model::PerformancePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMetric {
    #[default]
    Points,
    Cost,
}

impl ChartMetric {
    pub fn toggle(self) -> Self {
        match self {
            ChartMetric::Points => ChartMetric::Cost,
            ChartMetric::Cost => ChartMetric::Points,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartMetric::Points => "Points",
            ChartMetric::Cost => "Cost",
        }
    }

    fn value(self, point: &PerformancePoint) -> f64 {
        match self {
            ChartMetric::Points => f64::from(point.points),
            ChartMetric::Cost => point.cost,
        }
    }
}

/// `(round, value)` pairs in performance order.
pub fn series(points: &[PerformancePoint], metric: ChartMetric) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (f64::from(p.round), metric.value(p)))
        .collect()
}

pub fn x_bounds(points: &[PerformancePoint]) -> [f64; 2] {
    let min = points.iter().map(|p| p.round).min().unwrap_or(1);
    let max = points.iter().map(|p| p.round).max().unwrap_or(1);
    if min == max {
        // Single round still needs a non-zero axis span.
        return [f64::from(min) - 0.5, f64::from(max) + 0.5];
    }
    [f64::from(min), f64::from(max)]
}

/// Points axis starts at zero and tops out at the next multiple of five;
/// cost axis pads the observed range by one either side.
pub fn y_bounds(points: &[PerformancePoint], metric: ChartMetric) -> [f64; 2] {
    let values: Vec<f64> = points.iter().map(|p| metric.value(p)).collect();
    match metric {
        ChartMetric::Points => {
            let max = values.iter().copied().fold(0.0_f64, f64::max);
            let top = ((max / 5.0).ceil() * 5.0).max(5.0);
            [0.0, top]
        }
        ChartMetric::Cost => {
            if values.is_empty() {
                return [0.0, 1.0];
            }
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            [min - 1.0, max + 1.0]
        }
    }
}
