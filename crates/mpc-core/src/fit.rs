//! Least-squares fitting of deep scores against shallow scores.

use crate::aggregate::ObservationSet;

/// One fitted prediction model: `deep ~ slope * shallow + bias`, with
/// `sigma` the residual standard deviation the pruning search scales
/// by its confidence multiplier.
///
/// When `valid` is false the numeric fields are zero and carry no
/// meaning; only `sample_count` is informative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MpcModel {
    pub slope: f64,
    pub bias: f64,
    pub sigma: f64,
    pub sample_count: usize,
    pub valid: bool,
}

impl MpcModel {
    /// Marker for a cell with too little (or degenerate) data.
    pub const fn invalid(sample_count: usize) -> Self {
        MpcModel {
            slope: 0.0,
            bias: 0.0,
            sigma: 0.0,
            sample_count,
            valid: false,
        }
    }

    /// Predicted deep score for a shallow score.
    pub fn predict(&self, shallow: f64) -> f64 {
        self.slope * shallow + self.bias
    }
}

/// Fits one model to one observation set.
///
/// Returns an invalid model when the set holds fewer than
/// `min_samples` points, fewer than two points, or only a single
/// distinct shallow score (undefined slope). Otherwise performs
/// ordinary least squares over centered sums and estimates the
/// residual standard deviation with an n-2 denominator (two fitted
/// parameters); a two-point fit interpolates exactly, so its sigma is
/// 0 by definition.
pub fn fit(set: &ObservationSet, min_samples: usize) -> MpcModel {
    let n = set.points.len();
    if n < min_samples || n < 2 {
        return MpcModel::invalid(n);
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for &(x, y) in set.points.iter() {
        sum_x += x as f64;
        sum_y += y as f64;
    }
    let mean_x = sum_x / nf;
    let mean_y = sum_y / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in set.points.iter() {
        let dx = x as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (y as f64 - mean_y);
    }
    if sxx == 0.0 {
        return MpcModel::invalid(n);
    }

    let slope = sxy / sxx;
    let bias = mean_y - slope * mean_x;

    let sigma = if n > 2 {
        let mut rss = 0.0;
        for &(x, y) in set.points.iter() {
            let r = y as f64 - (slope * x as f64 + bias);
            rss += r * r;
        }
        (rss / (nf - 2.0)).sqrt()
    } else {
        0.0
    };

    MpcModel {
        slope,
        bias,
        sigma,
        sample_count: n,
        valid: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth_pair::{DepthPair, Slot};
    use crate::types::Score;
    use rand::rngs::SmallRng;
    use rand::{RngExt, SeedableRng};

    fn set(points: Vec<(Score, Score)>) -> ObservationSet {
        ObservationSet {
            pair: DepthPair::new(9, 3, Slot::Slot0),
            points,
        }
    }

    #[test]
    fn test_below_threshold_is_invalid() {
        let model = fit(&set(vec![(1, 2), (2, 4), (3, 6)]), 30);
        assert!(!model.valid);
        assert_eq!(model.sample_count, 3);
        assert_eq!(model.slope, 0.0);
        assert_eq!(model.bias, 0.0);
        assert_eq!(model.sigma, 0.0);
    }

    #[test]
    fn test_empty_and_single_point_are_invalid() {
        assert!(!fit(&set(vec![]), 0).valid);
        assert!(!fit(&set(vec![(3, 7)]), 1).valid);
    }

    #[test]
    fn test_zero_variance_is_invalid() {
        let model = fit(&set(vec![(4, 1), (4, 5), (4, 9), (4, 2)]), 1);
        assert!(!model.valid);
        assert_eq!(model.sample_count, 4);
        assert!(model.sigma.is_finite());
    }

    #[test]
    fn test_two_point_exact_fit() {
        let model = fit(&set(vec![(5, 12), (7, 16)]), 1);
        assert!(model.valid);
        assert_eq!(model.slope, 2.0);
        assert_eq!(model.bias, 2.0);
        assert_eq!(model.sigma, 0.0);
        assert_eq!(model.sample_count, 2);
    }

    #[test]
    fn test_exact_line_has_zero_residual() {
        // y = 3x - 4 over several points: sigma from the n-2 estimator
        // should vanish (up to rounding).
        let points: Vec<(Score, Score)> = (-10..=10).map(|x| (x, 3 * x - 4)).collect();
        let model = fit(&set(points), 1);
        assert!(model.valid);
        assert!((model.slope - 3.0).abs() < 1e-12);
        assert!((model.bias + 4.0).abs() < 1e-12);
        assert!(model.sigma < 1e-9);
    }

    #[test]
    fn test_noisy_fit_converges() {
        // deep = 2 * shallow + 5 + noise, noise uniform over -6..=6
        // (13 integer values, mean 0, sd = sqrt(14) ~= 3.74).
        let mut rng = SmallRng::seed_from_u64(42);
        let n = 20_000;
        let points: Vec<(Score, Score)> = (0..n)
            .map(|_| {
                let x: Score = rng.random_range(-30..=30);
                let noise: Score = rng.random_range(-6..=6);
                (x, 2 * x + 5 + noise)
            })
            .collect();

        let model = fit(&set(points), 30);
        assert!(model.valid);
        assert!((model.slope - 2.0).abs() < 0.01);
        assert!((model.bias - 5.0).abs() < 0.15);
        let noise_sd = 14.0f64.sqrt();
        assert!((model.sigma - noise_sd).abs() < 0.15);
    }

    #[test]
    fn test_predict() {
        let model = fit(&set(vec![(5, 12), (7, 16)]), 1);
        assert_eq!(model.predict(6.0), 14.0);
    }
}
