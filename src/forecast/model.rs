use crate::error::{PipelineError, Result};

/// Additive Holt-Winters (triple exponential smoothing): level +
/// trend + seasonal components on a regular grid. Smoothing weights
/// are either fixed or chosen by `fit_auto` over a coarse grid
/// minimizing in-sample one-step SSE.
pub struct HoltWinters {
    period: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
}

/// State and diagnostics of a fitted model. `fitted` holds the
/// one-step-ahead in-sample predictions aligned to the training
/// series; `sigma` is the residual standard deviation used for
/// prediction intervals.
pub struct FittedModel {
    period: usize,
    n: usize,
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
    sigma: f64,
}

impl HoltWinters {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.3,
        }
    }

    pub fn with_smoothing(mut self, alpha: f64, beta: f64, gamma: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
        self
    }

    /// Fit on a regular series. Needs at least two full seasonal
    /// cycles to initialize the seasonal indices.
    pub fn fit(&self, series: &[f64]) -> Result<FittedModel> {
        let m = self.period;
        let n = series.len();

        if n < 2 * m {
            return Err(PipelineError::InsufficientData {
                series: "training series".to_string(),
                points: n,
                required: 2 * m,
            });
        }

        // Initial state from the complete seasons
        let seasons = n / m;
        let mut season_means = vec![0.0; seasons];
        for (k, mean) in season_means.iter_mut().enumerate() {
            *mean = series[k * m..(k + 1) * m].iter().sum::<f64>() / m as f64;
        }

        let mut seasonals = vec![0.0; m];
        for (pos, seasonal) in seasonals.iter_mut().enumerate() {
            let mut sum = 0.0;
            for k in 0..seasons {
                sum += series[k * m + pos] - season_means[k];
            }
            *seasonal = sum / seasons as f64;
        }

        let mut level = season_means[0];
        let mut trend = (season_means[1] - season_means[0]) / m as f64;

        let mut fitted = Vec::with_capacity(n);
        let mut sse = 0.0;

        for (i, &observed) in series.iter().enumerate() {
            let s_idx = i % m;
            let prediction = level + trend + seasonals[s_idx];
            fitted.push(prediction);
            sse += (observed - prediction).powi(2);

            let last_level = level;
            level = self.alpha * (observed - seasonals[s_idx])
                + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - last_level) + (1.0 - self.beta) * trend;
            seasonals[s_idx] =
                self.gamma * (observed - level) + (1.0 - self.gamma) * seasonals[s_idx];
        }

        let dof = (n as f64 - 3.0).max(1.0);
        let sigma = (sse / dof).sqrt();

        Ok(FittedModel {
            period: m,
            n,
            level,
            trend,
            seasonals,
            fitted,
            sse,
            sigma,
        })
    }

    /// Grid-search the smoothing weights and keep the fit with the
    /// lowest in-sample SSE.
    pub fn fit_auto(period: usize, series: &[f64]) -> Result<FittedModel> {
        const ALPHAS: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];
        const BETAS: [f64; 3] = [0.05, 0.1, 0.2];
        const GAMMAS: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

        let mut best: Option<FittedModel> = None;
        for &alpha in &ALPHAS {
            for &beta in &BETAS {
                for &gamma in &GAMMAS {
                    let candidate = HoltWinters::new(period)
                        .with_smoothing(alpha, beta, gamma)
                        .fit(series)?;
                    let improved = best.as_ref().map_or(true, |b| candidate.sse < b.sse);
                    if improved {
                        best = Some(candidate);
                    }
                }
            }
        }

        best.ok_or_else(|| PipelineError::Config("empty smoothing grid".to_string()))
    }
}

impl FittedModel {
    /// Point forecasts for the next `horizon` steps after the
    /// training range, seasonal indices continuing in phase.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|k| {
                let s_idx = (self.n + k - 1) % self.period;
                self.level + k as f64 * self.trend + self.seasonals[s_idx]
            })
            .collect()
    }

    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

/// z multiplier for a central prediction interval of the given width,
/// via an inverse normal CDF rational approximation (Acklam).
pub fn interval_z(width: f64) -> f64 {
    normal_quantile(0.5 + width / 2.0)
}

fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let trend = 50.0 + 0.1 * i as f64;
                let seasonal = 8.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin();
                trend + seasonal
            })
            .collect()
    }

    #[test]
    fn test_fit_tracks_trend_and_season() {
        let series = seasonal_series(120);
        let model = HoltWinters::new(12).fit(&series).unwrap();

        assert_eq!(model.fitted().len(), 120);
        assert!(model.sigma() >= 0.0);

        // After two cycles the one-step predictions should sit close
        // to the series
        let late_errors: f64 = series[24..]
            .iter()
            .zip(&model.fitted()[24..])
            .map(|(y, f)| (y - f).abs())
            .sum::<f64>()
            / (series.len() - 24) as f64;
        assert!(late_errors < 3.0, "mean abs error too high: {}", late_errors);
    }

    #[test]
    fn test_forecast_continues_upward_trend() {
        let series = seasonal_series(120);
        let model = HoltWinters::fit_auto(12, &series).unwrap();
        let forecast = model.forecast(24);

        assert_eq!(forecast.len(), 24);
        // A full cycle ahead should continue the positive trend
        let last_year_mean: f64 = series[108..].iter().sum::<f64>() / 12.0;
        let forecast_year_mean: f64 = forecast[12..].iter().sum::<f64>() / 12.0;
        assert!(forecast_year_mean > last_year_mean);
    }

    #[test]
    fn test_fit_requires_two_cycles() {
        let series = seasonal_series(18);
        let result = HoltWinters::new(12).fit(&series);
        assert!(matches!(
            result,
            Err(PipelineError::InsufficientData { required: 24, .. })
        ));
    }

    #[test]
    fn test_fit_auto_beats_or_matches_default() {
        let series = seasonal_series(96);
        let default_fit = HoltWinters::new(12).fit(&series).unwrap();
        let auto_fit = HoltWinters::fit_auto(12, &series).unwrap();
        assert!(auto_fit.sse <= default_fit.sse);
    }

    #[test]
    fn test_interval_z_matches_normal_table() {
        assert!((interval_z(0.95) - 1.959964).abs() < 1e-3);
        assert!((interval_z(0.90) - 1.644854).abs() < 1e-3);
        assert!((interval_z(0.99) - 2.575829).abs() < 1e-3);
    }

    #[test]
    fn test_quantile_symmetry() {
        let z = normal_quantile(0.975);
        let neg = normal_quantile(0.025);
        assert!((z + neg).abs() < 1e-9);
    }
}
