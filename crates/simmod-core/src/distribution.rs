//! Sampling distributions for parameter values.

use crate::DVec;
use crate::error::{Result, SimmodError};
use rand::Rng;
use rand_distr::{Distribution as RandDist, Normal, Uniform};
use std::fmt;
use std::str::FromStr;

/// Distribution a parameter is sampled from.
///
/// The `(lower, upper)` bounds of a parametrization are interpreted per
/// distribution:
/// - `Uniform`: `U(lower, upper)`
/// - `Normal`: `N(mean = lower, std = upper)`, no clipping
/// - `LogUniform`: `exp(U(lower, upper))`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    Uniform,
    Normal,
    LogUniform,
}

impl Distribution {
    /// Draw one value per `(lower[i], upper[i])` pair.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, lower: &DVec, upper: &DVec) -> Result<DVec> {
        if lower.len() != upper.len() {
            return Err(SimmodError::ShapeMismatch(format!(
                "{} lower bounds but {} upper bounds",
                lower.len(),
                upper.len()
            )));
        }
        let mut values = DVec::zeros(lower.len());
        for i in 0..lower.len() {
            values[i] = self.sample_scalar(rng, lower[i], upper[i])?;
        }
        Ok(values)
    }

    fn sample_scalar<R: Rng + ?Sized>(&self, rng: &mut R, a: f64, b: f64) -> Result<f64> {
        match self {
            Distribution::Uniform => Ok(uniform(rng, a, b, *self)?),
            Distribution::LogUniform => Ok(uniform(rng, a, b, *self)?.exp()),
            Distribution::Normal => {
                let normal = Normal::new(a, b).map_err(|e| self.invalid(e.to_string()))?;
                Ok(normal.sample(rng))
            }
        }
    }

    fn invalid(&self, reason: String) -> SimmodError {
        SimmodError::InvalidDistributionParameters {
            distribution: self.to_string(),
            reason,
        }
    }
}

/// Uniform draw that tolerates swapped and degenerate bounds.
fn uniform<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64, dist: Distribution) -> Result<f64> {
    if !a.is_finite() || !b.is_finite() {
        return Err(dist.invalid(format!("bounds must be finite, got [{a}, {b}]")));
    }
    if !(b - a).is_finite() {
        return Err(dist.invalid(format!("range [{a}, {b}] is too wide to sample")));
    }
    Ok(Uniform::new_inclusive(a.min(b), a.max(b)).sample(rng))
}

impl FromStr for Distribution {
    type Err = SimmodError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "uniform" => Ok(Distribution::Uniform),
            "normal" | "gaussian" => Ok(Distribution::Normal),
            "loguniform" => Ok(Distribution::LogUniform),
            other => Err(SimmodError::UnsupportedDistribution(other.to_string())),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Distribution::Uniform => "uniform",
            Distribution::Normal => "normal",
            Distribution::LogUniform => "loguniform",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse() {
        assert_eq!("uniform".parse::<Distribution>().unwrap(), Distribution::Uniform);
        assert_eq!("normal".parse::<Distribution>().unwrap(), Distribution::Normal);
        assert_eq!("gaussian".parse::<Distribution>().unwrap(), Distribution::Normal);
        assert_eq!("loguniform".parse::<Distribution>().unwrap(), Distribution::LogUniform);
    }

    #[test]
    fn test_unsupported_names_valid_options() {
        let err = "poisson".parse::<Distribution>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("poisson"));
        assert!(msg.contains("'uniform'"));
        assert!(msg.contains("'loguniform'"));
        assert!(msg.contains("'normal'"));
    }

    #[test]
    fn test_uniform_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let lower = DVec::from_vec(vec![-1.0, 0.0, 10.0]);
        let upper = DVec::from_vec(vec![1.0, 1e-3, 10.5]);

        for _ in 0..1000 {
            let values = Distribution::Uniform.sample(&mut rng, &lower, &upper).unwrap();
            for i in 0..3 {
                assert!(values[i] >= lower[i] && values[i] <= upper[i]);
            }
        }
    }

    #[test]
    fn test_degenerate_uniform() {
        let mut rng = StdRng::seed_from_u64(0);
        let bound = DVec::from_vec(vec![0.25]);
        let values = Distribution::Uniform.sample(&mut rng, &bound, &bound).unwrap();
        assert_eq!(values[0], 0.25);
    }

    #[test]
    fn test_overflowing_range_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Distribution::Uniform
            .sample(&mut rng, &DVec::from_vec(vec![-1e308]), &DVec::from_vec(vec![1e308]))
            .unwrap_err();
        assert!(matches!(err, SimmodError::InvalidDistributionParameters { .. }));
    }

    #[test]
    fn test_bound_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Distribution::Uniform
            .sample(&mut rng, &DVec::zeros(2), &DVec::zeros(3))
            .unwrap_err();
        assert!(matches!(err, SimmodError::ShapeMismatch(_)));
    }

    #[test]
    fn test_loguniform_is_exp_of_uniform() {
        let lower = DVec::from_vec(vec![-2.0, 0.0]);
        let upper = DVec::from_vec(vec![-1.0, 1.0]);

        let mut rng_a = StdRng::seed_from_u64(3);
        let mut rng_b = StdRng::seed_from_u64(3);
        let log = Distribution::LogUniform.sample(&mut rng_a, &lower, &upper).unwrap();
        let uni = Distribution::Uniform.sample(&mut rng_b, &lower, &upper).unwrap();

        for i in 0..2 {
            assert_eq!(log[i], uni[i].exp());
            assert!(log[i] >= lower[i].exp() && log[i] <= upper[i].exp());
        }
    }

    #[test]
    fn test_normal_uses_mean_and_std() {
        let mut rng = StdRng::seed_from_u64(11);
        let mean = DVec::from_vec(vec![5.0]);
        let std = DVec::from_vec(vec![0.1]);

        let n = 2000;
        let sum: f64 = (0..n)
            .map(|_| Distribution::Normal.sample(&mut rng, &mean, &std).unwrap()[0])
            .sum();
        assert!((sum / n as f64 - 5.0).abs() < 0.02);
    }

    #[test]
    fn test_normal_negative_std() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Distribution::Normal
            .sample(&mut rng, &DVec::from_vec(vec![0.0]), &DVec::from_vec(vec![-1.0]))
            .unwrap_err();
        assert!(matches!(err, SimmodError::InvalidDistributionParameters { .. }));
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let lower = DVec::from_vec(vec![0.0; 4]);
        let upper = DVec::from_vec(vec![1.0; 4]);
        let a = Distribution::Uniform
            .sample(&mut StdRng::seed_from_u64(42), &lower, &upper)
            .unwrap();
        let b = Distribution::Uniform
            .sample(&mut StdRng::seed_from_u64(42), &lower, &upper)
            .unwrap();
        assert_eq!(a, b);
    }
}
