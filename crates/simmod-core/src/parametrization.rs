//! Parametrization — the link between a setter, a simulation object and the
//! range its values are sampled from.

use crate::config::{ParameterConfig, RangeSpec};
use crate::error::{Result, SimmodError};
use crate::execution::Execution;
use crate::{DVec, Sample};
use serde_json::{Map, Value};
use std::fmt;

/// A single randomizable quantity of a simulation object.
#[derive(Debug, Clone)]
pub struct Parametrization {
    /// Name of the registered setter that applies the value.
    pub setter: String,
    /// Target entity inside the simulation (joint, body, material, ...).
    pub object_name: String,
    /// When the parameter is intended to be resampled.
    pub execution: Execution,
    /// Distribution name, resolved when sampling.
    pub distribution: String,
    /// Shape of the raw range (last dimension is 2).
    pub shape: Vec<usize>,
    /// Optional human-readable label.
    pub name: Option<String>,
    lower_bound: DVec,
    upper_bound: DVec,
    current_val: Option<Sample>,
    history: Vec<Sample>,
}

impl Parametrization {
    /// Create a parametrization sampled uniformly.
    ///
    /// `execution` must be one of `BEFORE_STEP`, `AFTER_STEP` or `RESET`. If
    /// `shape` is given its last dimension must be 2 and the range pairs are
    /// tiled across the leading dimensions.
    pub fn new(
        setter: impl Into<String>,
        object_name: impl Into<String>,
        range: &RangeSpec,
        execution: &str,
        shape: Option<&[usize]>,
    ) -> Result<Self> {
        let execution: Execution = execution.parse()?;
        let (pairs, shape) = decompose_range(range, shape)?;
        let lower_bound = DVec::from_iterator(pairs.len(), pairs.iter().map(|p| p[0]));
        let upper_bound = DVec::from_iterator(pairs.len(), pairs.iter().map(|p| p[1]));

        Ok(Self {
            setter: setter.into(),
            object_name: object_name.into(),
            execution,
            distribution: "uniform".to_string(),
            shape,
            name: None,
            lower_bound,
            upper_bound,
            current_val: None,
            history: Vec::new(),
        })
    }

    /// Create a parametrization from a configuration entry.
    pub fn from_config(
        object_name: impl Into<String>,
        setter: impl Into<String>,
        config: &ParameterConfig,
    ) -> Result<Self> {
        let mut param = Self::new(
            setter,
            object_name,
            &config.range,
            &config.execution,
            config.shape.as_deref(),
        )?;
        param.distribution = config.distribution.clone();
        param.name = config.name.clone();
        Ok(param)
    }

    /// Set the distribution name.
    pub fn with_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = distribution.into();
        self
    }

    /// Lower bounds (or means for normal sampling).
    pub fn lower_bound(&self) -> &DVec {
        &self.lower_bound
    }

    /// Upper bounds (or standard deviations for normal sampling).
    pub fn upper_bound(&self) -> &DVec {
        &self.upper_bound
    }

    /// `(lower, upper)` bound pair.
    pub fn parameter_range(&self) -> (&DVec, &DVec) {
        (&self.lower_bound, &self.upper_bound)
    }

    /// Number of elements sampled per value array.
    pub fn len(&self) -> usize {
        self.lower_bound.len()
    }

    /// True if the bounds are empty.
    pub fn is_empty(&self) -> bool {
        self.lower_bound.is_empty()
    }

    /// Most recently applied value, if any.
    pub fn current_val(&self) -> Option<&Sample> {
        self.current_val.as_ref()
    }

    /// Previously applied values, oldest first.
    pub fn history(&self) -> &[Sample] {
        &self.history
    }

    /// Record a newly applied value, moving the previous one into the history.
    pub fn update(&mut self, new_values: Sample) {
        if let Some(previous) = self.current_val.take() {
            self.history.push(previous);
        }
        self.current_val = Some(new_values);
    }

    /// `"setter:object"` key used in metadata and logs.
    pub fn key(&self) -> String {
        format!("{}:{}", self.setter, self.object_name)
    }

    /// Serializable view `{setter: {object_name: current_val}}`.
    pub fn to_json(&self) -> Value {
        let mut inner = Map::new();
        inner.insert(self.object_name.clone(), sample_to_json(self.current_val.as_ref()));
        let mut outer = Map::new();
        outer.insert(self.setter.clone(), Value::Object(inner));
        Value::Object(outer)
    }
}

impl fmt::Display for Parametrization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            self.key(),
            sample_to_json(self.current_val.as_ref())
        )
    }
}

/// Convert a sample (or its absence) to nested JSON arrays.
pub fn sample_to_json(sample: Option<&Sample>) -> Value {
    match sample {
        None => Value::Null,
        Some(arrays) => Value::Array(
            arrays
                .iter()
                .map(|values| Value::from(values.as_slice().to_vec()))
                .collect(),
        ),
    }
}

/// Split a raw range into `[low, high]` pairs, tiled to `shape` if given.
fn decompose_range(range: &RangeSpec, shape: Option<&[usize]>) -> Result<(Vec<[f64; 2]>, Vec<usize>)> {
    let pairs: Vec<[f64; 2]> = match range {
        RangeSpec::Flat(values) => {
            if values.len() != 2 {
                return Err(SimmodError::ShapeMismatch(format!(
                    "range must contain exactly 2 elements (lower and upper bound), got {}",
                    values.len()
                )));
            }
            vec![[values[0], values[1]]]
        }
        RangeSpec::Nested(rows) => {
            if rows.is_empty() {
                return Err(SimmodError::ShapeMismatch("range is empty".to_string()));
            }
            rows.iter()
                .enumerate()
                .map(|(i, row)| match row.as_slice() {
                    [low, high] => Ok([*low, *high]),
                    _ => Err(SimmodError::ShapeMismatch(format!(
                        "range row {} must contain exactly 2 elements, got {}",
                        i,
                        row.len()
                    ))),
                })
                .collect::<Result<_>>()?
        }
    };

    let Some(shape) = shape else {
        let shape = match range {
            RangeSpec::Flat(_) => vec![2],
            RangeSpec::Nested(_) => vec![pairs.len(), 2],
        };
        return Ok((pairs, shape));
    };

    let Some((&last, leading)) = shape.split_last() else {
        return Err(SimmodError::ShapeMismatch("shape must not be empty".to_string()));
    };
    if last != 2 {
        return Err(SimmodError::ShapeMismatch(format!(
            "if a shape is given its last dimension must be 2 (lower and upper bound), got {:?}",
            shape
        )));
    }

    let n: usize = leading.iter().product();
    if n % pairs.len() != 0 {
        return Err(SimmodError::ShapeMismatch(format!(
            "{} range pairs cannot be tiled to shape {:?}",
            pairs.len(),
            shape
        )));
    }

    let tiled = pairs.iter().copied().cycle().take(n).collect();
    Ok((tiled, shape.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mass_param() -> Parametrization {
        Parametrization::new("mass", "pole", &RangeSpec::pair(0.01, 0.1), "RESET", None).unwrap()
    }

    fn sample(v: f64) -> Sample {
        vec![DVec::from_vec(vec![v])]
    }

    #[test]
    fn test_flat_range() {
        let param = mass_param();
        assert_eq!(param.len(), 1);
        assert_relative_eq!(param.lower_bound()[0], 0.01);
        assert_relative_eq!(param.upper_bound()[0], 0.1);
        assert_eq!(param.shape, vec![2]);
        assert_eq!(param.execution, Execution::Reset);
        assert_eq!(param.distribution, "uniform");
    }

    #[test]
    fn test_nested_range() {
        let range = RangeSpec::pairs(&[[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]);
        let param = Parametrization::new("diaginertia", "arm", &range, "AFTER_STEP", None).unwrap();

        assert_eq!(param.len(), 3);
        assert_eq!(param.lower_bound().as_slice(), &[0.0, 2.0, 4.0]);
        assert_eq!(param.upper_bound().as_slice(), &[1.0, 3.0, 5.0]);
        assert_eq!(param.shape, vec![3, 2]);
    }

    #[test]
    fn test_shape_tiles_pair() {
        let param = Parametrization::new(
            "diaginertia",
            "arm",
            &RangeSpec::pair(0.0, 1.0),
            "RESET",
            Some(&[3, 2]),
        )
        .unwrap();

        assert_eq!(param.lower_bound().len(), 3);
        assert_eq!(param.upper_bound().len(), 3);
        assert!(param.lower_bound().iter().all(|&v| v == 0.0));
        assert!(param.upper_bound().iter().all(|&v| v == 1.0));
        assert_eq!(param.shape, vec![3, 2]);
    }

    #[test]
    fn test_shape_last_dimension_must_be_two() {
        let err = Parametrization::new(
            "diaginertia",
            "arm",
            &RangeSpec::pair(0.0, 1.0),
            "RESET",
            Some(&[3, 3]),
        )
        .unwrap_err();
        assert!(matches!(err, SimmodError::ShapeMismatch(_)));
    }

    #[test]
    fn test_shape_not_tileable() {
        let range = RangeSpec::pairs(&[[0.0, 1.0], [2.0, 3.0]]);
        let err = Parametrization::new("diaginertia", "arm", &range, "RESET", Some(&[3, 2]))
            .unwrap_err();
        assert!(matches!(err, SimmodError::ShapeMismatch(_)));
    }

    #[test]
    fn test_flat_range_wrong_length() {
        let err = Parametrization::new(
            "mass",
            "pole",
            &RangeSpec::Flat(vec![0.0, 1.0, 2.0]),
            "RESET",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SimmodError::ShapeMismatch(_)));
    }

    #[test]
    fn test_invalid_execution() {
        let err = Parametrization::new("mass", "pole", &RangeSpec::pair(0.0, 1.0), "ON_RENDER", None)
            .unwrap_err();
        assert!(matches!(err, SimmodError::InvalidExecution(ref name) if name == "ON_RENDER"));
    }

    #[test]
    fn test_single_update_has_no_history() {
        let mut param = mass_param();
        param.update(sample(0.05));

        assert!(param.history().is_empty());
        assert_eq!(param.current_val(), Some(&sample(0.05)));
    }

    #[test]
    fn test_update_moves_previous_into_history() {
        let mut param = mass_param();
        param.update(sample(0.02));
        param.update(sample(0.03));

        assert_eq!(param.history(), &[sample(0.02)]);
        assert_eq!(param.current_val(), Some(&sample(0.03)));

        param.update(sample(0.04));
        assert_eq!(param.history(), &[sample(0.02), sample(0.03)]);
    }

    #[test]
    fn test_to_json() {
        let mut param = mass_param();
        assert_eq!(param.to_json(), serde_json::json!({ "mass": { "pole": null } }));

        param.update(sample(0.5));
        assert_eq!(param.to_json(), serde_json::json!({ "mass": { "pole": [[0.5]] } }));
    }

    #[test]
    fn test_display() {
        let mut param = mass_param();
        assert_eq!(param.to_string(), "mass:pole=null");
        param.update(sample(0.5));
        assert_eq!(param.to_string(), "mass:pole=[[0.5]]");
    }

    #[test]
    fn test_from_config() {
        let config = ParameterConfig::new([1.0, 0.1])
            .distribution("normal")
            .execution("BEFORE_STEP");
        let param = Parametrization::from_config("pole", "mass", &config).unwrap();

        assert_eq!(param.setter, "mass");
        assert_eq!(param.object_name, "pole");
        assert_eq!(param.distribution, "normal");
        assert_eq!(param.execution, Execution::BeforeStep);
    }
}
