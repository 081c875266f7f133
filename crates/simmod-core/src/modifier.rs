//! Modifiers bind a simulation backend to a set of named setters.
//!
//! A concrete modifier type declares its setters once in a [`SetterRegistry`]
//! and implements [`SetterModifier`]. Every such type is usable as a
//! [`Modifier`] trait object, which is what algorithms iterate over.
//!
//! ```ignore
//! impl SetterModifier for BodyModifier {
//!     const NAME: &'static str = "BodyModifier";
//!
//!     fn registry() -> &'static SetterRegistry<Self> {
//!         static REGISTRY: LazyLock<SetterRegistry<BodyModifier>> = LazyLock::new(|| {
//!             SetterRegistry::new()
//!                 .register("mass", 1, BodyModifier::set_mass)
//!                 .register("friction", 1, BodyModifier::set_friction)
//!         });
//!         &REGISTRY
//!     }
//!     // ...
//! }
//! ```

use crate::config::RandomizationConfig;
use crate::error::{Result, SimmodError};
use crate::parametrization::Parametrization;
use crate::DVec;
use indexmap::IndexMap;

/// Extra keyword arguments forwarded to setters.
pub type Kwargs = IndexMap<String, f64>;

/// Setter signature: `(modifier, object_name, value_arrays, kwargs)`.
pub type SetterFn<M> = fn(&mut M, &str, &[DVec], &Kwargs) -> Result<()>;

/// A registered setter with its declared arity.
pub struct Setter<M> {
    /// Public name referenced by parametrizations.
    pub name: &'static str,
    /// Number of value arrays consumed after the object name.
    pub arity: usize,
    func: SetterFn<M>,
}

impl<M> Setter<M> {
    /// Invoke the setter on `modifier`.
    pub fn call(&self, modifier: &mut M, object_name: &str, values: &[DVec], kwargs: &Kwargs) -> Result<()> {
        if values.len() != self.arity {
            return Err(SimmodError::InvalidValue {
                setter: self.name.to_string(),
                reason: format!("expected {} value arrays, got {}", self.arity, values.len()),
            });
        }
        (self.func)(modifier, object_name, values, kwargs)
    }
}

/// Per-type table of public setter name → setter.
pub struct SetterRegistry<M> {
    setters: IndexMap<&'static str, Setter<M>>,
}

impl<M> SetterRegistry<M> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            setters: IndexMap::new(),
        }
    }

    /// Register `func` under the public `name`, consuming `arity` value arrays.
    ///
    /// # Panics
    /// If `name` is already registered.
    pub fn register(mut self, name: &'static str, arity: usize, func: SetterFn<M>) -> Self {
        let previous = self.setters.insert(name, Setter { name, arity, func });
        assert!(previous.is_none(), "setter '{name}' registered twice");
        self
    }

    /// Look up a setter by public name.
    pub fn get(&self, name: &str) -> Option<&Setter<M>> {
        self.setters.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.setters.keys().copied()
    }

    /// Number of registered setters.
    pub fn len(&self) -> usize {
        self.setters.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }
}

impl<M> Default for SetterRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implemented by concrete modifier types.
pub trait SetterModifier: Sized + 'static {
    /// Type name used in errors and logs.
    const NAME: &'static str;

    /// Setters declared by this type, built once and shared by all instances.
    fn registry() -> &'static SetterRegistry<Self>;

    /// Names of the objects this modifier can address.
    fn names(&self) -> Vec<String>;

    /// Parametrizations owned by this modifier.
    fn instrumentation(&self) -> &[Parametrization];

    /// Mutable access to the parametrizations.
    fn instrumentation_mut(&mut self) -> &mut [Parametrization];

    /// Propagate all changes made since the last call into the simulation.
    fn update(&mut self) -> Result<()>;
}

/// Uniform capability set algorithms drive.
pub trait Modifier {
    /// Name of the concrete modifier type.
    fn type_name(&self) -> &'static str;

    /// Names of the objects this modifier can address.
    fn names(&self) -> Vec<String>;

    /// Registered setters as name → arity.
    fn standard_setters(&self) -> IndexMap<&'static str, usize>;

    /// Declared arity of `setter`.
    fn setter_arity(&self, setter: &str) -> Result<usize>;

    /// Invoke `setter` on `object_name` with the given value arrays.
    fn call_setter(&mut self, setter: &str, object_name: &str, values: &[DVec], kwargs: &Kwargs) -> Result<()>;

    /// Parametrizations owned by this modifier.
    fn instrumentation(&self) -> &[Parametrization];

    /// Mutable access to the parametrizations.
    fn instrumentation_mut(&mut self) -> &mut [Parametrization];

    /// Propagate all changes made since the last call into the simulation.
    fn update(&mut self) -> Result<()>;
}

fn unknown_setter<M: SetterModifier>(setter: &str) -> SimmodError {
    SimmodError::UnknownSetter {
        setter: setter.to_string(),
        modifier: M::NAME.to_string(),
    }
}

impl<M: SetterModifier> Modifier for M {
    fn type_name(&self) -> &'static str {
        M::NAME
    }

    fn names(&self) -> Vec<String> {
        SetterModifier::names(self)
    }

    fn standard_setters(&self) -> IndexMap<&'static str, usize> {
        M::registry()
            .setters
            .values()
            .map(|s| (s.name, s.arity))
            .collect()
    }

    fn setter_arity(&self, setter: &str) -> Result<usize> {
        M::registry()
            .get(setter)
            .map(|s| s.arity)
            .ok_or_else(|| unknown_setter::<M>(setter))
    }

    fn call_setter(&mut self, setter: &str, object_name: &str, values: &[DVec], kwargs: &Kwargs) -> Result<()> {
        let entry = M::registry()
            .get(setter)
            .ok_or_else(|| unknown_setter::<M>(setter))?;
        entry.call(self, object_name, values, kwargs)
    }

    fn instrumentation(&self) -> &[Parametrization] {
        SetterModifier::instrumentation(self)
    }

    fn instrumentation_mut(&mut self) -> &mut [Parametrization] {
        SetterModifier::instrumentation_mut(self)
    }

    fn update(&mut self) -> Result<()> {
        SetterModifier::update(self)
    }
}

/// Build the instrumentation of modifier type `M` from a configuration.
///
/// Parametrizations follow document order. Every entry must reference a
/// setter registered on `M`.
pub fn build_instrumentation<M: SetterModifier>(config: &RandomizationConfig) -> Result<Vec<Parametrization>> {
    let registry = M::registry();
    let mut instrumentation = Vec::new();
    for (object_name, setters) in config {
        for (setter, param_config) in setters {
            if !registry.contains(setter) {
                return Err(unknown_setter::<M>(setter));
            }
            instrumentation.push(Parametrization::from_config(object_name, setter, param_config)?);
        }
    }
    Ok(instrumentation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, ParameterConfig};
    use std::sync::LazyLock;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(String, String, Vec<DVec>)>,
        params: Vec<Parametrization>,
        updates: usize,
    }

    impl Recorder {
        fn set_mass(&mut self, name: &str, values: &[DVec], _kwargs: &Kwargs) -> Result<()> {
            self.calls.push(("mass".into(), name.into(), values.to_vec()));
            Ok(())
        }

        fn set_gravity(&mut self, name: &str, values: &[DVec], _kwargs: &Kwargs) -> Result<()> {
            self.calls.push(("gravity".into(), name.into(), values.to_vec()));
            Ok(())
        }
    }

    impl SetterModifier for Recorder {
        const NAME: &'static str = "Recorder";

        fn registry() -> &'static SetterRegistry<Self> {
            static REGISTRY: LazyLock<SetterRegistry<Recorder>> = LazyLock::new(|| {
                SetterRegistry::new()
                    .register("mass", 1, Recorder::set_mass)
                    .register("gravity", 3, Recorder::set_gravity)
            });
            &REGISTRY
        }

        fn names(&self) -> Vec<String> {
            vec!["pole".into()]
        }

        fn instrumentation(&self) -> &[Parametrization] {
            &self.params
        }

        fn instrumentation_mut(&mut self) -> &mut [Parametrization] {
            &mut self.params
        }

        fn update(&mut self) -> Result<()> {
            self.updates += 1;
            Ok(())
        }
    }

    #[test]
    fn test_standard_setters() {
        let modifier: Box<dyn Modifier> = Box::new(Recorder::default());
        let setters = modifier.standard_setters();

        assert_eq!(setters.len(), 2);
        assert_eq!(setters["mass"], 1);
        assert_eq!(setters["gravity"], 3);
        assert_eq!(modifier.type_name(), "Recorder");
    }

    #[test]
    fn test_call_setter() {
        let mut recorder = Recorder::default();
        let value = vec![DVec::from_vec(vec![0.5])];
        Modifier::call_setter(&mut recorder, "mass", "pole", &value, &Kwargs::new()).unwrap();

        assert_eq!(recorder.calls.len(), 1);
        assert_eq!(recorder.calls[0].1, "pole");
        assert_eq!(recorder.calls[0].2, value);
    }

    #[test]
    fn test_unknown_setter() {
        let mut modifier: Box<dyn Modifier> = Box::new(Recorder::default());
        let err = modifier
            .call_setter("texture", "pole", &[], &Kwargs::new())
            .unwrap_err();
        assert!(matches!(err, SimmodError::UnknownSetter { ref setter, .. } if setter == "texture"));
        assert!(modifier.setter_arity("texture").is_err());
    }

    #[test]
    fn test_arity_mismatch() {
        let mut modifier: Box<dyn Modifier> = Box::new(Recorder::default());
        let err = modifier
            .call_setter("gravity", "world", &[DVec::zeros(1)], &Kwargs::new())
            .unwrap_err();
        assert!(matches!(err, SimmodError::InvalidValue { .. }));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_registration_panics() {
        let _ = SetterRegistry::<Recorder>::new()
            .register("mass", 1, Recorder::set_mass)
            .register("mass", 1, Recorder::set_mass);
    }

    #[test]
    fn test_build_instrumentation() {
        let config = parse_config(
            r#"{
                "pole": { "mass": { "range": [0.01, 0.1] } },
                "world": { "gravity": { "range": [-10.0, -9.0], "execution": "AFTER_STEP" } }
            }"#,
        )
        .unwrap();

        let params = build_instrumentation::<Recorder>(&config).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].key(), "mass:pole");
        assert_eq!(params[1].key(), "gravity:world");
    }

    #[test]
    fn test_build_instrumentation_unknown_setter() {
        let mut config = RandomizationConfig::new();
        config
            .entry("pole".to_string())
            .or_default()
            .insert("texture".to_string(), ParameterConfig::new([0.0, 1.0]));

        let err = build_instrumentation::<Recorder>(&config).unwrap_err();
        assert!(matches!(err, SimmodError::UnknownSetter { ref modifier, .. } if modifier == "Recorder"));
    }
}
