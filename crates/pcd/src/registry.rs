//! Tag-to-constructor registry for transformation bindings.

use std::collections::BTreeMap;
use tracing::warn;

use crate::identity::IdentityTransformation;
use crate::transformation::{
    BindingInputs, TransformationBinding, TransformationDescriptor, TransformationTag,
};
use photoproof_core::{Error, Result};

/// Builds a binding for one transformation type.
pub type BindingConstructor = fn(BindingInputs) -> Result<Box<dyn TransformationBinding>>;

/// Explicit registry of binding constructors.
#[derive(Debug, Clone, Default)]
pub struct TransformationRegistry {
    constructors: BTreeMap<TransformationTag, BindingConstructor>,
}

impl TransformationRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in transformation.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(TransformationTag::Identity, IdentityTransformation::construct);
        registry
    }

    /// Register `constructor` for `tag`, replacing any earlier one.
    pub fn register(&mut self, tag: TransformationTag, constructor: BindingConstructor) {
        if self.constructors.insert(tag, constructor).is_some() {
            warn!(tag = %tag, "Replaced transformation constructor");
        }
    }

    pub fn contains(&self, tag: TransformationTag) -> bool {
        self.constructors.contains_key(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = TransformationTag> + '_ {
        self.constructors.keys().copied()
    }

    /// Build the binding for `inputs.descriptor`.
    ///
    /// # Errors
    /// `UnregisteredTransformation` if no constructor is registered for the tag.
    pub fn build(&self, inputs: BindingInputs) -> Result<Box<dyn TransformationBinding>> {
        let tag = inputs.descriptor.tag();
        let constructor = self
            .constructors
            .get(&tag)
            .ok_or_else(|| Error::UnregisteredTransformation(tag.to_string()))?;
        constructor(inputs)
    }

    /// Fail on the first descriptor without a constructor.
    pub fn ensure_covers(&self, permissible: &[TransformationDescriptor]) -> Result<()> {
        match permissible.iter().find(|d| !self.contains(d.tag())) {
            Some(missing) => Err(Error::UnregisteredTransformation(format!(
                "no constructor registered for '{}'",
                missing.tag()
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoproof_core::KeyScope;

    fn setup_inputs() -> BindingInputs {
        BindingInputs::for_setup(TransformationDescriptor::Identity, KeyScope::Shared, None)
    }

    #[test]
    fn test_standard_registry_covers_identity() {
        let registry = TransformationRegistry::standard();
        assert!(registry.contains(TransformationTag::Identity));
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec![TransformationTag::Identity]);
        registry.ensure_covers(&[TransformationDescriptor::Identity]).unwrap();

        let binding = registry.build(setup_inputs()).unwrap();
        assert_eq!(binding.tag(), TransformationTag::Identity);
    }

    #[test]
    fn test_empty_registry_reports_gaps() {
        let registry = TransformationRegistry::new();
        registry.ensure_covers(&[]).unwrap();
        assert!(matches!(
            registry.ensure_covers(&[TransformationDescriptor::Identity]),
            Err(Error::UnregisteredTransformation(_))
        ));
        assert!(matches!(
            registry.build(setup_inputs()),
            Err(Error::UnregisteredTransformation(_))
        ));
    }

    #[test]
    fn test_register_replaces() {
        fn failing(_: BindingInputs) -> Result<Box<dyn TransformationBinding>> {
            Err(Error::CircuitCompile("refused".to_string()))
        }

        let mut registry = TransformationRegistry::standard();
        registry.register(TransformationTag::Identity, failing);
        assert!(matches!(
            registry.build(setup_inputs()),
            Err(Error::CircuitCompile(_))
        ));
    }
}
