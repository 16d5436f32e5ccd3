//! Component schema registry.
//!
//! Maps component names to schemas and resolves a name plus props into either
//! a validated, defaulted property bag or a list of errors.
//!
//! The registry is a plain value with no internal locking. Construct it during
//! start-up and pass it by reference; if it must be shared and mutated across
//! threads, wrap it in `Arc<RwLock<_>>` at the composition point.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::ValidationResult;
use crate::handler::{ComponentHandler, ComponentOutput};
use crate::parser::ComponentDefinition;
use crate::value::{PropKind, PropValue, Props};

/// Predicate over a single prop value.
pub type PropCheck = dyn Fn(&PropValue) -> bool + Send + Sync;

/// Predicate over the whole property bag.
pub type PropsCheck = dyn Fn(&Props) -> bool + Send + Sync;

/// Declaration of a single component prop.
#[derive(Clone)]
pub struct PropSpec {
    kind: PropKind,
    required: bool,
    default: Option<PropValue>,
    check: Option<Arc<PropCheck>>,
}

impl PropSpec {
    #[must_use]
    pub fn new(kind: PropKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
            check: None,
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::new(PropKind::String)
    }

    #[must_use]
    pub fn number() -> Self {
        Self::new(PropKind::Number)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::new(PropKind::Boolean)
    }

    #[must_use]
    pub fn array() -> Self {
        Self::new(PropKind::Array)
    }

    #[must_use]
    pub fn object() -> Self {
        Self::new(PropKind::Object)
    }

    /// Mark the prop as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value applied when the prop is absent or `undefined`.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<PropValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Extra check run on provided values.
    #[must_use]
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&PropValue) -> bool + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(check));
        self
    }

    #[must_use]
    pub fn kind(&self) -> PropKind {
        self.kind
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&PropValue> {
        self.default.as_ref()
    }
}

impl fmt::Debug for PropSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropSpec")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("check", &self.check.is_some())
            .finish()
    }
}

/// Schema of a registered component.
///
/// Props are checked in declaration order, so error lists are stable.
#[derive(Clone, Default)]
pub struct ComponentSchema {
    name: String,
    props: Vec<(String, PropSpec)>,
    validator: Option<Arc<PropsCheck>>,
    handler: Option<Arc<dyn ComponentHandler>>,
}

impl ComponentSchema {
    /// Create an empty schema. A handler must be set before registration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the render handler.
    #[must_use]
    pub fn with_handler<H: ComponentHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Declare a prop. Redeclaring a name replaces the earlier declaration.
    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, spec: PropSpec) -> Self {
        let name = name.into();
        if let Some(slot) = self.props.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = spec;
        } else {
            self.props.push((name, spec));
        }
        self
    }

    /// Set a whole-component validator.
    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Props) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Name the schema is registered under (empty until registered).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared props in declaration order.
    pub fn props(&self) -> impl Iterator<Item = (&str, &PropSpec)> {
        self.props.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Run the component validator and all prop checks.
    fn check(&self, props: &Props) -> Vec<String> {
        let mut errors = Vec::new();
        let component = &self.name;

        if let Some(validator) = &self.validator
            && !validator(props)
        {
            errors.push(
                ComponentError::CustomComponentValidationFailed(component.clone()).to_string(),
            );
        }

        for (prop, spec) in &self.props {
            let value = props.get(prop).filter(|v| !v.is_missing());

            let Some(value) = value else {
                if spec.required {
                    errors.push(
                        ComponentError::MissingRequiredProp {
                            component: component.clone(),
                            prop: prop.clone(),
                        }
                        .to_string(),
                    );
                }
                continue;
            };

            if !value.matches_kind(spec.kind) {
                errors.push(
                    ComponentError::TypeMismatch {
                        component: component.clone(),
                        prop: prop.clone(),
                        expected: spec.kind,
                        actual: value.type_name(),
                    }
                    .to_string(),
                );
            }

            if let Some(check) = &spec.check
                && !check(value)
            {
                errors.push(
                    ComponentError::CustomPropValidationFailed {
                        component: component.clone(),
                        prop: prop.clone(),
                    }
                    .to_string(),
                );
            }
        }

        errors
    }

    /// Copy of `props` with defaults filled in for absent or `undefined` props.
    fn apply_defaults(&self, props: &Props) -> Props {
        let mut resolved = props.clone();
        for (prop, spec) in &self.props {
            let Some(default) = &spec.default else {
                continue;
            };
            let unset = resolved
                .get(prop)
                .is_none_or(|v| matches!(v, PropValue::Undefined));
            if unset {
                resolved.insert(prop.clone(), default.clone());
            }
        }
        resolved
    }

    /// Invoke the handler, turning errors and panics into a message.
    fn invoke(&self, props: &Props) -> Result<ComponentOutput, String> {
        let Some(handler) = &self.handler else {
            return Err("no render handler".to_owned());
        };

        match panic::catch_unwind(AssertUnwindSafe(|| handler.render(props))) {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for ComponentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSchema")
            .field("name", &self.name)
            .field("props", &self.props)
            .field("validator", &self.validator.is_some())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown error".to_owned()
    }
}

/// Per-component failures. These are reported as messages on results, never
/// returned as `Err`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    #[error("Component \"{0}\" is not registered")]
    UnknownComponent(String),
    #[error("Custom validation failed for component \"{0}\"")]
    CustomComponentValidationFailed(String),
    #[error("Required prop \"{prop}\" is missing for component \"{component}\"")]
    MissingRequiredProp { component: String, prop: String },
    #[error(
        "Prop \"{prop}\" has invalid type for component \"{component}\". Expected {expected}, got {actual}"
    )]
    TypeMismatch {
        component: String,
        prop: String,
        expected: PropKind,
        actual: &'static str,
    },
    #[error("Prop \"{prop}\" failed custom validation for component \"{component}\"")]
    CustomPropValidationFailed { component: String, prop: String },
    #[error("Error rendering component \"{component}\": {message}")]
    RenderError { component: String, message: String },
}

/// Error returned when registration is rejected.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result of resolving a component.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// True iff `errors` is empty.
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Props with defaults applied (the input props when validation failed).
    pub props: Props,
    /// Handler output on success.
    pub output: Option<ComponentOutput>,
}

impl Resolution {
    fn valid(props: Props, output: ComponentOutput) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            props,
            output: Some(output),
        }
    }

    fn invalid(props: Props, errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
            props,
            output: None,
        }
    }
}

/// Registry of component schemas.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    schemas: BTreeMap<String, ComponentSchema>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under `name`, replacing any previous registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] if `name` is empty or the
    /// schema has no handler.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        mut schema: ComponentSchema,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "Component name must be a non-empty string".to_owned(),
            ));
        }
        if !schema.has_handler() {
            return Err(RegistryError::InvalidArgument(format!(
                "Component \"{name}\" must have a render handler"
            )));
        }

        tracing::debug!(component = %name, "Registered component");
        schema.name.clone_from(&name);
        self.schemas.insert(name, schema);
        Ok(())
    }

    /// Resolve and render a component.
    ///
    /// # Example
    ///
    /// ```
    /// use mdc_components::{ComponentOutput, ComponentRegistry, ComponentSchema, PropSpec, Props};
    ///
    /// let mut registry = ComponentRegistry::new();
    /// registry
    ///     .register(
    ///         "Card",
    ///         ComponentSchema::new()
    ///             .with_prop("title", PropSpec::string().required())
    ///             .with_handler(|_: &Props| Ok(ComponentOutput::html("<div></div>"))),
    ///     )
    ///     .unwrap();
    ///
    /// let result = registry.resolve("Card", &Props::new());
    /// assert!(!result.is_valid);
    /// assert_eq!(
    ///     result.errors,
    ///     vec![r#"Required prop "title" is missing for component "Card""#]
    /// );
    /// ```
    #[must_use]
    pub fn resolve(&self, name: &str, props: &Props) -> Resolution {
        let Some(schema) = self.schemas.get(name) else {
            return Resolution::invalid(
                props.clone(),
                vec![ComponentError::UnknownComponent(name.to_owned()).to_string()],
            );
        };

        let errors = schema.check(props);
        if !errors.is_empty() {
            return Resolution::invalid(props.clone(), errors);
        }

        let resolved = schema.apply_defaults(props);
        match schema.invoke(&resolved) {
            Ok(output) => Resolution::valid(resolved, output),
            Err(message) => {
                tracing::warn!(component = %name, error = %message, "Component handler failed");
                let error = ComponentError::RenderError {
                    component: name.to_owned(),
                    message,
                };
                Resolution::invalid(resolved, vec![error.to_string()])
            }
        }
    }

    /// Validate a definition without rendering it.
    #[must_use]
    pub fn validate_definition(&self, definition: &ComponentDefinition) -> ValidationResult {
        let Some(schema) = self.schemas.get(&definition.name) else {
            return ValidationResult::from_parts(
                vec![ComponentError::UnknownComponent(definition.name.clone()).to_string()],
                Vec::new(),
            );
        };

        ValidationResult::from_parts(schema.check(&definition.props), Vec::new())
    }

    /// Registered component names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Look up a schema.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentSchema> {
        self.schemas.get(name)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Remove a component. Returns whether it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.schemas.remove(name).is_some();
        if removed {
            tracing::debug!(component = %name, "Unregistered component");
        }
        removed
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.schemas.clear();
    }
}
