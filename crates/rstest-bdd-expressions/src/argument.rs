//! Matched arguments: one per parameter of a compiled expression.

use std::sync::Arc;

use crate::capture::{Group, TreeRegexp};
use crate::errors::MatchError;
use crate::parameter::ParameterType;
use crate::value::Value;

/// A matched argument: the captured group, the parameter type that owns it,
/// and the transformed value.
#[derive(Debug, Clone)]
pub struct Argument {
    group: Group,
    parameter_type: Arc<ParameterType>,
    value: Value,
}

impl Argument {
    /// The transformed value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the argument and return the transformed value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// The capture group the argument was taken from.
    #[must_use]
    pub const fn group(&self) -> &Group {
        &self.group
    }

    /// The parameter type that produced the value. For anonymous parameters
    /// this is the type resolved for the current match.
    #[must_use]
    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }
}

/// Match `text` and transform each top-level group with the parameter type
/// at the same position.
pub(crate) fn build_arguments(
    tree_regexp: &TreeRegexp,
    text: &str,
    parameter_types: &[Arc<ParameterType>],
    expression: &str,
) -> Result<Option<Vec<Argument>>, MatchError> {
    let Some(root) = tree_regexp.match_text(text) else {
        log::trace!("`{expression}` did not match {text:?}");
        return Ok(None);
    };

    let mut arguments = Vec::with_capacity(parameter_types.len());
    for (position, (group, parameter_type)) in
        root.children().iter().zip(parameter_types).enumerate()
    {
        let value = parameter_type
            .transform(&group.values())
            .map_err(|source| MatchError::Transform {
                position,
                parameter: parameter_type.name().to_string(),
                expression: expression.to_string(),
                source,
            })?;
        log::trace!(
            "argument {position} of `{expression}` ({{{}}}) resolved to {value:?}",
            parameter_type.name()
        );
        arguments.push(Argument {
            group: group.clone(),
            parameter_type: Arc::clone(parameter_type),
            value,
        });
    }
    Ok(Some(arguments))
}
