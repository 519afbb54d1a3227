//! Wire-name resolution for workflow interface methods.
//!
//! Signals, queries and updates resolve to their explicit override, else the
//! method's own name. A validator has no wire name of its own: it resolves to
//! the name of the update it guards. The workflow entry method resolves to its
//! override, else the interface name.

use serde::{Deserialize, Serialize};

use crate::errors::MethodError;

use super::{
    descriptor::{MethodRef, RoleAttribute, RoleTag},
    guard::{check_eligible, Eligible},
};

/// Suffixes stripped from a validator's name to find its update.
const VALIDATOR_SUFFIXES: [&str; 2] = ["Validator", "_validator"];

/// A classified method together with the name it is addressed by on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedName {
    pub role: RoleTag,
    pub name: String,
}

/// Signal name of a `Signal` method.
pub fn workflow_signal_name(method: &MethodRef) -> Result<String, MethodError> {
    resolve_expecting(method, RoleTag::Signal, &[RoleTag::Signal])
}

/// Query type of a `Query` method.
pub fn workflow_query_type(method: &MethodRef) -> Result<String, MethodError> {
    resolve_expecting(method, RoleTag::Query, &[RoleTag::Query])
}

/// Update name of an `Update` method or of an `UpdateValidator` method.
///
/// An update and its validator always resolve to the same string.
pub fn workflow_update_name(method: &MethodRef) -> Result<String, MethodError> {
    resolve_expecting(
        method,
        RoleTag::Update,
        &[RoleTag::Update, RoleTag::UpdateValidator],
    )
}

/// Workflow type of the workflow entry method.
pub fn workflow_type(method: &MethodRef) -> Result<String, MethodError> {
    resolve_expecting(method, RoleTag::Workflow, &[RoleTag::Workflow])
}

/// Name of the update an `UpdateValidator` method is linked to.
///
/// The explicit target wins; otherwise the name is inferred by stripping
/// `Validator` or `_validator` from the validator's own name. The interface is
/// not searched for a matching update method.
pub fn validator_target_name(method: &MethodRef) -> Result<String, MethodError> {
    resolve_expecting(method, RoleTag::UpdateValidator, &[RoleTag::UpdateValidator])
}

/// Role and wire name of any workflow interface method.
pub fn resolve(method: &MethodRef) -> Result<ResolvedName, MethodError> {
    let result = check_eligible(method).and_then(|eligible| {
        let attr = eligible.role_attribute()?;
        Ok(ResolvedName {
            role: attr.tag(),
            name: wire_name(eligible, attr)?,
        })
    });
    trace_outcome(method, result.as_ref().map(|r| r.name.as_str()));
    result
}

fn resolve_expecting(
    method: &MethodRef,
    expected: RoleTag,
    accepted: &[RoleTag],
) -> Result<String, MethodError> {
    let result = check_eligible(method).and_then(|eligible| {
        let attr = match eligible.role_attribute() {
            Ok(attr) if accepted.contains(&attr.tag()) => attr,
            Ok(attr) => return Err(wrong_role(method, Some(attr.tag()), expected)),
            // A method without any role attribute matches no specific role.
            Err(MethodError::NoRoleAttribute { .. }) => {
                return Err(wrong_role(method, None, expected));
            }
            Err(err) => return Err(err),
        };
        wire_name(eligible, attr)
    });
    trace_outcome(method, result.as_ref().map(String::as_str));
    result
}

fn wrong_role(method: &MethodRef, found: Option<RoleTag>, expected: RoleTag) -> MethodError {
    MethodError::WrongRole {
        method: method.qualified_name(),
        found,
        expected,
    }
}

fn wire_name(eligible: Eligible<'_>, attr: &RoleAttribute) -> Result<String, MethodError> {
    let method = eligible.method();
    let name = match attr {
        RoleAttribute::Workflow { .. } => attr
            .explicit_name()
            .or_else(|| {
                method
                    .declaring_type()
                    .map(|ty| ty.name.as_str())
                    .filter(|name| !name.trim().is_empty())
            })
            .unwrap_or(method.name()),
        RoleAttribute::Signal { .. }
        | RoleAttribute::Query { .. }
        | RoleAttribute::Update { .. } => attr.explicit_name().unwrap_or(method.name()),
        RoleAttribute::UpdateValidator { .. } => match attr.explicit_name() {
            Some(target) => target,
            None => infer_update_name(method.name()).ok_or_else(|| {
                MethodError::InvalidValidatorTarget {
                    method: method.qualified_name(),
                    reason: format!(
                        "no update name given and the method name does not end in {}",
                        VALIDATOR_SUFFIXES.join(" or ")
                    ),
                }
            })?,
        },
    };
    Ok(name.to_string())
}

fn infer_update_name(validator: &str) -> Option<&str> {
    VALIDATOR_SUFFIXES
        .iter()
        .find_map(|suffix| validator.strip_suffix(suffix))
        .filter(|base| !base.is_empty())
}

#[cfg(feature = "tracing")]
fn trace_outcome(method: &MethodRef, outcome: Result<&str, &MethodError>) {
    match outcome {
        Ok(name) => {
            tracing::debug!(method = %method.qualified_name(), name, "resolved wire name")
        }
        Err(err) => tracing::warn!(method = %method, error = %err, "method resolution failed"),
    }
}

#[cfg(not(feature = "tracing"))]
fn trace_outcome(_method: &MethodRef, _outcome: Result<&str, &MethodError>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MethodErrorKind;
    use crate::metadata::descriptor::{InterfaceDef, MethodDef};

    fn iface() -> InterfaceDef {
        InterfaceDef::workflow("Orders")
            .method(MethodDef::new("place").workflow())
            .method(MethodDef::new("approve").update())
            .method(MethodDef::new("approve_validator").update_validator())
            .method(MethodDef::new("approveValidator").update_validator())
            .method(MethodDef::new("check").update_validator())
            .method(MethodDef::new("Validator").update_validator())
            .method(MethodDef::new("ghostValidator").update_validator())
            .method(MethodDef::new("blank").signal_named("  "))
    }

    #[test]
    fn validator_name_inferred_from_either_suffix() {
        let def = iface();
        for name in ["approve_validator", "approveValidator"] {
            let method = def.method_ref(name).unwrap();
            assert_eq!(validator_target_name(&method).unwrap(), "approve");
            assert_eq!(workflow_update_name(&method).unwrap(), "approve");
        }
    }

    #[test]
    fn validator_without_suffix_or_base_fails() {
        let def = iface();
        for name in ["check", "Validator"] {
            let err = workflow_update_name(&def.method_ref(name).unwrap()).unwrap_err();
            assert_eq!(err.kind(), MethodErrorKind::InvalidValidatorTarget, "{name}");
        }
    }

    #[test]
    fn validator_may_target_a_missing_update() {
        let method = iface().method_ref("ghostValidator").unwrap();
        assert_eq!(workflow_update_name(&method).unwrap(), "ghost");
    }

    #[test]
    fn validator_target_requires_validator_role() {
        let err = validator_target_name(&iface().method_ref("approve").unwrap()).unwrap_err();
        assert_eq!(
            err,
            MethodError::WrongRole {
                method: "Orders::approve".into(),
                found: Some(RoleTag::Update),
                expected: RoleTag::UpdateValidator,
            }
        );
    }

    #[test]
    fn workflow_type_defaults_to_interface_name() {
        let method = iface().method_ref("place").unwrap();
        assert_eq!(workflow_type(&method).unwrap(), "Orders");

        let def = InterfaceDef::workflow("Orders")
            .method(MethodDef::new("place").workflow_named("order-flow"));
        assert_eq!(
            workflow_type(&def.method_ref("place").unwrap()).unwrap(),
            "order-flow"
        );
    }

    #[test]
    fn blank_override_falls_back_to_method_name() {
        let method = iface().method_ref("blank").unwrap();
        assert_eq!(workflow_signal_name(&method).unwrap(), "blank");
    }

    #[test]
    fn explicit_names_are_used_verbatim() {
        let def = InterfaceDef::workflow("Orders")
            .method(MethodDef::new("pad").signal_named(" padded "))
            .method(MethodDef::new("guard").update_validator_for(" upd "));
        assert_eq!(
            workflow_signal_name(&def.method_ref("pad").unwrap()).unwrap(),
            " padded "
        );
        assert_eq!(
            workflow_update_name(&def.method_ref("guard").unwrap()).unwrap(),
            " upd "
        );
    }

    #[test]
    fn blank_interface_name_falls_back_to_method_name() {
        for name in ["", "   "] {
            let def = InterfaceDef::workflow(name).method(MethodDef::new("run").workflow());
            let method = def.method_ref("run").unwrap();
            assert_eq!(workflow_type(&method).unwrap(), "run", "{name:?}");
            assert_eq!(resolve(&method).unwrap().name, "run", "{name:?}");
        }
    }

    #[test]
    fn role_less_method_is_a_wrong_role_for_specific_resolvers() {
        let def = InterfaceDef::workflow("Orders").method(MethodDef::new("plain"));
        let method = def.method_ref("plain").unwrap();
        assert_eq!(
            workflow_signal_name(&method).unwrap_err(),
            MethodError::WrongRole {
                method: "Orders::plain".into(),
                found: None,
                expected: RoleTag::Signal,
            }
        );
        assert_eq!(
            resolve(&method).unwrap_err().kind(),
            MethodErrorKind::NoRoleAttribute
        );
    }

    #[test]
    fn resolve_reports_role_and_name() {
        let def = iface();
        assert_eq!(
            resolve(&def.method_ref("approveValidator").unwrap()).unwrap(),
            ResolvedName {
                role: RoleTag::UpdateValidator,
                name: "approve".into()
            }
        );
        assert_eq!(
            resolve(&def.method_ref("place").unwrap()).unwrap(),
            ResolvedName {
                role: RoleTag::Workflow,
                name: "Orders".into()
            }
        );
    }
}
