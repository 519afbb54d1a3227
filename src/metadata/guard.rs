use crate::errors::MethodError;

use super::descriptor::{CallableKind, MethodRef};

/// Proof that a [`MethodRef`] is a method declared on a workflow interface.
///
/// Only [`check_eligible`] produces one, so anything taking an `Eligible`
/// runs after the membership check.
#[derive(Debug, Clone, Copy)]
pub struct Eligible<'a> {
    method: &'a MethodRef,
}

impl<'a> Eligible<'a> {
    pub fn method(&self) -> &'a MethodRef {
        self.method
    }
}

/// Interface membership guard.
///
/// Rejects constructors, free functions and unnamed callables with
/// [`MethodError::InvalidReference`], then methods whose declaring type lacks
/// the workflow-interface marker with [`MethodError::NotAWorkflowInterface`].
/// Role attributes are not looked at.
pub fn check_eligible(method: &MethodRef) -> Result<Eligible<'_>, MethodError> {
    if method.kind() != CallableKind::Method || method.name().is_empty() {
        return Err(MethodError::InvalidReference {
            reference: method.to_string(),
        });
    }
    match method.declaring_type() {
        Some(ty) if ty.workflow_interface => Ok(Eligible { method }),
        Some(ty) => Err(MethodError::NotAWorkflowInterface {
            type_name: ty.name.clone(),
            method: method.qualified_name(),
        }),
        None => Err(MethodError::InvalidReference {
            reference: method.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MethodErrorKind;
    use crate::metadata::descriptor::{InterfaceDef, MethodDef};

    #[test]
    fn workflow_interface_method_is_eligible() {
        let def = InterfaceDef::workflow("Workflow1").method(MethodDef::new("signal1").signal());
        let method = def.method_ref("signal1").unwrap();
        let eligible = check_eligible(&method).unwrap();
        assert_eq!(eligible.method(), &method);
    }

    #[test]
    fn plain_type_is_rejected_even_with_role_attribute() {
        let def = InterfaceDef::plain("NotAWorkflow").method(MethodDef::new("aMethod").signal());
        let err = check_eligible(&def.method_ref("aMethod").unwrap()).unwrap_err();
        assert_eq!(
            err,
            MethodError::NotAWorkflowInterface {
                type_name: "NotAWorkflow".into(),
                method: "NotAWorkflow::aMethod".into(),
            }
        );
    }

    #[test]
    fn constructor_and_function_are_invalid_references() {
        let ctor = MethodRef::constructor("String");
        assert_eq!(
            check_eligible(&ctor).unwrap_err().kind(),
            MethodErrorKind::InvalidReference
        );

        let func = MethodRef::function(MethodDef::new("parse").signal());
        assert_eq!(
            check_eligible(&func).unwrap_err().kind(),
            MethodErrorKind::InvalidReference
        );
    }

    #[test]
    fn unnamed_method_is_an_invalid_reference() {
        let def = InterfaceDef::workflow("Workflow1").method(MethodDef::new("  ").signal());
        let method = def.method_ref("").unwrap();
        assert_eq!(
            check_eligible(&method).unwrap_err().kind(),
            MethodErrorKind::InvalidReference
        );
    }
}
