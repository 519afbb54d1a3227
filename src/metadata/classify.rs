use crate::errors::MethodError;

use super::{
    descriptor::{MethodRef, RoleAttribute, RoleTag},
    guard::{check_eligible, Eligible},
};

impl<'a> Eligible<'a> {
    /// The single role attribute on this method.
    ///
    /// Non-role attributes are ignored. Zero role attributes fail with
    /// [`MethodError::NoRoleAttribute`], more than one with
    /// [`MethodError::ConflictingRoleAttributes`] listing them in declaration order.
    pub fn role_attribute(&self) -> Result<&'a RoleAttribute, MethodError> {
        let method = self.method();
        let mut roles = method.role_attributes();
        let first = roles.next().ok_or_else(|| MethodError::NoRoleAttribute {
            method: method.qualified_name(),
        })?;
        if roles.next().is_some() {
            return Err(MethodError::ConflictingRoleAttributes {
                method: method.qualified_name(),
                roles: method.role_attributes().map(RoleAttribute::tag).collect(),
            });
        }
        Ok(first)
    }

    pub fn classify(&self) -> Result<RoleTag, MethodError> {
        self.role_attribute().map(RoleAttribute::tag)
    }
}

/// Role classifier. Runs the membership guard first.
pub fn classify(method: &MethodRef) -> Result<RoleTag, MethodError> {
    check_eligible(method)?.classify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MethodErrorKind;
    use crate::metadata::descriptor::{Attribute, InterfaceDef, MethodDef};

    fn iface() -> InterfaceDef {
        InterfaceDef::workflow("Workflow1")
            .method(MethodDef::new("run").workflow())
            .method(MethodDef::new("signal1").signal())
            .method(MethodDef::new("query1").query_named("state"))
            .method(MethodDef::new("update1").update())
            .method(MethodDef::new("update1Validator").update_validator_for("update1"))
            .method(MethodDef::new("helper").attribute(Attribute::custom("Deprecated")))
            .method(MethodDef::new("both").signal().query())
    }

    #[test]
    fn each_role_is_classified() {
        let def = iface();
        let cases = [
            ("run", RoleTag::Workflow),
            ("signal1", RoleTag::Signal),
            ("query1", RoleTag::Query),
            ("update1", RoleTag::Update),
            ("update1Validator", RoleTag::UpdateValidator),
        ];
        for (name, expected) in cases {
            let role = classify(&def.method_ref(name).unwrap()).unwrap();
            assert_eq!(role, expected, "{name}");
        }
    }

    #[test]
    fn custom_attributes_do_not_count_as_roles() {
        let err = classify(&iface().method_ref("helper").unwrap()).unwrap_err();
        assert_eq!(
            err,
            MethodError::NoRoleAttribute {
                method: "Workflow1::helper".into()
            }
        );
    }

    #[test]
    fn two_roles_conflict() {
        let err = classify(&iface().method_ref("both").unwrap()).unwrap_err();
        assert_eq!(
            err,
            MethodError::ConflictingRoleAttributes {
                method: "Workflow1::both".into(),
                roles: vec![RoleTag::Signal, RoleTag::Query],
            }
        );
    }

    #[test]
    fn eligibility_is_checked_before_roles() {
        let def =
            InterfaceDef::plain("NotAWorkflow").method(MethodDef::new("both").signal().query());
        let err = classify(&def.method_ref("both").unwrap()).unwrap_err();
        assert_eq!(err.kind(), MethodErrorKind::NotAWorkflowInterface);
    }
}
