//! Declarative metadata for workflow interfaces.
//!
//! Interfaces are described once with [`InterfaceDef`] and [`MethodDef`]; a
//! [`MethodRef`] is the opaque handle the resolvers operate on.
//!
//! ```ignore
//! use workflow_stub::metadata::{InterfaceDef, MethodDef};
//!
//! let greeter = InterfaceDef::workflow("Greeter")
//!     .method(MethodDef::new("greet").workflow())
//!     .method(MethodDef::new("rename").signal_named("set-name"));
//! let rename = greeter.method_ref("rename")?;
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::errors::MethodError;

/// Wire-addressable role of a workflow interface method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTag {
    Workflow,
    Signal,
    Query,
    Update,
    UpdateValidator,
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoleTag::Workflow => "workflow",
            RoleTag::Signal => "signal",
            RoleTag::Query => "query",
            RoleTag::Update => "update",
            RoleTag::UpdateValidator => "update validator",
        };
        write!(f, "{label}")
    }
}

/// Name of a Rust (or foreign) type as carried in metadata and type tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor(String);

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Descriptor for a Rust type, using its `std::any::type_name`.
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn unit() -> Self {
        Self::of::<()>()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role marker attached to a method, with its optional wire-name override.
///
/// An override that is empty or only whitespace counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleAttribute {
    Workflow {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Signal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Query {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Update {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Validator for an update; `update_name` links it to the update it guards.
    UpdateValidator {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        update_name: Option<String>,
    },
}

impl RoleAttribute {
    pub fn tag(&self) -> RoleTag {
        match self {
            RoleAttribute::Workflow { .. } => RoleTag::Workflow,
            RoleAttribute::Signal { .. } => RoleTag::Signal,
            RoleAttribute::Query { .. } => RoleTag::Query,
            RoleAttribute::Update { .. } => RoleTag::Update,
            RoleAttribute::UpdateValidator { .. } => RoleTag::UpdateValidator,
        }
    }

    /// Explicit wire name (for validators, the explicit target update name).
    ///
    /// A blank value counts as absent. Any other value is returned unchanged.
    pub fn explicit_name(&self) -> Option<&str> {
        let raw = match self {
            RoleAttribute::Workflow { name }
            | RoleAttribute::Signal { name }
            | RoleAttribute::Query { name }
            | RoleAttribute::Update { name } => name.as_deref(),
            RoleAttribute::UpdateValidator { update_name } => update_name.as_deref(),
        };
        raw.filter(|s| !s.trim().is_empty())
    }
}

/// Any marker attached to a method. Only [`Attribute::Role`] takes part in classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attribute {
    Role(RoleAttribute),
    Custom { name: String },
}

impl Attribute {
    pub fn custom(name: impl Into<String>) -> Self {
        Attribute::Custom { name: name.into() }
    }

    pub fn as_role(&self) -> Option<&RoleAttribute> {
        match self {
            Attribute::Role(role) => Some(role),
            Attribute::Custom { .. } => None,
        }
    }
}

impl From<RoleAttribute> for Attribute {
    fn from(role: RoleAttribute) -> Self {
        Attribute::Role(role)
    }
}

/// Declaration of one method on an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    name: String,
    params: Vec<TypeDescriptor>,
    returns: TypeDescriptor,
    attributes: Vec<Attribute>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            params: Vec::new(),
            returns: TypeDescriptor::unit(),
            attributes: Vec::new(),
        }
    }

    pub fn param(mut self, ty: TypeDescriptor) -> Self {
        self.params.push(ty);
        self
    }

    pub fn returns(mut self, ty: TypeDescriptor) -> Self {
        self.returns = ty;
        self
    }

    pub fn attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn workflow(self) -> Self {
        self.attribute(RoleAttribute::Workflow { name: None })
    }

    pub fn workflow_named(self, name: impl Into<String>) -> Self {
        self.attribute(RoleAttribute::Workflow {
            name: Some(name.into()),
        })
    }

    pub fn signal(self) -> Self {
        self.attribute(RoleAttribute::Signal { name: None })
    }

    pub fn signal_named(self, name: impl Into<String>) -> Self {
        self.attribute(RoleAttribute::Signal {
            name: Some(name.into()),
        })
    }

    pub fn query(self) -> Self {
        self.attribute(RoleAttribute::Query { name: None })
    }

    pub fn query_named(self, name: impl Into<String>) -> Self {
        self.attribute(RoleAttribute::Query {
            name: Some(name.into()),
        })
    }

    pub fn update(self) -> Self {
        self.attribute(RoleAttribute::Update { name: None })
    }

    pub fn update_named(self, name: impl Into<String>) -> Self {
        self.attribute(RoleAttribute::Update {
            name: Some(name.into()),
        })
    }

    /// Validator whose update is inferred from this method's own name.
    pub fn update_validator(self) -> Self {
        self.attribute(RoleAttribute::UpdateValidator { update_name: None })
    }

    pub fn update_validator_for(self, update_name: impl Into<String>) -> Self {
        self.attribute(RoleAttribute::UpdateValidator {
            update_name: Some(update_name.into()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    pub fn return_type(&self) -> &TypeDescriptor {
        &self.returns
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// Declaring type of a method, as far as resolution is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaringType {
    pub name: String,
    /// Whether the type carries the workflow-interface marker.
    pub workflow_interface: bool,
}

/// Declaration of an interface type and its methods.
#[derive(Debug, Clone)]
pub struct InterfaceDef {
    ty: DeclaringType,
    methods: Vec<Arc<MethodDef>>,
}

impl InterfaceDef {
    /// Type carrying the workflow-interface marker.
    pub fn workflow(name: impl Into<String>) -> Self {
        Self::with_marker(name, true)
    }

    /// Ordinary type without the marker. Its methods never resolve.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::with_marker(name, false)
    }

    fn with_marker(name: impl Into<String>, workflow_interface: bool) -> Self {
        Self {
            ty: DeclaringType {
                name: name.into().trim().to_string(),
                workflow_interface,
            },
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    pub fn name(&self) -> &str {
        &self.ty.name
    }

    pub fn is_workflow_interface(&self) -> bool {
        self.ty.workflow_interface
    }

    /// Reference to the first method declared with `name`.
    pub fn method_ref(&self, name: &str) -> Result<MethodRef, MethodError> {
        self.find(|m| m.name() == name).ok_or_else(|| self.unknown(name))
    }

    /// Reference to the overload of `name` taking exactly `params`.
    pub fn method_ref_with_params(
        &self,
        name: &str,
        params: &[TypeDescriptor],
    ) -> Result<MethodRef, MethodError> {
        self.find(|m| m.name() == name && m.params() == params)
            .ok_or_else(|| self.unknown(name))
    }

    fn find(&self, pred: impl Fn(&MethodDef) -> bool) -> Option<MethodRef> {
        self.methods
            .iter()
            .find(|m| pred(&***m))
            .map(|m| MethodRef {
                kind: CallableKind::Method,
                declaring_type: Some(self.ty.clone()),
                method: m.clone(),
            })
    }

    fn unknown(&self, name: &str) -> MethodError {
        MethodError::UnknownMethod {
            type_name: self.ty.name.clone(),
            method: name.to_string(),
        }
    }
}

/// What a [`MethodRef`] actually points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallableKind {
    Method,
    Constructor,
    Function,
}

/// Opaque handle to a callable, normally a method declared on an interface.
///
/// Equality and hashing use the callable kind, the declaring type name, the
/// method name and the parameter types, so the handle can key a cache.
#[derive(Debug, Clone)]
pub struct MethodRef {
    kind: CallableKind,
    declaring_type: Option<DeclaringType>,
    method: Arc<MethodDef>,
}

impl MethodRef {
    /// Reference to a constructor of `type_name`.
    pub fn constructor(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            kind: CallableKind::Constructor,
            method: Arc::new(MethodDef::new("new").returns(TypeDescriptor::named(&type_name))),
            declaring_type: Some(DeclaringType {
                name: type_name,
                workflow_interface: false,
            }),
        }
    }

    /// Reference to a free function.
    pub fn function(def: MethodDef) -> Self {
        Self {
            kind: CallableKind::Function,
            declaring_type: None,
            method: Arc::new(def),
        }
    }

    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    pub fn declaring_type(&self) -> Option<&DeclaringType> {
        self.declaring_type.as_ref()
    }

    pub fn name(&self) -> &str {
        self.method.name()
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        self.method.params()
    }

    pub fn return_type(&self) -> &TypeDescriptor {
        self.method.return_type()
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.method.attributes()
    }

    pub fn role_attributes(&self) -> impl Iterator<Item = &RoleAttribute> {
        self.attributes().iter().filter_map(Attribute::as_role)
    }

    /// `Type::method`, or the bare name for free functions.
    pub fn qualified_name(&self) -> String {
        match &self.declaring_type {
            Some(ty) => format!("{}::{}", ty.name, self.name()),
            None => self.name().to_string(),
        }
    }

    fn key(&self) -> (CallableKind, Option<&str>, &str, &[TypeDescriptor]) {
        (
            self.kind,
            self.declaring_type.as_ref().map(|t| t.name.as_str()),
            self.name(),
            self.params(),
        )
    }
}

impl PartialEq for MethodRef {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for MethodRef {}

impl Hash for MethodRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CallableKind::Method => write!(f, "method {}", self.qualified_name()),
            CallableKind::Constructor => write!(f, "constructor {}", self.qualified_name()),
            CallableKind::Function => write!(f, "function {}", self.qualified_name()),
        }
    }
}

/// Implemented by Rust types that publish a workflow interface definition.
pub trait WorkflowInterface {
    fn definition() -> InterfaceDef;

    fn method(name: &str) -> Result<MethodRef, MethodError> {
        Self::definition().method_ref(name)
    }
}
