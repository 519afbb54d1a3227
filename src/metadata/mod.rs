//! Method role classification and wire-name resolution.
//!
//! - **[`descriptor`]** - Interface/method declarations and the [`MethodRef`] handle
//! - **[`guard`]** - Interface membership guard
//! - **[`classify`]** - Role classifier
//! - **[`names`]** - Name resolver and validator linkage
//!
//! Resolution is pure over immutable declarations: it never blocks, holds no
//! state, and returns the same answer for the same reference every time.
//!
//! ```ignore
//! use workflow_stub::metadata::{workflow_signal_name, InterfaceDef, MethodDef};
//!
//! let def = InterfaceDef::workflow("Workflow1")
//!     .method(MethodDef::new("signal2").signal_named("customSignalName"));
//! assert_eq!(workflow_signal_name(&def.method_ref("signal2")?)?, "customSignalName");
//! ```

pub mod classify;
pub mod descriptor;
pub mod guard;
pub mod names;

pub use classify::classify;
pub use descriptor::{
    Attribute, CallableKind, DeclaringType, InterfaceDef, MethodDef, MethodRef, RoleAttribute,
    RoleTag, TypeDescriptor, WorkflowInterface,
};
pub use guard::{check_eligible, Eligible};
pub use names::{
    resolve, validator_target_name, workflow_query_type, workflow_signal_name, workflow_type,
    workflow_update_name, ResolvedName,
};
