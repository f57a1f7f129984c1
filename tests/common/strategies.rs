use proptest::prelude::*;

/// Short identifiers from a tiny alphabet so that factories often overlap.
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

/// Identifier sets advertised by one factory, possibly empty.
pub fn identifier_set_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(identifier_strategy(), 0..4)
}

/// A single mutation applied to a registry under test.
#[derive(Debug, Clone)]
pub enum RegistryOp {
    /// Register a new factory advertising these identifiers.
    Register(Vec<String>),
    /// Register an already registered handle again (index wraps).
    Reregister(usize),
    /// Unregister a registered handle (index wraps).
    Unregister(usize),
    /// Look an identifier up, which may rebuild the index.
    Lookup(String),
}

pub fn registry_op_strategy() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        4 => identifier_set_strategy().prop_map(RegistryOp::Register),
        1 => (0usize..16).prop_map(RegistryOp::Reregister),
        3 => (0usize..16).prop_map(RegistryOp::Unregister),
        2 => identifier_strategy().prop_map(RegistryOp::Lookup),
    ]
}

pub fn registry_ops_strategy() -> impl Strategy<Value = Vec<RegistryOp>> {
    prop::collection::vec(registry_op_strategy(), 0..40)
}
