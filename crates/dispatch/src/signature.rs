//! Signature Verifier - dispatch-type compatibility of hook functions
//!
//! A hook is accepted when its declared signature has the same shape as the
//! dispatcher's own entry point:
//!
//! ```text
//! withdraw: <T> (Address, Store<T>, U64, TransferRef, FunctionIdentity) -> (Asset)
//! deposit:  <T> (Store<T>, Asset, TransferRef, FunctionIdentity) -> ()
//! ```
//!
//! `T` is the open slot: the candidate may leave it generic or bind it to
//! any concrete store type. Every other position must match exactly.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::function::FunctionIdentity;

/// Which side of a transfer a hook governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Withdraw,
    Deposit,
}

/// Type of one parameter or return value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Address,
    U64,
    Bool,
    /// An in-flight fungible asset
    Asset,
    /// Borrowed transfer capability
    TransferRef,
    FunctionIdentity,
    /// A store, parameterized by the object type backing it
    Store(Box<TypeTag>),
    /// Generic type parameter by index
    TypeParam(u16),
    /// A concrete named type
    Struct(String),
}

impl TypeTag {
    /// `Store<T0>`
    pub fn generic_store() -> Self {
        TypeTag::Store(Box::new(TypeTag::TypeParam(0)))
    }

    /// `Store<name>`
    pub fn store_of(name: impl Into<String>) -> Self {
        TypeTag::Store(Box::new(TypeTag::Struct(name.into())))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Address => write!(f, "address"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Asset => write!(f, "FungibleAsset"),
            TypeTag::TransferRef => write!(f, "&TransferRef"),
            TypeTag::FunctionIdentity => write!(f, "&FunctionIdentity"),
            TypeTag::Store(inner) => write!(f, "Store<{}>", inner),
            TypeTag::TypeParam(i) => write!(f, "T{}", i),
            TypeTag::Struct(name) => write!(f, "{}", name),
        }
    }
}

/// Declared signature of a function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Number of generic type parameters
    pub type_params: u16,
    pub params: Vec<TypeTag>,
    pub returns: Vec<TypeTag>,
}

impl Signature {
    pub fn new(type_params: u16, params: Vec<TypeTag>, returns: Vec<TypeTag>) -> Self {
        Self {
            type_params,
            params,
            returns,
        }
    }

    /// Shape every withdraw hook must have
    pub fn withdraw_dispatcher() -> Self {
        Self::new(
            1,
            vec![
                TypeTag::Address,
                TypeTag::generic_store(),
                TypeTag::U64,
                TypeTag::TransferRef,
                TypeTag::FunctionIdentity,
            ],
            vec![TypeTag::Asset],
        )
    }

    /// Shape every deposit hook must have
    pub fn deposit_dispatcher() -> Self {
        Self::new(
            1,
            vec![
                TypeTag::generic_store(),
                TypeTag::Asset,
                TypeTag::TransferRef,
                TypeTag::FunctionIdentity,
            ],
            vec![],
        )
    }

    /// Required shape for a hook kind
    pub fn required(kind: HookKind) -> Self {
        match kind {
            HookKind::Withdraw => Self::withdraw_dispatcher(),
            HookKind::Deposit => Self::deposit_dispatcher(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.type_params > 0 {
            let params: Vec<String> = (0..self.type_params).map(|i| format!("T{}", i)).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        let returns: Vec<String> = self.returns.iter().map(ToString::to_string).collect();
        write!(f, "({}) -> ({})", params.join(", "), returns.join(", "))
    }
}

/// Structural match of one position.
///
/// A `TypeParam` in the required shape is the open slot and accepts any
/// declared generic of the candidate or any concrete struct. Everything else
/// must be equal.
fn tag_compatible(required: &TypeTag, candidate: &TypeTag, candidate_generics: u16) -> bool {
    match (required, candidate) {
        (TypeTag::TypeParam(_), TypeTag::TypeParam(i)) => *i < candidate_generics,
        (TypeTag::TypeParam(_), TypeTag::Struct(_)) => true,
        (TypeTag::TypeParam(_), _) => false,
        (TypeTag::Store(r), TypeTag::Store(c)) => tag_compatible(r, c, candidate_generics),
        (r, c) => r == c,
    }
}

fn list_compatible(required: &[TypeTag], candidate: &[TypeTag], candidate_generics: u16) -> bool {
    required.len() == candidate.len()
        && required
            .iter()
            .zip(candidate)
            .all(|(r, c)| tag_compatible(r, c, candidate_generics))
}

/// Compare a required shape against a candidate signature
pub fn signature_compatible(required: &Signature, candidate: &Signature) -> bool {
    // Binding the open slot concretely leaves the candidate with fewer generics
    candidate.type_params <= required.type_params
        && list_compatible(&required.params, &candidate.params, candidate.type_params)
        && list_compatible(&required.returns, &candidate.returns, candidate.type_params)
}

/// Dispatch-type compatibility of a published function with a required shape
pub fn is_dispatch_compatible(required: &Signature, candidate: &FunctionIdentity) -> bool {
    signature_compatible(required, candidate.signature())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn withdraw_with(params: Vec<TypeTag>, returns: Vec<TypeTag>) -> Signature {
        Signature::new(1, params, returns)
    }

    #[test]
    fn test_exact_shapes_compatible() {
        let w = Signature::withdraw_dispatcher();
        let d = Signature::deposit_dispatcher();
        assert!(signature_compatible(&w, &w));
        assert!(signature_compatible(&d, &d));
        assert!(!signature_compatible(&w, &d));
        assert!(!signature_compatible(&d, &w));
    }

    #[test]
    fn test_open_slot_accepts_concrete_store() {
        let candidate = Signature::new(
            0,
            vec![
                TypeTag::Address,
                TypeTag::store_of("DeflationStore"),
                TypeTag::U64,
                TypeTag::TransferRef,
                TypeTag::FunctionIdentity,
            ],
            vec![TypeTag::Asset],
        );
        assert!(signature_compatible(&Signature::withdraw_dispatcher(), &candidate));
    }

    #[test]
    fn test_open_slot_rejects_primitive() {
        let candidate = withdraw_with(
            vec![
                TypeTag::Address,
                TypeTag::Store(Box::new(TypeTag::U64)),
                TypeTag::U64,
                TypeTag::TransferRef,
                TypeTag::FunctionIdentity,
            ],
            vec![TypeTag::Asset],
        );
        assert!(!signature_compatible(&Signature::withdraw_dispatcher(), &candidate));
    }

    #[test]
    fn test_param_count_mismatch() {
        let candidate = withdraw_with(
            vec![
                TypeTag::Address,
                TypeTag::generic_store(),
                TypeTag::U64,
                TypeTag::TransferRef,
            ],
            vec![TypeTag::Asset],
        );
        assert!(!signature_compatible(&Signature::withdraw_dispatcher(), &candidate));
    }

    #[test]
    fn test_param_order_mismatch() {
        let candidate = withdraw_with(
            vec![
                TypeTag::generic_store(),
                TypeTag::Address,
                TypeTag::U64,
                TypeTag::TransferRef,
                TypeTag::FunctionIdentity,
            ],
            vec![TypeTag::Asset],
        );
        assert!(!signature_compatible(&Signature::withdraw_dispatcher(), &candidate));
    }

    #[test]
    fn test_fixed_type_mismatch() {
        let candidate = withdraw_with(
            vec![
                TypeTag::Address,
                TypeTag::generic_store(),
                TypeTag::Bool,
                TypeTag::TransferRef,
                TypeTag::FunctionIdentity,
            ],
            vec![TypeTag::Asset],
        );
        assert!(!signature_compatible(&Signature::withdraw_dispatcher(), &candidate));
    }

    #[test]
    fn test_return_mismatch() {
        let mut candidate = Signature::deposit_dispatcher();
        candidate.returns = vec![TypeTag::U64];
        assert!(!signature_compatible(&Signature::deposit_dispatcher(), &candidate));
    }

    #[test]
    fn test_undeclared_type_param_rejected() {
        let mut candidate = Signature::deposit_dispatcher();
        candidate.params[0] = TypeTag::Store(Box::new(TypeTag::TypeParam(1)));
        assert!(!signature_compatible(&Signature::deposit_dispatcher(), &candidate));

        candidate.params[0] = TypeTag::generic_store();
        candidate.type_params = 0;
        assert!(!signature_compatible(&Signature::deposit_dispatcher(), &candidate));
    }

    #[test]
    fn test_extra_type_params_rejected() {
        let mut candidate = Signature::deposit_dispatcher();
        candidate.type_params = 2;
        assert!(!signature_compatible(&Signature::deposit_dispatcher(), &candidate));
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(
            Signature::deposit_dispatcher().to_string(),
            "<T0>(Store<T0>, FungibleAsset, &TransferRef, &FunctionIdentity) -> ()"
        );
    }

    #[test]
    fn test_hook_kind_parse() {
        assert_eq!("withdraw".parse::<HookKind>().unwrap(), HookKind::Withdraw);
        assert_eq!(HookKind::Deposit.to_string(), "deposit");
    }
}
