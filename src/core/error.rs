//! Errors raised by ledger operations

use miette::Diagnostic;
use thiserror::Error;

use crate::core::entity::EntityKind;
use crate::core::store::StoreError;
use crate::core::validation::ValidationErrors;

#[derive(Debug, Error, Diagnostic)]
pub enum DomainError {
    /// One or more field rules were violated; carries every message
    #[error("invalid {kind}: {errors}")]
    #[diagnostic(
        code(nova::validation),
        help("correct the listed fields and try again")
    )]
    Validation {
        kind: EntityKind,
        errors: ValidationErrors,
    },

    /// A referenced row does not exist at write time
    #[error("{kind} {id} does not exist")]
    #[diagnostic(
        code(nova::reference),
        help("select an existing record, see the matching `list` command")
    )]
    Reference { kind: EntityKind, id: i64 },

    #[error("a product with sku '{sku}' already exists")]
    #[diagnostic(code(nova::uniqueness), help("every product needs its own sku"))]
    Uniqueness { sku: String },

    #[error("{kind} {id} not found")]
    #[diagnostic(code(nova::not_found))]
    NotFound { kind: EntityKind, id: i64 },

    #[error("{kind} {id} is referenced by {dependents} invoice item(s)")]
    #[diagnostic(
        code(nova::in_use),
        help("delete or edit the referencing invoice items first")
    )]
    InUse {
        kind: EntityKind,
        id: i64,
        dependents: i64,
    },

    #[error("storage error: {0}")]
    #[diagnostic(code(nova::storage))]
    Storage(#[from] StoreError),
}

impl DomainError {
    pub fn validation(kind: EntityKind, errors: ValidationErrors) -> Self {
        DomainError::Validation { kind, errors }
    }

    /// Field messages for validation failures, otherwise the error text
    pub fn messages(&self) -> Vec<String> {
        match self {
            DomainError::Validation { errors, .. } => errors.messages(),
            other => vec![other.to_string()],
        }
    }

    /// Stable short name of the error kind, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "validation",
            DomainError::Reference { .. } => "reference",
            DomainError::Uniqueness { .. } => "uniqueness",
            DomainError::NotFound { .. } => "not_found",
            DomainError::InUse { .. } => "in_use",
            DomainError::Storage(_) => "storage",
        }
    }
}

/// Map a failed product write: UNIQUE on sku becomes `Uniqueness`
pub(crate) fn classify_product_write(err: StoreError, sku: &str) -> DomainError {
    match err.constraint_message() {
        Some(msg) if msg.contains("UNIQUE") && msg.contains("products.sku") => {
            DomainError::Uniqueness {
                sku: sku.to_string(),
            }
        }
        _ => DomainError::Storage(err),
    }
}

/// Map a failed delete: FOREIGN KEY failures mean the row is still referenced
pub(crate) fn classify_delete(err: StoreError, kind: EntityKind, id: i64) -> DomainError {
    match err.constraint_message() {
        Some(msg) if msg.contains("FOREIGN KEY") => DomainError::InUse {
            kind,
            id,
            dependents: 1,
        },
        _ => DomainError::Storage(err),
    }
}

/// Map a failed insert or update: FOREIGN KEY failures mean a dangling reference
pub(crate) fn classify_reference(err: StoreError, kind: EntityKind, id: i64) -> DomainError {
    match err.constraint_message() {
        Some(msg) if msg.contains("FOREIGN KEY") => DomainError::Reference { kind, id },
        _ => DomainError::Storage(err),
    }
}
