//! Core module - storage, validation and the consistency engine

pub mod config;
pub mod entity;
pub mod error;
pub mod ledger;
pub mod report;
pub mod schema;
pub mod store;
pub mod transfer;
pub mod validation;

pub use config::{Config, ConfigError};
pub use entity::{Entity, EntityKind, InvoiceStatus};
pub use error::DomainError;
pub use ledger::{Ledger, TotalMismatch};
pub use store::{Gateway, Row, Store, StoreError, Written};
pub use transfer::{ImportReport, RowError, Table, TransferError};
pub use validation::{validate, FieldMap, FieldValue, Validate, ValidationErrors};
