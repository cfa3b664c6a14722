//! Entity type definitions

pub mod invoice;
pub mod invoice_item;
pub mod partner;
pub mod product;

pub use invoice::{Invoice, NewInvoice};
pub use invoice_item::{InvoiceItem, NewInvoiceItem};
pub use partner::{NewPartner, Partner};
pub use product::{NewProduct, Product};
