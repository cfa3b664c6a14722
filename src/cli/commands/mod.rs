//! CLI command implementations

pub mod check;
pub mod completions;
pub mod init;
pub mod invoice;
pub mod item;
pub mod partner;
pub mod product;
pub mod report;
pub mod transfer;
