//! Business logic services.

pub mod catalog_csv;
pub mod credentials;

pub use catalog_csv::{CsvError, ImportSummary, export_csv, import_csv};
pub use credentials::{AdminError, AdminService, CredentialHasher};
