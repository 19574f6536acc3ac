//! In-memory secret store with versioning support

mod store;

pub use store::{CreateError, GcpSecretStore, SecretEntry, SecretVersion};
