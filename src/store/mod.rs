pub mod credential_store;
pub mod mapping;
pub mod parser;

pub use credential_store::{CredentialFileInfo, CredentialFileKind, CredentialStore};
pub use mapping::CredentialMapping;
pub use parser::CredentialParser;
