mod credentials;

pub use credentials::CredentialManager;
