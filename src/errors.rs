use thiserror::Error;

/// All errors that can occur in CredVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong passphrase or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Format errors ---
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("No credential stored for provider '{0}'")]
    ProviderNotFound(String),

    // --- Persistence errors ---
    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Keyring errors ---
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Coarse classification of a [`VaultError`], used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A secret, salt, token or identifier has the wrong shape.
    Format,
    /// Wrong passphrase, corrupted or tampered ciphertext.
    Decryption,
    /// The backing store could not be read or written.
    Persistence,
    /// Invalid configuration.
    Config,
    /// Everything else (crypto setup, serialization, CLI).
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Decryption => "decryption",
            Self::Persistence => "persistence",
            Self::Config => "config",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VaultError {
    /// Classify this error for diagnostics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat(_) | Self::ProviderNotFound(_) => ErrorKind::Format,
            Self::DecryptionFailed => ErrorKind::Decryption,
            Self::Persistence(_) | Self::Io(_) | Self::KeyringError(_) => ErrorKind::Persistence,
            Self::ConfigError(_) => ErrorKind::Config,
            Self::EncryptionFailed(_)
            | Self::KeyDerivationFailed(_)
            | Self::SerializationError(_)
            | Self::CommandFailed(_)
            | Self::UserCancelled
            | Self::AuditError(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience type alias for CredVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
