//! Keystore configuration for APK signing.
//!
//! Signing is all-or-nothing: a keystore is only used when its location,
//! store password, key alias and key password are all provided. Anything
//! less degrades to an unsigned export instead of failing the build.

use std::fmt;
use std::path::{Path, PathBuf};

/// Fully specified keystore credentials.
///
/// Only constructed through [`SigningConfig::from_fields`], so every field
/// is guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct KeystoreConfig {
    location: String,
    store_password: String,
    key_alias: String,
    key_password: String,
}

impl KeystoreConfig {
    /// Keystore location: local path, `file://` or `http(s)://` URL.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn store_password(&self) -> &str {
        &self.store_password
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub fn key_password(&self) -> &str {
        &self.key_password
    }
}

impl fmt::Debug for KeystoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreConfig")
            .field("location", &self.location)
            .field("store_password", &"<redacted>")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"<redacted>")
            .finish()
    }
}

/// Signing mode shared by every export in a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SigningConfig {
    /// Produce an unsigned APK set (bundletool falls back to its debug key).
    Unsigned,
    /// Sign with the given keystore.
    Signed(KeystoreConfig),
}

impl SigningConfig {
    /// Builds the signing mode from the four raw inputs.
    ///
    /// Any empty field yields [`SigningConfig::Unsigned`]. When all four are
    /// present the location is trimmed; the other fields are taken verbatim.
    pub fn from_fields(
        location: &str,
        store_password: &str,
        key_alias: &str,
        key_password: &str,
    ) -> Self {
        let fields = [location, store_password, key_alias, key_password];
        let provided = fields.iter().filter(|field| !field.is_empty()).count();

        if provided < fields.len() {
            if provided > 0 {
                log::warn!(
                    "Keystore settings are incomplete ({provided} of 4 provided), exporting unsigned APKs"
                );
            }
            return Self::Unsigned;
        }

        Self::Signed(KeystoreConfig {
            location: location.trim().to_string(),
            store_password: store_password.to_string(),
            key_alias: key_alias.to_string(),
            key_password: key_password.to_string(),
        })
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed(_))
    }

    /// Keystore credentials, if signing.
    pub fn keystore(&self) -> Option<&KeystoreConfig> {
        match self {
            Self::Signed(keystore) => Some(keystore),
            Self::Unsigned => None,
        }
    }
}

/// Keystore credentials paired with the keystore file on local disk.
///
/// Remote keystores are downloaded per export, so this only lives as long
/// as the export's working directory.
#[derive(Debug)]
pub struct LocalKeystore<'a> {
    path: PathBuf,
    credentials: &'a KeystoreConfig,
}

impl<'a> LocalKeystore<'a> {
    pub fn new(path: impl Into<PathBuf>, credentials: &'a KeystoreConfig) -> Self {
        Self {
            path: path.into(),
            credentials,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn credentials(&self) -> &KeystoreConfig {
        self.credentials
    }
}
