//! Signer Configuration
//!
//! Settings for the signing pipeline with:
//! - Level presets (standard, hardened)
//! - Nonce entropy selection
//! - Post-signing sender verification
//! - Intent guards (fee cap, calldata limit)
//!
//! Settings are plain values handed to each call; there is no global
//! configuration state.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ValidationError;

/// Calldata limit applied by the hardened preset (128 KiB)
pub const HARDENED_MAX_DATA_BYTES: usize = 128 * 1024;

/// Settings preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Plain RFC 6979 signing
    Standard,
    /// OS entropy mixed into the nonce, signer verified after signing
    Hardened,
    /// User-defined settings
    Custom,
}

/// Source of supplementary nonce entropy
///
/// Every mode yields a valid RFC 6979 signature. Only `Deterministic`
/// and `Fixed` reproduce the same bytes across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyMode {
    /// No extra entropy
    Deterministic,
    /// 32 fresh bytes from the OS per signature
    OsRandom,
    /// Caller-supplied 32 bytes
    Fixed([u8; 32]),
}

impl EntropyMode {
    /// Materialize the entropy for one signature
    pub fn resolve(&self) -> Option<Zeroizing<[u8; 32]>> {
        match self {
            EntropyMode::Deterministic => None,
            EntropyMode::OsRandom => {
                use rand::rngs::OsRng;
                use rand::RngCore;

                let mut bytes = Zeroizing::new([0u8; 32]);
                OsRng.fill_bytes(&mut bytes[..]);
                Some(bytes)
            }
            EntropyMode::Fixed(bytes) => Some(Zeroizing::new(*bytes)),
        }
    }

    pub fn is_deterministic(&self) -> bool {
        !matches!(self, EntropyMode::OsRandom)
    }
}

/// Signing pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerSettings {
    /// Preset these settings came from
    pub level: SecurityLevel,
    /// Supplementary nonce entropy
    pub entropy: EntropyMode,
    /// Recover the sender after signing and compare with the key's address
    pub verify_recovery: bool,
    /// Reject calldata longer than this
    pub max_data_bytes: Option<usize>,
    /// Reject `maxPriorityFeePerGas > maxFeePerGas`
    pub enforce_fee_cap: bool,
}

impl Default for SignerSettings {
    fn default() -> Self {
        Self::standard()
    }
}

impl SignerSettings {
    /// Standard preset
    pub fn standard() -> Self {
        Self {
            level: SecurityLevel::Standard,
            entropy: EntropyMode::Deterministic,
            verify_recovery: false,
            max_data_bytes: None,
            enforce_fee_cap: true,
        }
    }

    /// Hardened preset
    pub fn hardened() -> Self {
        Self {
            level: SecurityLevel::Hardened,
            entropy: EntropyMode::OsRandom,
            verify_recovery: true,
            max_data_bytes: Some(HARDENED_MAX_DATA_BYTES),
            enforce_fee_cap: true,
        }
    }

    pub fn for_level(level: SecurityLevel) -> Self {
        match level {
            SecurityLevel::Standard | SecurityLevel::Custom => {
                let mut settings = Self::standard();
                settings.level = level;
                settings
            }
            SecurityLevel::Hardened => Self::hardened(),
        }
    }

    /// Apply a manual change; any change makes the settings custom
    pub fn customize<F>(mut self, updater: F) -> Self
    where
        F: FnOnce(&mut SignerSettings),
    {
        updater(&mut self);
        self.level = SecurityLevel::Custom;
        self
    }

    /// Load and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let settings: SignerSettings = serde_json::from_str(json)
            .map_err(|e| ValidationError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ValidationError> {
        serde_json::to_string_pretty(self).map_err(|e| ValidationError::InvalidSettings(e.to_string()))
    }

    /// Reject settings that cannot be honored
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_data_bytes == Some(0) {
            return Err(ValidationError::InvalidSettings(
                "maxDataBytes must be positive when set".to_string(),
            ));
        }
        if let EntropyMode::Fixed(bytes) = &self.entropy {
            if bytes.iter().all(|&b| b == 0) {
                return Err(ValidationError::InvalidSettings(
                    "fixed entropy must not be all zeros".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Consistent but weaker-than-preset combinations
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.enforce_fee_cap {
            warnings.push("Warning: priority fee may exceed the fee cap".to_string());
        }

        if matches!(self.entropy, EntropyMode::OsRandom) && !self.verify_recovery {
            warnings.push(
                "Warning: randomized nonces without post-signing verification".to_string(),
            );
        }

        if self.level == SecurityLevel::Hardened && self.max_data_bytes.is_none() {
            warnings.push("Warning: hardened level without a calldata limit".to_string());
        }

        warnings
    }
}
