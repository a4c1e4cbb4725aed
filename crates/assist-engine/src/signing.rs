//! Selection of the signing mode.
//!
//! The GPG command is used when both `signing.gnupg.keyName` and
//! `signing.gnupg.passphrase` are build properties. Otherwise an in-memory
//! PGP key is used when `GPG_SECRET_KEY` resolves; its password is then
//! required and its key id optional. With neither, signing is off and no
//! sign actions are registered.

use assist_config::key::keys;
use assist_config::Resolver;

use crate::secret::Secret;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningMode {
    /// Sign by invoking the local `gpg` binary.
    GpgCommand { key_name: String, passphrase: Secret },
    /// Sign with an ASCII-armored key held in configuration.
    InMemory {
        key_id: Option<String>,
        secret_key: Secret,
        password: Secret,
    },
}

impl SigningMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GpgCommand { .. } => "gpg command",
            Self::InMemory { .. } => "in-memory PGP key",
        }
    }
}

/// Outcome of signing configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningState {
    /// No signing inputs are present.
    NotConfigured,
    Ready(SigningMode),
    /// A secret key is present but a required companion setting is missing.
    /// Sign actions are still registered and fail with `message` when run.
    Misconfigured { message: String },
}

impl SigningState {
    /// Whether sign actions should be registered.
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::NotConfigured)
    }

    pub fn mode(&self) -> Option<&SigningMode> {
        match self {
            Self::Ready(mode) => Some(mode),
            _ => None,
        }
    }
}

/// Determine the signing state from the configuration snapshot.
pub fn signing_state(resolver: &Resolver<'_>) -> SigningState {
    let key_name = resolver.resolve(&keys::GPG_KEY_NAME.key()).optional();
    let passphrase = resolver.resolve(&keys::GPG_PASSPHRASE.key()).optional();
    if let (Some(key_name), Some(passphrase)) = (key_name, passphrase) {
        tracing::debug!(%key_name, "signing with gpg command");
        return SigningState::Ready(SigningMode::GpgCommand {
            key_name,
            passphrase: Secret::new(passphrase),
        });
    }

    let Some(secret_key) = resolver
        .resolve(&keys::SIGNING_SECRET_KEY.key())
        .optional()
    else {
        tracing::debug!("no signing key configured, sign actions are not registered");
        return SigningState::NotConfigured;
    };

    let password = match resolver.require(&keys::SIGNING_PASSWORD.key()) {
        Ok(password) => password,
        Err(e) => {
            tracing::warn!("signing key present but unusable: {e}");
            return SigningState::Misconfigured {
                message: e.to_string(),
            };
        }
    };
    let key_id = resolver.resolve(&keys::SIGNING_KEY_ID.key()).optional();
    tracing::debug!(key_id = key_id.as_deref().unwrap_or("<none>"), "signing with in-memory key");

    SigningState::Ready(SigningMode::InMemory {
        key_id,
        secret_key: Secret::new(secret_key),
        password: Secret::new(password),
    })
}
