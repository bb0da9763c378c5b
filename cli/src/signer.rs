use std::str::FromStr;

use alloy_signer_local::coins_bip39::English;
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner};
use color_eyre::{eyre::Context, Result, Section};

pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

const KEY_HELP_MSG: &str = r"
The key can be given in one of two forms:
- a 32-byte hex string, with or without the `0x` prefix
- a BIP-39 mnemonic phrase, in which case the first account (index 0) is used
";

/// Whether a signing key is configured in the environment.
#[must_use]
pub fn has_signer_in_env() -> bool {
    std::env::var_os(PRIVATE_KEY_ENV).is_some_and(|key| !key.is_empty())
}

/// Loads the transaction signer from the environment.
pub fn load_signer_from_env() -> Result<PrivateKeySigner> {
    let secret = std::env::var(PRIVATE_KEY_ENV)
        .with_suggestion(|| {
            format!(
                "Please set the signing key in the environment using the \
                 `{PRIVATE_KEY_ENV}` variable."
            )
        })
        .note(KEY_HELP_MSG)?;

    parse_signer(secret.trim())
}

/// Parses a hex private key or a mnemonic phrase.
pub fn parse_signer(secret: &str) -> Result<PrivateKeySigner> {
    if secret.contains(char::is_whitespace) {
        MnemonicBuilder::<English>::default()
            .phrase(secret)
            .index(0)
            .and_then(|builder| builder.build())
            .context("Creating a PrivateKeySigner from the mnemonic phrase")
            .note(KEY_HELP_MSG)
    } else {
        PrivateKeySigner::from_str(secret)
            .context("Parsing the hex string into a PrivateKeySigner")
            .note(KEY_HELP_MSG)
    }
}
