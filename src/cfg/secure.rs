// src/cfg/secure.rs

use secure_string::SecureString;
use serde::{Deserialize, Deserializer};

/// Deserializes an `Option<SecureString>` from YAML, treating a blank value
/// the same as an absent one.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<SecureString>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(non_blank(opt).map(SecureString::from))
}

/// Wrap a plain password, dropping blank values.
pub fn secure_opt(plain: Option<String>) -> Option<SecureString> {
    non_blank(plain).map(SecureString::from)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
