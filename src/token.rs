//! Read-only inspection of bearer token claims
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde_json::Value;

use crate::error::TokenError;

/// Roles every realm user gets; they say nothing about what the user can see.
const DEFAULT_REALM_ROLES: &[&str] = &["offline_access", "uma_authorization"];

/// Decode the claims of a JWT without checking its signature or expiry.
///
/// The token is only ever displayed locally; the service that issued it is the
/// one that validates it.
pub fn claims(token: &str) -> Result<Value, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let header = decode_header(token)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    // Key material is never consulted with signature validation off
    let key = DecodingKey::from_secret(&[]);

    Ok(decode::<Value>(token, &key, &validation)?.claims)
}

/// Human readable name from the claims, `name` first then `preferred_username`.
pub fn display_name(claims: &Value) -> Option<&str> {
    claims
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| claims.get("preferred_username").and_then(Value::as_str))
}

/// Realm roles granted to the token holder, minus the defaults every user has.
pub fn realm_roles(claims: &Value) -> Vec<String> {
    claims
        .pointer("/realm_access/roles")
        .and_then(Value::as_array)
        .map(|roles| {
            roles
                .iter()
                .filter_map(Value::as_str)
                .filter(|role| !DEFAULT_REALM_ROLES.contains(role))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
