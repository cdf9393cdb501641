//! Tokens issued by the authorization-code exchange.

// std
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{TokenResponse, basic::BasicTokenResponse};
// self
use crate::_prelude::*;

/// Token string wrapper that keeps the secret out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(<redacted>)")
	}
}

/// Tokens handed to the verify callback after a successful exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGrant {
	/// Bearer token used for the profile request.
	pub access_token: TokenSecret,
	/// Refresh token, when the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (normally `bearer`).
	pub token_type: String,
	/// Lifetime reported by the provider.
	pub expires_in: Option<StdDuration>,
	/// Scopes echoed back by the provider.
	pub scope: Option<Vec<String>>,
}
impl TokenGrant {
	/// Creates a grant carrying only an access token.
	pub fn bearer(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			token_type: "bearer".into(),
			expires_in: None,
			scope: None,
		}
	}

	pub(crate) fn from_response(response: &BasicTokenResponse) -> Self {
		Self {
			access_token: TokenSecret::new(response.access_token().secret().to_owned()),
			refresh_token: response
				.refresh_token()
				.map(|token| TokenSecret::new(token.secret().to_owned())),
			token_type: response.token_type().as_ref().to_owned(),
			expires_in: response.expires_in(),
			scope: response
				.scopes()
				.map(|scopes| scopes.iter().map(|scope| (**scope).clone()).collect()),
		}
	}
}
