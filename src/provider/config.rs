//! Construction-time strategy configuration with named defaults.

// self
use crate::_prelude::*;

/// Authorization endpoint used when `authorizationURL` is omitted.
pub const DEFAULT_AUTHORIZATION_URL: &str = "http://localhost:8080/oauth2/authorize";
/// Token endpoint used when `tokenURL` is omitted.
pub const DEFAULT_TOKEN_URL: &str = "http://localhost:8080/oauth2/token";
/// Profile endpoint used when `userProfileURL` is omitted.
pub const DEFAULT_USER_PROFILE_URL: &str = "http://localhost:8080/api/core/v3/people/@me";

/// Immutable strategy configuration.
///
/// Deserializes from the public option names (`clientID`, `callbackURL`, ...) or their
/// snake_case spellings. Endpoints stay as strings until the engine validates them, so a
/// configuration can always be built without failing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
	/// Provider-issued client identifier.
	#[serde(rename = "clientID", alias = "client_id")]
	pub client_id: String,
	/// Provider-issued client secret; empty for public clients.
	#[serde(rename = "clientSecret", alias = "client_secret", default)]
	pub client_secret: String,
	/// Redirect target after consent.
	#[serde(
		rename = "callbackURL",
		alias = "callback_url",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub callback_url: Option<String>,
	/// Authorization endpoint.
	#[serde(
		rename = "authorizationURL",
		alias = "authorization_url",
		default = "default_authorization_url"
	)]
	pub authorization_url: String,
	/// Token endpoint.
	#[serde(rename = "tokenURL", alias = "token_url", default = "default_token_url")]
	pub token_url: String,
	/// Endpoint returning the authenticated user's profile.
	#[serde(
		rename = "userProfileURL",
		alias = "user_profile_url",
		default = "default_user_profile_url"
	)]
	pub user_profile_url: String,
	/// Scopes requested during authorization.
	#[serde(default)]
	pub scope: Vec<String>,
	/// Character joining [`scope`](Self::scope) values in the authorization redirect.
	#[serde(rename = "scopeSeparator", alias = "scope_separator", default = "default_scope_separator")]
	pub scope_separator: char,
}
impl StrategyConfig {
	/// Creates a configuration with every optional field at its default.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self::builder(client_id, client_secret).build()
	}

	/// Creates a builder seeded with the client credentials.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> StrategyConfigBuilder {
		StrategyConfigBuilder::new(client_id, client_secret)
	}

	/// Joins the configured scopes, or returns `None` when no scope was requested.
	pub fn formatted_scope(&self) -> Option<String> {
		if self.scope.is_empty() {
			return None;
		}

		let mut buf = String::new();

		for (idx, value) in self.scope.iter().enumerate() {
			if idx > 0 {
				buf.push(self.scope_separator);
			}

			buf.push_str(value);
		}

		Some(buf)
	}
}
impl Debug for StrategyConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StrategyConfig")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("callback_url", &self.callback_url)
			.field("authorization_url", &self.authorization_url)
			.field("token_url", &self.token_url)
			.field("user_profile_url", &self.user_profile_url)
			.field("scope", &self.scope)
			.finish()
	}
}

/// Builder for [`StrategyConfig`] values.
#[derive(Debug)]
pub struct StrategyConfigBuilder {
	client_id: String,
	client_secret: String,
	callback_url: Option<String>,
	authorization_url: Option<String>,
	token_url: Option<String>,
	user_profile_url: Option<String>,
	scope: Vec<String>,
	scope_separator: Option<char>,
}
impl StrategyConfigBuilder {
	/// Creates a new builder seeded with the client credentials.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			callback_url: None,
			authorization_url: None,
			token_url: None,
			user_profile_url: None,
			scope: Vec::new(),
			scope_separator: None,
		}
	}

	/// Sets the callback URL.
	pub fn callback_url(mut self, url: impl Into<String>) -> Self {
		self.callback_url = Some(url.into());

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
		self.authorization_url = Some(url.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Overrides the profile endpoint.
	pub fn user_profile_url(mut self, url: impl Into<String>) -> Self {
		self.user_profile_url = Some(url.into());

		self
	}

	/// Replaces the requested scopes.
	pub fn scope<I, S>(mut self, scope: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope = scope.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the scope separator.
	pub fn scope_separator(mut self, separator: char) -> Self {
		self.scope_separator = Some(separator);

		self
	}

	/// Consumes the builder, filling every omitted field with its default.
	pub fn build(self) -> StrategyConfig {
		StrategyConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			callback_url: self.callback_url,
			authorization_url: self.authorization_url.unwrap_or_else(default_authorization_url),
			token_url: self.token_url.unwrap_or_else(default_token_url),
			user_profile_url: self.user_profile_url.unwrap_or_else(default_user_profile_url),
			scope: self.scope,
			scope_separator: self.scope_separator.unwrap_or_else(default_scope_separator),
		}
	}
}

fn default_authorization_url() -> String {
	DEFAULT_AUTHORIZATION_URL.into()
}

fn default_token_url() -> String {
	DEFAULT_TOKEN_URL.into()
}

fn default_user_profile_url() -> String {
	DEFAULT_USER_PROFILE_URL.into()
}

fn default_scope_separator() -> char {
	' '
}
