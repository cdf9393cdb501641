//! Jive login strategy.
//!
//! Jive's profile endpoint (`/api/core/v3/people/@me` by default) prefixes its JSON with an
//! anti-hijacking line such as `throw 'allowIllegalResourceCall is false.';`, so the body is
//! cleaned up before parsing. The resulting object is mapped into a [`NormalizedProfile`] whose
//! `username` comes from the nested `jive.username` member.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	error::{ProfileFetchError, ProfileParseError},
	flows,
	http::OAuthHttpClient,
	oauth::{self, OAuth2Engine, TransportErrorMapper},
	obs::AuthStage,
	profile::NormalizedProfile,
	provider::{
		AuthorizationOptions, AuthorizationParams, OAuth2Strategy, ProfileFuture, StrategyConfig,
		Verify,
	},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Name the strategy registers under.
pub const STRATEGY_NAME: &str = "jive-oauth";
/// Provider label stamped on every profile.
pub const PROVIDER: &str = "jive";

/// Jive strategy specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestJiveStrategy<V> = JiveStrategy<V, ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticates users by delegating to Jive over OAuth 2.0.
///
/// The strategy resolves its endpoints once at construction and keeps no per-request state, so a
/// single instance can serve concurrent logins.
pub struct JiveStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: StrategyConfig,
	user_profile_url: Url,
	engine: OAuth2Engine<C, M>,
	verify: V,
}
impl<V, C, M> JiveStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Registration name.
	pub const NAME: &'static str = STRATEGY_NAME;

	/// Creates a strategy that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: StrategyConfig,
		verify: V,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let engine = OAuth2Engine::from_config(&config, http_client, mapper)?;
		let user_profile_url = oauth::parse_url("userProfileURL", &config.user_profile_url)?;

		Ok(Self { config, user_profile_url, engine, verify })
	}

	/// Configuration the strategy was built from.
	pub fn config(&self) -> &StrategyConfig {
		&self.config
	}

	/// Resolved profile endpoint.
	pub fn user_profile_url(&self) -> &Url {
		&self.user_profile_url
	}

	/// Fetches the profile owned by `access_token` and normalizes it.
	///
	/// Transport failures are wrapped into [`ProfileFetchError`]; cleanup or parse failures are
	/// returned as [`ProfileParseError`] without wrapping.
	pub async fn fetch_profile(&self, access_token: &str) -> Result<NormalizedProfile> {
		flows::run_stage(Self::NAME, AuthStage::UserProfile, async {
			let body = self
				.engine
				.get(&self.user_profile_url, access_token)
				.await
				.map_err(ProfileFetchError::new)?;
			let object = bogus_json_cleanup(&body)?;

			Ok(normalize_profile(body, object))
		})
		.await
	}
}
#[cfg(feature = "reqwest")]
impl<V> JiveStrategy<V, ReqwestHttpClient, ReqwestTransportErrorMapper>
where
	V: Verify,
{
	/// Creates a strategy backed by a default reqwest client.
	///
	/// Only configuration is resolved here; no request is sent.
	pub fn new(config: StrategyConfig, verify: V) -> Result<Self> {
		Self::with_http_client(
			config,
			verify,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<V, C, M> OAuth2Strategy for JiveStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	type Http = C;
	type Mapper = M;
	type Verifier = V;

	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn engine(&self) -> &OAuth2Engine<C, M> {
		&self.engine
	}

	fn verifier(&self) -> &V {
		&self.verify
	}

	fn authorization_params(&self, options: &AuthorizationOptions) -> AuthorizationParams {
		authorization_params(options)
	}

	fn user_profile<'a>(&'a self, access_token: &'a str) -> ProfileFuture<'a> {
		Box::pin(self.fetch_profile(access_token))
	}
}
impl<V, C, M> Debug for JiveStrategy<V, C, M>
where
	V: Verify,
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JiveStrategy")
			.field("config", &self.config)
			.field("user_profile_url", &self.user_profile_url.as_str())
			.finish()
	}
}

/// Strips everything before the first `{` and parses the rest as a JSON object.
///
/// The first `{` anywhere in the body is taken as the start of the object, so a prefix that
/// itself contains `{` yields a parse error or the wrong object.
pub fn bogus_json_cleanup(body: &str) -> Result<Map<String, Value>, ProfileParseError> {
	let start = body.find('{').ok_or(ProfileParseError::MissingObject)?;

	Ok(serde_json::from_str(&body[start..])?)
}

/// Maps a cleaned Jive person object into a [`NormalizedProfile`].
pub fn normalize_profile(raw_body: String, raw_object: Map<String, Value>) -> NormalizedProfile {
	let username = raw_object.get("jive").and_then(|jive| jive.get("username")).cloned();

	NormalizedProfile {
		provider: PROVIDER,
		id: raw_object.get("id").cloned(),
		display_name: raw_object.get("displayName").cloned(),
		username,
		emails: raw_object.get("emails").cloned(),
		raw_body,
		raw_object,
	}
}

/// Builds the extra authorization parameters for `options`.
///
/// Only options that are present and non-empty are emitted. `hosted_domain` wins over `hd`.
pub fn authorization_params(options: &AuthorizationOptions) -> AuthorizationParams {
	fn present(value: &Option<String>) -> Option<&str> {
		value.as_deref().filter(|value| !value.is_empty())
	}

	let domain = present(&options.hosted_domain).or_else(|| present(&options.hd));

	[
		("access_type", present(&options.access_type)),
		("approval_prompt", present(&options.approval_prompt)),
		("prompt", present(&options.prompt)),
		("login_hint", present(&options.login_hint)),
		("user_id", present(&options.user_id)),
		("hd", domain),
	]
	.into_iter()
	.filter_map(|(key, value)| Some((key.to_owned(), value?.to_owned())))
	.collect()
}
