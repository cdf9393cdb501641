//! Strategy capability implemented by providers and the verify hook supplied by applications.
//!
//! A provider composes an [`OAuth2Engine`] with its own `authorization_params` and
//! `user_profile` hooks. The generic login flows in [`crate::flows`] drive any implementor.

// self
use crate::{
	_prelude::*,
	error::BoxError,
	http::OAuthHttpClient,
	oauth::{OAuth2Engine, TransportErrorMapper},
	profile::NormalizedProfile,
	token::TokenGrant,
};

/// Extra query parameters merged into the authorization redirect.
pub type AuthorizationParams = BTreeMap<String, String>;

/// Boxed future resolving to a normalized profile.
pub type ProfileFuture<'a> = Pin<Box<dyn Future<Output = Result<NormalizedProfile>> + 'a + Send>>;

/// Boxed future returned by [`Verify::verify`].
pub type VerifyFuture<'a, U> =
	Pin<Box<dyn Future<Output = Result<Verdict<U>, BoxError>> + 'a + Send>>;

/// Options recognized while building the authorization redirect.
///
/// Every option is optional; empty strings count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizationOptions {
	/// Requested access type (for example `offline`).
	pub access_type: Option<String>,
	/// Approval prompt behavior (for example `force`).
	pub approval_prompt: Option<String>,
	/// Prompt behavior (for example `consent`).
	pub prompt: Option<String>,
	/// Login hint shown on the consent page.
	pub login_hint: Option<String>,
	/// Upstream user identifier hint.
	#[serde(rename = "userID", alias = "user_id")]
	pub user_id: Option<String>,
	/// Hosted domain restriction; takes precedence over [`hd`](Self::hd).
	pub hosted_domain: Option<String>,
	/// Short alias for [`hosted_domain`](Self::hosted_domain).
	pub hd: Option<String>,
}

/// Result of a verify callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict<U> {
	/// The profile maps to an application user.
	Success(U),
	/// Credentials were understood but the application refuses the user.
	Rejected {
		/// Optional message for the host framework.
		info: Option<String>,
	},
}
impl<U> Verdict<U> {
	/// Rejects the user without additional information.
	pub fn rejected() -> Self {
		Self::Rejected { info: None }
	}

	/// Returns the user on success.
	pub fn into_user(self) -> Option<U> {
		match self {
			Self::Success(user) => Some(user),
			Self::Rejected { .. } => None,
		}
	}
}

/// Application hook resolving tokens and a profile into a user.
///
/// Implemented for every `Fn(TokenGrant, NormalizedProfile) -> impl Future` returning
/// `Result<Verdict<U>, BoxError>`.
pub trait Verify: Send + Sync {
	/// Application user type.
	type User: Send;

	/// Resolves the authenticated principal.
	fn verify(&self, tokens: TokenGrant, profile: NormalizedProfile) -> VerifyFuture<'_, Self::User>;
}
impl<F, Fut, U> Verify for F
where
	F: Send + Sync + Fn(TokenGrant, NormalizedProfile) -> Fut,
	U: Send,
	Fut: 'static + Send + Future<Output = Result<Verdict<U>, BoxError>>,
{
	type User = U;

	fn verify(&self, tokens: TokenGrant, profile: NormalizedProfile) -> VerifyFuture<'_, U> {
		Box::pin((self)(tokens, profile))
	}
}

/// Capability every provider strategy supplies on top of the shared engine.
pub trait OAuth2Strategy: Send + Sync {
	/// HTTP transport used by the engine.
	type Http: ?Sized + OAuthHttpClient;
	/// Mapper applied to the transport's errors.
	type Mapper: ?Sized + TransportErrorMapper<<Self::Http as OAuthHttpClient>::TransportError>;
	/// Verify callback invoked once a profile is available.
	type Verifier: ?Sized + Verify;

	/// Registration name of the strategy.
	fn name(&self) -> &'static str;

	/// Engine configured with the provider's endpoints and credentials.
	fn engine(&self) -> &OAuth2Engine<Self::Http, Self::Mapper>;

	/// Verify callback supplied at construction.
	fn verifier(&self) -> &Self::Verifier;

	/// Provider-specific query parameters for the authorization redirect.
	///
	/// The default implementation adds nothing.
	fn authorization_params(&self, _options: &AuthorizationOptions) -> AuthorizationParams {
		AuthorizationParams::new()
	}

	/// Fetches and normalizes the profile of the user owning `access_token`.
	fn user_profile<'a>(&'a self, access_token: &'a str) -> ProfileFuture<'a>;
}
