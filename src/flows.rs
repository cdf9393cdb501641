//! Login flows shared by every [`OAuth2Strategy`].
//!
//! [`Authenticate`] is implemented for all strategies. It builds the authorization redirect
//! (merging the strategy's `authorization_params`), validates the provider callback, and runs
//! the code exchange, the profile fetch, and the verify callback in order. Each stage is wrapped
//! in a [`StageSpan`] and recorded through [`obs`].

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	error::CallbackError,
	obs::{self, AuthStage, StageOutcome, StageSpan},
	provider::{AuthorizationOptions, OAuth2Strategy, Verdict, Verify},
};

const STATE_LEN: usize = 32;

/// Boxed `Send` future returned by [`Authenticate::authenticate`].
pub type AuthFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Authorization redirect plus the state value that must round-trip through the callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Provider URL the user agent should be redirected to.
	pub url: Url,
	/// Opaque random state embedded in [`url`](Self::url).
	pub state: String,
}
impl AuthorizationRequest {
	/// Checks the `state` returned by the provider.
	pub fn validate_state(&self, returned_state: Option<&str>) -> Result<(), CallbackError> {
		match returned_state {
			Some(state) if state == self.state => Ok(()),
			_ => Err(CallbackError::StateMismatch),
		}
	}
}

/// Query parameters the provider appends to the callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackParams {
	/// Authorization code.
	pub code: Option<String>,
	/// State echoed back by the provider.
	pub state: Option<String>,
	/// OAuth error code.
	pub error: Option<String>,
	/// OAuth error description.
	pub error_description: Option<String>,
	/// OAuth error URI.
	pub error_uri: Option<String>,
}
impl CallbackParams {
	/// Reads the callback parameters from the query string of `url`.
	pub fn from_url(url: &Url) -> Self {
		let mut params = Self::default();

		for (key, value) in url.query_pairs() {
			let slot = match key.as_ref() {
				"code" => &mut params.code,
				"state" => &mut params.state,
				"error" => &mut params.error,
				"error_description" => &mut params.error_description,
				"error_uri" => &mut params.error_uri,
				_ => continue,
			};

			*slot = Some(value.into_owned());
		}

		params
	}
}

/// Login flows available on every [`OAuth2Strategy`].
pub trait Authenticate: OAuth2Strategy {
	/// Builds the authorization redirect with a fresh random state.
	fn authorization_request(&self, options: &AuthorizationOptions) -> AuthorizationRequest {
		let stage = AuthStage::AuthorizationRequest;

		StageSpan::new(stage, self.name()).in_scope(|| {
			let state = random_state();
			let params = self.authorization_params(options);
			let url = self.engine().authorize_url(&params, &state);

			obs::record_stage_outcome(stage, StageOutcome::Success);
			obs::log_stage_detail(stage, url.path());

			AuthorizationRequest { url, state }
		})
	}

	/// Exchanges `code`, fetches the profile, and hands both to the verify callback.
	fn authenticate<'a>(
		&'a self,
		code: &'a str,
	) -> AuthFuture<'a, Verdict<<Self::Verifier as Verify>::User>> {
		Box::pin(async move {
			let tokens =
				run_stage(self.name(), AuthStage::TokenExchange, self.engine().exchange_code(code))
					.await?;
			let profile = self.user_profile(tokens.access_token.expose()).await?;

			run_stage(self.name(), AuthStage::Verify, async {
				self.verifier().verify(tokens, profile).await.map_err(Error::verify)
			})
			.await
		})
	}

	/// Completes a login from the provider callback.
	///
	/// The returned state must match `pending`. An `access_denied` error becomes a rejection;
	/// any other provider error fails the attempt.
	fn complete<'a>(
		&'a self,
		pending: &'a AuthorizationRequest,
		callback: &'a CallbackParams,
	) -> AuthFuture<'a, Verdict<<Self::Verifier as Verify>::User>> {
		Box::pin(async move {
			if let Some(error) = callback.error.as_deref() {
				if error == "access_denied" {
					return Ok(Verdict::Rejected {
						info: callback.error_description.clone().or_else(|| Some(error.to_owned())),
					});
				}

				return Err(CallbackError::Provider {
					error: error.to_owned(),
					description: callback.error_description.clone(),
					uri: callback.error_uri.clone(),
				}
				.into());
			}

			pending.validate_state(callback.state.as_deref())?;

			let code = callback.code.as_deref().ok_or(CallbackError::MissingCode)?;

			self.authenticate(code).await
		})
	}
}
impl<S> Authenticate for S where S: ?Sized + OAuth2Strategy {}

/// Runs one stage inside its span, recording attempt and outcome.
pub(crate) async fn run_stage<T, F>(strategy: &'static str, stage: AuthStage, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	let span = StageSpan::new(stage, strategy);

	obs::record_stage_outcome(stage, StageOutcome::Attempt);

	let result = span.instrument(fut).await;

	obs::record_stage_outcome(stage, StageOutcome::of(&result));

	if let Err(err) = &result {
		obs::log_stage_failure(stage, err);
	}

	result
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
