//! OAuth 2.0 engine wrapping the `oauth2` crate.
//!
//! The engine owns the client credentials and endpoints resolved from a [`StrategyConfig`] and
//! exposes the three primitives strategies build on: the authorization redirect URL, the
//! authorization-code exchange, and an authenticated GET.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet,
	EndpointSet, HttpClientError, RedirectUrl, RequestTokenError, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError},
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TokenExchangeError, TransportError},
	http::{OAuthHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::{self, AuthStage},
	provider::{AuthorizationParams, StrategyConfig},
	token::TokenGrant,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Boxed `Send` future returned by engine primitives.
pub type EngineFuture<'a, T, E = Error> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Engine specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestEngine = OAuth2Engine<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Maps HTTP transport failures into [`TransportError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport.
	fn map_transport_error(
		&self,
		stage: AuthStage,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> TransportError;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		stage: AuthStage,
		_metadata: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> TransportError {
		match err {
			HttpClientError::Reqwest(inner) => TransportError::from(*inner),
			HttpClientError::Http(inner) => TransportError::Request(inner),
			HttpClientError::Io(inner) => TransportError::Io(inner),
			HttpClientError::Other(message) => TransportError::Other { message },
			_ => TransportError::Other { message: format!("unclassified failure during {stage}") },
		}
	}
}

/// OAuth 2.0 client configured for a single provider.
pub struct OAuth2Engine<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	client_id: String,
	authorization_url: Url,
	callback_url: Option<Url>,
	scope: Option<String>,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> OAuth2Engine<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Resolves credentials and endpoints from `config`.
	///
	/// Client credentials travel in the token request body. No I/O happens here.
	pub fn from_config(
		config: &StrategyConfig,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		if config.client_id.is_empty() {
			return Err(ConfigError::MissingClientId.into());
		}

		let authorization_url = parse_url("authorizationURL", &config.authorization_url)?;
		let token_url = parse_url("tokenURL", &config.token_url)?;
		let callback_url = config
			.callback_url
			.as_deref()
			.map(|value| parse_url("callbackURL", value))
			.transpose()?;
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_auth_uri(AuthUrl::from_url(authorization_url.clone()))
			.set_token_uri(TokenUrl::from_url(token_url))
			.set_auth_type(AuthType::RequestBody);

		if !config.client_secret.is_empty() {
			oauth_client =
				oauth_client.set_client_secret(ClientSecret::new(config.client_secret.clone()));
		}
		if let Some(callback) = callback_url.as_ref() {
			oauth_client = oauth_client.set_redirect_uri(RedirectUrl::from_url(callback.clone()));
		}

		Ok(Self {
			oauth_client,
			client_id: config.client_id.clone(),
			authorization_url,
			callback_url,
			scope: config.formatted_scope(),
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
		})
	}

	/// Client identifier sent with every request.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Redirect target registered with the provider, if configured.
	pub fn callback_url(&self) -> Option<&Url> {
		self.callback_url.as_ref()
	}

	/// Builds the authorization redirect, appending strategy-specific `params` last.
	pub fn authorize_url(&self, params: &AuthorizationParams, state: &str) -> Url {
		let mut url = self.authorization_url.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.client_id);

		if let Some(callback) = self.callback_url.as_ref() {
			pairs.append_pair("redirect_uri", callback.as_str());
		}
		if let Some(scope) = self.scope.as_deref() {
			pairs.append_pair("scope", scope);
		}

		pairs.append_pair("state", state);

		for (key, value) in params {
			pairs.append_pair(key, value);
		}

		drop(pairs);

		url
	}

	/// Exchanges an authorization code for tokens.
	pub fn exchange_code<'a>(&'a self, code: &'a str) -> EngineFuture<'a, TokenGrant> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let handle = self.http_client.with_metadata(meta.clone());

			self.oauth_client
				.exchange_code(AuthorizationCode::new(code.to_owned()))
				.request_async(&handle)
				.await
				.map(|response| TokenGrant::from_response(&response))
				.map_err(|err| map_request_error(meta.take(), err, self.error_mapper.as_ref()))
		})
	}

	/// Issues an authenticated GET and returns the response body.
	///
	/// The token travels as a bearer `Authorization` header. Any status outside `2xx` is reported
	/// as [`TransportError::Status`] with the body attached.
	pub fn get<'a>(
		&'a self,
		url: &'a Url,
		access_token: &'a str,
	) -> EngineFuture<'a, String, TransportError> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let handle = self.http_client.with_metadata(meta.clone());
			let request = Request::builder()
				.method(Method::GET)
				.uri(url.as_str())
				.header(AUTHORIZATION, format!("Bearer {access_token}"))
				.header(ACCEPT, "application/json")
				.body(Vec::new())?;
			let response = handle.call(request).await.map_err(|err| {
				self.error_mapper.map_transport_error(
					AuthStage::UserProfile,
					meta.take().as_ref(),
					err,
				)
			})?;
			let status = response.status();
			let body = String::from_utf8_lossy(response.body()).into_owned();

			obs::log_stage_detail(AuthStage::UserProfile, status.as_str());

			if !status.is_success() {
				return Err(TransportError::Status { status: status.as_u16(), body });
			}

			Ok(body)
		})
	}
}
#[cfg(feature = "reqwest")]
impl OAuth2Engine<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an engine backed by a default reqwest client.
	pub fn new(config: &StrategyConfig) -> Result<Self> {
		Self::from_config(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Debug for OAuth2Engine<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Engine")
			.field("client_id", &self.client_id)
			.field("authorization_url", &self.authorization_url)
			.field("callback_url", &self.callback_url)
			.field("scope", &self.scope)
			.finish()
	}
}

/// Parses a configured endpoint, naming the offending option on failure.
pub(crate) fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|source| ConfigError::InvalidUrl { field, source })
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let status = meta.as_ref().and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => TokenExchangeError::OAuth {
			error: response.error().as_ref().to_owned(),
			description: response.error_description().cloned(),
			status,
		}
		.into(),
		RequestTokenError::Request(error) =>
			mapper.map_transport_error(AuthStage::TokenExchange, meta.as_ref(), error).into(),
		RequestTokenError::Parse(source, _body) => TokenExchangeError::Parse { source, status }.into(),
		RequestTokenError::Other(message) => TokenExchangeError::Unexpected { message, status }.into(),
	}
}
