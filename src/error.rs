//! Strategy-level error types shared by the engine, the Jive strategy, and flows.
//!
//! Profile failures come in two deliberately distinct shapes: transport problems are wrapped
//! into [`ProfileFetchError`] with a fixed message, while body parsing problems surface as
//! [`ProfileParseError`] untouched.

// self
use crate::_prelude::*;

/// Strategy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used for transport and verify callback sources.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure while talking to the token endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint rejected or garbled the authorization-code exchange.
	#[error(transparent)]
	TokenExchange(#[from] TokenExchangeError),
	/// Profile endpoint could not be reached or answered with an error status.
	#[error(transparent)]
	ProfileFetch(#[from] ProfileFetchError),
	/// Profile body could not be cleaned up into a JSON object.
	#[error(transparent)]
	ProfileParse(#[from] ProfileParseError),
	/// Provider callback could not be accepted.
	#[error(transparent)]
	Callback(#[from] CallbackError),

	/// Verify callback failed while resolving the user.
	#[error("Verify callback failed.")]
	Verify {
		/// Error reported by the callback.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a verify callback failure.
	pub fn verify(src: impl Into<BoxError>) -> Self {
		Self::Verify { source: src.into() }
	}
}

/// Configuration and validation failures raised while building the engine.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured endpoint is not a valid URL.
	#[error("The {field} option is not a valid URL.")]
	InvalidUrl {
		/// Option name as exposed on the configuration surface.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The client identifier is empty.
	#[error("OAuth 2.0 strategies require a clientID option.")]
	MissingClientId,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures reported by the engine's HTTP primitives.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// HTTP request could not be assembled.
	#[error("HTTP request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// Provider answered with a non-success status code.
	#[error("Provider responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, kept for diagnostics.
		body: String,
	},
	/// Transport reported a failure without a structured error.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// HTTP status attached to the failure, when the provider answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures returned by the token endpoint during the authorization-code exchange.
#[derive(Debug, ThisError)]
pub enum TokenExchangeError {
	/// Provider returned a standard OAuth error payload.
	#[error("Token endpoint returned an OAuth error: {error}.")]
	OAuth {
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, when supplied.
		description: Option<String>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint returned something the OAuth client could not classify.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport failure while fetching the user profile.
///
/// The display message is always [`ProfileFetchError::MESSAGE`]; the transport error is kept as
/// the source.
#[derive(Debug, ThisError)]
#[error("failed to fetch user profile")]
pub struct ProfileFetchError {
	/// Transport error reported by the engine.
	#[source]
	pub source: TransportError,
}
impl ProfileFetchError {
	/// Fixed human-readable message.
	pub const MESSAGE: &'static str = "failed to fetch user profile";

	/// Wraps a transport error.
	pub fn new(source: TransportError) -> Self {
		Self { source }
	}
}

/// Failures raised while cleaning up and parsing a profile body.
#[derive(Debug, ThisError)]
pub enum ProfileParseError {
	/// The body contains no `{`, so there is no object to parse.
	#[error("Profile body does not contain a JSON object.")]
	MissingObject,
	/// The substring starting at the first `{` is not a valid JSON object.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// Problems with the query parameters the provider sent back to the callback URL.
#[derive(Debug, ThisError)]
pub enum CallbackError {
	/// Returned `state` does not match the pending authorization request.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Callback carries neither a code nor an error.
	#[error("Callback is missing the authorization code.")]
	MissingCode,
	/// Provider reported an error other than `access_denied`.
	#[error("Provider returned an authorization error: {error}.")]
	Provider {
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, when supplied.
		description: Option<String>,
		/// OAuth `error_uri`, when supplied.
		uri: Option<String>,
	},
}
