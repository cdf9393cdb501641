//! Helpers shared by the reqwest-backed integration tests.

// self
use jive_oauth2::{
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{JiveStrategy, ReqwestJiveStrategy, StrategyConfig, Verify},
	reqwest::Client,
};

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Points every endpoint of a test configuration at `base_url` (typically a mock server).
pub fn test_strategy_config(base_url: &str) -> StrategyConfig {
	let base_url = base_url.trim_end_matches('/');

	StrategyConfig::builder("jive-client", "jive-secret")
		.callback_url("https://app.example.com/auth/jive/callback")
		.authorization_url(format!("{base_url}/oauth2/authorize"))
		.token_url(format!("{base_url}/oauth2/token"))
		.user_profile_url(format!("{base_url}/api/core/v3/people/@me"))
		.build()
}

/// Constructs a Jive strategy on the insecure test transport.
pub fn build_reqwest_test_strategy<V>(config: StrategyConfig, verify: V) -> ReqwestJiveStrategy<V>
where
	V: Verify,
{
	JiveStrategy::with_http_client(
		config,
		verify,
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
	.expect("Test strategy configuration should be valid.")
}
