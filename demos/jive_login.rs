//! Walks through a full Jive login against a local mock server: build the redirect, accept the
//! callback, exchange the code, and normalize the prefixed profile body.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use jive_oauth2::{
	error::BoxError,
	flows::{Authenticate, CallbackParams},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	profile::NormalizedProfile,
	provider::{AuthorizationOptions, ReqwestJiveStrategy, StrategyConfig, Verdict},
	reqwest::Client,
	token::TokenGrant,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/core/v3/people/@me");
			then.status(200).header("content-type", "application/json").body(
				"throw 'allowIllegalResourceCall is false.';\n{\"id\":\"2001\",\"displayName\":\"Ann Example\",\"jive\":{\"username\":\"ann1\"}}",
			);
		})
		.await;
	let config = StrategyConfig::builder("demo-client", "demo-secret")
		.callback_url("https://app.example.com/auth/jive/callback")
		.authorization_url(server.url("/oauth2/authorize"))
		.token_url(server.url("/oauth2/token"))
		.user_profile_url(server.url("/api/core/v3/people/@me"))
		.build();
	let http_client = ReqwestHttpClient::with_client(Client::builder().build()?);
	let strategy = ReqwestJiveStrategy::with_http_client(
		config,
		|_tokens: TokenGrant, profile: NormalizedProfile| async move {
			let username = profile.username_str().ok_or("Jive profile has no username.")?;

			Ok::<_, BoxError>(Verdict::Success(username.to_owned()))
		},
		http_client,
		ReqwestTransportErrorMapper,
	)?;
	let options = AuthorizationOptions { access_type: Some("offline".into()), ..Default::default() };
	let pending = strategy.authorization_request(&options);

	println!("Redirect the user agent to: {}.", pending.url);

	let callback = Url::parse(&format!(
		"https://app.example.com/auth/jive/callback?code=demo-code&state={}",
		pending.state
	))?;
	let verdict = strategy.complete(&pending, &CallbackParams::from_url(&callback)).await?;

	match verdict {
		Verdict::Success(username) => println!("Signed in as {username}."),
		Verdict::Rejected { info } => println!("Login rejected: {info:?}."),
	}

	token_mock.assert_async().await;
	profile_mock.assert_async().await;

	Ok(())
}
