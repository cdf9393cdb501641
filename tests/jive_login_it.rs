#![cfg(feature = "reqwest")]

mod common;

// std
use std::{collections::HashMap, error::Error as StdError, time::Duration as StdDuration};
// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use common::*;
use jive_oauth2::{
	error::{BoxError, CallbackError, Error, TokenExchangeError},
	flows::{Authenticate, CallbackParams},
	profile::NormalizedProfile,
	provider::{AuthorizationOptions, OAuth2Strategy, StrategyConfig, Verdict},
	token::TokenGrant,
};

const TOKEN_BODY: &str = "{\"access_token\":\"access-success\",\"refresh_token\":\"refresh-success\",\"token_type\":\"bearer\",\"expires_in\":3600}";
const PROFILE_BODY: &str = "throw 'allowIllegalResourceCall is false.';\n{\"id\":\"2001\",\"displayName\":\"Ann Example\",\"jive\":{\"username\":\"ann1\"}}";

fn config(server: &MockServer) -> StrategyConfig {
	test_strategy_config(&server.base_url())
}

async fn mock_token_success(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "authorization_code")
				.form_urlencoded_tuple("code", "valid-code")
				.form_urlencoded_tuple("client_id", "jive-client")
				.form_urlencoded_tuple("client_secret", "jive-secret")
				.form_urlencoded_tuple("redirect_uri", "https://app.example.com/auth/jive/callback");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await
}

async fn mock_profile_success(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/core/v3/people/@me")
				.header("authorization", "Bearer access-success");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await
}

#[tokio::test]
async fn authorization_request_carries_client_state_and_options() {
	let server = MockServer::start_async().await;
	let strategy = build_reqwest_test_strategy(
		config(&server),
		|_tokens: TokenGrant, _profile: NormalizedProfile| async move {
			Ok::<_, BoxError>(Verdict::<()>::rejected())
		},
	);
	let options = AuthorizationOptions {
		access_type: Some("offline".into()),
		hosted_domain: Some("example.com".into()),
		hd: Some("ignored.com".into()),
		..Default::default()
	};
	let request = strategy.authorization_request(&options);

	assert_eq!(request.state.len(), 32);
	assert!(request.validate_state(Some(request.state.as_str())).is_ok());
	assert_eq!(request.url.path(), "/oauth2/authorize");

	let pairs: HashMap<_, _> = request.url.query_pairs().into_owned().collect();

	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("client_id"), Some(&"jive-client".into()));
	assert_eq!(
		pairs.get("redirect_uri"),
		Some(&"https://app.example.com/auth/jive/callback".into())
	);
	assert_eq!(pairs.get("state"), Some(&request.state));
	assert_eq!(pairs.get("access_type"), Some(&"offline".into()));
	assert_eq!(pairs.get("hd"), Some(&"example.com".into()));
	assert!(!pairs.contains_key("scope"));
	assert!(!pairs.contains_key("prompt"));

	let second = strategy.authorization_request(&AuthorizationOptions::default());

	assert_ne!(second.state, request.state);
}

#[tokio::test]
async fn authenticate_exchanges_code_and_verifies_profile() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token_success(&server).await;
	let profile_mock = mock_profile_success(&server).await;
	let strategy = build_reqwest_test_strategy(
		config(&server),
		|tokens: TokenGrant, profile: NormalizedProfile| async move {
			assert_eq!(tokens.access_token.expose(), "access-success");
			assert_eq!(
				tokens.refresh_token.as_ref().map(|secret| secret.expose()),
				Some("refresh-success")
			);
			assert_eq!(tokens.expires_in, Some(StdDuration::from_secs(3600)));

			let username = profile.username_str().unwrap_or_default().to_owned();

			Ok::<_, BoxError>(Verdict::Success(format!("{}:{username}", profile.provider)))
		},
	);
	let verdict =
		strategy.authenticate("valid-code").await.expect("Authentication should succeed.");

	token_mock.assert_async().await;
	profile_mock.assert_async().await;

	assert_eq!(verdict, Verdict::Success("jive:ann1".to_owned()));
}

#[tokio::test]
async fn verify_rejection_is_not_an_error() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token_success(&server).await;
	let _profile_mock = mock_profile_success(&server).await;
	let strategy = build_reqwest_test_strategy(
		config(&server),
		|_tokens: TokenGrant, _profile: NormalizedProfile| async move {
			Ok::<_, BoxError>(Verdict::<String>::Rejected { info: Some("unknown user".into()) })
		},
	);
	let verdict =
		strategy.authenticate("valid-code").await.expect("Rejections should not be errors.");

	assert_eq!(verdict, Verdict::Rejected { info: Some("unknown user".into()) });
	assert_eq!(verdict.into_user(), None);
}

#[tokio::test]
async fn verify_failure_is_reported_as_verify_error() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token_success(&server).await;
	let _profile_mock = mock_profile_success(&server).await;
	let strategy = build_reqwest_test_strategy(
		config(&server),
		|_tokens: TokenGrant, _profile: NormalizedProfile| async move {
			Err::<Verdict<String>, BoxError>("account store offline".into())
		},
	);
	let err = strategy.authenticate("valid-code").await.expect_err("Verify failures must surface.");

	assert!(matches!(err, Error::Verify { .. }));
	assert_eq!(
		err.source().map(|source| source.to_string()),
		Some("account store offline".to_owned())
	);
}

#[tokio::test]
async fn token_endpoint_errors_skip_the_profile_fetch() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"already used\"}");
		})
		.await;
	let profile_mock = mock_profile_success(&server).await;
	let strategy = build_reqwest_test_strategy(
		config(&server),
		|_tokens: TokenGrant, _profile: NormalizedProfile| async move {
			Ok::<_, BoxError>(Verdict::Success(()))
		},
	);
	let err = strategy.authenticate("stale-code").await.expect_err("Invalid grants must fail.");

	token_mock.assert_async().await;

	assert_eq!(profile_mock.hits_async().await, 0);

	match err {
		Error::TokenExchange(TokenExchangeError::OAuth { error, description, status }) => {
			assert_eq!(error, "invalid_grant");
			assert_eq!(description.as_deref(), Some("already used"));
			assert_eq!(status, Some(400));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn complete_validates_callback_before_exchanging() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token_success(&server).await;
	let _profile_mock = mock_profile_success(&server).await;
	let strategy = build_reqwest_test_strategy(
		config(&server),
		|_tokens: TokenGrant, profile: NormalizedProfile| async move {
			Ok::<_, BoxError>(Verdict::Success(profile.id_str().unwrap_or_default().to_owned()))
		},
	);
	let pending = strategy.authorization_request(&AuthorizationOptions::default());
	let forged = CallbackParams {
		code: Some("valid-code".into()),
		state: Some("forged".into()),
		..Default::default()
	};
	let err = strategy.complete(&pending, &forged).await.expect_err("Forged state must fail.");

	assert!(matches!(err, Error::Callback(CallbackError::StateMismatch)));
	assert_eq!(token_mock.hits_async().await, 0);

	let denied = CallbackParams {
		error: Some("access_denied".into()),
		error_description: Some("User declined.".into()),
		state: Some(pending.state.clone()),
		..Default::default()
	};
	let verdict =
		strategy.complete(&pending, &denied).await.expect("Denials should become rejections.");

	assert_eq!(verdict, Verdict::Rejected { info: Some("User declined.".into()) });

	let callback_url = Url::parse(&format!(
		"https://app.example.com/auth/jive/callback?code=valid-code&state={}",
		pending.state
	))
	.expect("Callback URL should parse.");
	let verdict = strategy
		.complete(&pending, &CallbackParams::from_url(&callback_url))
		.await
		.expect("Valid callbacks should authenticate.");

	token_mock.assert_async().await;

	assert_eq!(verdict, Verdict::Success("2001".to_owned()));
}

#[tokio::test]
async fn provider_callback_errors_fail_the_attempt() {
	let server = MockServer::start_async().await;
	let strategy = build_reqwest_test_strategy(
		config(&server),
		|_tokens: TokenGrant, _profile: NormalizedProfile| async move {
			Ok::<_, BoxError>(Verdict::Success(()))
		},
	);
	let pending = strategy.authorization_request(&AuthorizationOptions::default());
	let callback = CallbackParams {
		error: Some("server_error".into()),
		error_description: Some("Upstream unavailable.".into()),
		..Default::default()
	};
	let err = strategy.complete(&pending, &callback).await.expect_err("Provider errors must fail.");

	match err {
		Error::Callback(CallbackError::Provider { error, description, uri }) => {
			assert_eq!(error, "server_error");
			assert_eq!(description.as_deref(), Some("Upstream unavailable."));
			assert_eq!(uri, None);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	let missing = CallbackParams { state: Some(pending.state.clone()), ..Default::default() };
	let err = strategy.complete(&pending, &missing).await.expect_err("A code is required.");

	assert!(matches!(err, Error::Callback(CallbackError::MissingCode)));
	assert_eq!(strategy.name(), "jive-oauth");
}
