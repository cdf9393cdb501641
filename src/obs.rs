//! Optional observability helpers for strategy stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit spans named `jive_oauth2.stage` with the `stage` and
//!   `strategy` fields, plus debug/warn events for stage outcomes.
//! - Enable `metrics` to increment the `jive_oauth2_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Stages of a login handled by a strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthStage {
	/// Building the authorization redirect.
	AuthorizationRequest,
	/// Exchanging the authorization code at the token endpoint.
	TokenExchange,
	/// Fetching and normalizing the user profile.
	UserProfile,
	/// Running the verify callback.
	Verify,
}
impl AuthStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthStage::AuthorizationRequest => "authorization_request",
			AuthStage::TokenExchange => "token_exchange",
			AuthStage::UserProfile => "user_profile",
			AuthStage::Verify => "verify",
		}
	}
}
impl Display for AuthStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}

	/// Maps a stage result onto its terminal outcome.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => StageOutcome::Success,
			Err(_) => StageOutcome::Failure,
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
