// self
use crate::{_prelude::*, obs::AuthStage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// A span covering one stage of a strategy's login.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the stage and the strategy name.
	pub fn new(stage: AuthStage, strategy: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("jive_oauth2.stage", stage = stage.as_str(), strategy);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, strategy);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}
}

/// Emits a warn event describing a failed stage.
pub fn log_stage_failure(stage: AuthStage, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(stage = stage.as_str(), error = %err, "Strategy stage failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, err);
	}
}

/// Emits a debug event with a short description of a completed stage.
pub fn log_stage_detail(stage: AuthStage, detail: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(stage = stage.as_str(), detail, "Strategy stage completed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, detail);
	}
}
