//! # Flowtty Engine
//!
//! Drives the simulated flow execution pipeline: a fixed four-stage catalog
//! walked on a timed schedule, with keyword-triggered failure injection and
//! synthesis of the terminal result envelope. Everything here is local
//! simulation; there is no backend call behind any stage.
//!
//! ## Architecture
//!
//! - **`run::runner`**: the asynchronous driver. One owned tokio task per
//!   run, streaming [`flowtty_types::flow::FlowRunEvent`]s over an unbounded
//!   channel. Superseding a run means aborting its handle.
//! - **`run::details`**: the [`StageDetailSource`] trait supplying synthetic
//!   stage details and the injected failure index, with a seedable sampled
//!   implementation.
//! - **`run::output`**: assembly of the [`flowtty_types::flow::ExecutionOutput`]
//!   envelope for both terminal paths.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use flowtty_engine::{RunTiming, SampledDetailSource, spawn_flow_run, validate_payload};
//! use flowtty_types::flow::{FlowRunEvent, FlowRunRequest};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let request = FlowRunRequest {
//!     deployment: Default::default(),
//!     payload: "hello world".into(),
//! };
//! validate_payload(&request.payload)?;
//!
//! let mut handle = spawn_flow_run(request, Arc::new(SampledDetailSource::new()), RunTiming::demo());
//! while let Some(event) = handle.events.recv().await {
//!     if let FlowRunEvent::RunCompleted { output } = event {
//!         println!("{}", output.to_pretty_json()?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod run;

pub use run::details::{SampledDetailSource, StageDetailSource};
pub use run::output::{STAGE_ERROR_DETAILS, error_envelope, success_envelope};
pub use run::runner::{FlowRunHandle, RunTiming, drive_flow_run, spawn_flow_run};
pub use run::{ERROR_TRIGGER_KEYWORD, ValidationError, payload_triggers_error, validate_payload};
