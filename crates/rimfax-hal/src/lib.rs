//! Rimfax backend abstraction layer.
//!
//! Provides a unified interface for executing compiled circuits on
//! quantum backends, local simulators included:
//! - A common [`Backend`] trait for job submission and management
//! - [`Capabilities`] to describe what each backend accepts
//! - Unified result handling via [`ExecutionResult`] and [`Counts`]
//! - A [`BackendRegistry`] for probe-based backend discovery
//!
//! # Example: Implementing a Backend
//!
//! ```ignore
//! use rimfax_hal::{
//!     Backend, BackendAvailability, Capabilities, ValidationResult,
//!     JobId, JobStatus, ExecutionResult, HalResult,
//! };
//! use rimfax_ir::CompiledCircuit;
//! use async_trait::async_trait;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     // Sync, infallible — capabilities cached at construction.
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     async fn availability(&self) -> HalResult<BackendAvailability> {
//!         Ok(BackendAvailability::always_available())
//!     }
//!
//!     async fn validate(&self, circuit: &CompiledCircuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!
//!     async fn submit(
//!         &self,
//!         circuit: &CompiledCircuit,
//!         shots: u32,
//!         seed: Option<u64>,
//!     ) -> HalResult<JobId> {
//!         # todo!()
//!     }
//!
//!     async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
//!         # todo!()
//!     }
//!
//!     async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//!
//!     async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendAvailability, ValidationResult};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
