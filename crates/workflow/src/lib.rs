//! Venue and event creation workflow.
//!
//! [`store::EntityStore`] is the persistence seam, [`EntityRepository`] adds
//! the session cache on top of it, and [`SubmissionOrchestrator`] runs the
//! validate / create / upload / update pipeline.

pub mod error;
pub mod orchestrator;
pub mod repository;
pub mod store;

pub use error::PersistenceError;
pub use orchestrator::{FailedUpload, SubmissionError, SubmissionOrchestrator, SubmissionReport};
pub use repository::EntityRepository;
pub use store::{EntityStore, MemoryEntityStore, PgEntityStore};
