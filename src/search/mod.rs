//! Explorer search resolution.
//!
//! # Module Organization
//!
//! - [`classify`] - Input shape facets and query normalization
//! - [`probes`] - Independent lookup strategies
//! - [`aggregate`] - Grouping, de-duplication and TTL selection
//! - [`cache`] - TTL result cache over a key/value store
//! - [`pipeline`] - Per-query state machine tying the above together
//! - [`coordinator`] - Debounce, cancellation and de-duplication of runs

// ============================================================================
// Module Declarations
// ============================================================================

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod coordinator;
pub mod pipeline;
pub mod probes;

// ============================================================================
// Re-exports
// ============================================================================

pub use classify::{InputClassification, classify, normalize_query};
pub use coordinator::{SearchCoordinator, SearchUpdate};
pub use pipeline::{PipelineState, Resolution, SearchPipeline};
