// Portfolio pipeline: resume ingestion, normalization, slug allocation,
// and persistence.
//
// Data flows one direction: raw upload → extraction → normalization →
// (optional) slug assignment → persistence → retrieval by slug.

pub mod extraction;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod slug;
pub mod store;
