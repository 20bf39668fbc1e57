// Resume Analysis Engine
// Remote (LLM) analysis with normalization, and a heuristic fallback that needs no backend.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod heuristic;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod prompts;
pub mod remote;
