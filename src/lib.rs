//! legacylens - Annotate legacy source trees with modernization reports
//!
//! A resilient annotation pipeline that walks a legacy source tree,
//! summarizes each file via a remote LLM endpoint (with bounded retries,
//! exponential backoff, and a deterministic rule-based fallback), and
//! persists markdown reports. Supports multiple inference providers
//! (OpenAI-compatible gateways, Azure OpenAI, Ollama).

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod util;
