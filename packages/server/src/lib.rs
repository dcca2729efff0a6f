// NYC Civic Scout - API Core
//
// Discovers NYC Council meetings, scores their community impact with an LLM
// (keyword fallback when the model is unavailable), geocodes them and serves
// the result over HTTP.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
