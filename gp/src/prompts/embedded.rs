//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Goal plan instruction template
pub const PLAN: &str = include_str!("../../prompts/plan.pmt");

/// System instruction sent alongside the plan prompt
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "plan" => Some(PLAN),
        "system" => Some(SYSTEM),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
