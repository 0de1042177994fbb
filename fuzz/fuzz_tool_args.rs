//! Fuzz target for tool argument parsing.
//!
//! Run with: cargo +nightly fuzz run fuzz_tool_args
//!
//! Arbitrary JSON arguments must parse or yield a fixed message, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use safecite_core::tools::{ToolCall, ToolName};

fuzz_target!(|data: &[u8]| {
    let Ok(arguments) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    for tool in ToolName::ALL {
        if let Ok(call) = ToolCall::parse(tool, &arguments) {
            assert_eq!(call.tool(), tool);
        }
    }
});
