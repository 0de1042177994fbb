//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text through `AppConfig::parse()` and the environment
//! override path, which re-validates.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(mut config) = safecite_config::AppConfig::parse(s) {
            let _ = config.apply_overrides_from(|_| Some(s.to_string()));
            let _ = config.redacted();
        }
    }
});
