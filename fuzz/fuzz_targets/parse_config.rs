//! Fuzz harness for configuration files (visitrank.yaml / visitrank.json).

#![no_main]

use libfuzzer_sys::fuzz_target;
use visitrank_config::{ConfigFormat, parse_config};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for format in [ConfigFormat::Yaml, ConfigFormat::Json] {
        if let Ok(config) = parse_config(input, format) {
            let _ = config.validate();
        }
    }
});
