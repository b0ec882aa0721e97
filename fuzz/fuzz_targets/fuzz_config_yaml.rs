#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary YAML must never panic the config loader or validator
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(config) = serde_yaml::from_str::<hestia::config::Config>(s)
    {
        let _ = config.validate();
    }
});
