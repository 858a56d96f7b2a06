use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fs};

use proc_macro2::TokenStream;
use quote::quote;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Compile-time defaults, overridable per build:
    // 10 MHz tick source, 20 ms debounce, 500 ms blink, 1 s arming threshold.
    let tick_hz: u32 = setting("PRESS_BLINK_TICK_HZ", 10_000_000);
    let debounce_ms: u64 = setting("PRESS_BLINK_DEBOUNCE_MS", 20);
    let blink_period_ms: u64 = setting("PRESS_BLINK_BLINK_PERIOD_MS", 500);
    let threshold_ms: u64 = setting("PRESS_BLINK_THRESHOLD_MS", 1000);
    let active_high: bool = setting("PRESS_BLINK_ACTIVE_HIGH", true);

    if tick_hz < 1000 {
        panic!("PRESS_BLINK_TICK_HZ must be at least 1000, got {}", tick_hz);
    }
    if blink_period_ms == 0 {
        panic!("PRESS_BLINK_BLINK_PERIOD_MS must be non-zero");
    }

    // _config.rs
    let mut g = TokenStream::new();

    g.extend(quote! {
        /// Tick source frequency.
        pub const TICK_HZ: u32 = #tick_hz;
        /// Time a raw level must hold before it is accepted.
        pub const DEBOUNCE_MS: u64 = #debounce_ms;
        /// Half period of the blink pattern.
        pub const BLINK_PERIOD_MS: u64 = #blink_period_ms;
        /// Minimum press duration that arms the blink pattern.
        pub const THRESHOLD_MS: u64 = #threshold_ms;
        /// `true` when a pressed button reads as a high level.
        pub const BUTTON_ACTIVE_HIGH: bool = #active_high;
    });

    let out_file = out_dir.join("_config.rs").to_string_lossy().to_string();
    fs::write(out_file, g.to_string()).unwrap();

    println!("cargo:rerun-if-changed=build.rs");
    for var in [
        "PRESS_BLINK_TICK_HZ",
        "PRESS_BLINK_DEBOUNCE_MS",
        "PRESS_BLINK_BLINK_PERIOD_MS",
        "PRESS_BLINK_THRESHOLD_MS",
        "PRESS_BLINK_ACTIVE_HIGH",
    ] {
        println!("cargo:rerun-if-env-changed={}", var);
    }
}

fn setting<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("invalid value {:?} for {}: {:?}", raw, name, e)),
        Err(_) => default,
    }
}
