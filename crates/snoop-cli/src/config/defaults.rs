use snoop_core::sandbox::{DEFAULT_FUEL, DEFAULT_MAX_CALL_DEPTH};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "snoop.config.json";

/// Requests in flight at once unless configured otherwise.
pub const DEFAULT_THREADS: usize = 16;

/// Files scanned in directory mode unless configured otherwise.
pub const DEFAULT_INCLUDE: &str = "**/*.js";

pub fn default_threads() -> usize {
    DEFAULT_THREADS
}

pub fn default_include() -> Vec<String> {
    vec![DEFAULT_INCLUDE.to_string()]
}

pub fn default_fuel() -> u64 {
    DEFAULT_FUEL
}

pub fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}
