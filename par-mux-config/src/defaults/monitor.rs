//! Default values for per-window monitoring options.

pub fn monitor_bell() -> bool {
    true
}

pub fn monitor_activity() -> bool {
    false
}

pub fn monitor_silence() -> u64 {
    0 // 0 = silence monitoring disabled
}
