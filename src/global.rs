// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use lazy_static::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

lazy_static! {
    /// Set when a termination signal is received.
    pub static ref EXIT_SIGNAL: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));

    static ref STARTED_AT: Instant = Instant::now();
}

/// Initialize globals
pub fn init() {
    lazy_static::initialize(&STARTED_AT);
    lazy_static::initialize(&EXIT_SIGNAL);
}

/// Seconds since the daemon started.
pub fn uptime() -> u64 {
    STARTED_AT.elapsed().as_secs()
}
