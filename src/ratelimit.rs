// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Fixed-window request throttling, keyed by client IP.
//!
//! Used on the login route only: 5 attempts per minute per IP. The window
//! is in-process; a multi-instance deployment throttles per instance.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// Login attempts allowed per window.
pub const LOGIN_MAX_ATTEMPTS: u32 = 5;

/// Length of the login window.
pub const LOGIN_WINDOW: Duration = Duration::from_secs(60);

/// Entries above this count trigger a sweep of expired windows.
const PRUNE_THRESHOLD: usize = 1024;

/// Fixed-window counter per IP.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_hits: u32,
    window: Duration,
    windows: HashMap<IpAddr, (Instant, u32)>,
}

impl FixedWindowLimiter {
    pub fn new(max_hits: u32, window: Duration) -> Self {
        Self {
            max_hits,
            window,
            windows: HashMap::new(),
        }
    }

    /// Count one hit for `ip`; `false` means the caller is over the limit.
    pub fn check(&mut self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&mut self, ip: IpAddr, now: Instant) -> bool {
        if self.windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            self.windows
                .retain(|_, (start, _)| now.duration_since(*start) < window);
        }

        let entry = self.windows.entry(ip).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }
        if entry.1 >= self.max_hits {
            return false;
        }
        entry.1 += 1;
        true
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW)
    }
}
