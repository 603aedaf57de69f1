//! Readiness pacing for transports without a native "can send now" event.
//!
//! A notification-based link (HID over GATT) has no readiness callback, so
//! the transport keeps one pending request and answers it on a timer, at
//! most one report per interval.
//!
//! ```text
//! request ──► armed (deadline = now + interval)
//!               │ more requests: deadline unchanged
//!               ▼
//!         deadline passed ── host ready ──► deliver, idle
//!               │
//!               └── host not ready ──► re-armed, request kept
//! ```

/// One outstanding readiness request and the time it is due.
///
/// Times are milliseconds on any monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportPacer {
    interval_ms: u64,
    requested: bool,
    deadline: Option<u64>,
}

impl ReportPacer {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            requested: false,
            deadline: None,
        }
    }

    /// When the pending request should be answered, if one is pending.
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Record a readiness request. A request made while one is already
    /// pending keeps the earlier deadline.
    pub fn request(&mut self, now_ms: u64) {
        self.requested = true;
        if self.deadline.is_none() {
            self.deadline = Some(now_ms.saturating_add(self.interval_ms));
        }
    }

    /// Called once the deadline has passed.
    ///
    /// Returns `true` when the request is consumed and the session should
    /// get its `CanSendNow`. If the host cannot take a report yet the
    /// request stays pending for another interval.
    pub fn on_deadline(&mut self, now_ms: u64, host_ready: bool) -> bool {
        self.deadline = None;
        if !self.requested {
            return false;
        }
        if host_ready {
            self.requested = false;
            true
        } else {
            self.deadline = Some(now_ms.saturating_add(self.interval_ms));
            false
        }
    }
}
