//! Session-expiry notifier
//!
//! Banner state machine (Hidden / Visible) driven by the session store's
//! JustExpired flag. Visible ends after the timeout or on dismissal,
//! whichever comes first, and either way lowers the store's flag so the
//! same expiry can't show twice.

pub mod clock;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::ExpiryTimer;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::DEFAULT_NOTIFIER_TIMEOUT_MS;
use crate::session::SessionStore;

pub const EXPIRY_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Hidden,
    Visible,
}

pub struct ExpiryNotifier {
    clock: Arc<dyn Clock>,
    timeout: Duration,
    state: BannerState,
    timer: ExpiryTimer,
    /// Last store expiry epoch that was shown
    shown_epoch: u64,
}

impl ExpiryNotifier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_timeout(clock, Duration::from_millis(DEFAULT_NOTIFIER_TIMEOUT_MS))
    }

    pub fn with_timeout(clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        ExpiryNotifier {
            clock,
            timeout,
            state: BannerState::Hidden,
            timer: ExpiryTimer::new(),
            shown_epoch: 0,
        }
    }

    pub fn state(&self) -> BannerState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == BannerState::Visible
    }

    /// Banner text while visible
    pub fn message(&self) -> Option<&'static str> {
        self.is_visible().then_some(EXPIRY_MESSAGE)
    }

    /// Time until auto-hide, if visible
    pub fn time_remaining(&self) -> Option<Duration> {
        if !self.is_visible() {
            return None;
        }
        self.timer.remaining(self.clock.now())
    }

    /// Follow the store: show for a new expiry, hide if the flag was lowered
    /// elsewhere (e.g. by a fresh login)
    pub fn sync(&mut self, store: &SessionStore) {
        let just_expired = store.is_just_expired();
        let epoch = store.expiry_epoch();

        if just_expired && epoch > self.shown_epoch {
            self.show(epoch);
        } else if !just_expired && self.is_visible() {
            debug!("expiry flag cleared externally, hiding banner");
            self.hide();
        }
    }

    /// Fire the timer if due; returns true if the banner was hidden by it
    pub fn tick(&mut self, store: &SessionStore) -> bool {
        if !self.is_visible() || !self.timer.is_due(self.clock.now()) {
            return false;
        }
        debug!("expiry banner timed out");
        self.hide();
        store.clear_expired_flag();
        true
    }

    /// User closed the banner; no-op when already hidden
    pub fn dismiss(&mut self, store: &SessionStore) {
        if !self.is_visible() {
            return;
        }
        debug!("expiry banner dismissed");
        self.hide();
        store.clear_expired_flag();
    }

    fn show(&mut self, epoch: u64) {
        self.shown_epoch = epoch;
        self.timer.cancel();
        self.timer.start(self.clock.now(), self.timeout);
        self.state = BannerState::Visible;
        debug!(epoch, timeout_ms = self.timeout.as_millis() as u64, "expiry banner shown");
    }

    fn hide(&mut self) {
        self.timer.cancel();
        self.state = BannerState::Hidden;
    }
}
