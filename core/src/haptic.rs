//! Haptic feedback dispatch.
//!
//! The UI fires haptics by [`HapticFeedbackType`], the manager decides which [`HapticPattern`]
//! that maps to and whether to play it at all. There is no platform vibrator here, the
//! [`LoggingHapticFeedbackManager`] records what would have been played.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::debug;
use strum::{Display, EnumIter};

/// The interactions that produce haptic feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum HapticFeedbackType {
    TabClick,
    Navigation,
    ScrollToTop,
    Action,
    RefreshThreshold,
    Selection,
}

/// The physical effect played for a [`HapticFeedbackType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum HapticPattern {
    Thud,
    Tick,
    Click,
    HeavyClick,
}

impl From<HapticFeedbackType> for HapticPattern {
    fn from(kind: HapticFeedbackType) -> Self {
        match kind {
            HapticFeedbackType::TabClick => Self::Thud,
            HapticFeedbackType::Navigation | HapticFeedbackType::Selection => Self::Tick,
            HapticFeedbackType::ScrollToTop | HapticFeedbackType::Action => Self::Click,
            HapticFeedbackType::RefreshThreshold => Self::HeavyClick,
        }
    }
}

/// Fire-and-forget haptic dispatch.
pub trait HapticFeedbackManager: Send + Sync {
    fn perform_haptic(&self, kind: HapticFeedbackType);

    fn set_enabled(&self, enabled: bool);

    fn is_enabled(&self) -> bool;
}

/// A manager that never plays anything, used when no haptics are available.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledHapticFeedbackManager;

impl HapticFeedbackManager for DisabledHapticFeedbackManager {
    fn perform_haptic(&self, _: HapticFeedbackType) {}

    fn set_enabled(&self, _: bool) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// A manager that logs the pattern it would play.
#[derive(Debug)]
pub struct LoggingHapticFeedbackManager {
    enabled: AtomicBool,
    played: AtomicUsize,
}

impl LoggingHapticFeedbackManager {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            played: AtomicUsize::new(0),
        }
    }

    /// How many haptics have been played so far.
    #[must_use]
    pub fn played(&self) -> usize {
        self.played.load(Ordering::Relaxed)
    }
}

impl Default for LoggingHapticFeedbackManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HapticFeedbackManager for LoggingHapticFeedbackManager {
    fn perform_haptic(&self, kind: HapticFeedbackType) {
        if !self.is_enabled() {
            return;
        }

        let pattern = HapticPattern::from(kind);
        debug!("haptic: {kind} -> {pattern}");
        self.played.fetch_add(1, Ordering::Relaxed);
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
