//! Screens the app can navigate between, and hooks that observe navigation.

use std::sync::Arc;

use strum::Display;

use crate::haptic::{HapticFeedbackManager, HapticFeedbackType};

/// A destination in the app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Display)]
pub enum Screen {
    #[default]
    Home,
    Search { initial_query: String },
    Settings,
}

/// Observes every `go_to` made by a navigator.
pub trait NavigationEventListener: Send + Sync {
    fn go_to(&self, screen: &Screen);
}

/// Plays a [`HapticFeedbackType::Navigation`] haptic on every navigation.
#[derive(Clone)]
pub struct HapticNavigationEventListener {
    haptics: Arc<dyn HapticFeedbackManager>,
}

impl HapticNavigationEventListener {
    #[must_use]
    pub fn new(haptics: Arc<dyn HapticFeedbackManager>) -> Self {
        Self { haptics }
    }
}

impl NavigationEventListener for HapticNavigationEventListener {
    fn go_to(&self, screen: &Screen) {
        log::trace!("navigating to {screen}");
        self.haptics.perform_haptic(HapticFeedbackType::Navigation);
    }
}
