//! Platform abstraction layer
//!
//! Ports the host provides to the game:
//! - Input subscription lifecycle (tied to a session)
//! - Screen navigation (menu, leaderboard)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Token for a live input subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Subscription(pub u64);

/// Source of the single discrete "act" input
pub trait InputPort {
    fn subscribe(&mut self) -> Subscription;
    /// Release a subscription. Unknown tokens are ignored.
    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Input port for hosts that push events straight into the game loop
#[derive(Debug, Clone, Default)]
pub struct DirectInput {
    next: u64,
    active: BTreeSet<u64>,
}

impl DirectInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl InputPort for DirectInput {
    fn subscribe(&mut self) -> Subscription {
        self.next += 1;
        self.active.insert(self.next);
        Subscription(self.next)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.active.remove(&subscription.0);
    }
}

/// Screens outside the game itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    Leaderboard,
}

/// Host screen router
pub trait NavigationPort {
    fn go_to(&mut self, screen: Screen);
}

/// Navigation that only logs (headless hosts)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigation;

impl NavigationPort for LogNavigation {
    fn go_to(&mut self, screen: Screen) {
        log::info!("Navigate to {:?}", screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_input_lifecycle() {
        let mut input = DirectInput::new();
        let a = input.subscribe();
        let b = input.subscribe();
        assert_ne!(a, b);
        assert_eq!(input.active_count(), 2);
        input.unsubscribe(a);
        input.unsubscribe(a);
        assert_eq!(input.active_count(), 1);
    }
}
