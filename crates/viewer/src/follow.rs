/// Autoscroll state for one panel.
///
/// Follows the tail while enabled and not detached; a manual scroll away
/// from the tail detaches it until the user re-engages.
#[derive(Debug, Clone)]
pub struct FollowState {
    enabled: bool,
    detached_by_user: bool,
}

impl Default for FollowState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FollowState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            detached_by_user: false,
        }
    }

    pub fn detach(&mut self) {
        self.detached_by_user = true;
    }

    pub fn reattach(&mut self) {
        self.detached_by_user = false;
    }

    pub fn should_scroll(&self) -> bool {
        self.enabled && !self.detached_by_user
    }
}
