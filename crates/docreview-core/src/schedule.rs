use std::time::{Duration, Instant};

/// Coalesces bursts of layout or scroll events into frame-aligned work.
///
/// Any number of `request` calls between two frames produce one
/// recomputation at the next `on_frame`. When configured with a follow-up
/// delay, each frame run also arms a single late recomputation to catch
/// layout that settles after the frame; a newer frame run re-arms it rather
/// than stacking another one. The host drives the clock, so the scheduler
/// itself never sleeps or spawns.
#[derive(Debug, Clone, Default)]
pub struct RecomputeScheduler {
    frame_pending: bool,
    follow_up_delay: Option<Duration>,
    follow_up_at: Option<Instant>,
}

impl RecomputeScheduler {
    /// One recomputation per frame plus a delayed follow-up.
    pub fn with_follow_up(delay: Duration) -> Self {
        Self {
            follow_up_delay: Some(delay),
            ..Default::default()
        }
    }

    /// One recomputation per frame, nothing afterwards (scroll tracking).
    pub fn per_frame() -> Self {
        Self::default()
    }

    /// Note that work is needed. Returns true when this call armed the frame,
    /// i.e. the host should request an animation frame.
    pub fn request(&mut self) -> bool {
        let newly_armed = !self.frame_pending;
        self.frame_pending = true;
        newly_armed
    }

    pub fn is_pending(&self) -> bool {
        self.frame_pending || self.follow_up_at.is_some()
    }

    /// Called once per animation frame. Returns true when the recomputation
    /// should run now.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if !self.frame_pending {
            return false;
        }
        self.frame_pending = false;
        if let Some(delay) = self.follow_up_delay {
            self.follow_up_at = Some(now + delay);
        }
        true
    }

    /// Returns true once the follow-up is due, then disarms it.
    pub fn poll_follow_up(&mut self, now: Instant) -> bool {
        match self.follow_up_at {
            Some(due) if now >= due => {
                self.follow_up_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.follow_up_at
    }

    pub fn cancel(&mut self) {
        self.frame_pending = false;
        self.follow_up_at = None;
    }
}
