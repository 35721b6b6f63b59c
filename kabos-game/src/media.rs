//! Audio/video lifecycle as a fire-and-forget capability.
//!
//! The controller issues commands and never looks at their outcome; a
//! blocked autoplay or missing asset cannot change game state.
use serde::{Deserialize, Serialize};

use crate::state::Screen;

/// Commands the controller may issue to the media layer.
///
/// Every method defaults to a no-op so hosts only implement what they play.
pub trait MediaHooks {
    /// First player gesture: unmute the intro and begin background audio.
    fn unlock_audio(&mut self) {}

    fn start_audio(&mut self) {}

    fn pause_audio(&mut self) {}

    fn resume_audio(&mut self) {}

    /// Side-channel notification whenever the screen changes.
    fn on_screen_enter(&mut self, _screen: Screen) {}
}

/// Headless hosts with nothing to play.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentMedia;

impl MediaHooks for SilentMedia {}

/// Environment lifecycle notifications forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    Hidden,
    Visible,
    PageHide,
}

/// Tracks whether background audio was ever started so resumes stay
/// silent until the player has opted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioGate {
    started: bool,
}

impl AudioGate {
    #[must_use]
    pub const fn started(self) -> bool {
        self.started
    }

    pub fn unlock(&mut self, media: &mut impl MediaHooks) {
        self.started = true;
        media.unlock_audio();
    }

    /// Start once; later calls resume playback.
    pub fn start(&mut self, media: &mut impl MediaHooks) {
        if self.started {
            media.resume_audio();
        } else {
            self.started = true;
            media.start_audio();
        }
    }

    pub fn pause(self, media: &mut impl MediaHooks) {
        media.pause_audio();
    }

    pub fn resume(self, media: &mut impl MediaHooks) {
        if self.started {
            media.resume_audio();
        }
    }

    pub fn lifecycle(self, event: LifecycleEvent, media: &mut impl MediaHooks) {
        match event {
            LifecycleEvent::Hidden | LifecycleEvent::PageHide => self.pause(media),
            LifecycleEvent::Visible => self.resume(media),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl MediaHooks for Recorder {
        fn unlock_audio(&mut self) {
            self.0.push("unlock");
        }

        fn start_audio(&mut self) {
            self.0.push("start");
        }

        fn pause_audio(&mut self) {
            self.0.push("pause");
        }

        fn resume_audio(&mut self) {
            self.0.push("resume");
        }
    }

    #[test]
    fn resume_is_ignored_until_started() {
        let mut media = Recorder::default();
        let mut gate = AudioGate::default();
        gate.lifecycle(LifecycleEvent::Visible, &mut media);
        gate.lifecycle(LifecycleEvent::Hidden, &mut media);
        assert_eq!(media.0, vec!["pause"]);

        gate.start(&mut media);
        gate.start(&mut media);
        gate.lifecycle(LifecycleEvent::PageHide, &mut media);
        gate.lifecycle(LifecycleEvent::Visible, &mut media);
        assert_eq!(media.0, vec!["pause", "start", "resume", "pause", "resume"]);
        assert!(gate.started());
    }

    #[test]
    fn unlock_counts_as_started() {
        let mut media = Recorder::default();
        let mut gate = AudioGate::default();
        gate.unlock(&mut media);
        gate.start(&mut media);
        assert_eq!(media.0, vec!["unlock", "resume"]);
    }

    #[test]
    fn silent_media_accepts_everything() {
        let mut media = SilentMedia;
        let mut gate = AudioGate::default();
        gate.start(&mut media);
        gate.lifecycle(LifecycleEvent::Hidden, &mut media);
        media.on_screen_enter(Screen::Hub);
        assert!(gate.started());
    }
}
