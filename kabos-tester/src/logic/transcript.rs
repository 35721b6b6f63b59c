use serde::Serialize;

use kabos_game::{MediaHooks, Screen};

/// One command the controller issued to the media layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "screen", rename_all = "snake_case")]
pub enum MediaCommand {
    Unlock,
    Start,
    Pause,
    Resume,
    Enter(Screen),
}

/// Media collaborator that plays nothing and remembers everything.
#[derive(Debug, Clone, Default)]
pub struct TranscriptMedia {
    commands: Vec<MediaCommand>,
}

impl TranscriptMedia {
    #[must_use]
    pub fn commands(&self) -> &[MediaCommand] {
        &self.commands
    }
}

impl MediaHooks for TranscriptMedia {
    fn unlock_audio(&mut self) {
        self.commands.push(MediaCommand::Unlock);
    }

    fn start_audio(&mut self) {
        self.commands.push(MediaCommand::Start);
    }

    fn pause_audio(&mut self) {
        self.commands.push(MediaCommand::Pause);
    }

    fn resume_audio(&mut self) {
        self.commands.push(MediaCommand::Resume);
    }

    fn on_screen_enter(&mut self, screen: Screen) {
        self.commands.push(MediaCommand::Enter(screen));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut media = TranscriptMedia::default();
        media.unlock_audio();
        media.on_screen_enter(Screen::Hub);
        media.resume_audio();
        media.on_screen_enter(Screen::Hub);
        assert_eq!(
            media.commands(),
            &[
                MediaCommand::Unlock,
                MediaCommand::Enter(Screen::Hub),
                MediaCommand::Resume,
                MediaCommand::Enter(Screen::Hub),
            ]
        );
    }

    #[test]
    fn serializes_with_screen_payload() {
        let json = serde_json::to_string(&MediaCommand::Enter(Screen::Lose)).unwrap();
        assert_eq!(json, r#"{"command":"enter","screen":"lose"}"#);
    }
}
