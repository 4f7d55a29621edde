use crate::{
    bridge::{CommandSink, SurfaceCommand},
    engine::{BadgeColor, BadgeState},
};

/// Paints the toolbar badge. Rendering the same state twice emits the same
/// commands, which the host applies idempotently.
#[derive(Clone)]
pub struct BadgeRenderer {
    sink: CommandSink,
}

impl BadgeRenderer {
    pub fn new(sink: CommandSink) -> Self {
        Self { sink }
    }

    pub fn render(&self, badge: &BadgeState) {
        match badge {
            BadgeState::Cleared => {
                self.send(SurfaceCommand::SetBadgeText {
                    text: String::new(),
                });
            }
            BadgeState::Unknown => {
                self.send(SurfaceCommand::SetBadgeText {
                    text: "N/A".to_string(),
                });
                self.send(SurfaceCommand::SetBadgeBackgroundColor {
                    color: BadgeColor::Gray.as_hex().to_string(),
                });
            }
            BadgeState::Score { percent, color } => {
                self.send(SurfaceCommand::SetBadgeText {
                    text: percent.to_string(),
                });
                self.send(SurfaceCommand::SetBadgeBackgroundColor {
                    color: color.as_hex().to_string(),
                });
            }
        }
    }

    fn send(&self, command: SurfaceCommand) {
        // The receiver only disappears during shutdown.
        let _ = self.sink.send(command);
    }
}
