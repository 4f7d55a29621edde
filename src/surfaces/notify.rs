use crate::{
    bridge::{CommandSink, NotificationOptions, SurfaceCommand},
    engine::NotificationSpec,
};

const TITLE: &str = "Phishing site warning";

/// Emits one system notification per qualifying navigation. There is no
/// cooldown window: revisiting a flagged URL re-notifies every time.
#[derive(Clone)]
pub struct NotificationTrigger {
    sink: CommandSink,
    icon_url: String,
}

impl NotificationTrigger {
    pub fn new(sink: CommandSink, icon_url: String) -> Self {
        Self { sink, icon_url }
    }

    pub fn fire(&self, spec: &NotificationSpec) {
        let options = NotificationOptions {
            kind: "basic",
            icon_url: self.icon_url.clone(),
            title: TITLE.to_string(),
            message: format!(
                "The website {} has a {}% chance of being a phishing site. \
                 Be careful when providing sensitive information.",
                spec.url, spec.percent
            ),
        };
        let _ = self
            .sink
            .send(SurfaceCommand::CreateNotification { options });
    }
}
