//! JSON-lines bridge with the host browser: navigation and popup events
//! arrive on stdin, badge/notification/report commands go out on stdout.

use serde::{Deserialize, Serialize};
use tokio::{io::AsyncWriteExt, sync::mpsc};

use crate::{domain::LifecycleStatus, popup::PopupReport};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserEvent {
    TabUpdated {
        tab_id: i64,
        #[serde(default)]
        url: Option<String>,
        status: LifecycleStatus,
    },
    PopupOpened {
        tab_id: i64,
        url: String,
    },
    SetThreshold {
        value: i64,
    },
    AdjustThreshold {
        delta: i64,
    },
    ToggleSafeDomain {
        url: String,
        enabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub icon_url: String,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceCommand {
    SetBadgeText { text: String },
    SetBadgeBackgroundColor { color: String },
    CreateNotification { options: NotificationOptions },
    PopupReport { report: PopupReport },
}

pub type CommandSink = mpsc::UnboundedSender<SurfaceCommand>;

pub fn command_channel() -> (CommandSink, mpsc::UnboundedReceiver<SurfaceCommand>) {
    mpsc::unbounded_channel()
}

/// Serializes surface commands as JSON lines on stdout until every sender
/// is dropped.
pub async fn write_commands(mut commands: mpsc::UnboundedReceiver<SurfaceCommand>) {
    let mut stdout = tokio::io::stdout();
    while let Some(command) = commands.recv().await {
        let mut line = match serde_json::to_string(&command) {
            Ok(line) => line,
            Err(err) => {
                tracing::error!(target: "bridge", error = %err, "failed to encode surface command");
                continue;
            }
        };
        line.push('\n');
        if let Err(err) = stdout.write_all(line.as_bytes()).await {
            tracing::error!(target: "bridge", error = %err, "failed to write surface command");
            break;
        }
        let _ = stdout.flush().await;
    }
}
