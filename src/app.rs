use std::{sync::Arc, time::Duration};

use anyhow::Result;
use reqwest::Client;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
    time::timeout,
};

use crate::{
    bridge::{self, BrowserEvent, CommandSink, SurfaceCommand},
    classifier::RiskClient,
    config::AppConfig,
    domain::NavigationEvent,
    engine,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    popup::PopupPresenter,
    store::{self, AssessmentCache, PreferenceStore},
    surfaces::{BadgeRenderer, NotificationTrigger},
    watcher::NavigationWatcher,
};

pub struct PhishGuardApp {
    _paths: ResolvedPaths,
    prefs: PreferenceStore,
    watcher: Arc<NavigationWatcher<RiskClient>>,
    popup: Arc<PopupPresenter<RiskClient>>,
    sink: CommandSink,
    writer_handle: JoinHandle<()>,
    shutdown: Shutdown,
}

impl PhishGuardApp {
    pub async fn initialize(
        config: AppConfig,
        paths: ResolvedPaths,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let pool = store::init_pool(&paths.db_path).await?;
        let prefs = PreferenceStore::new(pool.clone());
        let cache = AssessmentCache::new(pool);

        let http_client = Client::builder()
            .user_agent(format!("phishguard/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let client = Arc::new(RiskClient::new(http_client, config.classifier.clone()));

        let (sink, commands) = bridge::command_channel();
        let writer_handle = tokio::spawn(bridge::write_commands(commands));

        let badge = BadgeRenderer::new(sink.clone());
        let notifier = NotificationTrigger::new(sink.clone(), config.notification.icon_url.clone());

        let watcher = Arc::new(NavigationWatcher::new(
            client.clone(),
            prefs.clone(),
            cache.clone(),
            badge,
            notifier,
        ));
        let popup = Arc::new(PopupPresenter::new(client, prefs.clone(), cache));

        Ok(Self {
            _paths: paths,
            prefs,
            watcher,
            popup,
            sink,
            writer_handle,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        tracing::info!("phishguard bridge started");

        let mut listener = self.shutdown.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                _ = listener.notified() => {
                    tracing::info!("shutdown signal received (CTRL+C / SIGTERM)");
                    break;
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => self.dispatch(line.trim()),
                    Ok(None) => {
                        tracing::info!("browser closed the bridge (stdin EOF)");
                        break;
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to read from the bridge");
                        break;
                    }
                }
            }
        }

        self.shutdown.trigger();

        let PhishGuardApp {
            prefs,
            sink,
            writer_handle,
            ..
        } = self;

        let shutdown_timeout = Duration::from_secs(5);
        if timeout(shutdown_timeout, prefs.close()).await.is_err() {
            tracing::warn!(
                target: "store",
                "store did not close within {:?}",
                shutdown_timeout
            );
        }

        // Dropping the last sink lets the writer drain and exit.
        drop(sink);
        let mut writer_handle = writer_handle;
        let writer_sleep = tokio::time::sleep(shutdown_timeout);
        tokio::pin!(writer_sleep);
        tokio::select! {
            res = &mut writer_handle => {
                if let Err(err) = res {
                    if err.is_panic() {
                        tracing::error!(target: "bridge", "command writer panicked");
                    }
                }
            }
            _ = &mut writer_sleep => {
                tracing::warn!(
                    target: "bridge",
                    "command writer did not stop within {:?}; aborting",
                    shutdown_timeout
                );
                writer_handle.abort();
            }
        }

        tracing::info!("phishguard stopped");
        Ok(())
    }

    fn dispatch(&self, line: &str) {
        if line.is_empty() {
            return;
        }
        let event: BrowserEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(target: "bridge", error = %err, "ignoring malformed browser event");
                return;
            }
        };

        match event {
            BrowserEvent::TabUpdated { tab_id, url, status } => {
                let Some(url) = url else { return };
                let event = NavigationEvent {
                    tab_id,
                    url,
                    status,
                };
                // Handlers overlap on purpose; there is no per-tab isolation
                // and in-flight queries are never cancelled.
                let watcher = self.watcher.clone();
                tokio::spawn(async move {
                    watcher.handle(event).await;
                });
            }
            BrowserEvent::PopupOpened { tab_id, url } => {
                let popup = self.popup.clone();
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    let report = popup.report(&url).await;
                    tracing::debug!(target: "popup", tab_id, "popup report ready");
                    let _ = sink.send(SurfaceCommand::PopupReport { report });
                });
            }
            BrowserEvent::SetThreshold { value } => {
                let prefs = self.prefs.clone();
                tokio::spawn(async move {
                    match prefs.set_threshold(value).await {
                        Ok(threshold) => {
                            tracing::debug!(target: "store", threshold, "threshold updated");
                        }
                        Err(err) => {
                            tracing::warn!(target: "store", error = %err, "failed to set threshold");
                        }
                    }
                });
            }
            BrowserEvent::AdjustThreshold { delta } => {
                let prefs = self.prefs.clone();
                tokio::spawn(async move {
                    match prefs.adjust_threshold(delta).await {
                        Ok(threshold) => {
                            tracing::debug!(target: "store", threshold, "threshold adjusted");
                        }
                        Err(err) => {
                            tracing::warn!(target: "store", error = %err, "failed to adjust threshold");
                        }
                    }
                });
            }
            BrowserEvent::ToggleSafeDomain { url, enabled } => {
                let Some(hostname) = engine::hostname(&url) else {
                    tracing::warn!(target: "store", url = %url, "cannot toggle safe domain without a hostname");
                    return;
                };
                let prefs = self.prefs.clone();
                tokio::spawn(async move {
                    if let Err(err) = prefs.set_domain_safe(&hostname, enabled).await {
                        tracing::warn!(
                            target: "store",
                            error = %err,
                            hostname = %hostname,
                            "failed to update safe domain list"
                        );
                    }
                });
            }
        }
    }
}
