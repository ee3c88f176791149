use std::collections::HashSet;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::PathBuf;
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{
    DebounceEventResult, DebouncedEvent, DebouncedEventKind, new_debouncer,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::actor::panel_color::{self, Event};
use crate::common::config::Config;

/// Watches the config file and hands validated changes to the panel color
/// actor.
pub struct ConfigWatcher {
    file: PathBuf,
    real_file: Option<PathBuf>,
    real_file_id: Option<(u64, u64)>,
    events_tx: panel_color::Sender,
    enabled: bool,
}

impl ConfigWatcher {
    pub fn new(events_tx: panel_color::Sender, config: &Config, config_path: PathBuf) -> Self {
        let real_file = fs::canonicalize(&config_path).ok();
        let real_file_id = real_file
            .as_ref()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| (m.dev(), m.ino()));

        ConfigWatcher {
            file: config_path,
            real_file,
            real_file_id,
            events_tx,
            enabled: config.settings.hot_reload,
        }
    }

    pub fn spawn(
        events_tx: panel_color::Sender,
        config: &Config,
        config_path: PathBuf,
    ) -> JoinHandle<()> {
        let watcher = Self::new(events_tx, config, config_path);
        tokio::spawn(async move {
            if let Err(e) = watcher.run().await {
                warn!("config-watcher: error: {e:?}");
            }
        })
    }

    async fn run(mut self) -> notify::Result<()> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<DebouncedEvent>();

        let mut debouncer =
            new_debouncer(Duration::from_millis(250), move |res: DebounceEventResult| {
                if let Ok(events) = res {
                    for e in events {
                        if e.kind == DebouncedEventKind::Any {
                            let _ = tx.send(e);
                        }
                    }
                }
            })?;

        let watcher = debouncer.watcher();

        // Editors often replace the file, so watch the directory instead.
        let mut parents: HashSet<PathBuf> = HashSet::new();
        if let Some(p) = self.file.parent() {
            parents.insert(p.to_path_buf());
        }
        if let Some(real) = &self.real_file
            && let Some(p) = real.parent()
        {
            parents.insert(p.to_path_buf());
        }

        for dir in parents.iter() {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            info!("watching {:?}", dir);
        }

        while let Some(event) = rx.recv().await {
            if self.events_tx.is_closed() {
                debug!("panel color actor stopped; config watcher exiting");
                break;
            }
            if !self.is_relevant(&event) {
                continue;
            }

            trace!("change detected (debounced): {:?} {:?}", event.kind, event.path);

            if let Some(config) = self.accept(Config::read(&self.file)) {
                self.events_tx.send(Event::ConfigUpdated(Box::new(config)));
                info!("config reloaded");
            }
        }

        Ok(())
    }

    /// Decides whether a freshly read config should be applied.
    fn accept(&mut self, read: anyhow::Result<Config>) -> Option<Config> {
        let config = match read {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to read config file: {e:?}");
                return None;
            }
        };

        // A disabled watcher keeps listening so the file can turn it back on.
        if !self.enabled && !config.settings.hot_reload {
            trace!("hot reload disabled; ignoring change");
            return None;
        }

        let issues = config.validate();
        if !issues.is_empty() {
            for issue in &issues {
                warn!("config not reloaded: {issue}");
            }
            return None;
        }

        self.enabled = config.settings.hot_reload;
        Some(config)
    }

    fn is_relevant(&self, event: &DebouncedEvent) -> bool {
        if event.path == self.file {
            return true;
        }

        if let Some(real) = &self.real_file {
            if event.path == *real {
                return true;
            }

            if let Ok(ev_real) = fs::canonicalize(&event.path)
                && ev_real == *real
            {
                return true;
            }

            if let Ok(meta) = fs::metadata(&event.path)
                && let Some((dev, ino)) = self.real_file_id
                && meta.dev() == dev
                && meta.ino() == ino
            {
                return true;
            }
        }

        event.path.file_name().is_some_and(|n| Some(n) == self.file.file_name())
    }
}
