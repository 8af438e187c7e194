//! Wires the channel, the overlay bridge and the engine onto one runtime.

use std::sync::Arc;

use lingualink_channel::{ChannelConfig, ChannelHandle, ResilientChannel};
use lingualink_dom::DocumentUpdate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::engine::{Engine, EngineConfig};
use crate::error::EngineResult;
use crate::overlay::{OverlayBridge, OverlaySink};
use crate::settings::{Settings, SettingsConfig, SettingsHandle};

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub engine: EngineConfig,
    pub channel: ChannelConfig,
    pub settings: SettingsConfig,
}

/// A running caption service.
pub struct CaptionService {
    settings: SettingsHandle,
    channel: ChannelHandle,
    cancel: CancellationToken,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl CaptionService {
    /// Spawn the channel, overlay bridge and engine tasks. The engine reads
    /// document updates from `updates`. Everything stops when `cancel`
    /// fires.
    pub fn start(
        config: ServiceConfig,
        sink: Arc<dyn OverlaySink>,
        updates: mpsc::Receiver<DocumentUpdate>,
        cancel: CancellationToken,
    ) -> EngineResult<Self> {
        let settings = SettingsHandle::new(Settings::new(&config.settings, &config.engine.targets));
        let channel = ResilientChannel::spawn(&config.channel, cancel.clone())?;
        let bridge = OverlayBridge::new(sink, &config.engine.targets, settings.subscribe());
        let engine = Engine::new(config.engine, channel.handle.clone(), settings.subscribe())?;

        let bridge_cancel = cancel.clone();
        let events = channel.events;
        let bridge_task = tokio::spawn(async move {
            bridge.run(events, bridge_cancel).await;
        });
        let engine_task = tokio::spawn(engine.run(updates, cancel.clone()));

        info!("Caption service started");
        Ok(Self {
            settings,
            channel: channel.handle,
            cancel,
            tasks: vec![
                ("channel", channel.task),
                ("overlay", bridge_task),
                ("engine", engine_task),
            ],
        })
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn channel(&self) -> &ChannelHandle {
        &self.channel
    }

    /// Cancel every task and wait for them to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for (name, task) in self.tasks {
            if let Err(e) = task.await {
                warn!(task = name, error = %e, "Task ended abnormally");
            }
        }
        info!("Caption service stopped");
    }
}
