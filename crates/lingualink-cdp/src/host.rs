//! Page host: keeps a document mirror of one browser tab up to date.
//!
//! The host takes a pierced snapshot of the tab, streams DOM events as
//! [`DocumentUpdate`]s and re-snapshots periodically and whenever the
//! browser reports a new document. Elements the caller cares about get their
//! box model probed so the mirror knows whether they render.

use lingualink_dom::{
    DocumentUpdate, ElementData, FrameSnapshot, Layout, NodeId, NodeSnapshot, SnapshotKind,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::client::CdpClient;
use crate::config::HostConfig;
use crate::convert::{DomEvent, node_to_snapshot, translate_event};
use crate::error::CdpError;
use crate::session::PageSession;

/// Decides which elements get a layout probe.
pub type ProbeFilter = Box<dyn Fn(&ElementData) -> bool + Send + Sync>;

pub struct PageHost {
    // Owns the socket the session talks through.
    _client: CdpClient,
    session: PageSession,
    config: HostConfig,
    probe: ProbeFilter,
}

impl PageHost {
    /// Connect to the browser and attach to the configured tab.
    pub async fn attach(config: HostConfig, probe: ProbeFilter) -> Result<Self, CdpError> {
        let client = CdpClient::connect(&config.cdp_endpoint).await?;
        let page = client.find_page(&config.page_url_contains).await?;
        info!(title = %page.title, url = %page.url, "Attaching to meeting tab");
        let session = client.attach_page(&page.id).await?;
        Ok(Self {
            _client: client,
            session,
            config,
            probe,
        })
    }

    /// Stream updates until cancelled or until the receiver goes away.
    /// Returns an error when the browser connection is lost.
    pub async fn run(
        mut self,
        updates: mpsc::Sender<DocumentUpdate>,
        cancel: CancellationToken,
    ) -> Result<(), CdpError> {
        let mut refresh = tokio::time::interval(self.config.refresh_interval());
        refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = refresh.tick() => {
                    if !self.resync(&updates).await? {
                        return Ok(());
                    }
                }
                event = self.session.next_event() => {
                    let Some(event) = event else {
                        return Err(CdpError::SessionClosed);
                    };
                    let translated = match translate_event(&event) {
                        Ok(Some(translated)) => translated,
                        Ok(None) => continue,
                        Err(e) => {
                            warn!(error = %e, "Skipping malformed DOM event");
                            continue;
                        }
                    };
                    let delivered = match translated {
                        DomEvent::DocumentUpdated => {
                            debug!("Document replaced, taking a new snapshot");
                            self.resync(&updates).await?
                        }
                        DomEvent::Update { update, unloaded } => {
                            for node_id in unloaded {
                                self.load_children(node_id).await?;
                            }
                            self.forward(update, &updates).await?
                        }
                    };
                    if !delivered {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Send a fresh snapshot followed by layout probes. Returns `false` once
    /// the receiver is gone.
    async fn resync(&self, updates: &mpsc::Sender<DocumentUpdate>) -> Result<bool, CdpError> {
        let root = self.session.get_document().await?;
        let snapshot = node_to_snapshot(&root)
            .ok_or_else(|| CdpError::InvalidResponse("Document root is not a document".to_string()))?;
        let probes = self.probe_targets(&snapshot);
        trace!(probes = probes.len(), "Snapshot taken");

        if updates.send(DocumentUpdate::Replace(snapshot)).await.is_err() {
            return Ok(false);
        }
        self.send_layouts(probes, updates).await
    }

    /// Ask for a node's children. A node the browser already dropped is
    /// skipped.
    async fn load_children(&self, node_id: i64) -> Result<(), CdpError> {
        match self.session.request_child_nodes(node_id).await {
            Err(CdpError::Protocol { code: -32000, message }) => {
                trace!(node_id, %message, "Children no longer available");
                Ok(())
            }
            other => other,
        }
    }

    async fn forward(
        &self,
        update: DocumentUpdate,
        updates: &mpsc::Sender<DocumentUpdate>,
    ) -> Result<bool, CdpError> {
        let probes = match &update {
            DocumentUpdate::Inserted { node, .. } => self.probe_targets(node),
            DocumentUpdate::ShadowRootPushed { root, .. } => self.probe_targets(root),
            DocumentUpdate::ChildrenSet { nodes, .. } => {
                nodes.iter().flat_map(|n| self.probe_targets(n)).collect()
            }
            _ => Vec::new(),
        };
        if updates.send(update).await.is_err() {
            return Ok(false);
        }
        self.send_layouts(probes, updates).await
    }

    async fn send_layouts(
        &self,
        probes: Vec<NodeId>,
        updates: &mpsc::Sender<DocumentUpdate>,
    ) -> Result<bool, CdpError> {
        for node in probes {
            let layout = match self.session.get_box_model(node.0).await? {
                Some(_) => Layout::Box,
                None => Layout::NoBox,
            };
            if updates
                .send(DocumentUpdate::Layout { node, layout })
                .await
                .is_err()
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Elements in the snapshot, including shadow roots and frame
    /// documents, that pass the probe filter.
    fn probe_targets(&self, snapshot: &NodeSnapshot) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![snapshot];
        while let Some(node) = stack.pop() {
            if let (Some(id), SnapshotKind::Element { tag, attributes, .. }) = (node.id, &node.kind) {
                let mut element = ElementData::new(tag.clone());
                for (name, value) in attributes {
                    element.set_attr(name.clone(), value.clone());
                }
                if (self.probe)(&element) {
                    out.push(id);
                }
            }
            if let Some(FrameSnapshot::Document(document)) = &node.frame {
                stack.push(document.as_ref());
            }
            stack.extend(node.shadow_roots.iter().rev());
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Keep a page host attached: re-attach after failures until cancelled.
pub async fn run_host(
    config: HostConfig,
    probe: impl Fn() -> ProbeFilter,
    updates: mpsc::Sender<DocumentUpdate>,
    cancel: CancellationToken,
) {
    loop {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            attached = PageHost::attach(config.clone(), probe()) => attached,
        };
        match outcome {
            Ok(host) => match host.run(updates.clone(), cancel.clone()).await {
                Ok(()) => return,
                Err(e) => warn!(error = %e, "Page host lost the browser"),
            },
            Err(e) => warn!(error = %e, "Page host could not attach"),
        }
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(config.retry_delay()) => {}
        }
    }
}
