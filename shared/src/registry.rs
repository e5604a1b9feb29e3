// Owner of every live overlay. Routes ticks and close requests by id and
// drops an overlay as soon as it reports Closed.

use crate::error::{OverlayError, SurfaceError};
use crate::overlay::{CloseReason, Overlay, OverlayConfig, OverlayEvent, OverlayId};
use crate::window::OverlayWindow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// What "show overlay" does while another overlay is still up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReentryPolicy {
    /// Keep the running overlay, drop the request.
    Ignore,
    /// Close running overlays, then start a new one.
    #[default]
    Replace,
    /// Every request gets its own independent overlay.
    Concurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Redraw,
    /// Fade tick measured from the overlay's own show time.
    Fade,
    /// Fade tick at an explicit elapsed time.
    FadeAt(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Created(OverlayId),
    /// Policy is [`ReentryPolicy::Ignore`] and this overlay is still running.
    Ignored(OverlayId),
}

pub struct OverlayRegistry<W: OverlayWindow> {
    overlays: BTreeMap<OverlayId, Overlay<W>>,
    next_id: u64,
    policy: ReentryPolicy,
    config: OverlayConfig,
}

impl<W: OverlayWindow> OverlayRegistry<W> {
    pub fn new(policy: ReentryPolicy, config: OverlayConfig) -> Self {
        Self {
            overlays: BTreeMap::new(),
            next_id: 1,
            policy,
            config,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.overlays.contains_key(&id)
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay<W>> {
        self.overlays.get(&id)
    }

    pub fn ids(&self) -> Vec<OverlayId> {
        self.overlays.keys().copied().collect()
    }

    /// Handle a "show overlay" request.
    ///
    /// `factory` builds the native window for the new id. A factory or start
    /// failure is returned as an error; nothing is registered in that case.
    pub fn trigger<F>(&mut self, factory: F) -> Result<TriggerOutcome, OverlayError>
    where
        F: FnOnce(OverlayId) -> Result<W, SurfaceError>,
    {
        match self.policy {
            ReentryPolicy::Ignore => {
                if let Some(&id) = self.overlays.keys().next() {
                    debug!("{id} still running, show request ignored");
                    return Ok(TriggerOutcome::Ignored(id));
                }
            }
            ReentryPolicy::Replace => {
                let closed = self.close_all();
                if closed > 0 {
                    debug!("replaced {closed} running overlay(s)");
                }
            }
            ReentryPolicy::Concurrent => {}
        }

        let id = OverlayId(self.next_id);
        self.next_id += 1;

        let window = factory(id)?;
        let mut overlay = Overlay::new(id, window, self.config.clone());
        overlay.show()?;
        self.overlays.insert(id, overlay);
        Ok(TriggerOutcome::Created(id))
    }

    /// Route a timer tick. Returns the close reason if the overlay finished.
    pub fn dispatch(&mut self, id: OverlayId, tick: Tick) -> Option<CloseReason> {
        let overlay = self.overlays.get_mut(&id)?;
        let event = match tick {
            Tick::Redraw => overlay.on_redraw_tick(),
            Tick::Fade => overlay.on_fade_tick_now(),
            Tick::FadeAt(elapsed) => overlay.on_fade_tick(elapsed),
        };
        self.settle(id, event)
    }

    /// External close request for one overlay.
    pub fn close(&mut self, id: OverlayId) -> Option<CloseReason> {
        let event = self.overlays.get_mut(&id)?.request_close();
        self.settle(id, event)
    }

    /// Close every overlay. Returns how many were closed.
    pub fn close_all(&mut self) -> usize {
        let ids = self.ids();
        ids.into_iter()
            .filter(|&id| self.close(id).is_some())
            .count()
    }

    fn settle(&mut self, id: OverlayId, event: Option<OverlayEvent>) -> Option<CloseReason> {
        match event {
            Some(OverlayEvent::Closed(reason)) => {
                self.overlays.remove(&id);
                info!("{id} removed ({reason:?}), {} still live", self.overlays.len());
                Some(reason)
            }
            None => None,
        }
    }
}
