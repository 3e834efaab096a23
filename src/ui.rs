//! HUD collaborator
//!
//! The score readout and the start/game-over banners. The simulation only
//! emits [`GameEvent`]s; [`apply_events`] turns them into [`Hud`] calls.

use crate::sim::{GameEvent, OverlayId};

/// Text overlay surface
pub trait Hud {
    /// Show overlay `id` with `text` (lines separated by `\n`)
    fn display_overlay(&mut self, id: OverlayId, text: &str);
    fn clear_overlay(&mut self, id: OverlayId);
    fn update_score_display(&mut self, value: u32);
}

/// Score readout text
pub fn score_text(score: u32) -> String {
    format!("Score: {}", score)
}

/// Forward drained simulation events to a HUD
pub fn apply_events<H: Hud + ?Sized>(hud: &mut H, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ShowOverlay(overlay) => hud.display_overlay(overlay.id(), &overlay.text()),
            GameEvent::ClearOverlay(id) => hud.clear_overlay(*id),
            GameEvent::ScoreChanged(score) => hud.update_score_display(*score),
            GameEvent::PairSpawned { .. }
            | GameEvent::PairRetired { .. }
            | GameEvent::GameOver { .. } => {}
        }
    }
}

/// HUD that writes to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogHud {
    /// Last score shown
    pub score: u32,
    /// Overlays currently up
    pub visible: Vec<OverlayId>,
}

impl Hud for LogHud {
    fn display_overlay(&mut self, id: OverlayId, text: &str) {
        log::info!("[{:?}] {}", id, text.replace('\n', " / "));
        if !self.visible.contains(&id) {
            self.visible.push(id);
        }
    }

    fn clear_overlay(&mut self, id: OverlayId) {
        self.visible.retain(|v| *v != id);
    }

    fn update_score_display(&mut self, value: u32) {
        if value != self.score {
            log::debug!("{}", score_text(value));
        }
        self.score = value;
    }
}

/// HUD built from absolutely positioned DOM elements
#[cfg(target_arch = "wasm32")]
pub struct DomHud {
    document: web_sys::Document,
}

#[cfg(target_arch = "wasm32")]
impl DomHud {
    const SCORE_ID: &'static str = "score";
    const SCORE_STYLE: &'static str = "position:absolute;top:10px;left:10px;color:white;\
        font-size:24px;font-family:Arial, sans-serif;";

    /// Create the score element on `document`
    pub fn new(document: web_sys::Document) -> Self {
        let hud = Self { document };
        if hud.document.get_element_by_id(Self::SCORE_ID).is_none() {
            hud.append_div(Self::SCORE_ID, Self::SCORE_STYLE, &score_text(0));
        }
        hud
    }

    fn element_id(id: OverlayId) -> &'static str {
        match id {
            OverlayId::Start => "startMessage",
            OverlayId::GameOver => "gameOverMessage",
        }
    }

    fn style(id: OverlayId) -> &'static str {
        match id {
            OverlayId::Start => "position:absolute;top:40%;left:50%;\
                transform:translate(-50%, -50%);color:white;font-size:24px;\
                font-family:Arial, sans-serif;text-align:center;",
            OverlayId::GameOver => "position:absolute;top:50%;left:50%;\
                transform:translate(-50%, -50%);color:red;font-size:32px;\
                font-family:Arial, sans-serif;text-align:center;",
        }
    }

    fn append_div(&self, id: &str, style: &str, html: &str) {
        let Some(body) = self.document.body() else {
            log::warn!("No document body for #{}", id);
            return;
        };
        match self.document.create_element("div") {
            Ok(el) => {
                el.set_id(id);
                let _ = el.set_attribute("style", style);
                el.set_inner_html(html);
                let _ = body.append_child(&el);
            }
            Err(e) => log::warn!("Could not create #{}: {:?}", id, e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Hud for DomHud {
    fn display_overlay(&mut self, id: OverlayId, text: &str) {
        // Never stack a second copy of the same banner
        self.clear_overlay(id);
        self.append_div(Self::element_id(id), Self::style(id), &text.replace('\n', "<br>"));
    }

    fn clear_overlay(&mut self, id: OverlayId) {
        if let Some(el) = self.document.get_element_by_id(Self::element_id(id)) {
            el.remove();
        }
    }

    fn update_score_display(&mut self, value: u32) {
        if let Some(el) = self.document.get_element_by_id(Self::SCORE_ID) {
            el.set_text_content(Some(&score_text(value)));
        }
    }
}
