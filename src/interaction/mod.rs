//! Hide prompt and crosshair highlight
//!
//! The host probes from the camera each tick and reports what it hit. This
//! module decides what the prompt says, whether the crosshair is
//! highlighted, and whether the interact key should enter or leave a spot.

use serde::{Deserialize, Serialize};

use crate::concealment::{ConcealState, SpotCatalogue};
use crate::core::config::InteractionConfig;
use crate::core::types::SpotId;
use crate::host::ui::PromptUi;

/// Result of the host's camera probe
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionProbe {
    /// Hide spot under the crosshair, if any
    pub spot: Option<SpotId>,
    pub distance: f32,
    /// Whether anything interactable was hit (doors, notes, spots)
    pub interactable: bool,
}

impl InteractionProbe {
    pub fn spot(spot: SpotId, distance: f32) -> Self {
        Self {
            spot: Some(spot),
            distance,
            interactable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InteractionAction {
    Enter(SpotId),
    Exit,
}

#[derive(Debug, Clone)]
pub struct InteractionPrompt {
    config: InteractionConfig,
    hide_text: String,
    exit_text: String,
}

impl InteractionPrompt {
    pub fn new(config: InteractionConfig) -> Self {
        let hide_text = format!("Press '{}' to hide", config.key_label);
        let exit_text = format!("Press '{}' to exit", config.key_label);
        Self {
            config,
            hide_text,
            exit_text,
        }
    }

    pub fn hide_text(&self) -> &str {
        &self.hide_text
    }

    pub fn exit_text(&self) -> &str {
        &self.exit_text
    }

    /// Refresh the prompt UI and translate a key press into an action
    pub fn update(
        &self,
        state: ConcealState,
        probe: Option<&InteractionProbe>,
        spots: &SpotCatalogue,
        interact_pressed: bool,
        ui: &mut dyn PromptUi,
    ) -> Option<InteractionAction> {
        match state {
            ConcealState::Revealed => {}
            ConcealState::ExitingConceal => {
                ui.set_highlight(false);
                ui.set_prompt(None);
                return None;
            }
            ConcealState::EnteringConceal | ConcealState::Concealed | ConcealState::Peeking => {
                ui.set_highlight(false);
                ui.set_prompt(Some(&self.exit_text));
                return interact_pressed.then_some(InteractionAction::Exit);
            }
        }

        let in_reach = probe.filter(|p| p.distance <= self.config.interact_distance);
        ui.set_highlight(in_reach.is_some_and(|p| p.interactable));

        let target = in_reach
            .and_then(|p| p.spot)
            .and_then(|id| spots.hide_target(id));

        match target {
            Some(spot) => {
                ui.set_prompt(Some(&self.hide_text));
                interact_pressed.then_some(InteractionAction::Enter(spot.id))
            }
            None => {
                ui.set_prompt(None);
                None
            }
        }
    }
}

impl Default for InteractionPrompt {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}
