//! Output-only presentation collaborators: prompt/crosshair and affordances

/// Hide prompt and crosshair highlight. Pure output, never read back.
pub trait PromptUi {
    fn set_highlight(&mut self, highlighted: bool);

    /// `None` hides the prompt
    fn set_prompt(&mut self, text: Option<&str>);
}

/// Player affordances driven by the detection aggregate
pub trait AffordanceLayer {
    /// Field-of-view offset (degrees) added to the camera's base FOV
    fn set_fov_offset(&mut self, offset: f32);

    /// Movement speed as a multiple of walk speed
    fn set_speed_modifier(&mut self, modifier: f32);

    /// Screen effect (vignette/tint) intensity
    fn set_screen_effect(&mut self, _intensity: f32) {}
}

/// Records the last values pushed to the prompt UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptState {
    pub highlighted: bool,
    pub prompt: Option<String>,
}

impl PromptUi for PromptState {
    fn set_highlight(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    fn set_prompt(&mut self, text: Option<&str>) {
        self.prompt = text.map(str::to_string);
    }
}

/// Records the last values pushed to the affordance layer
#[derive(Debug, Clone, PartialEq)]
pub struct AffordanceState {
    pub fov_offset: f32,
    pub speed_modifier: f32,
    pub screen_effect: f32,
}

impl Default for AffordanceState {
    fn default() -> Self {
        Self {
            fov_offset: 0.0,
            speed_modifier: 1.0,
            screen_effect: 0.0,
        }
    }
}

impl AffordanceLayer for AffordanceState {
    fn set_fov_offset(&mut self, offset: f32) {
        self.fov_offset = offset;
    }

    fn set_speed_modifier(&mut self, modifier: f32) {
        self.speed_modifier = modifier;
    }

    fn set_screen_effect(&mut self, intensity: f32) {
        self.screen_effect = intensity;
    }
}
