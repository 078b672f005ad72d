//! Tick system - advances the whole stealth world by one step
//!
//! Order within a tick:
//! registry flush -> interaction -> concealment -> perception -> aggregate -> affordances
//!
//! Every event produced along the way is forwarded to the host's sink.

use serde::Serialize;

use crate::affordance::AffordanceSnapshot;
use crate::concealment::ConcealState;
use crate::host::avatar::Avatar;
use crate::host::events::{EventSink, StealthEvent};
use crate::host::navigation::NavigationService;
use crate::host::ui::{AffordanceLayer, PromptUi};
use crate::interaction::{InteractionAction, InteractionProbe};
use crate::perception::{DetectionAggregator, PerceptionEvent, TargetView};
use crate::simulation::world::StealthWorld;
use crate::spatial::OcclusionProbe;

/// Player input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub delta_time: f32,
    pub look_delta_yaw: f32,
    pub look_delta_pitch: f32,
    pub interact_pressed: bool,
    pub peek_held: bool,
    pub wants_to_run: bool,
    /// Camera probe result, if the host ran one
    pub probe: Option<InteractionProbe>,
}

impl TickInput {
    /// Input with nothing pressed
    pub fn idle(delta_time: f32) -> Self {
        Self {
            delta_time,
            ..Default::default()
        }
    }
}

/// Host collaborators borrowed for one tick
pub struct TickServices<'a> {
    pub occlusion: &'a dyn OcclusionProbe,
    pub navigation: &'a mut dyn NavigationService,
    pub events: &'a mut dyn EventSink,
    pub prompt: &'a mut dyn PromptUi,
    pub affordances: &'a mut dyn AffordanceLayer,
}

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub time: f64,
    pub concealment: ConcealState,
    pub detected: bool,
    pub detecting_agents: usize,
    pub live_agents: usize,
    /// An agent reached the unconcealed player this tick
    pub caught: bool,
    pub events_emitted: usize,
    pub affordance: AffordanceSnapshot,
}

impl<A: Avatar> StealthWorld<A> {
    pub fn tick(&mut self, input: &TickInput, services: &mut TickServices<'_>) -> TickReport {
        let delta_time = input.delta_time.max(0.0);
        let mut emitted = 0;
        let mut caught = false;

        let reclaimed = self.agents.flush();
        if reclaimed > 0 {
            tracing::debug!(reclaimed, "Reclaimed despawned agents");
        }

        self.current_tick += 1;
        self.now += f64::from(delta_time);

        // Interaction
        let action = self.prompt.update(
            self.controller.state(),
            input.probe.as_ref(),
            &self.spots,
            input.interact_pressed,
            services.prompt,
        );
        match action {
            Some(InteractionAction::Enter(spot)) => {
                if let Some(spot) = self.spots.hide_target(spot) {
                    self.controller.request_enter(spot);
                }
            }
            Some(InteractionAction::Exit) => {
                self.controller.request_exit();
            }
            None => {}
        }

        // Concealment
        if self.controller.is_concealed() {
            self.controller.request_peek(input.peek_held);
        }
        self.controller
            .tick(delta_time, input.look_delta_yaw, input.look_delta_pitch);

        for event in self.controller.take_events() {
            services.events.emit(StealthEvent::from(event));
            emitted += 1;
        }

        // Perception
        let view = self.controller.avatar().map(|avatar| TargetView {
            entity: self.player,
            position: avatar.pose().position,
            concealed: self.controller.is_concealed(),
        });

        for agent in self.agents.iter_mut() {
            let events = agent.tick(self.now, view.as_ref(), services.occlusion, services.navigation);
            for event in events {
                caught |= matches!(event, PerceptionEvent::Caught { .. });
                services.events.emit(StealthEvent::from(event));
                emitted += 1;
            }
        }

        // Aggregate and affordances
        let detected = DetectionAggregator::any_detected(&self.agents);
        let can_run = input.wants_to_run && !self.controller.state().suppresses_locomotion();
        let affordance = self
            .response
            .update(detected, can_run, delta_time, services.affordances);

        TickReport {
            tick: self.current_tick,
            time: self.now,
            concealment: self.controller.state(),
            detected,
            detecting_agents: DetectionAggregator::detecting_count(&self.agents),
            live_agents: self.agents.len(),
            caught,
            events_emitted: emitted,
            affordance,
        }
    }
}
