//! Simulation root - owns the player rig, the level's hide spots and the
//! agent registry

use crate::affordance::DetectionResponse;
use crate::concealment::{ConcealmentController, SpotCatalogue};
use crate::core::config::StealthConfig;
use crate::core::error::{Result, StealthError};
use crate::core::types::{AgentId, EntityId, Pose, Seconds, SpotId};
use crate::host::avatar::{Avatar, KinematicAvatar};
use crate::interaction::InteractionPrompt;
use crate::perception::{AgentRegistry, PerceptionAgent};

/// Golden-ratio increment used to spread per-agent seeds
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct StealthWorld<A: Avatar = KinematicAvatar> {
    pub(crate) config: StealthConfig,
    pub(crate) spots: SpotCatalogue,
    pub(crate) player: EntityId,
    pub(crate) controller: ConcealmentController<A>,
    pub(crate) agents: AgentRegistry,
    pub(crate) prompt: InteractionPrompt,
    pub(crate) response: DetectionResponse,
    pub(crate) now: Seconds,
    pub(crate) current_tick: u64,
}

impl<A: Avatar> StealthWorld<A> {
    pub fn new(config: StealthConfig, spots: SpotCatalogue, avatar: A) -> Self {
        Self {
            player: EntityId::new(),
            controller: ConcealmentController::new(config.concealment.clone(), avatar),
            agents: AgentRegistry::new(),
            prompt: InteractionPrompt::new(config.interaction.clone()),
            response: DetectionResponse::new(config.affordance.clone()),
            now: 0.0,
            current_tick: 0,
            spots,
            config,
        }
    }

    pub fn config(&self) -> &StealthConfig {
        &self.config
    }

    /// Entity id of the player; agents are handed this as their target
    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn spots(&self) -> &SpotCatalogue {
        &self.spots
    }

    pub fn controller(&self) -> &ConcealmentController<A> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ConcealmentController<A> {
        &mut self.controller
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut AgentRegistry {
        &mut self.agents
    }

    pub fn now(&self) -> Seconds {
        self.now
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Spawn an agent that hunts the player
    pub fn spawn_agent(&mut self, pose: Pose) -> AgentId {
        self.spawn_with_target(pose, Some(self.player))
    }

    /// Spawn an agent with no target; it only ever patrols
    pub fn spawn_blind_agent(&mut self, pose: Pose) -> AgentId {
        self.spawn_with_target(pose, None)
    }

    fn spawn_with_target(&mut self, pose: Pose, target: Option<EntityId>) -> AgentId {
        let index = self.agents.spawned_total();
        let seed = self.config.seed ^ index.wrapping_add(1).wrapping_mul(SEED_STRIDE);
        let agent = PerceptionAgent::new(pose, self.config.perception.clone(), target, seed);

        let id = self.agents.spawn(agent);
        tracing::debug!(agent = ?id, index, "Spawned agent");
        id
    }

    /// Remove an agent; takes effect for lookups immediately and frees the
    /// slot at the start of the next tick
    pub fn despawn_agent(&mut self, id: AgentId) -> Result<()> {
        if self.agents.despawn(id) {
            tracing::debug!(agent = ?id, "Despawned agent");
            Ok(())
        } else {
            tracing::warn!(agent = ?id, "Despawn requested for unknown agent");
            Err(StealthError::AgentNotFound(id))
        }
    }

    /// Hide in a spot by id, bypassing the interaction prompt
    pub fn request_enter(&mut self, spot: SpotId) -> bool {
        match self.spots.hide_target(spot) {
            Some(spot) => self.controller.request_enter(spot),
            None => {
                tracing::warn!(spot = ?spot, "Hide requested for unknown or invalid spot");
                false
            }
        }
    }

    pub fn request_exit(&mut self) -> bool {
        self.controller.request_exit()
    }
}
