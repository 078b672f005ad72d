//! Live agent registry and the detection aggregate
//!
//! The registry is owned by the simulation root. Despawns are deferred: a
//! despawned agent is hidden from lookups and iteration immediately, and its
//! slot is reclaimed by [`AgentRegistry::flush`] at the start of the next
//! tick, so removing an agent while another system is walking the registry
//! never invalidates that walk.

use ahash::AHashMap;

use crate::core::types::AgentId;
use crate::perception::agent::PerceptionAgent;

struct Slot {
    agent: PerceptionAgent,
    despawned: bool,
}

#[derive(Default)]
pub struct AgentRegistry {
    slots: Vec<Slot>,
    index: AHashMap<AgentId, usize>,
    spawned_total: u64,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, agent: PerceptionAgent) -> AgentId {
        let id = agent.id();
        self.index.insert(id, self.slots.len());
        self.slots.push(Slot {
            agent,
            despawned: false,
        });
        self.spawned_total += 1;
        id
    }

    /// Mark an agent for removal; returns false for unknown ids
    pub fn despawn(&mut self, id: AgentId) -> bool {
        match self.index.get(&id) {
            Some(&slot) if !self.slots[slot].despawned => {
                self.slots[slot].despawned = true;
                true
            }
            _ => false,
        }
    }

    /// Reclaim despawned slots
    pub fn flush(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| !slot.despawned);

        let removed = before - self.slots.len();
        if removed > 0 {
            self.index = self
                .slots
                .iter()
                .enumerate()
                .map(|(i, slot)| (slot.agent.id(), i))
                .collect();
        }
        removed
    }

    /// Agents ever spawned, used to derive per-agent seeds
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn get(&self, id: AgentId) -> Option<&PerceptionAgent> {
        let slot = self.slots.get(*self.index.get(&id)?)?;
        (!slot.despawned).then_some(&slot.agent)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut PerceptionAgent> {
        let slot = self.slots.get_mut(*self.index.get(&id)?)?;
        (!slot.despawned).then_some(&mut slot.agent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerceptionAgent> + '_ {
        self.slots
            .iter()
            .filter(|slot| !slot.despawned)
            .map(|slot| &slot.agent)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PerceptionAgent> + '_ {
        self.slots
            .iter_mut()
            .filter(|slot| !slot.despawned)
            .map(|slot| &mut slot.agent)
    }

    /// Live agents (excludes pending despawns)
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Combines every live agent's detection flag
///
/// Holds no state; membership changes are picked up on the next call.
pub struct DetectionAggregator;

impl DetectionAggregator {
    pub fn any_detected(registry: &AgentRegistry) -> bool {
        registry.iter().any(|agent| agent.detected())
    }

    /// Number of agents currently detecting the target
    pub fn detecting_count(registry: &AgentRegistry) -> usize {
        registry.iter().filter(|agent| agent.detected()).count()
    }
}
