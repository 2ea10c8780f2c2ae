//! Demo in-memory entity registry: the external collaborator `esphome-core`
//! expects behind [`EntitySource`], plus the write side (`apply_command`)
//! that actually mutates state when a client issues a command. A real
//! deployment would back this with GPIO/sensor drivers instead.

use std::sync::Mutex;

use esphome_core::connection::EntityCommand;
use esphome_core::entity::{object_id_hash, EntityId, EntityInfo, EntityKind, EntitySource, StateValue};

struct EntityRecord {
    info: EntityInfo,
    state: Mutex<StateValue>,
}

pub struct EntityRegistry {
    entities: Vec<EntityRecord>,
}

impl EntityRegistry {
    /// A small fixed demo fleet: one sensor, one binary sensor, one switch.
    /// Good enough to exercise every dispatch path in the connection state
    /// machine without a real device behind it.
    pub fn demo() -> Self {
        let mut entities = Vec::new();
        entities.push(EntityRecord {
            info: EntityInfo {
                key: object_id_hash("living_room_temperature"),
                object_id: "living_room_temperature".into(),
                name: "Living Room Temperature".into(),
                unique_id: "living_room_temperature".into(),
                kind: EntityKind::Sensor,
                disabled_by_default: false,
                icon: "mdi:thermometer".into(),
                entity_category: 0,
            },
            state: Mutex::new(StateValue::Float(21.5)),
        });
        entities.push(EntityRecord {
            info: EntityInfo {
                key: object_id_hash("front_door"),
                object_id: "front_door".into(),
                name: "Front Door".into(),
                unique_id: "front_door".into(),
                kind: EntityKind::BinarySensor,
                disabled_by_default: false,
                icon: "mdi:door".into(),
                entity_category: 0,
            },
            state: Mutex::new(StateValue::Bool(false)),
        });
        entities.push(EntityRecord {
            info: EntityInfo {
                key: object_id_hash("porch_light"),
                object_id: "porch_light".into(),
                name: "Porch Light".into(),
                unique_id: "porch_light".into(),
                kind: EntityKind::Switch,
                disabled_by_default: false,
                icon: "mdi:lightbulb".into(),
                entity_category: 0,
            },
            state: Mutex::new(StateValue::Bool(false)),
        });
        Self { entities }
    }

    /// Applies a resolved command, returning whether the entity was found
    /// and the command shape matched the entity's kind.
    pub fn apply_command(&self, key: EntityId, command: &EntityCommand) -> bool {
        let Some(record) = self.entities.iter().find(|r| r.info.key == key) else {
            return false;
        };
        let mut state = record.state.lock().expect("entity state mutex poisoned");
        match (record.info.kind, command) {
            (EntityKind::Switch, EntityCommand::Switch { state: s }) => {
                *state = StateValue::Bool(*s);
                true
            }
            (EntityKind::Light, EntityCommand::Light { has_state, state: s, .. }) => {
                if *has_state {
                    *state = StateValue::Bool(*s);
                }
                true
            }
            (EntityKind::Cover, EntityCommand::Cover { has_position, position }) => {
                if *has_position {
                    *state = StateValue::Float(*position);
                }
                true
            }
            _ => false,
        }
    }
}

impl EntitySource for EntityRegistry {
    fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn entity_at(&self, index: usize) -> Option<&EntityInfo> {
        self.entities.get(index).map(|r| &r.info)
    }

    fn state_of(&self, key: EntityId) -> Option<StateValue> {
        self.entities
            .iter()
            .find(|r| r.info.key == key)
            .map(|r| *r.state.lock().expect("entity state mutex poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_registry_exposes_three_entities() {
        let registry = EntityRegistry::demo();
        assert_eq!(registry.entity_count(), 3);
    }

    #[test]
    fn command_updates_switch_state() {
        let registry = EntityRegistry::demo();
        let key = object_id_hash("porch_light");
        assert!(registry.apply_command(key, &EntityCommand::Switch { state: true }));
        assert_eq!(registry.state_of(key), Some(StateValue::Bool(true)));
    }

    #[test]
    fn unknown_key_command_is_rejected() {
        let registry = EntityRegistry::demo();
        assert!(!registry.apply_command(0xffff_ffff, &EntityCommand::Switch { state: true }));
    }
}
