pub mod data;
pub mod world;

use std::collections::BTreeMap;

use data::{DataError, DataPaths, Diagnostics, NpcTypeDirectory, PrototypeRegistry};
use world::{Item, Location, Npc, World};

/// Everything produced by one load of the content directories.
///
/// Prototypes are read-only template data; locations and NPCs are the live
/// world the gameplay layer mutates.
#[derive(Debug)]
pub struct GameData {
    prototypes: PrototypeRegistry,
    world: World,
    diagnostics: Diagnostics,
}

/// Load, validate and build using the built-in NPC behaviors.
pub fn load_game_data(paths: &DataPaths) -> GameData {
    GameData::load(paths, NpcTypeDirectory::global())
}

impl GameData {
    /// Run the whole pipeline. Always returns a world, possibly with fewer
    /// entities than authored; check [`GameData::success`] for the verdict.
    pub fn load(paths: &DataPaths, npc_types: &NpcTypeDirectory) -> GameData {
        let mut diagnostics = npc_types.diagnostics().clone();

        let (prototypes, load_diags) = data::load_all(paths);
        diagnostics.extend(load_diags);
        diagnostics.extend(data::validate(&prototypes, npc_types));

        let world = world::build_world(&prototypes, npc_types, &mut diagnostics);

        if diagnostics.has_errors() {
            tracing::error!(
                target: "data",
                errors = diagnostics.errors().count(),
                warnings = diagnostics.warnings().count(),
                "Game data loaded with errors"
            );
        } else {
            tracing::info!(
                target: "data",
                warnings = diagnostics.warnings().count(),
                "Game data loaded"
            );
        }

        GameData {
            prototypes,
            world,
            diagnostics,
        }
    }

    /// False iff at least one error (not warning) was reported.
    pub fn success(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn prototypes(&self) -> &PrototypeRegistry {
        &self.prototypes
    }

    pub fn locations(&self) -> &BTreeMap<String, Location> {
        &self.world.locations
    }

    pub fn npcs(&self) -> &BTreeMap<String, Npc> {
        &self.world.npcs
    }

    /// Instantiate a fresh item. Asking for an id that is not an item
    /// prototype is a caller bug, not a content problem.
    pub fn create_item(&self, id: &str) -> Result<Item, DataError> {
        self.prototypes
            .get_item(id)
            .map(|proto| proto.create())
            .ok_or_else(|| DataError::UnknownItem(id.to_string()))
    }

    pub fn get_location(&self, id: &str) -> Result<&Location, DataError> {
        self.world
            .locations
            .get(id)
            .ok_or_else(|| DataError::UnknownLocation(id.to_string()))
    }

    pub fn get_location_mut(&mut self, id: &str) -> Result<&mut Location, DataError> {
        self.world
            .locations
            .get_mut(id)
            .ok_or_else(|| DataError::UnknownLocation(id.to_string()))
    }

    pub fn get_npc_mut(&mut self, id: &str) -> Result<&mut Npc, DataError> {
        self.world
            .npcs
            .get_mut(id)
            .ok_or_else(|| DataError::UnknownNpc(id.to_string()))
    }

    /// Move an NPC to another location, carrying its presence entry along.
    pub fn move_npc(&mut self, npc_id: &str, destination: &str) -> Result<(), DataError> {
        if !self.world.locations.contains_key(destination) {
            return Err(DataError::UnknownLocation(destination.to_string()));
        }

        let npc = self
            .world
            .npcs
            .get_mut(npc_id)
            .ok_or_else(|| DataError::UnknownNpc(npc_id.to_string()))?;
        let from = std::mem::replace(&mut npc.location, destination.to_string());

        let presence = self
            .world
            .locations
            .get_mut(&from)
            .and_then(|loc| loc.remove_npc(npc_id));

        if let (Some(presence), Some(to)) = (presence, self.world.locations.get_mut(destination)) {
            to.add_npc(presence);
        }

        tracing::debug!(target: "data", "Moved NPC '{}' from '{}' to '{}'", npc_id, from, destination);
        Ok(())
    }
}
