use std::collections::BTreeMap;

use super::location::{Location, NpcPresence};
use super::npc::Npc;
use crate::data::{DiagnosticKind, Diagnostics, NpcTypeDirectory, PrototypeRegistry};

/// The live entity graph.
#[derive(Debug, Default)]
pub struct World {
    pub locations: BTreeMap<String, Location>,
    pub npcs: BTreeMap<String, Npc>,
}

/// Materialize the live world from the prototype registry.
///
/// Bad references are reported into `diagnostics` (paths, item placements)
/// or skipped quietly when the validator already covers them (NPCs). The
/// result may hold fewer entities than authored but is always consistent.
pub fn build_world(
    registry: &PrototypeRegistry,
    npc_types: &NpcTypeDirectory,
    diagnostics: &mut Diagnostics,
) -> World {
    let mut world = World::default();

    // Nodes first.
    for proto in registry.locations() {
        world
            .locations
            .insert(proto.id().to_string(), proto.create());
    }

    // Then edges. Destinations resolve against the built locations, so
    // every edge points at something that exists.
    for proto in registry.locations() {
        let id = proto.id();
        let file = proto.common.source_file.as_path();

        for (destination, description) in &proto.paths {
            // Already reported by the validator.
            if destination == id {
                continue;
            }

            if !world.locations.contains_key(destination) {
                diagnostics.error(
                    DiagnosticKind::UnknownLocation,
                    Some(id),
                    Some(file),
                    format!(
                        "Location '{}' not found. Referenced by location '{}' in file \"{}\".",
                        destination,
                        id,
                        file.display()
                    ),
                );
                continue;
            }

            if let Some(location) = world.locations.get_mut(id) {
                location.add_path_to(destination.as_str(), description.as_str());
            }
        }
    }

    // Items.
    for proto in registry.locations() {
        let id = proto.id();
        let file = proto.common.source_file.as_path();

        for item_id in &proto.items {
            let Some(item_proto) = registry.get_item(item_id) else {
                diagnostics.error(
                    DiagnosticKind::UnknownItem,
                    Some(id),
                    Some(file),
                    format!(
                        "Item '{}' not found. Referenced by location '{}' in file \"{}\".",
                        item_id,
                        id,
                        file.display()
                    ),
                );
                continue;
            };

            if let Some(location) = world.locations.get_mut(id) {
                location.items.insert(item_proto.create());
            }
        }
    }

    // NPCs last, they need resolved locations.
    for proto in registry.npcs() {
        let id = proto.id();

        let Some(location) = proto
            .location
            .as_deref()
            .and_then(|loc| world.locations.get_mut(loc))
        else {
            continue;
        };
        let Some(behavior) = npc_types.create(id) else {
            continue;
        };

        let mut npc = Npc::new(id, location.id.as_str(), behavior);
        npc.name = proto.common.name.clone().unwrap_or_default();
        npc.call_name = proto.common.call_name.clone().unwrap_or_default();

        location.add_npc(NpcPresence {
            npc_id: id.to_string(),
            glance_description: proto.glance_description.clone().unwrap_or_default(),
            approach_description: proto.approach_description.clone().unwrap_or_default(),
        });

        world.npcs.insert(id.to_string(), npc);
    }

    tracing::info!(
        target: "data",
        locations = world.locations.len(),
        npcs = world.npcs.len(),
        "Built world"
    );

    world
}
