use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::npc_types::NpcTypeDirectory;
use super::prototype::{ItemPrototype, LocationPrototype, NpcPrototype, Prototype};
use super::registry::PrototypeRegistry;

/// Check every prototype for completeness and referential integrity.
///
/// Reports everything it finds; the registry is never modified.
pub fn validate(registry: &PrototypeRegistry, npc_types: &NpcTypeDirectory) -> Diagnostics {
    let mut diags = Diagnostics::new();

    for (_, proto) in registry.iter() {
        let common = proto.common();
        let id = proto.id();
        let file = proto.source_file();

        if common.call_name.is_none() {
            diags.missing_property(id, file, "call_name");
        }
        if common.name.is_none() {
            diags.missing_property(id, file, "name");
        }

        match proto {
            Prototype::Location(p) => validate_location(p, &mut diags),
            Prototype::Item(p) => validate_item(p, &mut diags),
            Prototype::Npc(p) => validate_npc(p, registry, npc_types, &mut diags),
        }
    }

    diags
}

fn validate_location(proto: &LocationPrototype, diags: &mut Diagnostics) {
    let id = proto.id();
    let file = proto.common.source_file.as_path();

    if proto.description.is_none() {
        diags.missing_property(Some(id), file, "description");
    }

    // Missing paths is only a warning; a dead-end room is legal.
    if proto.paths.is_empty() {
        diags.warning(
            DiagnosticKind::NoPaths,
            Some(id),
            Some(file),
            format!("Location '{}' has no paths.", id),
        );
    }

    if proto.paths.contains_key(id) {
        diags.error(
            DiagnosticKind::PathToSelf,
            Some(id),
            Some(file),
            format!(
                "Location '{}' contains a path to itself, in file \"{}\".",
                id,
                file.display()
            ),
        );
    }
}

fn validate_item(proto: &ItemPrototype, diags: &mut Diagnostics) {
    let id = Some(proto.id());
    let file = proto.common.source_file.as_path();

    if proto.inventory_description.is_none() {
        diags.missing_property(id, file, "inventory_description");
    }
    if proto.ground_description.is_none() {
        diags.missing_property(id, file, "ground_description");
    }

    if proto.is_wieldable && proto.hands_required.is_none() {
        diags.missing_property(id, file, "hands_required");
    }

    if proto.is_wearable {
        if proto.defense.is_none() {
            diags.missing_property(id, file, "defense");
        }
        if proto.covered_parts.is_empty() {
            diags.missing_property(id, file, "covered_parts");
        }
        if proto.covered_layers.is_empty() {
            diags.missing_property(id, file, "covered_layers");
        }
    }

    if proto.has_inventory && proto.weight_fraction.is_none_or(|f| f.is_zero()) {
        diags.missing_property(id, file, "weight_fraction");
    }

    for (index, action) in proto.actions.iter().enumerate() {
        if action.name.as_deref().is_none_or(str::is_empty) {
            diags.missing_property(id, file, &format!("actions[{}].name", index));
        }
        if action.call_names.is_empty() {
            diags.missing_property(id, file, &format!("actions[{}].call_names", index));
        }
    }
}

fn validate_npc(
    proto: &NpcPrototype,
    registry: &PrototypeRegistry,
    npc_types: &NpcTypeDirectory,
    diags: &mut Diagnostics,
) {
    let id = proto.id();
    let file = proto.common.source_file.as_path();

    match proto.location.as_deref() {
        None => diags.missing_property(Some(id), file, "location"),
        // Must be a location specifically, not just any known id.
        Some(location) if registry.get_location(location).is_none() => diags.error(
            DiagnosticKind::UnknownLocation,
            Some(id),
            Some(file),
            format!(
                "Unknown location '{}' referenced by '{}' in file \"{}\".",
                location,
                id,
                file.display()
            ),
        ),
        Some(_) => {}
    }

    if proto.glance_description.is_none() {
        diags.missing_property(Some(id), file, "glance_description");
    }
    if proto.approach_description.is_none() {
        diags.missing_property(Some(id), file, "approach_description");
    }

    if !npc_types.contains(id) {
        diags.error(
            DiagnosticKind::UnknownNpcType,
            Some(id),
            Some(file),
            format!("Unknown NPC '{}' in file \"{}\".", id, file.display()),
        );
    }
}
