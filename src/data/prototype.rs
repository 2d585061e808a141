use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::world::{Container, Inventory, Item, ItemAction, Location, Wearable, Wieldable};

//////////////////////
/// PROTOTYPE KINDS ///
//////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrototypeKind {
    Location,
    Item,
    Npc,
}

impl PrototypeKind {
    /// Load order: items first so locations can reference them in the
    /// registry, NPCs last.
    pub const ALL: [PrototypeKind; 3] = [
        PrototypeKind::Item,
        PrototypeKind::Location,
        PrototypeKind::Npc,
    ];

    /// Default sub-directory under the content root.
    pub fn dir_name(self) -> &'static str {
        match self {
            PrototypeKind::Location => "location",
            PrototypeKind::Item => "item",
            PrototypeKind::Npc => "npc",
        }
    }

    /// Top-level key holding a list of records (`[[location]]` and so on).
    pub fn list_key(self) -> &'static str {
        self.dir_name()
    }

    /// Deserialize one record of this kind.
    pub fn parse(self, value: toml::Value) -> Result<Prototype, toml::de::Error> {
        Ok(match self {
            PrototypeKind::Location => Prototype::Location(value.try_into()?),
            PrototypeKind::Item => Prototype::Item(value.try_into()?),
            PrototypeKind::Npc => Prototype::Npc(value.try_into()?),
        })
    }
}

///////////////////////
/// TOML STRUCTS    ///
///////////////////////

/// Fields every prototype carries. Required keys are `Option` so that a
/// record missing one still parses and the validator can report it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrototypeCommon {
    pub id: Option<String>,
    pub call_name: Option<String>,
    pub name: Option<String>,

    #[serde(skip)]
    pub source_file: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationPrototype {
    #[serde(flatten)]
    pub common: PrototypeCommon,

    pub description: Option<String>,

    /// destination location id -> description of the way there
    #[serde(default)]
    pub paths: BTreeMap<String, String>,

    /// item prototype ids, instantiated into the location at build time
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPrototype {
    #[serde(flatten)]
    pub common: PrototypeCommon,

    pub inventory_description: Option<String>,
    pub ground_description: Option<String>,

    #[serde(default)]
    pub is_wieldable: bool,
    pub hands_required: Option<u32>,

    #[serde(default)]
    pub is_wearable: bool,
    pub defense: Option<i32>,
    #[serde(default)]
    pub covered_parts: BodyParts,
    #[serde(default)]
    pub covered_layers: WearableLayers,

    #[serde(default)]
    pub has_inventory: bool,
    pub weight_fraction: Option<Fraction>,

    #[serde(default)]
    pub actions: Vec<ItemActionPrototype>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemActionPrototype {
    pub name: Option<String>,
    #[serde(default)]
    pub call_names: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub execute_description: String,
    #[serde(default)]
    pub has_target: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NpcPrototype {
    #[serde(flatten)]
    pub common: PrototypeCommon,

    /// id of the starting location prototype
    pub location: Option<String>,

    pub glance_description: Option<String>,
    pub approach_description: Option<String>,
}

/// Share of contained weight that counts towards the carrier, `{ numerator = 1, denominator = 2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Fraction {
            numerator,
            denominator,
        }
    }

    /// A zero numerator or a zero denominator is not a usable weight fraction.
    pub fn is_zero(&self) -> bool {
        self.numerator == 0 || self.denominator == 0
    }

    /// Scale `weight` by this fraction. Saturates at `u32::MAX`.
    pub fn apply(&self, weight: u32) -> u32 {
        if self.denominator == 0 {
            return weight;
        }
        let scaled = u64::from(weight) * u64::from(self.numerator) / u64::from(self.denominator);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// Declares a bitset authored in TOML as a list of snake_case names,
/// e.g. `covered_parts = ["head", "torso"]`.
macro_rules! flag_set {
    ($set:ident, $flag:ident, $from:tt { $($variant:ident = $bit:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $flag {
            $($variant),+
        }

        impl $flag {
            pub const ALL: &'static [$flag] = &[$($flag::$variant),+];

            pub fn bit(self) -> u8 {
                match self {
                    $($flag::$variant => $bit),+
                }
            }
        }

        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
        #[serde(from = $from)]
        pub struct $set(u8);

        impl $set {
            pub const EMPTY: $set = $set(0);

            pub fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub fn contains(self, flag: $flag) -> bool {
                self.0 & flag.bit() != 0
            }

            pub fn intersects(self, other: $set) -> bool {
                self.0 & other.0 != 0
            }

            pub fn with(self, flag: $flag) -> $set {
                $set(self.0 | flag.bit())
            }

            pub fn iter(self) -> impl Iterator<Item = $flag> {
                $flag::ALL.iter().copied().filter(move |f| self.contains(*f))
            }
        }

        impl From<Vec<$flag>> for $set {
            fn from(flags: Vec<$flag>) -> Self {
                flags.into_iter().fold($set::EMPTY, $set::with)
            }
        }
    };
}

flag_set!(BodyParts, BodyPart, "Vec<BodyPart>" {
    Head = 1 << 0,
    Torso = 1 << 1,
    Arms = 1 << 2,
    Hands = 1 << 3,
    Legs = 1 << 4,
    Feet = 1 << 5,
});

flag_set!(WearableLayers, WearableLayer, "Vec<WearableLayer>" {
    Inner = 1 << 0,
    Middle = 1 << 1,
    Outer = 1 << 2,
});

///////////////////////////
/// THE TAGGED PROTOTYPE ///
///////////////////////////

#[derive(Debug, Clone)]
pub enum Prototype {
    Location(LocationPrototype),
    Item(ItemPrototype),
    Npc(NpcPrototype),
}

impl Prototype {
    pub fn kind(&self) -> PrototypeKind {
        match self {
            Prototype::Location(_) => PrototypeKind::Location,
            Prototype::Item(_) => PrototypeKind::Item,
            Prototype::Npc(_) => PrototypeKind::Npc,
        }
    }

    pub fn common(&self) -> &PrototypeCommon {
        match self {
            Prototype::Location(p) => &p.common,
            Prototype::Item(p) => &p.common,
            Prototype::Npc(p) => &p.common,
        }
    }

    fn common_mut(&mut self) -> &mut PrototypeCommon {
        match self {
            Prototype::Location(p) => &mut p.common,
            Prototype::Item(p) => &mut p.common,
            Prototype::Npc(p) => &mut p.common,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.common().id.as_deref()
    }

    pub fn source_file(&self) -> &Path {
        &self.common().source_file
    }

    pub fn set_source_file(&mut self, path: &Path) {
        self.common_mut().source_file = path.to_path_buf();
    }

    pub fn as_location(&self) -> Option<&LocationPrototype> {
        match self {
            Prototype::Location(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&ItemPrototype> {
        match self {
            Prototype::Item(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_npc(&self) -> Option<&NpcPrototype> {
        match self {
            Prototype::Npc(p) => Some(p),
            _ => None,
        }
    }

    /// Post-parse normalization, run once after the source file is stamped.
    ///
    /// Returns the authored path keys that collapsed onto an already taken
    /// destination once trimmed. Those edges are not kept.
    pub fn on_deserialized(&mut self) -> Vec<String> {
        let mut dropped_paths = Vec::new();
        let common = self.common_mut();
        common.id = clean_key(common.id.take());
        common.call_name = clean_key(common.call_name.take());
        common.name = common.name.take().map(|n| n.trim().to_string());

        match self {
            Prototype::Location(p) => {
                p.description = p.description.take().map(|d| normalize_multiline_desc(&d));
                // Keys already written without padding claim their slot first.
                let (clean, padded): (Vec<_>, Vec<_>) = std::mem::take(&mut p.paths)
                    .into_iter()
                    .partition(|(dest, _)| dest.trim() == dest.as_str());
                for (dest, desc) in clean.into_iter().chain(padded) {
                    let key = dest.trim().to_string();
                    if p.paths.contains_key(&key) {
                        dropped_paths.push(dest);
                        continue;
                    }
                    p.paths.insert(key, normalize_multiline_desc(&desc));
                }
                for item in &mut p.items {
                    *item = item.trim().to_string();
                }
            }
            Prototype::Item(p) => {
                p.inventory_description = p
                    .inventory_description
                    .take()
                    .map(|d| normalize_multiline_desc(&d));
                p.ground_description = p
                    .ground_description
                    .take()
                    .map(|d| normalize_multiline_desc(&d));
                for action in &mut p.actions {
                    action.name = action.name.take().map(|n| n.trim().to_string());
                    action.call_names.retain(|c| !c.trim().is_empty());
                    action.description = normalize_multiline_desc(&action.description);
                    action.execute_description =
                        normalize_multiline_desc(&action.execute_description);
                }
            }
            Prototype::Npc(p) => {
                p.location = clean_key(p.location.take());
                p.glance_description = p
                    .glance_description
                    .take()
                    .map(|d| normalize_multiline_desc(&d));
                p.approach_description = p
                    .approach_description
                    .take()
                    .map(|d| normalize_multiline_desc(&d));
            }
        }

        dropped_paths
    }
}

impl LocationPrototype {
    pub fn id(&self) -> &str {
        self.common.id.as_deref().unwrap_or_default()
    }

    /// Bare location: no paths, items or NPCs yet. Those are wired by the builder.
    pub fn create(&self) -> Location {
        Location::new(
            self.id(),
            self.common.name.clone().unwrap_or_default(),
            self.common.call_name.clone().unwrap_or_default(),
            self.description.clone().unwrap_or_default(),
        )
    }
}

impl ItemPrototype {
    pub fn id(&self) -> &str {
        self.common.id.as_deref().unwrap_or_default()
    }

    /// Fresh item instance, composed from whichever capabilities are enabled.
    pub fn create(&self) -> Item {
        let wieldable = self.is_wieldable.then(|| Wieldable {
            hands_required: self.hands_required.unwrap_or(1),
        });

        let wearable = self.is_wearable.then(|| Wearable {
            defense: self.defense.unwrap_or(0),
            covered_parts: self.covered_parts,
            covered_layers: self.covered_layers,
        });

        let container = self.has_inventory.then(|| Container {
            weight_fraction: self.weight_fraction.unwrap_or(Fraction::new(1, 1)),
            contents: Inventory::new(),
        });

        let actions = self
            .actions
            .iter()
            .map(|a| ItemAction {
                name: a.name.clone().unwrap_or_default(),
                call_names: a.call_names.clone(),
                description: a.description.clone(),
                execute_description: a.execute_description.clone(),
                has_target: a.has_target,
            })
            .collect();

        Item {
            prototype_id: self.id().to_string(),
            name: self.common.name.clone().unwrap_or_default(),
            call_name: self.common.call_name.clone().unwrap_or_default(),
            description_in_inventory: self.inventory_description.clone().unwrap_or_default(),
            description_on_ground: self.ground_description.clone().unwrap_or_default(),
            wieldable,
            wearable,
            container,
            actions,
        }
    }
}

impl NpcPrototype {
    pub fn id(&self) -> &str {
        self.common.id.as_deref().unwrap_or_default()
    }
}

fn clean_key(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Reflow authored text: wrapped lines join with a space, one blank line
/// becomes a line break, two or more become a paragraph break.
pub(crate) fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut pending_blank_lines = 0usize;
    let mut first_text_seen = false;

    for line in raw.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            pending_blank_lines += 1;
            continue;
        }

        if first_text_seen {
            match pending_blank_lines {
                0 => result.push(' '),
                1 => result.push('\n'),
                _ => result.push_str("\n\n"),
            }
        }
        result.push_str(trimmed);
        first_text_seen = true;
        pending_blank_lines = 0;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kind: PrototypeKind, src: &str) -> Prototype {
        let table: toml::Table = toml::from_str(src).unwrap();
        kind.parse(toml::Value::Table(table)).unwrap()
    }

    #[test]
    fn location_collections_default_to_empty() {
        let proto = parse(
            PrototypeKind::Location,
            r#"
            id = "cellar"
            name = "Cellar"
            call_name = "cellar"
            "#,
        );
        let loc = proto.as_location().unwrap();
        assert!(loc.paths.is_empty());
        assert!(loc.items.is_empty());
        assert!(loc.description.is_none());
    }

    #[test]
    fn bitsets_parse_from_name_lists() {
        let proto = parse(
            PrototypeKind::Item,
            r#"
            id = "helm"
            is_wearable = true
            covered_parts = ["head", "head",]
            covered_layers = ["outer"]
            "#,
        );
        let item = proto.as_item().unwrap();
        assert!(item.covered_parts.contains(BodyPart::Head));
        assert!(!item.covered_parts.contains(BodyPart::Feet));
        assert_eq!(item.covered_parts.iter().count(), 1);
        assert!(item.covered_layers.contains(WearableLayer::Outer));
    }

    #[test]
    fn on_deserialized_trims_ids_and_reflows_text() {
        let mut proto = parse(
            PrototypeKind::Npc,
            r#"
            id = "  orchibald "
            location = " "
            glance_description = """
            A dwarf
            leans on the bar.

            He looks shifty."""
            "#,
        );
        proto.on_deserialized();
        let npc = proto.as_npc().unwrap();
        assert_eq!(npc.id(), "orchibald");
        assert!(npc.location.is_none());
        assert_eq!(
            npc.glance_description.as_deref(),
            Some("A dwarf leans on the bar.\nHe looks shifty.")
        );
    }

    #[test]
    fn padded_path_keys_do_not_overwrite_clean_ones() {
        let mut proto = parse(
            PrototypeKind::Location,
            r#"
            id = "a"
            paths = { "b" = "one", " b" = "two", " c " = "three" }
            "#,
        );
        let dropped = proto.on_deserialized();
        assert_eq!(dropped, vec![" b".to_string()]);
        let loc = proto.as_location().unwrap();
        assert_eq!(loc.paths.len(), 2);
        assert_eq!(loc.paths["b"], "one");
        assert_eq!(loc.paths["c"], "three");
    }

    #[test]
    fn item_create_composes_capabilities() {
        let proto = parse(
            PrototypeKind::Item,
            r#"
            id = "backpack"
            name = "Backpack"
            call_name = "backpack"
            has_inventory = true
            weight_fraction = { numerator = 1, denominator = 2 }
            "#,
        );
        let item = proto.as_item().unwrap().create();
        assert_eq!(item.prototype_id, "backpack");
        assert!(item.wieldable.is_none());
        assert!(item.wearable.is_none());
        let container = item.container.as_ref().unwrap();
        assert_eq!(container.weight_fraction, Fraction::new(1, 2));
        assert!(container.contents.is_empty());
    }

    #[test]
    fn fraction_zero_checks() {
        assert!(Fraction::new(0, 3).is_zero());
        assert!(Fraction::new(2, 0).is_zero());
        assert!(!Fraction::new(1, 4).is_zero());
        assert_eq!(Fraction::new(1, 4).apply(20), 5);
    }

    #[test]
    fn fraction_apply_on_heavy_loads() {
        assert_eq!(Fraction::new(3, 4).apply(u32::MAX), 3_221_225_471);
        assert_eq!(Fraction::new(u32::MAX, 1).apply(2), u32::MAX);
        assert_eq!(Fraction::new(5, 0).apply(7), 7);
    }
}
