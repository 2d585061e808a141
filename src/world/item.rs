use crate::data::{BodyParts, Fraction, WearableLayers};

/// Live item instance. Deliberately not `Clone`: an item lives in exactly
/// one inventory and moves between them.
#[derive(Debug)]
pub struct Item {
    pub prototype_id: String,
    pub name: String,
    pub call_name: String,
    pub description_in_inventory: String,
    pub description_on_ground: String,
    pub wieldable: Option<Wieldable>,
    pub wearable: Option<Wearable>,
    pub container: Option<Container>,
    pub actions: Vec<ItemAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wieldable {
    pub hands_required: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wearable {
    pub defense: i32,
    pub covered_parts: BodyParts,
    pub covered_layers: WearableLayers,
}

impl Wearable {
    /// Two wearables can be worn together unless they overlap on both a
    /// layer and a body part.
    pub fn is_compatible_with(&self, other: &Wearable) -> bool {
        !self.covered_layers.intersects(other.covered_layers)
            || !self.covered_parts.intersects(other.covered_parts)
    }
}

#[derive(Debug)]
pub struct Container {
    pub weight_fraction: Fraction,
    pub contents: Inventory,
}

/// Descriptor of something a character can do with an item. Carrying out
/// the action is the gameplay layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAction {
    pub name: String,
    pub call_names: Vec<String>,
    pub description: String,
    pub execute_description: String,
    pub has_target: bool,
}

impl Item {
    pub fn listing_name(&self) -> String {
        format!("{} [{}]", self.name, self.call_name)
    }

    pub fn listing_with_stats(&self) -> String {
        let mut listing = self.listing_name();
        if let Some(w) = &self.wieldable {
            listing.push_str(&format!(" {}-handed", w.hands_required));
        }
        if let Some(w) = self.wearable.as_ref().filter(|w| w.defense != 0) {
            listing.push_str(&format!(" {} Defense", w.defense));
        }
        listing
    }

    pub fn find_action(&self, call_name: &str) -> Option<&ItemAction> {
        self.actions
            .iter()
            .find(|a| a.call_names.iter().any(|c| c.eq_ignore_ascii_case(call_name)))
    }
}

/// Ordered set of owned items.
#[derive(Debug, Default)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an item.
    pub fn insert(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove the first item instantiated from `prototype_id`.
    pub fn remove(&mut self, prototype_id: &str) -> Option<Item> {
        let index = self
            .items
            .iter()
            .position(|i| i.prototype_id == prototype_id)?;
        Some(self.items.remove(index))
    }

    /// Move the first item instantiated from `prototype_id` into `other`.
    pub fn transfer(&mut self, prototype_id: &str, other: &mut Inventory) -> bool {
        match self.remove(prototype_id) {
            Some(item) => {
                other.insert(item);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, prototype_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.prototype_id == prototype_id)
    }

    pub fn find_by_call_name(&self, call_name: &str) -> Option<&Item> {
        self.items
            .iter()
            .find(|i| i.call_name.eq_ignore_ascii_case(call_name))
    }

    pub fn count(&self, prototype_id: &str) -> usize {
        self.items
            .iter()
            .filter(|i| i.prototype_id == prototype_id)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
