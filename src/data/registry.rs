use std::collections::BTreeMap;

use super::prototype::{ItemPrototype, LocationPrototype, NpcPrototype, Prototype, PrototypeKind};

/// Flat id -> prototype map shared by every kind.
///
/// Iteration is in id order so later passes report findings in the same
/// order on every run.
#[derive(Debug, Clone, Default)]
pub struct PrototypeRegistry {
    prototypes: BTreeMap<String, Prototype>,
}

impl PrototypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a prototype under its id.
    ///
    /// Records without an id, or whose id is already taken, are handed back
    /// untouched; the record already in the registry is kept.
    pub fn insert(&mut self, prototype: Prototype) -> Result<(), Prototype> {
        let Some(id) = prototype.id().map(str::to_string) else {
            return Err(prototype);
        };

        if self.prototypes.contains_key(&id) {
            return Err(prototype);
        }

        self.prototypes.insert(id, prototype);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Prototype> {
        self.prototypes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.prototypes.contains_key(id)
    }

    pub fn get_location(&self, id: &str) -> Option<&LocationPrototype> {
        self.get(id).and_then(Prototype::as_location)
    }

    pub fn get_item(&self, id: &str) -> Option<&ItemPrototype> {
        self.get(id).and_then(Prototype::as_item)
    }

    pub fn get_npc(&self, id: &str) -> Option<&NpcPrototype> {
        self.get(id).and_then(Prototype::as_npc)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prototype)> {
        self.prototypes.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn locations(&self) -> impl Iterator<Item = &LocationPrototype> {
        self.prototypes.values().filter_map(Prototype::as_location)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemPrototype> {
        self.prototypes.values().filter_map(Prototype::as_item)
    }

    pub fn npcs(&self) -> impl Iterator<Item = &NpcPrototype> {
        self.prototypes.values().filter_map(Prototype::as_npc)
    }

    pub fn count_kind(&self, kind: PrototypeKind) -> usize {
        self.prototypes.values().filter(|p| p.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::prototype::PrototypeCommon;

    fn location(id: &str, name: &str) -> Prototype {
        Prototype::Location(LocationPrototype {
            common: PrototypeCommon {
                id: Some(id.into()),
                name: Some(name.into()),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn item(id: &str) -> Prototype {
        Prototype::Item(ItemPrototype {
            common: PrototypeCommon {
                id: Some(id.into()),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn duplicate_insert_keeps_first() {
        let mut reg = PrototypeRegistry::new();
        assert!(reg.insert(location("hall", "First")).is_ok());

        let rejected = reg.insert(location("hall", "Second")).unwrap_err();
        assert_eq!(rejected.common().name.as_deref(), Some("Second"));
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.get_location("hall").unwrap().common.name.as_deref(),
            Some("First")
        );
    }

    #[test]
    fn ids_share_one_namespace_across_kinds() {
        let mut reg = PrototypeRegistry::new();
        reg.insert(item("lamp")).unwrap();
        assert!(reg.insert(location("lamp", "Lamp room")).is_err());
        assert!(reg.get_location("lamp").is_none());
        assert!(reg.get_item("lamp").is_some());
    }

    #[test]
    fn record_without_id_is_rejected() {
        let mut reg = PrototypeRegistry::new();
        assert!(reg.insert(Prototype::Npc(NpcPrototype::default())).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn kind_views_filter() {
        let mut reg = PrototypeRegistry::new();
        reg.insert(item("lamp")).unwrap();
        reg.insert(location("hall", "Hall")).unwrap();
        assert_eq!(reg.items().count(), 1);
        assert_eq!(reg.locations().count(), 1);
        assert_eq!(reg.count_kind(PrototypeKind::Npc), 0);
        assert!(reg.get_npc("hall").is_none());
        assert!(reg.get_item("hall").is_none());
    }

    #[test]
    fn npc_lookup_by_id() {
        let mut reg = PrototypeRegistry::new();
        let npc = Prototype::Npc(NpcPrototype {
            common: PrototypeCommon {
                id: Some("orchibald".into()),
                ..Default::default()
            },
            location: Some("tavern".into()),
            ..Default::default()
        });
        reg.insert(npc).unwrap();
        assert_eq!(
            reg.get_npc("orchibald").unwrap().location.as_deref(),
            Some("tavern")
        );
    }
}
