use super::item::Inventory;

/// Directed edge to another location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPath {
    pub destination: String,
    pub description: String,
}

/// How an NPC shows up in a location's listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcPresence {
    pub npc_id: String,
    pub glance_description: String,
    pub approach_description: String,
}

#[derive(Debug)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub call_name: String,
    pub description: String,
    pub items: Inventory,
    paths: Vec<LocationPath>,
    npcs: Vec<NpcPresence>,
}

impl Location {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        call_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Location {
            id: id.into(),
            name: name.into(),
            call_name: call_name.into(),
            description: description.into(),
            items: Inventory::new(),
            paths: Vec::new(),
            npcs: Vec::new(),
        }
    }

    pub fn add_path_to(&mut self, destination: impl Into<String>, description: impl Into<String>) {
        self.paths.push(LocationPath {
            destination: destination.into(),
            description: description.into(),
        });
    }

    pub fn paths(&self) -> &[LocationPath] {
        &self.paths
    }

    pub fn path_to(&self, destination: &str) -> Option<&LocationPath> {
        self.paths.iter().find(|p| p.destination == destination)
    }

    pub fn add_npc(&mut self, presence: NpcPresence) {
        self.npcs.push(presence);
    }

    pub fn remove_npc(&mut self, npc_id: &str) -> Option<NpcPresence> {
        let index = self.npcs.iter().position(|p| p.npc_id == npc_id)?;
        Some(self.npcs.remove(index))
    }

    pub fn npcs(&self) -> &[NpcPresence] {
        &self.npcs
    }

    pub fn has_npc(&self, npc_id: &str) -> bool {
        self.npcs.iter().any(|p| p.npc_id == npc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_keep_insertion_order() {
        let mut hall = Location::new("hall", "Hall", "hall", "A long hall.");
        hall.add_path_to("kitchen", "a swinging door");
        hall.add_path_to("cellar", "a trapdoor");

        let dests: Vec<&str> = hall.paths().iter().map(|p| p.destination.as_str()).collect();
        assert_eq!(dests, vec!["kitchen", "cellar"]);
        assert_eq!(hall.path_to("cellar").unwrap().description, "a trapdoor");
        assert!(hall.path_to("attic").is_none());
    }

    #[test]
    fn npc_presence_comes_and_goes() {
        let mut hall = Location::new("hall", "Hall", "hall", "");
        hall.add_npc(NpcPresence {
            npc_id: "orchibald".into(),
            glance_description: "A dwarf.".into(),
            approach_description: "He eyes you.".into(),
        });
        assert!(hall.has_npc("orchibald"));
        assert!(hall.remove_npc("orchibald").is_some());
        assert!(hall.npcs().is_empty());
    }
}
