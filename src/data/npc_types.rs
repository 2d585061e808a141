use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use crate::world::{NpcBehavior, NpcFactory, Orchibald};

/// One entry of the registration table: a prototype id claimed by a behavior.
#[derive(Clone, Copy)]
pub struct NpcRegistration {
    pub id: &'static str,
    pub factory: NpcFactory,
}

/// Build a registration table from `"id" => Type` pairs. Each type must
/// implement `NpcBehavior + Default`.
#[macro_export]
macro_rules! npc_registrations {
    ($($id:literal => $ty:ty),* $(,)?) => {
        &[$(
            $crate::data::NpcRegistration {
                id: $id,
                factory: || -> ::std::boxed::Box<dyn $crate::world::NpcBehavior> {
                    ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
                },
            }
        ),*]
    };
}

/// Every behavior shipped with the game.
pub const BUILTIN_NPCS: &[NpcRegistration] = npc_registrations! {
    "orchibald" => Orchibald,
};

/// Prototype id -> behavior constructor.
#[derive(Debug, Default)]
pub struct NpcTypeDirectory {
    factories: BTreeMap<&'static str, NpcFactory>,
    diagnostics: Diagnostics,
}

impl NpcTypeDirectory {
    /// Directory over the built-in table, discovered once per process.
    pub fn global() -> &'static NpcTypeDirectory {
        static DIRECTORY: OnceLock<NpcTypeDirectory> = OnceLock::new();
        DIRECTORY.get_or_init(|| NpcTypeDirectory::discover(BUILTIN_NPCS))
    }

    /// Register every valid entry; blank and duplicate ids are reported
    /// and skipped, the first claim on an id wins.
    pub fn discover(registrations: &[NpcRegistration]) -> Self {
        let mut directory = NpcTypeDirectory::default();

        for reg in registrations {
            let id = reg.id.trim();
            if id.is_empty() || id != reg.id {
                directory.diagnostics.error(
                    DiagnosticKind::InvalidNpcRegistration,
                    Some(reg.id),
                    None,
                    format!("NPC registration with invalid id '{}'.", reg.id),
                );
                continue;
            }

            if directory.factories.contains_key(id) {
                directory.diagnostics.error(
                    DiagnosticKind::InvalidNpcRegistration,
                    Some(id),
                    None,
                    format!("Duplicate NPC registration with id '{}'.", id),
                );
                continue;
            }

            directory.factories.insert(reg.id, reg.factory);
        }

        tracing::debug!(target: "data", "Registered {} NPC behaviors", directory.factories.len());
        directory
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn factory(&self, id: &str) -> Option<NpcFactory> {
        self.factories.get(id).copied()
    }

    pub fn create(&self, id: &str) -> Option<Box<dyn NpcBehavior>> {
        self.factory(id).map(|f| f())
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Problems found while discovering registrations.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Mute;

    impl NpcBehavior for Mute {
        fn converse(&self, _speaker: &str, _said: &str) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn builtin_directory_knows_orchibald() {
        let dir = NpcTypeDirectory::global();
        assert!(dir.contains("orchibald"));
        assert_eq!(dir.ids().collect::<Vec<_>>(), vec!["orchibald"]);
        assert!(dir.diagnostics().is_empty());
        assert!(dir.create("orchibald").unwrap().wants_to_harm("anyone"));
    }

    #[test]
    fn duplicate_and_blank_ids_are_rejected() {
        let table: &[NpcRegistration] = npc_registrations! {
            "guard" => Mute,
            "guard" => Orchibald,
            " " => Mute,
        };
        let dir = NpcTypeDirectory::discover(table);

        assert_eq!(dir.ids().collect::<Vec<_>>(), vec!["guard"]);
        assert_eq!(
            dir.diagnostics()
                .count_kind(&DiagnosticKind::InvalidNpcRegistration),
            2
        );
        // first claim wins
        assert!(!dir.create("guard").unwrap().wants_to_harm("anyone"));
    }
}
