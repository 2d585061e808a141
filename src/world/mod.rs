mod builder;
mod item;
mod location;
mod npc;

pub use builder::{World, build_world};
pub use item::{Container, Inventory, Item, ItemAction, Wearable, Wieldable};
pub use location::{Location, LocationPath, NpcPresence};
pub use npc::{Npc, NpcBehavior, NpcFactory, Orchibald};
