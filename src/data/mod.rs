mod config;
mod diagnostics;
mod error;
mod loader;
mod npc_types;
mod prototype;
mod registry;
mod validator;

pub use config::{DATA_DIR_ENV, DataPaths};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::DataError;
pub use loader::load_all;
pub use npc_types::{BUILTIN_NPCS, NpcRegistration, NpcTypeDirectory};
pub use prototype::{
    BodyPart, BodyParts, Fraction, ItemActionPrototype, ItemPrototype, LocationPrototype,
    NpcPrototype, Prototype, PrototypeCommon, PrototypeKind, WearableLayer, WearableLayers,
};
pub use registry::PrototypeRegistry;
pub use validator::validate;
