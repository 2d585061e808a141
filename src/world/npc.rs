use std::fmt;

/// Custom behavior for a data-defined NPC.
///
/// The data files describe where an NPC stands and how it looks; everything
/// it *does* lives in an implementation of this trait, registered under the
/// NPC's prototype id.
pub trait NpcBehavior: fmt::Debug {
    fn max_health(&self) -> u32 {
        100
    }

    /// Lines spoken when a character talks to this NPC.
    fn converse(&self, speaker: &str, said: &str) -> Vec<String>;

    fn wants_to_harm(&self, _other: &str) -> bool {
        false
    }
}

/// Zero-argument constructor for a behavior.
pub type NpcFactory = fn() -> Box<dyn NpcBehavior>;

/// Live NPC, bound to its behavior and current location.
#[derive(Debug)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub call_name: String,
    /// id of the location the NPC is currently in
    pub location: String,
    pub health: u32,
    behavior: Box<dyn NpcBehavior>,
}

impl Npc {
    pub fn new(id: impl Into<String>, location: impl Into<String>, behavior: Box<dyn NpcBehavior>) -> Self {
        Npc {
            id: id.into(),
            name: String::new(),
            call_name: String::new(),
            location: location.into(),
            health: behavior.max_health(),
            behavior,
        }
    }

    pub fn behavior(&self) -> &dyn NpcBehavior {
        self.behavior.as_ref()
    }

    pub fn converse(&self, speaker: &str, said: &str) -> Vec<String> {
        self.behavior.converse(speaker, said)
    }

    pub fn wants_to_harm(&self, other: &str) -> bool {
        self.behavior.wants_to_harm(other)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

impl fmt::Display for Npc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/////////////////////////
/// BUILT-IN BEHAVIORS ///
/////////////////////////

/// The great Orchibald. Suspicious, and always up for a fight.
#[derive(Debug, Default)]
pub struct Orchibald;

impl NpcBehavior for Orchibald {
    fn converse(&self, _speaker: &str, _said: &str) -> Vec<String> {
        vec![
            "Hello.....".to_string(),
            "Anyways, i wasn't being suspicious at all just now...".to_string(),
            "Just so you know *cough*".to_string(),
        ]
    }

    fn wants_to_harm(&self, _other: &str) -> bool {
        true
    }
}
