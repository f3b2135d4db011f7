//! Creature data model.
//!
//! Contains the user-authored creature profile, the chronicler's
//! valuation fields, and the mutable play state (record, status,
//! combat history) that the arena rewrites after each fight.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven combat scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CombatStats {
    #[schemars(description = "El nivel de ataque de la criatura (0-100).")]
    pub attack: u8,
    #[schemars(description = "El nivel de defensa de la criatura (0-100).")]
    pub defense: u8,
    #[schemars(description = "El nivel de velocidad de la criatura (0-100).")]
    pub speed: u8,
    #[schemars(description = "El nivel de inteligencia de la criatura (0-100).")]
    pub intelligence: u8,
    #[schemars(description = "El nivel de resistencia de la criatura (0-100).")]
    pub stamina: u8,
    #[schemars(description = "El nivel de fuerza de la criatura (0-100).")]
    pub strength: u8,
    #[schemars(description = "El nivel de precisión de la criatura (0-100).")]
    pub precision: u8,
}

impl CombatStats {
    pub fn new(
        attack: u8,
        defense: u8,
        speed: u8,
        intelligence: u8,
        stamina: u8,
        strength: u8,
        precision: u8,
    ) -> Self {
        Self {
            attack,
            defense,
            speed,
            intelligence,
            stamina,
            strength,
            precision,
        }
    }

    /// All scores as (Spanish label, value) pairs, for prompt assembly.
    pub fn as_pairs(&self) -> [(&'static str, u8); 7] {
        [
            ("Ataque", self.attack),
            ("Defensa", self.defense),
            ("Velocidad", self.speed),
            ("Inteligencia", self.intelligence),
            ("Resistencia", self.stamina),
            ("Fuerza", self.strength),
            ("Precisión", self.precision),
        ]
    }

    /// Clamp every score to the declared 0-100 range.
    ///
    /// The range is stated in the response schema but the model is not
    /// trusted to honor it.
    pub fn clamped(self) -> Self {
        Self {
            attack: self.attack.min(100),
            defense: self.defense.min(100),
            speed: self.speed.min(100),
            intelligence: self.intelligence.min(100),
            stamina: self.stamina.min(100),
            strength: self.strength.min(100),
            precision: self.precision.min(100),
        }
    }
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::new(50, 50, 50, 50, 50, 50, 50)
    }
}

/// Rarity tier assigned by the chronicler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Rarity {
    #[serde(rename = "Común")]
    Comun,
    #[serde(rename = "Poco Común")]
    PocoComun,
    #[serde(rename = "Raro")]
    Raro,
    #[serde(rename = "Épico")]
    Epico,
    #[serde(rename = "Legendario")]
    Legendario,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Comun => "Común",
            Rarity::PocoComun => "Poco Común",
            Rarity::Raro => "Raro",
            Rarity::Epico => "Épico",
            Rarity::Legendario => "Legendario",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where a creature stands in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CreatureStatus {
    /// Fit to fight or be released.
    #[default]
    #[serde(rename = "Saludable")]
    Saludable,
    /// Wounded in combat; excluded from the arena.
    #[serde(rename = "Herido")]
    Herido,
    /// Dead; shown only in the cemetery.
    #[serde(rename = "Muerto")]
    Muerto,
    /// Currently living out a universal event.
    #[serde(rename = "Activa")]
    Activa,
}

impl CreatureStatus {
    pub fn name(&self) -> &'static str {
        match self {
            CreatureStatus::Saludable => "Saludable",
            CreatureStatus::Herido => "Herido",
            CreatureStatus::Muerto => "Muerto",
            CreatureStatus::Activa => "Activa",
        }
    }
}

impl fmt::Display for CreatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a fight ended for one of its two fighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CombatOutcome {
    Victoria,
    Derrota,
    Muerte,
    Herido,
    Huida,
}

impl CombatOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            CombatOutcome::Victoria => "victoria",
            CombatOutcome::Derrota => "derrota",
            CombatOutcome::Muerte => "muerte",
            CombatOutcome::Herido => "herido",
            CombatOutcome::Huida => "huida",
        }
    }
}

/// One entry in a creature's combat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatRecord {
    pub opponent: String,
    pub outcome: CombatOutcome,
    pub battlefield: String,
}

/// Everything the user enters in the crafting form.
///
/// Free-text fields may be empty; only the filled ones are woven into
/// the describe prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureProfile {
    pub name: String,
    #[serde(default)]
    pub composition: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub build: String,
    #[serde(default)]
    pub body_parts: String,
    #[serde(default)]
    pub appearance: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub depth: String,
    #[serde(default)]
    pub top_speed: String,
    #[serde(default)]
    pub wingspan: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub girth: String,
    #[serde(default)]
    pub flight_speed: String,
    #[serde(default)]
    pub swim_speed: String,
    #[serde(default)]
    pub jump_height: String,
    #[serde(default)]
    pub bite_force: String,
    #[serde(default)]
    pub carry_capacity: String,
    #[serde(default)]
    pub hide_toughness: String,
    #[serde(default)]
    pub elemental_affinity: String,
    #[serde(default)]
    pub unique_abilities: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub stats: CombatStats,
    #[serde(default)]
    pub temperament: String,
    #[serde(default)]
    pub vocalizations: String,
    #[serde(default)]
    pub diet: String,
    #[serde(default)]
    pub habitat: String,
    #[serde(default)]
    pub ecological_role: String,
    #[serde(default)]
    pub social_role: String,
    #[serde(default)]
    pub longevity: String,
    #[serde(default)]
    pub breeding_fit: bool,
    #[serde(default)]
    pub parenting_skills: String,
    #[serde(default)]
    pub symbiotic_ties: String,
    #[serde(default)]
    pub origin_story: String,
}

impl CreatureProfile {
    /// Create a profile with just a name; every other field empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            composition: String::new(),
            size: String::new(),
            build: String::new(),
            body_parts: String::new(),
            appearance: String::new(),
            height: String::new(),
            weight: String::new(),
            width: String::new(),
            depth: String::new(),
            top_speed: String::new(),
            wingspan: String::new(),
            length: String::new(),
            girth: String::new(),
            flight_speed: String::new(),
            swim_speed: String::new(),
            jump_height: String::new(),
            bite_force: String::new(),
            carry_capacity: String::new(),
            hide_toughness: String::new(),
            elemental_affinity: String::new(),
            unique_abilities: String::new(),
            weaknesses: String::new(),
            stats: CombatStats::default(),
            temperament: String::new(),
            vocalizations: String::new(),
            diet: String::new(),
            habitat: String::new(),
            ecological_role: String::new(),
            social_role: String::new(),
            longevity: String::new(),
            breeding_fit: false,
            parenting_skills: String::new(),
            symbiotic_ties: String::new(),
            origin_story: String::new(),
        }
    }
}

/// A crafted creature: profile, chronicler valuation, and play state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub profile: CreatureProfile,

    /// Narrative description and origin lore written by the chronicler.
    pub narrative: String,

    /// Definitive combat scores.
    pub combat_stats: CombatStats,

    pub rarity: Rarity,

    /// Technical assessment from a beast expert.
    pub expert_review: String,

    /// Street rumors and public opinion.
    pub public_review: String,

    /// The chronicler's own take on the design.
    pub ai_review: String,

    /// Final score, 1-5 stars.
    pub star_rating: u8,

    #[serde(default)]
    pub wins: u32,

    #[serde(default)]
    pub losses: u32,

    #[serde(default)]
    pub status: CreatureStatus,

    #[serde(default)]
    pub combat_history: Vec<CombatRecord>,

    #[serde(default)]
    pub death_cause: Option<String>,
}

impl Creature {
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Whether the creature can enter the arena or be released.
    pub fn is_healthy(&self) -> bool {
        self.status == CreatureStatus::Saludable
    }

    pub fn is_dead(&self) -> bool {
        self.status == CreatureStatus::Muerto
    }
}

/// Build a fully-valued creature for tests and demos.
pub fn create_sample_creature(name: &str) -> Creature {
    let mut profile = CreatureProfile::new(name);
    profile.composition = "Escamas de obsidiana, núcleo de magma".to_string();
    profile.size = "mediano".to_string();
    profile.build = "atlético".to_string();
    profile.elemental_affinity = "fuego".to_string();
    profile.unique_abilities = "Aliento de fuego espectral".to_string();
    profile.weaknesses = "Frío profundo".to_string();
    profile.temperament = "solitaria".to_string();
    profile.diet = "energía geotérmica".to_string();
    profile.habitat = "picos volcánicos".to_string();
    profile.vocalizations = "Rugido grave y resonante".to_string();
    profile.stats = CombatStats::new(75, 65, 60, 70, 80, 70, 50);

    Creature {
        profile,
        narrative: format!("{name}, el eco solitario de la forja ardiente."),
        combat_stats: CombatStats::new(75, 65, 60, 70, 80, 70, 50),
        rarity: Rarity::Legendario,
        expert_review: "Una base formidable en resistencia y ataque.".to_string(),
        public_review: "Dicen que la tierra tiembla a su paso.".to_string(),
        ai_review: "Un diseño equilibrado y creíble dentro de su propio lore.".to_string(),
        star_rating: 5,
        wins: 0,
        losses: 0,
        status: CreatureStatus::Saludable,
        combat_history: Vec::new(),
        death_cause: None,
    }
}
