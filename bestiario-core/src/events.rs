//! Universal events: planetary sagas.
//!
//! A universal event pairs one creature with one planet and advances in
//! fixed three-day turns narrated by the chronicler. The event record
//! keeps an append-only log; the planet is replaced wholesale each turn.

use crate::creature::{Creature, CreatureStatus};
use crate::flows::SagaTurn;
use crate::planet::PlanetState;
use crate::store::unix_timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// In-game days that pass per saga turn.
pub const DAYS_PER_TURN: u32 = 3;

/// Unique identifier for universal events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The creature's health over the course of a saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum SagaHealth {
    #[default]
    #[serde(rename = "Activa")]
    Activa,
    #[serde(rename = "Herida")]
    Herida,
    #[serde(rename = "Muriendo")]
    Muriendo,
    #[serde(rename = "Muerta")]
    Muerta,
}

impl SagaHealth {
    pub fn name(&self) -> &'static str {
        match self {
            SagaHealth::Activa => "Activa",
            SagaHealth::Herida => "Herida",
            SagaHealth::Muriendo => "Muriendo",
            SagaHealth::Muerta => "Muerta",
        }
    }
}

impl fmt::Display for SagaHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One creature's open-ended saga on one planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversalEvent {
    pub id: EventId,

    /// Snapshot of the creature at release time.
    pub creature: Creature,

    pub planet: PlanetState,

    /// Append-only narration log.
    pub event_log: Vec<String>,

    /// Rolling summary of the situation, at most two sentences.
    pub story_summary: String,

    /// Next turn to be narrated (1-based).
    pub turn: u32,

    pub is_active: bool,

    /// When the saga started (unix seconds).
    pub start_date: String,

    /// The creature's health within this saga.
    #[serde(default)]
    pub health: SagaHealth,
}

impl UniversalEvent {
    /// Release a creature onto a planet, starting a fresh saga.
    pub fn begin(mut creature: Creature, planet: PlanetState) -> Self {
        creature.status = CreatureStatus::Activa;
        let name = creature.name().to_string();

        Self {
            id: EventId::new(),
            creature,
            event_log: vec![format!(
                "La criatura \"{name}\" ha sido liberada en {}. El universo contiene la \
                 respiración.",
                planet.name
            )],
            story_summary: format!(
                "\"{name}\" acaba de llegar a {}, un mundo desprevenido de la nueva presencia \
                 en su ecosistema.",
                planet.name
            ),
            planet,
            turn: 1,
            is_active: true,
            start_date: unix_timestamp(),
            health: SagaHealth::Activa,
        }
    }

    /// Restart a concluded saga on a new planet.
    pub fn rekindle(&mut self, planet: PlanetState) {
        let name = self.creature.name().to_string();

        self.event_log = vec![format!(
            "Tras su saga anterior, \"{name}\" viaja a un nuevo mundo: {}. La odisea continúa.",
            planet.name
        )];
        self.story_summary = format!(
            "\"{name}\" ha llegado a {}, un mundo que no sospecha la magnitud de la leyenda \
             que acaba de aterrizar.",
            planet.name
        );
        self.planet = planet;
        self.turn = 1;
        self.is_active = true;
        self.start_date = unix_timestamp();
        self.health = SagaHealth::Activa;
        self.creature.status = CreatureStatus::Activa;
    }

    /// The in-game day the next turn will narrate.
    pub fn current_day(&self) -> u32 {
        self.turn * DAYS_PER_TURN
    }

    /// Fold a narrated turn into the event record.
    pub fn apply_turn(&mut self, result: &SagaTurn) {
        let day = self.current_day();
        self.event_log
            .push(format!("Día {day}: {}", result.new_log_entry));
        self.story_summary = result.story_summary.clone();
        self.planet = result.updated_planet.clone();
        self.health = result.creature_status;
        self.turn += 1;
        self.is_active = !result.is_event_over;
    }

    /// The bestiary status (and death cause, if any) a creature should
    /// carry once its saga has concluded.
    pub fn bestiary_status_after(&self) -> (CreatureStatus, Option<String>) {
        match self.health {
            SagaHealth::Muerta => {
                let cause = self.event_log.last().cloned();
                (CreatureStatus::Muerto, cause)
            }
            SagaHealth::Herida | SagaHealth::Muriendo => (CreatureStatus::Herido, None),
            SagaHealth::Activa => (CreatureStatus::Saludable, None),
        }
    }
}

/// Whether a creature is currently living out an active saga.
pub fn is_creature_engaged(events: &[UniversalEvent], name: &str) -> bool {
    events
        .iter()
        .any(|e| e.is_active && e.creature.name() == name)
}

/// Whether some active saga already takes place on the named planet.
pub fn is_planet_occupied(events: &[UniversalEvent], planet_name: &str) -> bool {
    events
        .iter()
        .any(|e| e.is_active && e.planet.name == planet_name)
}
