//! Game - the primary public API.
//!
//! Wraps the chronicler, the store, and the deterministic settlement
//! logic into a single façade: craft, save, fight, release, advance,
//! back up. Every operation loads the documents it needs, mutates them
//! in memory, and persists only after the generative call has succeeded,
//! so a failed flow never leaves partial state behind.

use crate::arena::{bet_is_valid, settle_combat, Fight, Settlement};
use crate::creature::{Creature, CreatureProfile, CreatureStatus};
use crate::events::{is_creature_engaged, is_planet_occupied, EventId, UniversalEvent};
use crate::flows::{Chronicler, ChroniclerConfig, CombatReport, FlowError, SagaTurn};
use crate::planet::{find_planet, Battlefield, PlanetState};
use crate::store::{Backup, GameStore, StoreError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from Game operations.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("No API key configured - set GEMINI_API_KEY environment variable")]
    NoApiKey,

    #[error("La apuesta debe ser mayor que cero y no puede exceder tu capital.")]
    InvalidBet,

    #[error("Ya existe una criatura llamada \"{0}\" en tu bestiario.")]
    DuplicateName(String),

    #[error("\"{0}\" no está disponible: está {1}.")]
    NotAvailable(String, String),

    #[error("No existe ninguna criatura llamada \"{0}\".")]
    UnknownCreature(String),

    #[error("Planeta no encontrado: {0}")]
    UnknownPlanet(String),

    #[error("Evento no encontrado.")]
    UnknownEvent,

    #[error("El evento ya ha concluido.")]
    EventOver,

    #[error("Describe el sonido de la criatura en el campo de vocalizaciones.")]
    NoVocalization,
}

/// Configuration for creating a game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Directory holding the persisted game documents.
    pub data_dir: PathBuf,

    /// Model override for the chronicler.
    pub model: Option<String>,

    /// Maximum tokens for chronicler responses.
    pub max_output_tokens: usize,

    /// Temperature for chronicler generation.
    pub temperature: Option<f32>,
}

impl GameConfig {
    /// Create a config with the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let defaults = ChroniclerConfig::default();
        Self {
            data_dir: data_dir.into(),
            model: None,
            max_output_tokens: defaults.max_output_tokens,
            temperature: defaults.temperature,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: usize) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Where to release a creature.
#[derive(Debug, Clone)]
pub enum Destination {
    /// A built-in planet, by name.
    Planet(String),
    /// A brand-new world generated by the chronicler.
    NewWorld,
}

/// Everything a finished fight produced.
#[derive(Debug, Clone)]
pub struct FightResult {
    pub report: CombatReport,
    pub settlement: Settlement,
    pub battlefield: Battlefield,
}

/// One advanced saga turn plus the updated event record.
#[derive(Debug, Clone)]
pub struct SagaAdvance {
    pub turn: SagaTurn,
    pub event: UniversalEvent,
}

/// A creature-crafting game session.
pub struct Game {
    chronicler: Chronicler,
    store: GameStore,
}

impl Game {
    /// Create a game with the given configuration.
    ///
    /// Requires `GEMINI_API_KEY` environment variable to be set.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let chronicler_config = ChroniclerConfig {
            model: config.model,
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        };
        let chronicler = Chronicler::from_env()
            .map_err(|_| GameError::NoApiKey)?
            .with_config(chronicler_config);

        Ok(Self {
            chronicler,
            store: GameStore::new(config.data_dir),
        })
    }

    /// Create a game from pre-built parts.
    pub fn with_parts(chronicler: Chronicler, store: GameStore) -> Self {
        Self { chronicler, store }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    // ========================================================================
    // Crafting
    // ========================================================================

    /// Ask the chronicler to value a creature profile.
    ///
    /// The result is not persisted; call [`Game::save_creature`] to add
    /// it to the bestiary.
    pub async fn craft(&self, profile: &CreatureProfile) -> Result<Creature, GameError> {
        let valuation = self.chronicler.describe_creature(profile).await?;
        Ok(valuation.into_creature(profile.clone()))
    }

    /// Add a crafted creature to the bestiary. Names must be unique.
    pub async fn save_creature(&self, creature: &Creature) -> Result<(), GameError> {
        let mut bestiary = self.store.load_bestiary().await?;
        if bestiary.iter().any(|c| c.name() == creature.name()) {
            return Err(GameError::DuplicateName(creature.name().to_string()));
        }
        bestiary.push(creature.clone());
        self.store.save_bestiary(&bestiary).await?;
        Ok(())
    }

    /// The bestiary ranked by wins, best record first.
    pub async fn bestiary(&self) -> Result<Vec<Creature>, GameError> {
        let mut bestiary = self.store.load_bestiary().await?;
        bestiary.sort_by(|a, b| b.wins.cmp(&a.wins));
        Ok(bestiary)
    }

    /// Creatures that died in combat or on a saga, for the cemetery.
    pub async fn fallen(&self) -> Result<Vec<Creature>, GameError> {
        let bestiary = self.store.load_bestiary().await?;
        Ok(bestiary.into_iter().filter(|c| c.is_dead()).collect())
    }

    /// Delete every creature. Irreversible.
    pub async fn clear_bestiary(&self) -> Result<(), GameError> {
        self.store.clear_bestiary().await?;
        Ok(())
    }

    /// The player's current capital.
    pub async fn capital(&self) -> Result<i64, GameError> {
        Ok(self.store.load_capital().await?)
    }

    // ========================================================================
    // Arena
    // ========================================================================

    /// Run a wagered fight end to end: validate, simulate, settle,
    /// persist.
    pub async fn fight(
        &self,
        contender: &str,
        opponent: &str,
        bet: i64,
    ) -> Result<FightResult, GameError> {
        let mut bestiary = self.store.load_bestiary().await?;
        let events = self.store.load_events().await?;
        let capital = self.store.load_capital().await?;

        if !bet_is_valid(bet, capital) {
            return Err(GameError::InvalidBet);
        }

        let creature1 = find_creature(&bestiary, contender)?.clone();
        let creature2 = find_creature(&bestiary, opponent)?.clone();
        ensure_can_fight(&creature1, &events)?;
        ensure_can_fight(&creature2, &events)?;

        let battlefield = Battlefield::random();
        let fight = Fight {
            contender: contender.to_string(),
            opponent: opponent.to_string(),
            battlefield: battlefield.clone(),
            bet,
        };

        // Nothing is persisted until the chronicler has answered.
        let report = self
            .chronicler
            .simulate_combat(&creature1, &creature2, &battlefield)
            .await?;

        let settlement = settle_combat(&mut bestiary, capital, &fight, &report);

        self.store.save_bestiary(&bestiary).await?;
        self.store.save_capital(settlement.new_capital).await?;

        Ok(FightResult {
            report,
            settlement,
            battlefield,
        })
    }

    // ========================================================================
    // Universal events
    // ========================================================================

    /// Release a creature onto a planet, starting (or continuing) its
    /// saga. Returns the event record.
    pub async fn release(
        &self,
        name: &str,
        destination: Destination,
    ) -> Result<UniversalEvent, GameError> {
        let mut bestiary = self.store.load_bestiary().await?;
        let mut events = self.store.load_events().await?;

        let creature = find_creature(&bestiary, name)?.clone();
        if creature.is_dead() {
            return Err(GameError::NotAvailable(
                name.to_string(),
                creature.status.to_string(),
            ));
        }
        if is_creature_engaged(&events, name) {
            return Err(GameError::NotAvailable(
                name.to_string(),
                CreatureStatus::Activa.to_string(),
            ));
        }

        let planet = match destination {
            Destination::Planet(planet_name) => find_planet(&planet_name)
                .cloned()
                .ok_or(GameError::UnknownPlanet(planet_name))?,
            Destination::NewWorld => self.chronicler.generate_planet().await?,
        };

        let event = match events
            .iter_mut()
            .find(|e| !e.is_active && e.creature.name() == name)
        {
            Some(finished) => {
                finished.rekindle(planet);
                finished.clone()
            }
            None => {
                let event = UniversalEvent::begin(creature, planet);
                events.push(event.clone());
                event
            }
        };

        if let Some(entry) = bestiary.iter_mut().find(|c| c.name() == name) {
            entry.status = CreatureStatus::Activa;
        }

        self.store.save_events(&events).await?;
        self.store.save_bestiary(&bestiary).await?;

        Ok(event)
    }

    /// Whether an active saga already takes place on the named planet.
    pub async fn planet_occupied(&self, planet_name: &str) -> Result<bool, GameError> {
        let events = self.store.load_events().await?;
        Ok(is_planet_occupied(&events, planet_name))
    }

    /// All universal events, active and concluded.
    pub async fn events(&self) -> Result<Vec<UniversalEvent>, GameError> {
        Ok(self.store.load_events().await?)
    }

    /// Narrate and apply the next turn of an active saga.
    pub async fn advance_saga(&self, id: EventId) -> Result<SagaAdvance, GameError> {
        let mut events = self.store.load_events().await?;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(GameError::UnknownEvent)?;
        if !event.is_active {
            return Err(GameError::EventOver);
        }

        let turn = self.chronicler.advance_saga(event).await?;
        event.apply_turn(&turn);

        // When the saga concludes, the bestiary copy catches up.
        let sync = (!event.is_active).then(|| {
            let (status, cause) = event.bestiary_status_after();
            (event.creature.name().to_string(), status, cause)
        });
        let advanced = event.clone();

        if let Some((name, status, cause)) = sync {
            let mut bestiary = self.store.load_bestiary().await?;
            if let Some(entry) = bestiary.iter_mut().find(|c| c.name() == name) {
                entry.status = status;
                if status == CreatureStatus::Muerto {
                    entry.death_cause = cause;
                }
            }
            self.store.save_bestiary(&bestiary).await?;
        }

        self.store.save_events(&events).await?;

        Ok(SagaAdvance {
            turn,
            event: advanced,
        })
    }

    // ========================================================================
    // Sound
    // ========================================================================

    /// Generate the vocalization audio of a saved creature.
    pub async fn creature_sound(&self, name: &str) -> Result<String, GameError> {
        let bestiary = self.store.load_bestiary().await?;
        let creature = find_creature(&bestiary, name)?;
        if creature.profile.vocalizations.is_empty() {
            return Err(GameError::NoVocalization);
        }
        Ok(self
            .chronicler
            .generate_sound(&creature.profile.vocalizations)
            .await?)
    }

    // ========================================================================
    // Backup
    // ========================================================================

    /// Export the full game state to a backup file.
    pub async fn export_backup(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        let backup = self.store.export_backup().await?;
        backup.save_json(path).await?;
        Ok(())
    }

    /// Restore the full game state from a backup file.
    pub async fn import_backup(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        let backup = Backup::load_json(path).await?;
        self.store.import_backup(&backup).await?;
        Ok(())
    }
}

fn find_creature<'a>(bestiary: &'a [Creature], name: &str) -> Result<&'a Creature, GameError> {
    bestiary
        .iter()
        .find(|c| c.name() == name)
        .ok_or_else(|| GameError::UnknownCreature(name.to_string()))
}

fn ensure_can_fight(creature: &Creature, events: &[UniversalEvent]) -> Result<(), GameError> {
    if is_creature_engaged(events, creature.name()) {
        return Err(GameError::NotAvailable(
            creature.name().to_string(),
            CreatureStatus::Activa.to_string(),
        ));
    }
    if !creature.is_healthy() {
        return Err(GameError::NotAvailable(
            creature.name().to_string(),
            creature.status.to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::create_sample_creature;

    #[test]
    fn test_game_config_builder() {
        let config = GameConfig::new("/tmp/bestiario")
            .with_model("gemini-2.5-pro")
            .with_max_output_tokens(2048)
            .with_temperature(0.5);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/bestiario"));
        assert_eq!(config.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.max_output_tokens, 2048);
        assert_eq!(config.temperature, Some(0.5));
    }

    #[test]
    fn test_error_messages_are_localized() {
        assert!(GameError::InvalidBet.to_string().contains("apuesta"));
        assert!(GameError::DuplicateName("Dragonus".to_string())
            .to_string()
            .contains("Ya existe una criatura"));
    }

    #[test]
    fn test_ensure_can_fight() {
        let healthy = create_sample_creature("Dragonus");
        assert!(ensure_can_fight(&healthy, &[]).is_ok());

        let mut wounded = create_sample_creature("Golemech");
        wounded.status = CreatureStatus::Herido;
        let err = ensure_can_fight(&wounded, &[]).unwrap_err();
        assert!(matches!(err, GameError::NotAvailable(_, ref s) if s == "Herido"));

        let planet = crate::planet::find_planet("Marte").unwrap().clone();
        let events = vec![UniversalEvent::begin(
            create_sample_creature("Umbra"),
            planet,
        )];
        let engaged = create_sample_creature("Umbra");
        assert!(ensure_can_fight(&engaged, &events).is_err());
    }

    #[test]
    fn test_find_creature() {
        let bestiary = vec![create_sample_creature("Dragonus")];
        assert!(find_creature(&bestiary, "Dragonus").is_ok());
        assert!(matches!(
            find_creature(&bestiary, "Fenix"),
            Err(GameError::UnknownCreature(_))
        ));
    }
}
