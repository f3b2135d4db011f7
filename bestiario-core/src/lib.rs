//! Creature-crafting game core with an AI chronicler.
//!
//! This crate provides:
//! - The five generative flows (creature valuation, planet generation,
//!   combat simulation, saga narration, vocalization audio)
//! - Deterministic arena settlement and wager math
//! - Universal-event (planetary saga) bookkeeping
//! - Local JSON persistence with versioned backup export/import
//!
//! # Quick Start
//!
//! ```ignore
//! use bestiario_core::{CreatureProfile, Game, GameConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let game = Game::new(GameConfig::new("./bestiario-data"))?;
//!
//!     let mut profile = CreatureProfile::new("Dragonus");
//!     profile.elemental_affinity = "fuego".to_string();
//!
//!     let creature = game.craft(&profile).await?;
//!     println!("{}", creature.narrative);
//!     game.save_creature(&creature).await?;
//!     Ok(())
//! }
//! ```

pub mod arena;
pub mod creature;
pub mod events;
pub mod flows;
pub mod game;
pub mod planet;
pub mod store;
pub mod testing;

// Primary public API
pub use creature::{
    create_sample_creature, CombatOutcome, CombatRecord, CombatStats, Creature, CreatureProfile,
    CreatureStatus, Rarity,
};
pub use events::{EventId, SagaHealth, UniversalEvent};
pub use flows::{Chronicler, ChroniclerConfig, CombatReport, CreatureValuation, FlowError, SagaTurn};
pub use game::{Destination, FightResult, Game, GameConfig, GameError, SagaAdvance};
pub use planet::{Battlefield, Demographics, PlanetState, PlanetStatus, BATTLEFIELDS, PLANETS};
pub use store::{Backup, GameStore, StoreError, DEFAULT_CAPITAL};
pub use testing::{MockChronicler, TestHarness};
