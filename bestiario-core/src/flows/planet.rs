//! The generate-planet flow: a brand-new world from nothing.

use super::{Chronicler, FlowError};
use crate::planet::{PlanetState, PlanetStatus};

impl Chronicler {
    /// Generate a unique, never-before-seen planet.
    pub async fn generate_planet(&self) -> Result<PlanetState, FlowError> {
        let prompt = include_str!("prompts/generate_planet.txt").to_string();
        let planet = self.generate_structured(prompt).await?;
        Ok(patch_new_planet(planet))
    }
}

/// Force the initial-state invariants the prompt asks for but the model
/// does not reliably honor.
fn patch_new_planet(mut planet: PlanetState) -> PlanetState {
    planet.devastation_level = 0;
    planet.status = PlanetStatus::Estable;
    planet.initial_population = planet.population;
    planet
}
