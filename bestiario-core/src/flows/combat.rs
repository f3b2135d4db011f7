//! The simulate-combat flow: two creatures and a battlefield in, an
//! AI-narrated battle with betting odds out.

use super::{Chronicler, FlowError};
use crate::creature::{CombatOutcome, Creature};
use crate::planet::Battlefield;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the fight ended for one creature.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FighterOutcome {
    #[schemars(description = "El desenlace para esta criatura.")]
    pub outcome: CombatOutcome,

    #[schemars(description = "Descripción del resultado, especialmente importante si es \
                              'muerte'.")]
    pub description: Option<String>,
}

/// The chronicler's full account of a wagered fight.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CombatReport {
    #[schemars(description = "Una narración detallada y épica del combate, describiendo las \
                              acciones, el entorno, las reacciones y el clímax de la batalla.")]
    pub combat_log: String,

    #[schemars(description = "El nombre de la criatura que ha ganado el combate. Puede ser \
                              nulo si ambas huyen o mueren.")]
    pub winner_name: Option<String>,

    #[schemars(description = "El nombre de la criatura considerada favorita para ganar ANTES \
                              del combate.")]
    pub favorite_name: String,

    #[schemars(description = "Las probabilidades de la apuesta para el favorito, en formato \
                              'X:1'.")]
    pub odds: String,

    #[schemars(description = "El desenlace para la primera criatura.")]
    pub creature1_outcome: FighterOutcome,

    #[schemars(description = "El desenlace para la segunda criatura.")]
    pub creature2_outcome: FighterOutcome,
}

impl Chronicler {
    /// Simulate a battle between two creatures on the given battlefield.
    pub async fn simulate_combat(
        &self,
        creature1: &Creature,
        creature2: &Creature,
        battlefield: &Battlefield,
    ) -> Result<CombatReport, FlowError> {
        let prompt = build_combat_prompt(creature1, creature2, battlefield);
        self.generate_structured(prompt).await
    }
}

fn build_combat_prompt(
    creature1: &Creature,
    creature2: &Creature,
    battlefield: &Battlefield,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(include_str!("prompts/simulate_combat.txt"));

    prompt.push_str(&format!("\n**Campo de Batalla: {}**\n", battlefield.name));
    prompt.push_str(&format!(
        "- Descripción del entorno: {}\n",
        battlefield.description
    ));

    push_fighter(&mut prompt, 1, creature1);
    push_fighter(&mut prompt, 2, creature2);

    prompt
}

fn push_fighter(prompt: &mut String, index: usize, creature: &Creature) {
    prompt.push_str(&format!("\n**Criatura {index}: {}**\n", creature.name()));
    prompt.push_str(&format!(
        "- Descripción y Habilidades: {}\n",
        creature.narrative
    ));
    prompt.push_str(&format!(
        "- Debilidades: {}\n",
        creature.profile.weaknesses
    ));
    prompt.push_str(&format!(
        "- Hábitat Natural: {}\n",
        creature.profile.habitat
    ));
    prompt.push_str(&format!(
        "- **Temperamento: {}**\n",
        creature.profile.temperament
    ));
    let stats =
        serde_json::to_string(&creature.combat_stats).unwrap_or_else(|_| "{}".to_string());
    prompt.push_str(&format!("- Estadísticas: {stats}\n"));
}
