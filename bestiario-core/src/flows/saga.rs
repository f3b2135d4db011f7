//! The universal-event flow: narrate the next chapter of a saga.

use super::{Chronicler, FlowError};
use crate::events::{SagaHealth, UniversalEvent};
use crate::planet::PlanetState;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One narrated turn of a planetary saga.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SagaTurn {
    #[schemars(description = "La narración del nuevo suceso que acaba de ocurrir. Debe ser \
                              un párrafo detallado que continúe la historia.")]
    pub new_log_entry: String,

    #[schemars(description = "Un resumen actualizado de la situación global en el planeta. \
                              Máximo dos frases.")]
    pub story_summary: String,

    #[schemars(description = "El estado actualizado del planeta después del suceso \
                              (población, demografía, devastación, etc.).")]
    pub updated_planet: PlanetState,

    #[schemars(description = "El nuevo estado de salud de la criatura.")]
    pub creature_status: SagaHealth,

    #[schemars(description = "Indica si el evento ha concluido (la criatura muere, la \
                              población es aniquilada o se alcanza un final definitivo).")]
    pub is_event_over: bool,
}

impl Chronicler {
    /// Narrate the next turn of an active universal event.
    pub async fn advance_saga(&self, event: &UniversalEvent) -> Result<SagaTurn, FlowError> {
        let prompt = build_saga_prompt(event);
        self.generate_structured(prompt).await
    }
}

fn build_saga_prompt(event: &UniversalEvent) -> String {
    let creature = &event.creature;
    let planet = &event.planet;

    let mut prompt = String::new();
    prompt.push_str(include_str!("prompts/universal_event.txt"));

    prompt.push_str("\n**Contexto General:**\n");
    prompt.push_str(&format!(
        "- Criatura: {}, {}\n",
        creature.name(),
        creature.narrative
    ));
    prompt.push_str(&format!(
        "- Habilidades Clave: {}\n",
        creature.profile.unique_abilities
    ));
    prompt.push_str(&format!(
        "- Debilidades: {}\n",
        creature.profile.weaknesses
    ));
    prompt.push_str(&format!(
        "- Temperamento: {}\n",
        creature.profile.temperament
    ));
    prompt.push_str(&format!("- Estado de la criatura: {}\n", event.health));
    prompt.push_str(&format!("- Planeta: {}\n", planet.name));
    prompt.push_str(&format!("- Turno actual: {}\n", event.turn));

    prompt.push_str("\n**Estado Actual del Planeta:**\n");
    prompt.push_str(&format!("- Descripción: {}\n", planet.description));
    prompt.push_str(&format!("- Población Total: {}\n", planet.population));
    prompt.push_str(&format!(
        "- Demografía: {} infantes, {} niños, {} adolescentes, {} adultos, {} ancianos\n",
        planet.demographics.infants,
        planet.demographics.children,
        planet.demographics.adolescents,
        planet.demographics.adults,
        planet.demographics.elderly
    ));
    prompt.push_str(&format!(
        "- Nivel de Devastación: {}%\n",
        planet.devastation_level
    ));
    prompt.push_str(&format!("- Estado General: {}\n", planet.status));

    prompt.push_str("\n**Historial de Sucesos Previos:**\n");
    for entry in &event.event_log {
        prompt.push_str(&format!("- {entry}\n"));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::create_sample_creature;
    use crate::planet::find_planet;

    #[test]
    fn test_prompt_carries_saga_context() {
        let creature = create_sample_creature("Dragonus");
        let planet = find_planet("Tierra").unwrap().clone();
        let mut event = UniversalEvent::begin(creature, planet);
        event.turn = 4;
        event
            .event_log
            .push("Día 3: La criatura despertó en la tundra.".to_string());

        let prompt = build_saga_prompt(&event);

        assert!(prompt.contains("Criatura: Dragonus"));
        assert!(prompt.contains("Planeta: Tierra"));
        assert!(prompt.contains("Turno actual: 4"));
        assert!(prompt.contains("- Día 3: La criatura despertó en la tundra."));
        assert!(prompt.contains("Población Total: 7800000000"));
    }

    #[test]
    fn test_turn_deserializes_from_model_json() {
        let raw = r#"{
            "new_log_entry": "La criatura derribó la flota orbital.",
            "story_summary": "El planeta queda sin defensas.",
            "updated_planet": {
                "name": "Tierra",
                "population": 7000000000,
                "initial_population": 7800000000,
                "demographics": {
                    "infants": 900000000,
                    "children": 1300000000,
                    "adolescents": 1100000000,
                    "adults": 2700000000,
                    "elderly": 1000000000
                },
                "devastation_level": 35,
                "description": "Un planeta herido.",
                "status": "Bajo Asedio"
            },
            "creature_status": "Herida",
            "is_event_over": false
        }"#;
        let turn: SagaTurn = serde_json::from_str(raw).unwrap();

        assert_eq!(turn.creature_status, SagaHealth::Herida);
        assert!(!turn.is_event_over);
        assert_eq!(turn.updated_planet.devastation_level, 35);
    }
}
