//! The describe-creature flow: profile in, full valuation out.

use super::{Chronicler, FlowError};
use crate::creature::{CombatStats, Creature, CreatureProfile, CreatureStatus, Rarity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The chronicler's verdict on a crafted creature.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatureValuation {
    #[schemars(description = "El nombre de la criatura.")]
    pub name: String,

    #[schemars(description = "La descripción narrativa completa con la historia de origen, \
                              como una entrada en un bestiario legendario.")]
    pub narrative: String,

    #[schemars(description = "Las estadísticas de combate definitivas.")]
    pub combat_stats: CombatStats,

    #[schemars(description = "La rareza asignada a la criatura.")]
    pub rarity: Rarity,

    #[schemars(description = "Valoración técnica de un experto en bestias.")]
    pub expert_review: String,

    #[schemars(description = "Rumores y opiniones del público general sobre la criatura.")]
    pub public_review: String,

    #[schemars(description = "Reseña de la propia IA sobre la coherencia del diseño.")]
    pub ai_review: String,

    #[schemars(description = "Puntuación final de 1 a 5 estrellas.")]
    pub star_rating: u8,
}

impl CreatureValuation {
    /// Combine a valuation with the profile it was generated from.
    pub fn into_creature(self, profile: CreatureProfile) -> Creature {
        Creature {
            profile,
            narrative: self.narrative,
            combat_stats: self.combat_stats,
            rarity: self.rarity,
            expert_review: self.expert_review,
            public_review: self.public_review,
            ai_review: self.ai_review,
            star_rating: self.star_rating,
            wins: 0,
            losses: 0,
            status: CreatureStatus::Saludable,
            combat_history: Vec::new(),
            death_cause: None,
        }
    }
}

impl Chronicler {
    /// Generate lore, stats, rarity, reviews, and a star rating for a
    /// creature profile.
    pub async fn describe_creature(
        &self,
        profile: &CreatureProfile,
    ) -> Result<CreatureValuation, FlowError> {
        let prompt = build_describe_prompt(profile);
        let valuation = self.generate_structured(prompt).await?;
        Ok(patch_valuation(valuation, profile))
    }
}

/// Re-impose the guarantees the model is not trusted with: the name
/// always equals the input name, stats stay in 0-100, stars in 1-5.
fn patch_valuation(mut valuation: CreatureValuation, profile: &CreatureProfile) -> CreatureValuation {
    valuation.name = profile.name.clone();
    valuation.combat_stats = valuation.combat_stats.clamped();
    valuation.star_rating = valuation.star_rating.clamp(1, 5);
    valuation
}

fn build_describe_prompt(profile: &CreatureProfile) -> String {
    let mut prompt = String::new();
    prompt.push_str(include_str!("prompts/describe_creature.txt"));

    prompt.push_str("\n**Detalles de la Criatura:**\n");
    prompt.push_str(&format!("- **Nombre:** {}\n", profile.name));
    prompt.push_str(&format!(
        "- **Composición y Materiales:** {}\n",
        profile.composition
    ));
    prompt.push_str(&format!(
        "- **Atributos Físicos:** Mide {}, tiene una complexión {}. Sus partes más notables \
         son {}. Su apariencia general y textura es {}.\n",
        profile.size, profile.build, profile.body_parts, profile.appearance
    ));

    let measurements = [
        ("Altura", &profile.height),
        ("Peso", &profile.weight),
        ("Anchura", &profile.width),
        ("Profundidad", &profile.depth),
        ("Velocidad máxima", &profile.top_speed),
        ("Envergadura", &profile.wingspan),
        ("Longitud", &profile.length),
        ("Circunferencia", &profile.girth),
        ("Velocidad de vuelo", &profile.flight_speed),
        ("Velocidad de nado", &profile.swim_speed),
        ("Capacidad de salto", &profile.jump_height),
        ("Fuerza de mordida", &profile.bite_force),
        ("Capacidad de carga", &profile.carry_capacity),
        ("Resistencia de la piel", &profile.hide_toughness),
    ];
    let filled: Vec<String> = measurements
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
    if !filled.is_empty() {
        prompt.push_str(&format!("- **Medidas Detalladas:** {}\n", filled.join(", ")));
    }

    prompt.push_str(&format!(
        "- **Afinidad Elemental:** {}\n",
        profile.elemental_affinity
    ));
    prompt.push_str(&format!(
        "- **Habilidades Únicas:** {}\n",
        profile.unique_abilities
    ));
    prompt.push_str(&format!("- **Debilidades:** {}\n", profile.weaknesses));

    prompt.push_str("- **Estadísticas de Combate Propuestas:**\n");
    for (label, value) in profile.stats.as_pairs() {
        prompt.push_str(&format!("  - {label}: {value}/100\n"));
    }

    prompt.push_str("- **Comportamiento y Lore:**\n");
    prompt.push_str(&format!("  - **Temperamento:** {}\n", profile.temperament));
    prompt.push_str(&format!("  - **Dieta:** {}\n", profile.diet));
    prompt.push_str(&format!("  - **Hábitat Natural:** {}\n", profile.habitat));
    if !profile.ecological_role.is_empty() {
        prompt.push_str(&format!(
            "  - **Rol Ecológico:** {}\n",
            profile.ecological_role
        ));
    }
    prompt.push_str(&format!("  - **Rol Social:** {}\n", profile.social_role));
    if !profile.longevity.is_empty() {
        prompt.push_str(&format!("  - **Longevidad:** {}\n", profile.longevity));
    }
    prompt.push_str(&format!(
        "  - **Reproducción:** {} (Habilidades de crianza: {})\n",
        if profile.breeding_fit { "Sí" } else { "No" },
        profile.parenting_skills
    ));
    if !profile.symbiotic_ties.is_empty() {
        prompt.push_str(&format!(
            "  - **Relaciones Simbióticas:** {}\n",
            profile.symbiotic_ties
        ));
    }
    if !profile.vocalizations.is_empty() {
        prompt.push_str(&format!(
            "  - **Vocalizaciones:** {}\n",
            profile.vocalizations
        ));
    }
    prompt.push_str(&format!(
        "- **Historia de Origen Sugerida por el Creador:** {}\n",
        profile.origin_story
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::create_sample_creature;

    fn sample_valuation(name: &str) -> CreatureValuation {
        CreatureValuation {
            name: name.to_string(),
            narrative: "Una leyenda ígnea.".to_string(),
            combat_stats: CombatStats::new(75, 65, 60, 70, 80, 70, 50),
            rarity: Rarity::Epico,
            expert_review: "Sólida.".to_string(),
            public_review: "Temible.".to_string(),
            ai_review: "Coherente.".to_string(),
            star_rating: 4,
        }
    }

    #[test]
    fn test_patch_overwrites_name() {
        let profile = create_sample_creature("Dragonus").profile;
        let valuation = sample_valuation("Draconis el Magnífico");

        let patched = patch_valuation(valuation, &profile);
        assert_eq!(patched.name, "Dragonus");
    }

    #[test]
    fn test_patch_clamps_ranges() {
        let profile = create_sample_creature("Dragonus").profile;
        let mut valuation = sample_valuation("Dragonus");
        valuation.combat_stats.attack = 250;
        valuation.star_rating = 9;

        let patched = patch_valuation(valuation, &profile);
        assert_eq!(patched.combat_stats.attack, 100);
        assert_eq!(patched.star_rating, 5);

        let mut valuation = sample_valuation("Dragonus");
        valuation.star_rating = 0;
        let patched = patch_valuation(valuation, &profile);
        assert_eq!(patched.star_rating, 1);
    }

    #[test]
    fn test_prompt_includes_profile_fields() {
        let profile = create_sample_creature("Dragonus").profile;
        let prompt = build_describe_prompt(&profile);

        assert!(prompt.contains("**Nombre:** Dragonus"));
        assert!(prompt.contains("Escamas de obsidiana"));
        assert!(prompt.contains("Ataque: 75/100"));
        assert!(prompt.contains("**Temperamento:** solitaria"));
        assert!(prompt.contains("Reproducción:** No"));
        // Empty measurement fields stay out of the prompt
        assert!(!prompt.contains("Medidas Detalladas"));
    }

    #[test]
    fn test_prompt_includes_filled_measurements() {
        let mut profile = create_sample_creature("Dragonus").profile;
        profile.wingspan = "15m".to_string();
        profile.bite_force = "1500 PSI".to_string();

        let prompt = build_describe_prompt(&profile);
        assert!(prompt.contains("Medidas Detalladas"));
        assert!(prompt.contains("Envergadura: 15m"));
        assert!(prompt.contains("Fuerza de mordida: 1500 PSI"));
    }

    #[test]
    fn test_into_creature_starts_fresh() {
        let profile = create_sample_creature("Dragonus").profile;
        let creature = sample_valuation("Dragonus").into_creature(profile);

        assert_eq!(creature.name(), "Dragonus");
        assert_eq!(creature.wins, 0);
        assert_eq!(creature.status, CreatureStatus::Saludable);
        assert!(creature.combat_history.is_empty());
    }
}
