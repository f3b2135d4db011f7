//! Quick demo of the crafting flow: value a creature and save it.

use bestiario_core::{CombatStats, CreatureProfile, Game, GameConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    println!("=== Taller de Criaturas ===\n");

    let game = Game::new(GameConfig::new("./bestiario-data"))?;

    let mut profile = CreatureProfile::new("Dragonus");
    profile.composition = "Escamas de obsidiana viviente, núcleo de magma".to_string();
    profile.size = "mediano".to_string();
    profile.build = "atlético".to_string();
    profile.body_parts = "Alas de energía térmica, cuernos de obsidiana".to_string();
    profile.appearance = "Láminas angulares con vetas de magma palpitante".to_string();
    profile.elemental_affinity = "fuego".to_string();
    profile.unique_abilities = "Aliento de fuego espectral, emanación ígnea perpetua".to_string();
    profile.weaknesses = "Frío profundo, dependencia del calor geotérmico".to_string();
    profile.temperament = "solitaria".to_string();
    profile.diet = "energía geotérmica y mágica".to_string();
    profile.habitat = "picos volcánicos activos".to_string();
    profile.stats = CombatStats::new(75, 65, 60, 70, 80, 70, 50);

    println!("1. Generating valuation (this calls the Gemini API)...");
    let creature = game.craft(&profile).await?;

    println!("   Rarity: {}", creature.rarity);
    println!("   Stars:  {}", "*".repeat(creature.star_rating as usize));
    println!("\n2. Narrative (first 500 chars):");
    println!("   ---");
    let snippet: String = creature.narrative.chars().take(500).collect();
    for line in snippet.lines() {
        println!("   {line}");
    }
    println!("   ---");

    println!("\n3. Expert review: {}", creature.expert_review);

    println!("\n4. Saving to the bestiary...");
    game.save_creature(&creature).await?;
    println!("   Saved. Bestiary now holds {} creature(s).", game.bestiary().await?.len());

    Ok(())
}
