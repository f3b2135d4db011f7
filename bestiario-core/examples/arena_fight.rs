//! Quick demo of a wagered arena fight between two saved creatures.
//!
//! Expects a bestiary with at least two healthy creatures; run the
//! craft_creature example first (twice, with different names).

use bestiario_core::{Game, GameConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    println!("=== Ranking y Arena ===\n");

    let game = Game::new(GameConfig::new("./bestiario-data"))?;

    let bestiary = game.bestiary().await?;
    let healthy: Vec<_> = bestiary.iter().filter(|c| c.is_healthy()).collect();
    if healthy.len() < 2 {
        println!("Need at least two healthy creatures; found {}.", healthy.len());
        return Ok(());
    }

    let contender = healthy[0].name().to_string();
    let opponent = healthy[1].name().to_string();
    let bet = 50;

    println!("1. Capital before: {} €", game.capital().await?);
    println!("2. {contender} vs {opponent}, betting {bet} €...\n");

    let result = game.fight(&contender, &opponent, bet).await?;

    println!("   Battlefield: {}", result.battlefield.name);
    println!(
        "   Favorite: {} at {}",
        result.report.favorite_name, result.report.odds
    );
    match result.report.winner_name {
        Some(ref winner) => println!("   Winner: {winner}"),
        None => println!("   No winner."),
    }
    println!(
        "   Wager: {} ({} €)",
        if result.settlement.contender_won {
            "won"
        } else {
            "lost"
        },
        result.settlement.delta
    );

    println!("\n3. Combat log (first 600 chars):");
    println!("   ---");
    let snippet: String = result.report.combat_log.chars().take(600).collect();
    for line in snippet.lines() {
        println!("   {line}");
    }
    println!("   ---");

    println!("\n4. Capital after: {} €", game.capital().await?);

    Ok(())
}
