//! Arena settlement: the deterministic half of a wagered fight.
//!
//! The chronicler narrates the battle; everything that happens to the
//! persisted game state afterwards (records, statuses, capital) is
//! resolved here, as pure functions over owned state.

use crate::creature::{CombatOutcome, CombatRecord, Creature, CreatureStatus};
use crate::events::{is_creature_engaged, UniversalEvent};
use crate::flows::CombatReport;
use crate::planet::Battlefield;

/// A wagered fight about to be (or just) simulated.
///
/// The bet rides on the contender (creature 1).
#[derive(Debug, Clone)]
pub struct Fight {
    pub contender: String,
    pub opponent: String,
    pub battlefield: Battlefield,
    pub bet: i64,
}

/// The monetary result of a settled fight.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Signed capital change for the player.
    pub delta: i64,

    /// Capital after settlement.
    pub new_capital: i64,

    /// Whether the contender took the victory.
    pub contender_won: bool,
}

/// A bet must be positive and covered by the player's capital.
pub fn bet_is_valid(bet: i64, capital: i64) -> bool {
    bet > 0 && bet <= capital
}

/// Parse the favorite's odds from the chronicler's `"X:1"` string.
///
/// Anything unparseable falls back to even money.
pub fn parse_odds(odds: &str) -> i64 {
    odds.split(':')
        .next()
        .and_then(|n| n.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}

/// Fold a combat report into the bestiary and the player's capital.
///
/// A win on the favorite pays the flat bet; a win against the odds pays
/// bet times the favorite's multiplier. Any loss costs the flat bet.
pub fn settle_combat(
    bestiary: &mut [Creature],
    capital: i64,
    fight: &Fight,
    report: &CombatReport,
) -> Settlement {
    let contender_won = apply_outcome(
        bestiary,
        &fight.contender,
        &fight.opponent,
        fight,
        &report.creature1_outcome.outcome,
        report.creature1_outcome.description.as_deref(),
    );
    apply_outcome(
        bestiary,
        &fight.opponent,
        &fight.contender,
        fight,
        &report.creature2_outcome.outcome,
        report.creature2_outcome.description.as_deref(),
    );

    let delta = if contender_won {
        if report.favorite_name == fight.contender {
            fight.bet
        } else {
            fight.bet * parse_odds(&report.odds)
        }
    } else {
        -fight.bet
    };

    Settlement {
        delta,
        new_capital: capital + delta,
        contender_won,
    }
}

/// Record one fighter's outcome; returns whether it was a victory.
fn apply_outcome(
    bestiary: &mut [Creature],
    name: &str,
    opponent: &str,
    fight: &Fight,
    outcome: &CombatOutcome,
    description: Option<&str>,
) -> bool {
    let Some(creature) = bestiary.iter_mut().find(|c| c.name() == name) else {
        return false;
    };

    creature.combat_history.push(CombatRecord {
        opponent: opponent.to_string(),
        outcome: *outcome,
        battlefield: fight.battlefield.name.clone(),
    });

    let won = *outcome == CombatOutcome::Victoria;
    if won {
        creature.wins += 1;
    } else {
        creature.losses += 1;
    }

    match outcome {
        CombatOutcome::Muerte => {
            creature.status = CreatureStatus::Muerto;
            creature.death_cause = description
                .map(str::to_string)
                .or_else(|| Some("Caído en combate.".to_string()));
        }
        CombatOutcome::Herido => creature.status = CreatureStatus::Herido,
        _ => {}
    }

    won
}

/// Creatures the contender may fight: healthy, distinct, and not away
/// on an active universal event.
pub fn eligible_opponents<'a>(
    bestiary: &'a [Creature],
    events: &[UniversalEvent],
    contender: &str,
) -> Vec<&'a Creature> {
    bestiary
        .iter()
        .filter(|c| {
            c.name() != contender && c.is_healthy() && !is_creature_engaged(events, c.name())
        })
        .collect()
}
