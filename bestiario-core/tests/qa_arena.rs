//! QA tests for arena combat settlement and wagering.
//!
//! These tests run fully deterministic scenarios through the scripted
//! mock chronicler: no API calls, no disk.

use bestiario_core::arena::eligible_opponents;
use bestiario_core::flows::{CombatReport, FighterOutcome, FlowError};
use bestiario_core::testing::{assert_capital, assert_record, assert_status, TestHarness};
use bestiario_core::{CombatOutcome, CreatureStatus, DEFAULT_CAPITAL};

fn report(
    winner: Option<&str>,
    favorite: &str,
    odds: &str,
    outcome1: CombatOutcome,
    outcome2: CombatOutcome,
    death_note: Option<&str>,
) -> CombatReport {
    CombatReport {
        combat_log: "El polvo se asienta sobre la arena.".to_string(),
        winner_name: winner.map(str::to_string),
        favorite_name: favorite.to_string(),
        odds: odds.to_string(),
        creature1_outcome: FighterOutcome {
            outcome: outcome1,
            description: None,
        },
        creature2_outcome: FighterOutcome {
            outcome: outcome2,
            description: death_note.map(str::to_string),
        },
    }
}

// =============================================================================
// TEST 1: A fatal fight removes the loser from future opponent lists
// =============================================================================

#[test]
fn test_death_excludes_from_opponent_lists() {
    let mut harness = TestHarness::new();
    harness
        .add_creature("Dragonus")
        .add_creature("Golemech")
        .add_creature("Fenix");

    harness.expect_report(report(
        Some("Dragonus"),
        "Dragonus",
        "2:1",
        CombatOutcome::Victoria,
        CombatOutcome::Muerte,
        Some("No contento con la victoria, Dragonus asestó el golpe final."),
    ));

    let (result, settlement) = harness.fight("Dragonus", "Golemech", 25).unwrap();
    assert_eq!(result.winner_name.as_deref(), Some("Dragonus"));
    assert!(settlement.contender_won);

    assert_status(&harness, "Golemech", CreatureStatus::Muerto);
    let fallen = harness.creature("Golemech");
    assert!(fallen
        .death_cause
        .as_deref()
        .unwrap()
        .contains("golpe final"));

    // Golemech never shows up as an opponent again
    let opponents = eligible_opponents(&harness.bestiary, &harness.events, "Dragonus");
    let names: Vec<&str> = opponents.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Fenix"]);
}

// =============================================================================
// TEST 2: Wager payouts across a series of fights
// =============================================================================

#[test]
fn test_wager_payouts_across_fights() {
    let mut harness = TestHarness::new();
    harness.add_creature("Dragonus").add_creature("Golemech");

    // Fight 1: favorite wins, flat payout
    harness.expect_report(report(
        Some("Dragonus"),
        "Dragonus",
        "3:1",
        CombatOutcome::Victoria,
        CombatOutcome::Derrota,
        None,
    ));
    harness.fight("Dragonus", "Golemech", 100).unwrap();
    assert_capital(&harness, DEFAULT_CAPITAL + 100);

    // Fight 2: upset win against 3:1 odds pays triple
    harness.expect_report(report(
        Some("Dragonus"),
        "Golemech",
        "3:1",
        CombatOutcome::Victoria,
        CombatOutcome::Derrota,
        None,
    ));
    harness.fight("Dragonus", "Golemech", 100).unwrap();
    assert_capital(&harness, DEFAULT_CAPITAL + 100 + 300);

    // Fight 3: a loss costs the flat bet regardless of odds
    harness.expect_report(report(
        Some("Golemech"),
        "Golemech",
        "5:1",
        CombatOutcome::Derrota,
        CombatOutcome::Victoria,
        None,
    ));
    harness.fight("Dragonus", "Golemech", 150).unwrap();
    assert_capital(&harness, DEFAULT_CAPITAL + 400 - 150);

    assert_record(&harness, "Dragonus", 2, 1);
    assert_record(&harness, "Golemech", 1, 2);
    assert_eq!(harness.creature("Dragonus").combat_history.len(), 3);
}

// =============================================================================
// TEST 3: A flee ends without a winner for the fleeing side
// =============================================================================

#[test]
fn test_mutual_flight_has_no_winner() {
    let mut harness = TestHarness::new();
    harness.add_creature("Dragonus").add_creature("Golemech");

    harness.expect_report(report(
        None,
        "Dragonus",
        "2:1",
        CombatOutcome::Huida,
        CombatOutcome::Huida,
        None,
    ));

    let (result, settlement) = harness.fight("Dragonus", "Golemech", 60).unwrap();
    assert!(result.winner_name.is_none());
    assert!(!settlement.contender_won);
    assert_capital(&harness, DEFAULT_CAPITAL - 60);

    // Both remain healthy and fightable
    assert_status(&harness, "Dragonus", CreatureStatus::Saludable);
    assert_status(&harness, "Golemech", CreatureStatus::Saludable);
}

// =============================================================================
// TEST 4: A failed flow leaves no partial state behind
// =============================================================================

#[test]
fn test_failed_flow_mutates_nothing() {
    let mut harness = TestHarness::new();
    harness.add_creature("Dragonus").add_creature("Golemech");

    // No scripted report queued: the "model" returns nothing
    let err = harness.fight("Dragonus", "Golemech", 500).unwrap_err();
    assert!(matches!(err, FlowError::Empty));
    assert!(!err.to_string().is_empty());

    assert_capital(&harness, DEFAULT_CAPITAL);
    assert_record(&harness, "Dragonus", 0, 0);
    assert_record(&harness, "Golemech", 0, 0);
    assert!(harness.creature("Dragonus").combat_history.is_empty());
}

// =============================================================================
// TEST 5: Injuries bench a creature without killing it
// =============================================================================

#[test]
fn test_injury_benches_creature() {
    let mut harness = TestHarness::new();
    harness.add_creature("Dragonus").add_creature("Golemech");

    harness.expect_report(report(
        Some("Golemech"),
        "Golemech",
        "2:1",
        CombatOutcome::Herido,
        CombatOutcome::Victoria,
        None,
    ));
    harness.fight("Dragonus", "Golemech", 40).unwrap();

    assert_status(&harness, "Dragonus", CreatureStatus::Herido);
    assert!(!harness.creature("Dragonus").is_dead());

    let opponents = eligible_opponents(&harness.bestiary, &harness.events, "Golemech");
    assert!(opponents.is_empty());
}
