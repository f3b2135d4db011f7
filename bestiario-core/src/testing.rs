//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - `MockChronicler` for deterministic testing without API calls
//! - `TestHarness` for scripted game scenarios over in-memory state
//! - Assertion helpers for verifying game state

use crate::arena::{settle_combat, Fight, Settlement};
use crate::creature::{create_sample_creature, Creature, CreatureStatus};
use crate::events::UniversalEvent;
use crate::flows::{CombatReport, CreatureValuation, FlowError, SagaTurn};
use crate::planet::{Battlefield, PlanetState};
use crate::store::DEFAULT_CAPITAL;
use std::collections::VecDeque;

/// A mock chronicler that returns scripted flow outputs.
///
/// Use this for deterministic tests without API calls. Each flow has
/// its own queue; an exhausted queue answers like a model that returned
/// nothing.
#[derive(Debug, Default)]
pub struct MockChronicler {
    valuations: VecDeque<CreatureValuation>,
    reports: VecDeque<CombatReport>,
    planets: VecDeque<PlanetState>,
    turns: VecDeque<SagaTurn>,
}

impl MockChronicler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_valuation(&mut self, valuation: CreatureValuation) {
        self.valuations.push_back(valuation);
    }

    pub fn queue_report(&mut self, report: CombatReport) {
        self.reports.push_back(report);
    }

    pub fn queue_planet(&mut self, planet: PlanetState) {
        self.planets.push_back(planet);
    }

    pub fn queue_turn(&mut self, turn: SagaTurn) {
        self.turns.push_back(turn);
    }

    pub fn next_valuation(&mut self) -> Result<CreatureValuation, FlowError> {
        self.valuations.pop_front().ok_or(FlowError::Empty)
    }

    pub fn next_report(&mut self) -> Result<CombatReport, FlowError> {
        self.reports.pop_front().ok_or(FlowError::Empty)
    }

    pub fn next_planet(&mut self) -> Result<PlanetState, FlowError> {
        self.planets.pop_front().ok_or(FlowError::Empty)
    }

    pub fn next_turn(&mut self) -> Result<SagaTurn, FlowError> {
        self.turns.pop_front().ok_or(FlowError::Empty)
    }
}

/// Test harness for running game scenarios over in-memory state.
///
/// Mirrors the persistence triple (bestiary, capital, events) without
/// touching disk, and applies the same settlement and saga bookkeeping
/// the real game uses.
pub struct TestHarness {
    pub chronicler: MockChronicler,
    pub bestiary: Vec<Creature>,
    pub capital: i64,
    pub events: Vec<UniversalEvent>,
}

impl TestHarness {
    /// Create an empty harness with the default starting capital.
    pub fn new() -> Self {
        Self {
            chronicler: MockChronicler::new(),
            bestiary: Vec::new(),
            capital: DEFAULT_CAPITAL,
            events: Vec::new(),
        }
    }

    /// Add a sample creature to the bestiary and return its name.
    pub fn add_creature(&mut self, name: &str) -> &mut Self {
        self.bestiary.push(create_sample_creature(name));
        self
    }

    /// Queue a combat report for the next fight.
    pub fn expect_report(&mut self, report: CombatReport) -> &mut Self {
        self.chronicler.queue_report(report);
        self
    }

    /// Queue a saga turn for the next advance.
    pub fn expect_turn(&mut self, turn: SagaTurn) -> &mut Self {
        self.chronicler.queue_turn(turn);
        self
    }

    /// Run a wagered fight through the scripted chronicler.
    ///
    /// Settlement only happens if the scripted report is there, exactly
    /// like the real game never mutates state on a failed flow.
    pub fn fight(
        &mut self,
        contender: &str,
        opponent: &str,
        bet: i64,
    ) -> Result<(CombatReport, Settlement), FlowError> {
        let report = self.chronicler.next_report()?;

        let fight = Fight {
            contender: contender.to_string(),
            opponent: opponent.to_string(),
            battlefield: Battlefield::random(),
            bet,
        };
        let settlement = settle_combat(&mut self.bestiary, self.capital, &fight, &report);
        self.capital = settlement.new_capital;

        Ok((report, settlement))
    }

    /// Release a creature onto a planet, starting or continuing a saga.
    pub fn release(&mut self, name: &str, planet: PlanetState) {
        let creature = self
            .bestiary
            .iter()
            .find(|c| c.name() == name)
            .expect("creature exists in harness bestiary")
            .clone();

        match self
            .events
            .iter_mut()
            .find(|e| !e.is_active && e.creature.name() == name)
        {
            Some(finished) => finished.rekindle(planet),
            None => self.events.push(UniversalEvent::begin(creature, planet)),
        }

        if let Some(entry) = self.bestiary.iter_mut().find(|c| c.name() == name) {
            entry.status = CreatureStatus::Activa;
        }
    }

    /// Advance the saga at the given event index by one scripted turn.
    pub fn advance(&mut self, index: usize) -> Result<(), FlowError> {
        let turn = self.chronicler.next_turn()?;
        let event = &mut self.events[index];
        event.apply_turn(&turn);

        if !event.is_active {
            let (status, cause) = event.bestiary_status_after();
            let name = event.creature.name().to_string();
            if let Some(entry) = self.bestiary.iter_mut().find(|c| c.name() == name) {
                entry.status = status;
                if status == CreatureStatus::Muerto {
                    entry.death_cause = cause;
                }
            }
        }

        Ok(())
    }

    /// Look up a creature by name.
    pub fn creature(&self, name: &str) -> &Creature {
        self.bestiary
            .iter()
            .find(|c| c.name() == name)
            .expect("creature exists in harness bestiary")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert a creature's status.
#[track_caller]
pub fn assert_status(harness: &TestHarness, name: &str, status: CreatureStatus) {
    let actual = harness.creature(name).status;
    assert_eq!(
        actual, status,
        "Expected {name} to be {status}, got {actual}"
    );
}

/// Assert the player's capital.
#[track_caller]
pub fn assert_capital(harness: &TestHarness, capital: i64) {
    assert_eq!(
        harness.capital, capital,
        "Expected capital {capital}, got {}",
        harness.capital
    );
}

/// Assert a creature's win/loss record.
#[track_caller]
pub fn assert_record(harness: &TestHarness, name: &str, wins: u32, losses: u32) {
    let creature = harness.creature(name);
    assert_eq!(
        (creature.wins, creature.losses),
        (wins, losses),
        "Expected {name} record {wins}-{losses}, got {}-{}",
        creature.wins,
        creature.losses
    );
}
