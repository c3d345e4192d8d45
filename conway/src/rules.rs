// rules.rs - Rule table and per-cell evaluator

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use Outcome::{Birth, Both, Die, Stay};

/// Number of rule entries, one per possible neighbor count (0..=8).
pub const RULE_ENTRIES: usize = 9;

/// What happens to a cell with a given neighbor count.
///
/// The discriminant is the base-4 digit used by the share codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Outcome {
    /// Dead regardless of the current state.
    #[default]
    Die = 0,
    /// Keep the current state.
    Stay = 1,
    /// Alive only if currently dead; a living cell dies.
    Birth = 2,
    /// Alive regardless of the current state.
    Both = 3,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Outcome::Die, Outcome::Stay, Outcome::Birth, Outcome::Both];

    pub fn digit(self) -> u8 {
        self as u8
    }

    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(Outcome::Die),
            1 => Some(Outcome::Stay),
            2 => Some(Outcome::Birth),
            3 => Some(Outcome::Both),
            _ => None,
        }
    }

    /// Next alive state of a cell whose current state is `alive`.
    #[inline]
    pub fn apply(self, alive: bool) -> bool {
        match self {
            Outcome::Die => false,
            Outcome::Stay => alive,
            Outcome::Birth => !alive,
            Outcome::Both => true,
        }
    }

    /// Splits the outcome into (dead cell becomes alive, live cell stays alive).
    pub fn as_flags(self) -> (bool, bool) {
        (self.apply(false), self.apply(true))
    }

    pub fn from_flags(born: bool, survives: bool) -> Self {
        match (born, survives) {
            (false, false) => Outcome::Die,
            (false, true) => Outcome::Stay,
            (true, false) => Outcome::Birth,
            (true, true) => Outcome::Both,
        }
    }
}

/// Named rule tables.
pub struct Preset {
    pub name: &'static str,
    pub table: RuleTable,
}

const CONWAY: RuleTable = RuleTable([Die, Die, Stay, Both, Die, Die, Die, Die, Die]);
const CAVES: RuleTable = RuleTable([Die, Die, Die, Die, Stay, Both, Both, Both, Both]);
const HIGHLIFE: RuleTable = RuleTable([Die, Die, Stay, Both, Die, Die, Birth, Die, Die]);

pub const PRESETS: &[Preset] = &[
    Preset { name: "conway",   table: CONWAY },
    Preset { name: "caves",    table: CAVES },
    Preset { name: "highlife", table: HIGHLIFE },
];

/// Outcome per neighbor count. Indexing with any count `0..=8` is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleTable(pub [Outcome; RULE_ENTRIES]);

impl Default for RuleTable {
    fn default() -> Self {
        Self::conway()
    }
}

impl RuleTable {
    pub const fn new(outcomes: [Outcome; RULE_ENTRIES]) -> Self {
        Self(outcomes)
    }

    pub const fn conway() -> Self {
        CONWAY
    }

    pub const fn caves() -> Self {
        CAVES
    }

    pub const fn highlife() -> Self {
        HIGHLIFE
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .map(|preset| preset.table)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    /// Builds a table from classic birth/survival neighbor lists (B3/S23 style).
    pub fn from_birth_survival(birth: &[u8], survival: &[u8]) -> Self {
        let mut outcomes = [Outcome::Die; RULE_ENTRIES];
        for (count, outcome) in outcomes.iter_mut().enumerate() {
            let count = count as u8;
            *outcome = Outcome::from_flags(birth.contains(&count), survival.contains(&count));
        }
        Self(outcomes)
    }

    pub fn outcomes(&self) -> &[Outcome; RULE_ENTRIES] {
        &self.0
    }

    pub fn set(&mut self, neighbors: usize, outcome: Outcome) {
        if let Some(entry) = self.0.get_mut(neighbors) {
            *entry = outcome;
        }
    }

    #[inline]
    pub fn outcome(&self, neighbors: u8) -> Outcome {
        self.0[neighbors as usize]
    }

    /// Next alive state for a cell with the given state and neighbor count.
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        self.outcome(neighbors).apply(alive)
    }

    pub fn preset_name(&self) -> Option<&'static str> {
        PRESETS.iter().find(|preset| preset.table == *self).map(|preset| preset.name)
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::share::encode_rules(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_semantics_are_exhaustive() {
        let expected = [
            // (outcome, dead ->, alive ->)
            (Die, false, false),
            (Stay, false, true),
            (Birth, true, false),
            (Both, true, true),
        ];
        for (outcome, from_dead, from_alive) in expected {
            for neighbors in 0..=8u8 {
                let mut table = RuleTable::new([Die; RULE_ENTRIES]);
                table.set(neighbors as usize, outcome);
                assert_eq!(table.next_state(false, neighbors), from_dead, "{outcome:?} dead n={neighbors}");
                assert_eq!(table.next_state(true, neighbors), from_alive, "{outcome:?} alive n={neighbors}");
            }
        }
    }

    #[test]
    fn conway_table_is_b3_s23() {
        let table = RuleTable::conway();
        for neighbors in 0..=8u8 {
            assert_eq!(table.next_state(false, neighbors), neighbors == 3);
            assert_eq!(table.next_state(true, neighbors), neighbors == 2 || neighbors == 3);
        }
        assert_eq!(table, RuleTable::from_birth_survival(&[3], &[2, 3]));
    }

    #[test]
    fn highlife_kills_live_cells_on_six() {
        let table = RuleTable::highlife();
        assert!(table.next_state(false, 6));
        assert!(!table.next_state(true, 6));
        assert_eq!(table, RuleTable::from_birth_survival(&[3, 6], &[2, 3]));
    }

    #[test]
    fn caves_table_is_b5678_s45678() {
        assert_eq!(
            RuleTable::caves(),
            RuleTable::from_birth_survival(&[5, 6, 7, 8], &[4, 5, 6, 7, 8])
        );
    }

    #[test]
    fn flags_round_trip() {
        for outcome in Outcome::ALL {
            let (born, survives) = outcome.as_flags();
            assert_eq!(Outcome::from_flags(born, survives), outcome);
            assert_eq!(Outcome::from_digit(outcome.digit()), Some(outcome));
        }
        assert_eq!(Outcome::from_digit(4), None);
    }

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(RuleTable::preset("HighLife").unwrap(), RuleTable::highlife());
        assert_eq!(RuleTable::caves().preset_name(), Some("caves"));
        assert!(matches!(
            RuleTable::preset("seeds"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }
}
