//! Cumulative draw state threaded through every matchday.

use super::Constraint;
use crate::models::{Rules, Team};

/// The pairing rules a matchday search is allowed to rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintSet {
    pub no_rematches: bool,
    pub country_protection: bool,
    pub pot_protection: bool,
}

impl ConstraintSet {
    pub fn from_rules(rules: &Rules) -> Self {
        Self {
            no_rematches: rules.no_rematches,
            country_protection: rules.country_protection,
            pot_protection: rules.pot_protection,
        }
    }

    pub const fn none() -> Self {
        Self { no_rematches: false, country_protection: false, pot_protection: false }
    }

    /// This set followed by progressively weaker ones: pot protection goes
    /// first, then country protection, then no rematches.
    pub fn relaxations(self) -> Vec<ConstraintSet> {
        let mut chain = vec![self];
        let mut current = self;
        for step in 0..3 {
            match step {
                0 => current.pot_protection = false,
                1 => current.country_protection = false,
                _ => current.no_rematches = false,
            }
            if chain.last() != Some(&current) {
                chain.push(current);
            }
        }
        chain
    }
}

/// Play history and home/away counters for one draw.
///
/// Teams are addressed by their index in the roster slice.
#[derive(Debug, Clone)]
pub struct DrawContext<'a> {
    teams: &'a [Team],
    rules: &'a Rules,
    meetings: Vec<Vec<u8>>,
    home: Vec<u32>,
    away: Vec<u32>,
}

impl<'a> DrawContext<'a> {
    pub fn new(teams: &'a [Team], rules: &'a Rules) -> Self {
        let n = teams.len();
        Self {
            teams,
            rules,
            meetings: vec![vec![0; n]; n],
            home: vec![0; n],
            away: vec![0; n],
        }
    }

    pub fn teams(&self) -> &'a [Team] {
        self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn have_met(&self, a: usize, b: usize) -> bool {
        self.meetings[a][b] > 0
    }

    pub fn record_meeting(&mut self, a: usize, b: usize) {
        self.meetings[a][b] = self.meetings[a][b].saturating_add(1);
        self.meetings[b][a] = self.meetings[b][a].saturating_add(1);
    }

    pub fn record_home_away(&mut self, home: usize, away: usize) {
        self.home[home] += 1;
        self.away[away] += 1;
    }

    pub fn home_count(&self, index: usize) -> u32 {
        self.home[index]
    }

    pub fn away_count(&self, index: usize) -> u32 {
        self.away[index]
    }

    /// Below the home cap, or balance not enforced.
    pub fn can_host(&self, index: usize) -> bool {
        !self.rules.home_away_balance || self.home[index] < self.rules.home_away_cap()
    }

    pub fn can_travel(&self, index: usize) -> bool {
        !self.rules.home_away_balance || self.away[index] < self.rules.home_away_cap()
    }

    /// Some home/away orientation of the pair keeps both sides within the cap.
    pub fn can_orient(&self, a: usize, b: usize) -> bool {
        (self.can_host(a) && self.can_travel(b)) || (self.can_host(b) && self.can_travel(a))
    }

    fn broken(&self, a: usize, b: usize, matchday: u8, set: &ConstraintSet) -> [Option<Constraint>; 3] {
        let (ta, tb) = (&self.teams[a], &self.teams[b]);
        [
            (set.no_rematches && self.have_met(a, b)).then_some(Constraint::NoRematches),
            (set.country_protection && ta.shares_country_with(tb))
                .then_some(Constraint::CountryProtection),
            (set.pot_protection && matchday == 1 && ta.pot == tb.pot)
                .then_some(Constraint::PotProtection),
        ]
    }

    /// Pairing rules the pair would break on `matchday`, judged against a
    /// given constraint set.
    pub fn violations_under(
        &self,
        a: usize,
        b: usize,
        matchday: u8,
        set: &ConstraintSet,
    ) -> Vec<Constraint> {
        self.broken(a, b, matchday, set).into_iter().flatten().collect()
    }

    /// Number of full-rule breaks, without allocating.
    pub fn violation_count(&self, a: usize, b: usize, matchday: u8) -> usize {
        let full = ConstraintSet::from_rules(self.rules);
        self.broken(a, b, matchday, &full).iter().filter(|c| c.is_some()).count()
    }

    /// Pairing rules the pair would break under the full rules.
    pub fn violations(&self, a: usize, b: usize, matchday: u8) -> Vec<Constraint> {
        self.violations_under(a, b, matchday, &ConstraintSet::from_rules(self.rules))
    }

    pub fn allows(&self, a: usize, b: usize, matchday: u8, set: &ConstraintSet) -> bool {
        a != b && self.broken(a, b, matchday, set).iter().all(Option::is_none)
    }
}
