//! Deterministic matchday-by-matchday Swiss draw.
//!
//! Pairing and home/away assignment are separate passes. Each matchday is a
//! perfect-matching search over the pool under the active pairing rules,
//! falling back to weaker rule sets only when the search fails. Once every
//! matchday is paired, the whole fixture graph is oriented at once so each
//! team's home and away counts differ by at most one.

use super::{
    enforce_schedule_contracts, incomplete_schedule_issues, validate_draw_request, Constraint,
    ConstraintSet, DrawContext, DrawIssue, DrawResult,
};
use crate::error::DrawError;
use crate::models::{Fixture, Rules, Team};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Backtracking steps allowed per matchday and rule set, shared by every
/// choice of resting team.
const SEARCH_BUDGET: usize = 50_000;

#[derive(Debug, Clone)]
struct Pairing {
    matchday: u8,
    first: usize,
    second: usize,
    violated: Vec<Constraint>,
}

#[derive(Debug, Default)]
struct RoundPlan {
    pairs: Vec<(usize, usize)>,
    idle: Option<usize>,
    relaxed: bool,
    /// Search steps spent across every rule set tried
    steps: usize,
}

/// Draw the full Swiss-phase fixture list.
///
/// Every rule the result breaks is listed in [`DrawResult::issues`]; an
/// invalid request is rejected before pairing starts.
///
/// ```rust
/// use ucl_core::draw::conduct_swiss_draw;
/// use ucl_core::models::{Pot, Rules, Team};
///
/// let teams: Vec<Team> = (0..16)
///     .map(|i| Team::new(format!("t{i}"), format!("Team {i}"), format!("C{i}"), 50.0, Pot::ALL[i / 4]))
///     .collect();
/// let draw = conduct_swiss_draw(&teams, &Rules::default()).unwrap();
/// assert_eq!(draw.fixtures.len(), 64);
/// assert!(draw.is_clean());
/// ```
pub fn conduct_swiss_draw(teams: &[Team], rules: &Rules) -> Result<DrawResult, DrawError> {
    validate_draw_request(teams, rules)?;
    info!(teams = teams.len(), matchdays = rules.number_of_matchdays, "conducting swiss draw");

    let mut ctx = DrawContext::new(teams, rules);
    let full = ConstraintSet::from_rules(rules);
    let mut scheduled = vec![0u32; teams.len()];
    let mut pairings = Vec::with_capacity(teams.len() / 2 * usize::from(rules.number_of_matchdays));
    let mut issues = Vec::new();

    for matchday in 1..=rules.number_of_matchdays {
        let round = pair_matchday(&ctx, matchday, full, &scheduled);
        debug!(matchday, steps = round.steps, "matchday paired");
        if round.relaxed {
            warn!(matchday, "no pairing satisfies every rule, relaxing constraints");
        }
        if let Some(idle) = round.idle {
            debug!(matchday, team = %teams[idle].id, "odd pool, team sits out");
            issues.push(DrawIssue::IdleTeam { team: teams[idle].id.clone(), matchday });
        }
        for (first, second) in round.pairs {
            let violated = ctx.violations(first, second, matchday);
            ctx.record_meeting(first, second);
            scheduled[first] += 1;
            scheduled[second] += 1;
            pairings.push(Pairing { matchday, first, second, violated });
        }
    }

    let orientation = if rules.home_away_balance {
        let edges: Vec<(usize, usize)> = pairings.iter().map(|p| (p.first, p.second)).collect();
        balanced_orientation(teams.len(), &edges)
    } else {
        vec![true; pairings.len()]
    };

    let mut fixtures = Vec::with_capacity(pairings.len());
    for (pairing, keep) in pairings.into_iter().zip(orientation) {
        let (home, away) =
            if keep { (pairing.first, pairing.second) } else { (pairing.second, pairing.first) };
        ctx.record_home_away(home, away);

        if !pairing.violated.is_empty() {
            warn!(
                matchday = pairing.matchday,
                home = %teams[home].id,
                away = %teams[away].id,
                violated = ?pairing.violated,
                "fixture breaks draw rules"
            );
            issues.push(DrawIssue::ConstraintFallback {
                matchday: pairing.matchday,
                home: teams[home].id.clone(),
                away: teams[away].id.clone(),
                violated: pairing.violated,
            });
        }
        fixtures.push(Fixture::new(teams[home].clone(), teams[away].clone(), pairing.matchday));
    }

    if rules.home_away_balance {
        for (index, team) in teams.iter().enumerate() {
            let (home, away) = (ctx.home_count(index), ctx.away_count(index));
            if home.abs_diff(away) > 1 {
                warn!(team = %team.id, home, away, "home/away split unbalanced");
            }
        }
    }

    issues.extend(incomplete_schedule_issues(teams, &fixtures, rules.number_of_matchdays));
    enforce_schedule_contracts(&fixtures);

    info!(fixtures = fixtures.len(), issues = issues.len(), "swiss draw complete");
    Ok(DrawResult { fixtures, issues })
}

/// Pair one matchday, weakening the rule set until a full matching exists.
fn pair_matchday(
    ctx: &DrawContext<'_>,
    matchday: u8,
    full: ConstraintSet,
    scheduled: &[u32],
) -> RoundPlan {
    let n = ctx.len();
    let idle_candidates: Vec<Option<usize>> = if n % 2 == 0 {
        vec![None]
    } else {
        // Busiest team rests first; among equals the later roster entry.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| scheduled[b].cmp(&scheduled[a]).then(b.cmp(&a)));
        order.into_iter().map(Some).collect()
    };

    let mut steps = 0;
    for set in full.relaxations() {
        let candidates = candidate_lists(ctx, matchday, set);
        let mut budget = SEARCH_BUDGET;
        for &idle in &idle_candidates {
            if !pool_can_pair(ctx, idle, matchday, set) {
                continue;
            }
            let mut search = MatchingSearch::new(&candidates, idle, budget);
            let solved = search.solve();
            steps += budget - search.budget;
            if solved {
                let mut pairs = search.pairs;
                pairs.sort_by_key(|&(a, b)| a.min(b));
                return RoundPlan { pairs, idle, relaxed: set != full, steps };
            }
            budget = search.budget;
            if budget == 0 {
                debug!(matchday, ?set, "search budget exhausted");
                break;
            }
        }
    }

    // Unconstrained matching of an even pool always exists, so this is only
    // reached for a degenerate pool.
    let idle = idle_candidates.first().copied().flatten();
    let pool: Vec<usize> = (0..n).filter(|&t| Some(t) != idle).collect();
    let pairs = pool.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
    RoundPlan { pairs, idle, relaxed: true, steps }
}

/// Necessary condition for a full matching: under country protection (or pot
/// protection on matchday 1) no group may fill more than half the pool.
fn pool_can_pair(ctx: &DrawContext<'_>, idle: Option<usize>, matchday: u8, set: ConstraintSet) -> bool {
    let pool: Vec<&Team> =
        ctx.teams().iter().enumerate().filter(|&(i, _)| Some(i) != idle).map(|(_, t)| t).collect();
    let limit = pool.len() / 2;

    if set.country_protection {
        let mut per_country: HashMap<&str, usize> = HashMap::new();
        for team in &pool {
            *per_country.entry(team.country.as_str()).or_default() += 1;
        }
        if per_country.values().any(|&count| count > limit) {
            return false;
        }
    }
    if set.pot_protection && matchday == 1 {
        let mut per_pot = [0usize; 4];
        for team in &pool {
            per_pot[usize::from(team.pot.number() - 1)] += 1;
        }
        if per_pot.iter().any(|&count| count > limit) {
            return false;
        }
    }
    true
}

/// Allowed partners of every team under `set`, cleanest against the full
/// rules first and roster order among equals.
fn candidate_lists(ctx: &DrawContext<'_>, matchday: u8, set: ConstraintSet) -> Vec<Vec<usize>> {
    (0..ctx.len())
        .map(|team| {
            let mut partners: Vec<usize> =
                (0..ctx.len()).filter(|&p| ctx.allows(team, p, matchday, &set)).collect();
            partners.sort_by_key(|&p| ctx.violation_count(team, p, matchday));
            partners
        })
        .collect()
}

/// Backtracking perfect matching, most constrained team first.
///
/// `open[t]` counts the candidates of `t` still free; candidate lists are
/// symmetric, so taking a team decrements the count of each of its
/// candidates.
struct MatchingSearch<'c> {
    candidates: &'c [Vec<usize>],
    free: Vec<bool>,
    open: Vec<usize>,
    pairs: Vec<(usize, usize)>,
    budget: usize,
}

impl<'c> MatchingSearch<'c> {
    fn new(candidates: &'c [Vec<usize>], idle: Option<usize>, budget: usize) -> Self {
        let mut search = Self {
            candidates,
            free: vec![true; candidates.len()],
            open: candidates.iter().map(Vec::len).collect(),
            pairs: Vec::new(),
            budget,
        };
        if let Some(idle) = idle {
            search.take(idle);
        }
        search
    }

    fn take(&mut self, team: usize) {
        self.free[team] = false;
        for &other in &self.candidates[team] {
            self.open[other] -= 1;
        }
    }

    fn release(&mut self, team: usize) {
        self.free[team] = true;
        for &other in &self.candidates[team] {
            self.open[other] += 1;
        }
    }

    fn solve(&mut self) -> bool {
        let mut best: Option<usize> = None;
        for team in (0..self.free.len()).filter(|&t| self.free[t]) {
            if self.open[team] == 0 {
                return false;
            }
            if best.map_or(true, |current| self.open[team] < self.open[current]) {
                best = Some(team);
            }
        }
        let Some(team) = best else {
            return true;
        };

        self.take(team);
        let candidates = self.candidates;
        for &partner in &candidates[team] {
            if !self.free[partner] {
                continue;
            }
            if self.budget == 0 {
                break;
            }
            self.budget -= 1;

            self.take(partner);
            self.pairs.push((team, partner));
            if self.solve() {
                return true;
            }
            self.pairs.pop();
            self.release(partner);
        }
        self.release(team);
        false
    }
}

/// Orient every edge so each vertex's out- and in-degree differ by at most
/// one. `true` keeps `(a, b)` as written, `false` flips it.
///
/// Odd-degree vertices are joined to an extra vertex, which makes every degree
/// even; walking closed trails and orienting edges in walking order then
/// balances every vertex exactly, and dropping the extra edges leaves each
/// odd vertex off by one.
pub(crate) fn balanced_orientation(vertices: usize, edges: &[(usize, usize)]) -> Vec<bool> {
    let mut degree = vec![0usize; vertices];
    for &(a, b) in edges {
        degree[a] += 1;
        degree[b] += 1;
    }

    let extra = vertices;
    let mut all = edges.to_vec();
    all.extend((0..vertices).filter(|&v| degree[v] % 2 == 1).map(|v| (v, extra)));

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); vertices + 1];
    for (index, &(a, b)) in all.iter().enumerate() {
        adjacency[a].push(index);
        adjacency[b].push(index);
    }

    let mut used = vec![false; all.len()];
    let mut forward = vec![true; all.len()];
    let mut cursor = vec![0usize; vertices + 1];

    for start in 0..=vertices {
        let mut stack = vec![start];
        while let Some(&vertex) = stack.last() {
            while cursor[vertex] < adjacency[vertex].len() && used[adjacency[vertex][cursor[vertex]]] {
                cursor[vertex] += 1;
            }
            match adjacency[vertex].get(cursor[vertex]) {
                Some(&edge) => {
                    used[edge] = true;
                    let (a, b) = all[edge];
                    forward[edge] = a == vertex;
                    stack.push(if a == vertex { b } else { a });
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    forward.truncate(edges.len());
    forward
}

#[cfg(test)]
mod tests {
    use super::super::test_support::distinct_country_roster;
    use super::*;
    use crate::models::Pot;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn home_away_counts(fixtures: &[Fixture]) -> HashMap<&str, (i32, i32)> {
        let mut counts: HashMap<&str, (i32, i32)> = HashMap::new();
        for fixture in fixtures {
            counts.entry(fixture.home.id.as_str()).or_default().0 += 1;
            counts.entry(fixture.away.id.as_str()).or_default().1 += 1;
        }
        counts
    }

    fn assert_once_per_matchday(fixtures: &[Fixture]) {
        let mut booked = HashSet::new();
        for fixture in fixtures {
            assert_ne!(fixture.home.id, fixture.away.id);
            assert!(booked.insert((fixture.matchday, fixture.home.id.clone())), "{}", fixture.id);
            assert!(booked.insert((fixture.matchday, fixture.away.id.clone())), "{}", fixture.id);
        }
    }

    /// Every fixture that breaks an active rule carries a matching issue.
    fn assert_breaches_reported(result: &DrawResult, rules: &Rules) {
        let mut met: HashSet<(String, String)> = HashSet::new();
        let mut by_matchday: Vec<&Fixture> = result.fixtures.iter().collect();
        by_matchday.sort_by_key(|f| f.matchday);

        for fixture in by_matchday {
            let (h, a) = (&fixture.home, &fixture.away);
            let key = if h.id < a.id { (h.id.clone(), a.id.clone()) } else { (a.id.clone(), h.id.clone()) };
            let breaches = (rules.no_rematches && met.contains(&key))
                || (rules.country_protection && h.country == a.country)
                || (rules.pot_protection && fixture.matchday == 1 && h.pot == a.pot);
            met.insert(key);

            if breaches {
                let reported = result.issues.iter().any(|issue| {
                    matches!(issue, DrawIssue::ConstraintFallback { matchday, home, away, .. }
                        if *matchday == fixture.matchday && *home == h.id && *away == a.id)
                });
                assert!(reported, "unreported breach in {}", fixture.id);
            }
        }
    }

    #[test]
    fn test_sixteen_team_league_phase() {
        let teams = distinct_country_roster(16);
        let rules = Rules { pot_protection: true, ..Rules::default() };
        let result = conduct_swiss_draw(&teams, &rules).unwrap();

        assert_eq!(result.fixtures.len(), 64);
        assert!(result.is_clean(), "{:?}", result.errors());
        assert_once_per_matchday(&result.fixtures);

        let mut pairs = HashSet::new();
        for fixture in &result.fixtures {
            let mut key = [fixture.home.id.clone(), fixture.away.id.clone()];
            key.sort();
            assert!(pairs.insert(key), "rematch in {}", fixture.id);
            if fixture.matchday == 1 {
                assert_ne!(fixture.home.pot, fixture.away.pot);
            }
        }

        for (team, (home, away)) in home_away_counts(&result.fixtures) {
            assert_eq!((home, away), (4, 4), "{team}");
        }
    }

    #[test]
    fn test_draw_is_deterministic() {
        let teams = distinct_country_roster(20);
        let rules = Rules::default();
        let first = conduct_swiss_draw(&teams, &rules).unwrap();
        let second = conduct_swiss_draw(&teams, &rules).unwrap();
        assert_eq!(first.fixtures, second.fixtures);
        assert_eq!(first.issues, second.issues);
    }

    #[test]
    fn test_unsatisfiable_country_rule_is_reported() {
        // Six of ten clubs share a country: someone must meet a compatriot.
        let teams: Vec<Team> = (0..10)
            .map(|i| {
                let country = if i < 6 { "ENG".to_string() } else { format!("X{i}") };
                Team::new(format!("t{i}"), format!("Team {i}"), country, 50.0, Pot::ALL[i % 4])
            })
            .collect();
        let rules = Rules { number_of_matchdays: 6, ..Rules::default() };
        let result = conduct_swiss_draw(&teams, &rules).unwrap();

        assert_eq!(result.fixtures.len(), 30);
        assert_once_per_matchday(&result.fixtures);
        assert!(result.issues.iter().any(|issue| matches!(
            issue,
            DrawIssue::ConstraintFallback { violated, .. } if violated.contains(&Constraint::CountryProtection)
        )));
        assert_breaches_reported(&result, &rules);
    }

    /// Twenty clubs from one country: country protection can never hold.
    fn crowded_roster(size: usize) -> Vec<Team> {
        (0..size)
            .map(|i| {
                let country = if i < 20 { "ENG".to_string() } else { format!("X{i}") };
                Team::new(format!("t{i}"), format!("Team {i}"), country, 50.0, Pot::ALL[i % 4])
            })
            .collect()
    }

    #[test]
    fn test_crowded_country_relaxes_without_exhausting_search() {
        let rules = Rules { number_of_matchdays: 10, pot_protection: true, ..Rules::default() };
        let full = ConstraintSet::from_rules(&rules);

        for size in [36, 35] {
            let teams = crowded_roster(size);
            let ctx = DrawContext::new(&teams, &rules);
            let round = pair_matchday(&ctx, 1, full, &vec![0; size]);
            assert!(round.relaxed);
            assert_eq!(round.pairs.len(), size / 2);
            assert!(round.steps < 1_000, "{size} teams: {} search steps", round.steps);

            let result = conduct_swiss_draw(&teams, &rules).unwrap();
            assert_eq!(result.fixtures.len(), size / 2 * 10);
            assert_once_per_matchday(&result.fixtures);
            assert_breaches_reported(&result, &rules);
        }
    }

    #[test]
    fn test_odd_roster_rests_one_team_per_matchday() {
        let teams = distinct_country_roster(17);
        let rules = Rules::default();
        let result = conduct_swiss_draw(&teams, &rules).unwrap();

        assert_eq!(result.fixtures.len(), 64);
        assert_once_per_matchday(&result.fixtures);

        let idle: Vec<&String> = result
            .issues
            .iter()
            .filter_map(|issue| match issue {
                DrawIssue::IdleTeam { team, .. } => Some(team),
                _ => None,
            })
            .collect();
        assert_eq!(idle.len(), 8);
        let distinct: HashSet<_> = idle.iter().collect();
        assert_eq!(distinct.len(), 8, "rest days rotate: {idle:?}");

        let short = result
            .issues
            .iter()
            .filter(|issue| matches!(issue, DrawIssue::IncompleteSchedule { scheduled: 7, .. }))
            .count();
        assert_eq!(short, 8);
    }

    #[test]
    fn test_balance_off_keeps_search_orientation() {
        let teams = distinct_country_roster(16);
        let rules = Rules { home_away_balance: false, ..Rules::default() };
        let result = conduct_swiss_draw(&teams, &rules).unwrap();
        assert_eq!(result.fixtures.len(), 64);
        assert!(result.is_clean());

        // The team the search paired first hosts.
        let ctx = DrawContext::new(&teams, &rules);
        let round = pair_matchday(&ctx, 1, ConstraintSet::from_rules(&rules), &[0; 16]);
        let expected: Vec<(&str, &str)> =
            round.pairs.iter().map(|&(h, a)| (teams[h].id.as_str(), teams[a].id.as_str())).collect();
        let first_day: Vec<(&str, &str)> = result
            .fixtures
            .iter()
            .filter(|f| f.matchday == 1)
            .map(|f| (f.home.id.as_str(), f.away.id.as_str()))
            .collect();
        assert_eq!(first_day, expected);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let teams = distinct_country_roster(6);
        assert!(matches!(
            conduct_swiss_draw(&teams, &Rules::default()),
            Err(DrawError::NotEnoughTeams { found: 6, required: 9 })
        ));
    }

    #[test]
    fn test_orientation_balances_odd_degrees() {
        // Path 0-1-2-3 plus triangle 3-4-5.
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 3)];
        let forward = balanced_orientation(6, &edges);
        let mut balance = [0i32; 6];
        for (&(a, b), keep) in edges.iter().zip(forward) {
            let (from, to) = if keep { (a, b) } else { (b, a) };
            balance[from] += 1;
            balance[to] -= 1;
        }
        assert!(balance.iter().all(|b| b.abs() <= 1), "{balance:?}");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_draw_invariants(
            size in 10usize..=26,
            countries in 3usize..=12,
            matchdays in 6u8..=8,
            balance in any::<bool>(),
            pot_protection in any::<bool>(),
            country_protection in any::<bool>(),
        ) {
            let teams: Vec<Team> = (0..size)
                .map(|i| Team::new(
                    format!("t{i}"),
                    format!("Team {i}"),
                    format!("C{}", i % countries),
                    (i * 7 % 40) as f64,
                    Pot::ALL[i % 4],
                ))
                .collect();
            let rules = Rules {
                number_of_matchdays: matchdays,
                home_away_balance: balance,
                pot_protection,
                country_protection,
                ..Rules::default()
            };
            let result = conduct_swiss_draw(&teams, &rules).unwrap();

            assert_once_per_matchday(&result.fixtures);
            assert_breaches_reported(&result, &rules);
            prop_assert_eq!(result.fixtures.len(), size / 2 * usize::from(matchdays));
            if balance {
                for (team, (home, away)) in home_away_counts(&result.fixtures) {
                    prop_assert!((home - away).abs() <= 1, "{} hosts {} travels {}", team, home, away);
                }
            }
        }
    }
}
