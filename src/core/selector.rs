//! Budgeted subset selection.
//!
//! Candidates are accumulated in ranked order. Three tiers are tried in turn:
//!
//! 1. **Windowed** – one greedy fill per target size (5, 4, 3), each bounded by
//!    the window maximum; a fill of at least three stops whose exact
//!    accumulation-order time lies inside the window is a candidate result, and
//!    the one closest to the window midpoint wins.
//! 2. **Best effort** – a single fill of up to five stops bounded only by the
//!    maximum.
//! 3. **Minimum guarantee** – top-ranked unused candidates are appended,
//!    ignoring the budget, until three stops are taken. A catalog with fewer
//!    than three places contributes all of them.

use crate::core::accountant;
use crate::core::context::{RouteContext, SelectionStrategy};
use crate::domain::model::{CandidateCombination, PlaceId, ScoredCandidate, SelectionTier};
use crate::utils::error::Result;
use std::collections::HashSet;

pub const MIN_STOPS: usize = 3;
pub const MAX_STOPS: usize = 5;

#[derive(Debug, Clone)]
pub struct TieredGreedySelector {
    target_counts: Vec<usize>,
}

impl TieredGreedySelector {
    pub fn new() -> Self {
        Self {
            target_counts: vec![5, 4, 3],
        }
    }

    /// 沿排名走一遍，只在累計時間不超過上限時接受候選
    fn greedy_fill<'p>(
        ranked: &[ScoredCandidate<'p>],
        target_count: usize,
        ctx: &RouteContext<'_>,
    ) -> Result<(Vec<ScoredCandidate<'p>>, f64)> {
        let mut accepted: Vec<ScoredCandidate<'p>> = Vec::with_capacity(target_count);
        let mut taken: HashSet<PlaceId> = HashSet::with_capacity(target_count);
        let mut running_total = 0.0;

        for candidate in ranked {
            if accepted.len() >= target_count {
                break;
            }
            if taken.contains(&candidate.id()) {
                continue;
            }

            let transition_hours = match accepted.last() {
                None => candidate.walk_time_from_start_hours,
                Some(last) => ctx.walk_hours(last.coordinates(), candidate.coordinates())?,
            };
            let marginal = candidate.dwell_time_hours + transition_hours;

            if running_total + marginal <= ctx.window.max_hours {
                taken.insert(candidate.id());
                accepted.push(*candidate);
                running_total += marginal;
            }
        }

        Ok((accepted, running_total))
    }

    fn windowed<'p>(
        &self,
        ranked: &[ScoredCandidate<'p>],
        ctx: &RouteContext<'_>,
    ) -> Result<Option<(Vec<ScoredCandidate<'p>>, f64)>> {
        let midpoint = ctx.window.midpoint();
        let mut best: Option<(Vec<ScoredCandidate<'p>>, f64)> = None;
        let mut best_diff = f64::INFINITY;

        for &target_count in &self.target_counts {
            let (combination, _) = Self::greedy_fill(ranked, target_count, ctx)?;
            if combination.len() < MIN_STOPS {
                tracing::debug!(
                    "Target {}: only {} stops fit under {}h",
                    target_count,
                    combination.len(),
                    ctx.window.max_hours
                );
                continue;
            }

            let exact = accountant::account(&combination, ctx)?.total_hours;
            if !ctx.window.contains(exact) {
                tracing::debug!(
                    "Target {}: {} stops take {:.2}h, outside window",
                    target_count,
                    combination.len(),
                    exact
                );
                continue;
            }

            let diff = (exact - midpoint).abs();
            tracing::debug!(
                "Target {}: {} stops take {:.2}h (midpoint distance {:.3})",
                target_count,
                combination.len(),
                exact,
                diff
            );
            if diff < best_diff {
                best_diff = diff;
                best = Some((combination, exact));
            }
        }

        Ok(best)
    }

    fn best_effort<'p>(
        ranked: &[ScoredCandidate<'p>],
        ctx: &RouteContext<'_>,
    ) -> Result<Vec<ScoredCandidate<'p>>> {
        let (combination, _) = Self::greedy_fill(ranked, MAX_STOPS, ctx)?;
        Ok(combination)
    }

    /// 不看時間預算，用排名最前的未選候選補足
    fn fill_to_minimum<'p>(combination: &mut Vec<ScoredCandidate<'p>>, ranked: &[ScoredCandidate<'p>]) {
        let mut taken: HashSet<PlaceId> = combination.iter().map(|c| c.id()).collect();

        for candidate in ranked {
            if combination.len() >= MIN_STOPS {
                break;
            }
            if taken.insert(candidate.id()) {
                combination.push(*candidate);
            }
        }
    }
}

impl Default for TieredGreedySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStrategy for TieredGreedySelector {
    fn select<'p>(
        &self,
        ranked: &[ScoredCandidate<'p>],
        ctx: &RouteContext<'_>,
    ) -> Result<CandidateCombination<'p>> {
        if let Some((candidates, accumulated_hours)) = self.windowed(ranked, ctx)? {
            tracing::debug!(
                "Selected {} stops within window ({:.2}h)",
                candidates.len(),
                accumulated_hours
            );
            return Ok(CandidateCombination {
                candidates,
                accumulated_hours,
                tier: SelectionTier::Windowed,
            });
        }

        let mut candidates = Self::best_effort(ranked, ctx)?;
        let mut tier = SelectionTier::BestEffort;
        tracing::warn!(
            "No combination fits [{}, {}]h, best effort kept {} stops",
            ctx.window.min_hours,
            ctx.window.max_hours,
            candidates.len()
        );

        if candidates.len() < MIN_STOPS {
            let before = candidates.len();
            Self::fill_to_minimum(&mut candidates, ranked);
            if candidates.len() > before {
                tier = SelectionTier::MinimumGuarantee;
                tracing::warn!(
                    "Filled up to {} stops ignoring the time budget",
                    candidates.len()
                );
            }
        }

        let accumulated_hours = accountant::account(&candidates, ctx)?.total_hours;
        Ok(CandidateCombination {
            candidates,
            accumulated_hours,
            tier,
        })
    }
}
