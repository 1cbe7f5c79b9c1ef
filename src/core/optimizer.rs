use crate::core::combinations::{schedules, CourseLookup};
use crate::core::scoring::score_schedule;
use crate::models::{FormattedSchedule, PreferenceProfile, Schedule, ScoredSchedule, ScoringWeights};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Result of one optimization run
#[derive(Debug)]
pub struct OptimizeResult<'a> {
    /// Best schedules, highest score first
    pub schedules: Vec<ScoredSchedule<'a>>,
    /// Valid schedules scored during the run
    pub candidates_visited: usize,
    /// The candidate budget ran out before the search space did
    pub truncated: bool,
}

impl OptimizeResult<'_> {
    fn empty() -> Self {
        Self {
            schedules: Vec::new(),
            candidates_visited: 0,
            truncated: false,
        }
    }
}

/// Heap entry ordered so that the *worst* schedule sits on top of the max-heap.
///
/// Lower score is worse; among equal scores the later-generated one is worse, so
/// ties always resolve to generation order.
struct Ranked<'a> {
    score: f64,
    seq: u64,
    schedule: Schedule<'a>,
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked<'_> {}

/// Top-K schedule selector
///
/// # Pipeline
/// 1. Per-course valid combinations
/// 2. Lazy cross product with day-bucketed conflict check
/// 3. Scoring against the preference profile
/// 4. Bounded heap keeping the best `k`
///
/// Stages 2-4 are fused: each candidate is generated, checked, scored and either
/// kept or dropped before the next one is produced.
#[derive(Debug, Clone)]
pub struct Optimizer {
    weights: ScoringWeights,
    max_candidates: Option<usize>,
}

impl Optimizer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            max_candidates: None,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Stop after scoring this many valid schedules (`None` searches exhaustively)
    pub fn with_candidate_limit(mut self, max_candidates: Option<usize>) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Find the `k` best schedules for the requested courses
    ///
    /// # Arguments
    /// * `lookup` - Normalized courses available to this request
    /// * `course_ids` - Requested courses; schedules are positional with this list
    /// * `preferences` - The student's preference profile
    /// * `k` - Maximum number of schedules to return
    ///
    /// # Returns
    /// OptimizeResult with schedules sorted best first. Empty when no course is
    /// requested, `k` is zero, or any course cannot be scheduled.
    pub fn optimize<'a, L, S>(
        &self,
        lookup: &'a L,
        course_ids: &[S],
        preferences: &PreferenceProfile,
        k: usize,
    ) -> OptimizeResult<'a>
    where
        L: CourseLookup + ?Sized,
        S: AsRef<str>,
    {
        let candidates = schedules(lookup, course_ids);
        tracing::debug!(
            "Optimizing {} courses over {} candidate tuples (k = {})",
            course_ids.len(),
            candidates.candidate_space(),
            k
        );

        self.select_top_k(candidates, preferences, k)
    }

    /// Keep the `k` highest-scoring schedules from a stream of valid schedules
    ///
    /// Only the current best `k` are held in memory. A candidate replaces the
    /// current worst only when it scores strictly higher.
    pub fn select_top_k<'a, I>(
        &self,
        candidates: I,
        preferences: &PreferenceProfile,
        k: usize,
    ) -> OptimizeResult<'a>
    where
        I: IntoIterator<Item = Schedule<'a>>,
    {
        if k == 0 {
            return OptimizeResult::empty();
        }

        let mut heap: BinaryHeap<Ranked<'a>> = BinaryHeap::with_capacity(k + 1);
        let mut candidates = candidates.into_iter();
        let mut visited = 0usize;
        let mut truncated = false;

        while let Some(schedule) = candidates.next() {
            let score = score_schedule(&schedule, preferences, &self.weights);
            let seq = visited as u64;
            visited += 1;

            if heap.len() < k {
                heap.push(Ranked { score, seq, schedule });
            } else if heap.peek().is_some_and(|worst| score > worst.score) {
                heap.pop();
                heap.push(Ranked { score, seq, schedule });
            }

            if self.max_candidates.is_some_and(|limit| visited >= limit) {
                truncated = candidates.next().is_some();
                break;
            }
        }

        if truncated {
            tracing::debug!("Candidate budget exhausted after {} schedules", visited);
        }

        OptimizeResult {
            schedules: heap
                .into_sorted_vec()
                .into_iter()
                .map(|ranked| ScoredSchedule {
                    schedule: ranked.schedule,
                    score: ranked.score,
                })
                .collect(),
            candidates_visited: visited,
            truncated,
        }
    }

    /// Optimize and format the ranked schedules for the response layer
    pub fn optimize_schedules<L, S>(
        &self,
        lookup: &L,
        course_ids: &[S],
        preferences: &PreferenceProfile,
        max_results: usize,
    ) -> Vec<FormattedSchedule>
    where
        L: CourseLookup + ?Sized,
        S: AsRef<str>,
    {
        self.optimize(lookup, course_ids, preferences, max_results)
            .schedules
            .iter()
            .map(FormattedSchedule::from)
            .collect()
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
