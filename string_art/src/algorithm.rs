use std::ops::Range;

use num_traits::AsPrimitive;
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::{
    config::{self, Config},
    darkness::{Darkness, FlatDarkness},
    geometry::Segment,
    image::Residual,
    nail_table::NailTable,
    verboser::{Message, Verboser},
    Float,
};

/// Lays out the nails described by `config` and runs the greedy path search
/// over `residual` until one of the stop conditions holds.
pub fn compute<S: Float>(
    config: &Config<S>,
    residual: Residual<S>,
    verboser: &mut impl Verboser,
) -> Result<Computation<S>, Error>
where
    usize: AsPrimitive<S>,
{
    config.validate()?;
    let table = NailTable::circle(config.nail_count, config.radius, config.center, verboser)?;
    Ok(Algorithm::new(table, residual, *config).compute(verboser))
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Auto stop: nothing above the residual threshold is left.
    ResidualExhausted,
    /// No candidate scored above zero for `max_no_improve` steps in a row.
    TooManyStalls,
    /// The cursor has no other nail to go to.
    NoCandidate,
    /// `max_steps` steps were taken.
    StepBudgetReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StopReason::ResidualExhausted => "residual exhausted",
            StopReason::TooManyStalls => "too many steps without improvement",
            StopReason::NoCandidate => "no candidate nail",
            StopReason::StepBudgetReached => "step budget reached",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    /// The last `k` steps found no chord worth drawing.
    Stalled(usize),
    Stopped(StopReason),
}

/// One thread pass, numbered from 1 in winding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step: usize,
    pub from: usize,
    pub to: usize,
}

/// Result of a finished run.
#[derive(Clone, Debug)]
pub struct Computation<S> {
    table: NailTable<S>,
    residual: Residual<S>,
    path: Vec<Step>,
    reason: StopReason,
    steps: usize,
    config: Config<S>,
}

impl<S: Float> Computation<S> {
    pub fn table(&self) -> &NailTable<S> {
        &self.table
    }

    /// The residual grid as the run left it.
    pub fn residual(&self) -> &Residual<S> {
        &self.residual
    }

    pub fn path(&self) -> &[Step] {
        &self.path
    }

    pub fn reason(&self) -> StopReason {
        self.reason
    }

    /// Evaluated steps, stalled ones included.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn config(&self) -> &Config<S> {
        &self.config
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment<S>> + '_ {
        self.path
            .iter()
            .map(|step| self.table.segment(step.from, step.to))
    }
}

/// Greedy thread path builder.
///
/// Owns the residual grid for the whole run. Every step scores the chords
/// from the cursor to every other nail, draws the best one and moves the
/// cursor to its end.
pub struct Algorithm<S, D = FlatDarkness<S>> {
    config: Config<S>,
    table: NailTable<S>,
    residual: Residual<S>,
    darkness: D,
    path: Vec<Step>,
    cursor: usize,
    stalls: usize,
    steps: usize,
    state: State,
    buffers: Vec<BatchBuffer<S>>,
}

impl<S: Float> Algorithm<S> {
    pub fn new(table: NailTable<S>, residual: Residual<S>, config: Config<S>) -> Self {
        let darkness = FlatDarkness(config.thread_strength);
        Self::with_darkness(table, residual, config, darkness)
    }
}

impl<S: Float, D: Darkness<S>> Algorithm<S, D> {
    pub fn with_darkness(
        table: NailTable<S>,
        residual: Residual<S>,
        config: Config<S>,
        darkness: D,
    ) -> Self {
        Self {
            buffers: BatchBuffer::split(table.len(), num_cpus::get()),
            config,
            table,
            residual,
            darkness,
            path: Vec::new(),
            cursor: 0,
            stalls: 0,
            steps: 0,
            state: State::Running,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn path(&self) -> &[Step] {
        &self.path
    }

    pub fn residual(&self) -> &Residual<S> {
        &self.residual
    }

    pub fn table(&self) -> &NailTable<S> {
        &self.table
    }

    /// Runs until a stop condition holds.
    pub fn compute(mut self, verboser: &mut impl Verboser) -> Computation<S> {
        tracing::info!(
            nails = self.table.len(),
            max_steps = self.config.max_steps,
            auto_stop = self.config.auto_stop,
            "computing thread path"
        );
        let reason = loop {
            if let State::Stopped(reason) = self.step(verboser) {
                break reason;
            }
        };
        tracing::info!(
            %reason,
            lines = self.path.len(),
            steps = self.steps,
            "thread path finished"
        );
        Computation {
            table: self.table,
            residual: self.residual,
            path: self.path,
            reason,
            steps: self.steps,
            config: self.config,
        }
    }

    /// Advances the run by one step and returns the new state. Once stopped,
    /// further calls do nothing.
    pub fn step(&mut self, verboser: &mut impl Verboser) -> State {
        if let State::Stopped(_) = self.state {
            return self.state;
        }
        if self.steps >= self.config.max_steps {
            return self.stop(StopReason::StepBudgetReached, verboser);
        }
        if self.config.auto_stop && self.residual.max() <= self.config.residual_threshold {
            return self.stop(StopReason::ResidualExhausted, verboser);
        }

        verboser.verbose(Message::Computing(self.steps));
        self.steps += 1;
        let Some((to, score)) = self.get_best_line() else {
            return self.stop(StopReason::NoCandidate, verboser);
        };

        if score <= S::ZERO {
            self.stalls += 1;
            tracing::debug!(stalls = self.stalls, step = self.steps, "no chord improves the residual");
            verboser.verbose(Message::Stalled(self.stalls));
            if self.stalls >= self.config.max_no_improve {
                return self.stop(StopReason::TooManyStalls, verboser);
            }
            self.state = State::Stalled(self.stalls);
        } else {
            self.stalls = 0;
            let segment = self.table.segment(self.cursor, to);
            self.residual
                .apply(&segment, &self.darkness, self.config.line_weight);
            self.path.push(Step {
                step: self.path.len() + 1,
                from: self.cursor,
                to,
            });
            self.cursor = to;
            self.state = State::Running;
        }
        self.state
    }

    fn stop(&mut self, reason: StopReason, verboser: &mut impl Verboser) -> State {
        verboser.verbose(Message::Stopped(reason));
        self.state = State::Stopped(reason);
        self.state
    }

    /// Best chord leaving the cursor as `(nail, score)`.
    ///
    /// Candidates are scored in parallel by contiguous index chunks. Each
    /// chunk keeps its first strict maximum and the chunks are merged in
    /// index order, so ties always resolve to the lowest nail index.
    fn get_best_line(&mut self) -> Option<(usize, S)> {
        let cursor = self.cursor;
        let table = &self.table;
        let residual = &self.residual;
        let line_weight = self.config.line_weight;
        self.buffers.par_iter_mut().for_each(|buffer| {
            buffer.result = None;
            for to in buffer.range.clone() {
                if to == cursor {
                    continue;
                }
                let score = residual.score(&table.segment(cursor, to), line_weight);
                if buffer.result.map_or(true, |(_, best)| score > best) {
                    buffer.result = Some((to, score));
                }
            }
        });

        let mut best: Option<(usize, S)> = None;
        for BatchBuffer { range: _, result } in self.buffers.iter() {
            if let Some((to, score)) = *result {
                if best.map_or(true, |(_, best)| score > best) {
                    best = Some((to, score));
                }
            }
        }
        best
    }
}

struct BatchBuffer<S> {
    range: Range<usize>,
    result: Option<(usize, S)>,
}

impl<S> BatchBuffer<S> {
    /// Splits `0..nail_count` into at most `count` contiguous ranges.
    fn split(nail_count: usize, count: usize) -> Vec<Self> {
        let chunk_size = nail_count.div_ceil(count.max(1)).max(1);
        (0..nail_count)
            .step_by(chunk_size)
            .map(|start| BatchBuffer {
                range: start..std::cmp::min(start + chunk_size, nail_count),
                result: None,
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Point, verboser::Silent};

    fn config(nail_count: usize, size: usize) -> Config<f64> {
        Config {
            nail_count,
            ..Config::for_size(size)
        }
    }

    #[test]
    fn batches_cover_every_nail_once() {
        for (nails, cpus) in [(0, 4), (1, 8), (7, 3), (180, 16), (5, 1)] {
            let buffers = BatchBuffer::<f32>::split(nails, cpus);
            let covered: Vec<usize> = buffers.iter().flat_map(|b| b.range.clone()).collect();
            assert_eq!(covered, (0..nails).collect::<Vec<_>>());
            assert!(buffers.len() <= cpus.max(1));
        }
    }

    #[test]
    fn step_by_step_matches_compute() {
        let residual = Residual::new(32, |p| ((p.x * 7 + p.y * 3) % 11) as f64 / 10.0).unwrap();
        let mut cfg = config(24, 32);
        cfg.max_steps = 40;
        cfg.thread_strength = 0.5;

        let table = NailTable::circle(24, 16.0, Point::new(16.0, 16.0), &mut Silent).unwrap();
        let mut stepper = Algorithm::new(table.clone(), residual.clone(), cfg);
        while !matches!(stepper.step(&mut Silent), State::Stopped(_)) {}

        let computed = Algorithm::new(table, residual, cfg).compute(&mut Silent);
        assert_eq!(stepper.path(), computed.path());
        assert_eq!(stepper.residual(), computed.residual());
        assert_eq!(stepper.state(), State::Stopped(computed.reason()));
    }

    #[test]
    fn ties_resolve_to_lowest_index_across_chunks() {
        // Nail 1 is a short chord; nails 2..=8 all cover five lit pixels.
        let nails = vec![
            Point::new(5.0, 5.0),
            Point::new(6.0, 5.0),
            Point::new(9.0, 5.0),
            Point::new(1.0, 5.0),
            Point::new(5.0, 9.0),
            Point::new(5.0, 1.0),
            Point::new(9.0, 9.0),
            Point::new(1.0, 1.0),
            Point::new(9.0, 1.0),
        ];
        for chunks in [1, 2, 3, 4, 5, 9] {
            let residual = Residual::filled(10, 1.0f64).unwrap();
            let table = NailTable::from_points(nails.clone());
            let mut algorithm = Algorithm::new(table, residual, config(9, 10));
            algorithm.buffers = BatchBuffer::split(9, chunks);
            assert_eq!(algorithm.step(&mut Silent), State::Running);
            assert_eq!(algorithm.path()[0].to, 2, "split in {chunks} chunks");
        }
    }

    #[test]
    fn stopped_run_stays_stopped() {
        let residual = Residual::filled(8, 1.0f64).unwrap();
        let mut cfg = config(6, 8);
        cfg.max_steps = 1;
        let table = NailTable::circle(6, 4.0, Point::new(4.0, 4.0), &mut Silent).unwrap();
        let mut algorithm = Algorithm::new(table, residual, cfg);
        assert_eq!(algorithm.step(&mut Silent), State::Running);
        let stopped = State::Stopped(StopReason::StepBudgetReached);
        assert_eq!(algorithm.step(&mut Silent), stopped);
        assert_eq!(algorithm.step(&mut Silent), stopped);
        assert_eq!(algorithm.path().len(), 1);
    }

    #[test]
    fn stall_state_counts_up() {
        let residual = Residual::filled(8, 0.0f64).unwrap();
        let mut cfg = config(6, 8);
        cfg.auto_stop = false;
        cfg.max_no_improve = 3;
        let table = NailTable::circle(6, 4.0, Point::new(4.0, 4.0), &mut Silent).unwrap();
        let mut algorithm = Algorithm::new(table, residual, cfg);
        assert_eq!(algorithm.step(&mut Silent), State::Stalled(1));
        assert_eq!(algorithm.step(&mut Silent), State::Stalled(2));
        assert_eq!(
            algorithm.step(&mut Silent),
            State::Stopped(StopReason::TooManyStalls)
        );
        assert_eq!(algorithm.cursor(), 0);
    }

    #[test]
    fn compute_validates_config() {
        let residual = Residual::filled(4, 1.0f64).unwrap();
        let mut cfg = config(4, 4);
        cfg.thread_strength = 0.0;
        assert!(matches!(
            compute(&cfg, residual, &mut Silent),
            Err(Error::Config(config::Error::ThreadStrength(_)))
        ));
    }

    #[test]
    fn reports_progress_and_stop() {
        let residual = Residual::filled(8, 1.0f64).unwrap();
        let mut cfg = config(8, 8);
        cfg.max_steps = 3;
        let mut messages = Vec::new();
        let computation = compute(&cfg, residual, &mut |m: Message| messages.push(m)).unwrap();
        assert_eq!(computation.reason(), StopReason::StepBudgetReached);
        let computing: Vec<_> = messages
            .iter()
            .filter_map(|m| match m {
                Message::Computing(step) => Some(*step),
                _ => None,
            })
            .collect();
        assert_eq!(computing, vec![0, 1, 2]);
        assert_eq!(
            messages.last(),
            Some(&Message::Stopped(StopReason::StepBudgetReached))
        );
    }
}
