use string_art::{
    compute,
    geometry::Point,
    verboser::{Message, Silent},
    Algorithm, Config, NailTable, Residual, State, StopReason,
};

fn pattern(size: usize) -> Residual<f64> {
    Residual::new(size, |p| {
        let v = ((p.x * 31 + p.y * 17) % 23) as f64 / 22.0;
        if (p.x / 4 + p.y / 4) % 2 == 0 {
            v
        } else {
            v * 0.25
        }
    })
    .unwrap()
}

fn config(size: usize, nail_count: usize, max_steps: usize) -> Config<f64> {
    Config {
        nail_count,
        max_steps,
        ..Config::for_size(size)
    }
}

#[test]
fn path_respects_step_budget() {
    for (nails, steps) in [(8, 5), (36, 50), (60, 200)] {
        let computation = compute(&config(48, nails, steps), pattern(48), &mut Silent).unwrap();
        assert!(computation.path().len() <= steps);
        assert!(computation.steps() <= steps);
    }
}

#[test]
fn path_is_a_chain_of_distinct_nails() {
    let computation = compute(&config(48, 36, 150), pattern(48), &mut Silent).unwrap();
    let path = computation.path();
    assert!(!path.is_empty());
    assert_eq!(path[0].from, 0);
    for (i, step) in path.iter().enumerate() {
        assert_eq!(step.step, i + 1);
        assert_ne!(step.from, step.to);
        assert!(step.to < 36);
        if i > 0 {
            assert_eq!(step.from, path[i - 1].to);
        }
    }
}

#[test]
fn residual_stays_between_zero_and_initial() {
    let initial = pattern(40);
    let mut cfg = config(40, 24, 80);
    cfg.thread_strength = 0.35;
    let table = NailTable::circle(24, cfg.radius, cfg.center, &mut Silent).unwrap();
    let mut algorithm = Algorithm::new(table, initial.clone(), cfg);
    loop {
        let state = algorithm.step(&mut Silent);
        for (now, before) in algorithm.residual().pixels().iter().zip(initial.pixels()) {
            assert!(*now >= 0.0 && now <= before);
        }
        if let State::Stopped(_) = state {
            break;
        }
    }
}

#[test]
fn runs_are_deterministic() {
    let cfg = config(64, 90, 300);
    let a = compute(&cfg, pattern(64), &mut Silent).unwrap();
    let b = compute(&cfg, pattern(64), &mut Silent).unwrap();
    assert_eq!(a.path(), b.path());
    assert_eq!(a.reason(), b.reason());
    assert_eq!(a.residual(), b.residual());
}

#[test]
fn blank_grid_auto_stops_immediately() {
    let residual = Residual::filled(32, 0.01f64).unwrap();
    let computation = compute(&config(32, 20, 100), residual, &mut Silent).unwrap();
    assert!(computation.path().is_empty());
    assert_eq!(computation.reason(), StopReason::ResidualExhausted);
    assert_eq!(computation.steps(), 0);
}

#[test]
fn zero_grid_stalls_exactly_max_no_improve_times() {
    let mut cfg = config(32, 20, 1000);
    cfg.auto_stop = false;
    cfg.max_no_improve = 7;
    let residual = Residual::filled(32, 0.0f64).unwrap();
    let mut stalls = Vec::new();
    let computation = compute(&cfg, residual, &mut |message: Message| {
        if let Message::Stalled(k) = message {
            stalls.push(k)
        }
    })
    .unwrap();
    assert!(computation.path().is_empty());
    assert_eq!(computation.reason(), StopReason::TooManyStalls);
    assert_eq!(computation.steps(), 7);
    assert_eq!(stalls, (1..=7).collect::<Vec<_>>());
}

#[test]
fn four_nails_pick_lowest_index_among_best() {
    let cfg = Config {
        nail_count: 4,
        radius: 1.0,
        center: Point::new(0.0, 0.0),
        max_steps: 1,
        thread_strength: 1.0,
        line_weight: 1,
        ..Config::<f64>::for_size(4)
    };
    let residual = Residual::filled(4, 1.0).unwrap();
    let table = NailTable::circle(4, 1.0, Point::new(0.0, 0.0), &mut Silent).unwrap();
    let scores: Vec<f64> = (1..4)
        .map(|to| residual.score(&table.segment(0, to), 1))
        .collect();
    let best = scores.iter().cloned().fold(f64::MIN, f64::max);
    let expected = 1 + scores.iter().position(|&s| s == best).unwrap();

    let computation = compute(&cfg, residual, &mut Silent).unwrap();
    let path = computation.path();
    assert_eq!(path.len(), 1);
    assert_eq!((path[0].from, path[0].to), (0, expected));
    // nails 2 and 3 both cover two lit pixels
    assert_eq!(expected, 2);
    assert_eq!(computation.reason(), StopReason::StepBudgetReached);
}

#[test]
fn two_nails_alternate_then_stall() {
    let mut cfg = config(10, 2, 100);
    cfg.radius = 4.0;
    cfg.thread_strength = 0.4;
    cfg.auto_stop = false;
    cfg.max_no_improve = 3;
    let computation = compute(&cfg, Residual::filled(10, 1.0).unwrap(), &mut Silent).unwrap();
    let path = computation.path();
    assert!(path.len() >= 3);
    for (i, step) in path.iter().enumerate() {
        assert_eq!(step.from, i % 2);
        assert_eq!(step.to, 1 - i % 2);
    }
    assert_eq!(computation.reason(), StopReason::TooManyStalls);
    assert_eq!(computation.steps(), path.len() + 3);
}

#[test]
fn each_step_removes_at_most_its_chord_score() {
    let mut cfg = config(48, 40, 120);
    cfg.thread_strength = 0.6;
    let table = NailTable::circle(40, cfg.radius, cfg.center, &mut Silent).unwrap();
    let mut algorithm = Algorithm::new(table, pattern(48), cfg);
    loop {
        let before = algorithm.residual().clone();
        let drawn = algorithm.path().len();
        let state = algorithm.step(&mut Silent);
        let removed = before.total() - algorithm.residual().total();
        if algorithm.path().len() > drawn {
            let step = algorithm.path()[drawn];
            let segment = algorithm.table().segment(step.from, step.to);
            let score = before.score(&segment, cfg.line_weight);
            assert!(removed > 0.0);
            assert!(removed <= score + 1e-9, "step {}: {removed} > {score}", step.step);
        } else {
            assert_eq!(removed, 0.0);
        }
        if let State::Stopped(_) = state {
            break;
        }
    }
    assert!(!algorithm.path().is_empty());
}

#[test]
fn coincident_nails_stall_instead_of_drawing() {
    let table = NailTable::from_points(vec![Point::new(2.0f64, 2.0), Point::new(2.0, 2.0)]);
    let mut cfg = config(4, 2, 5);
    cfg.auto_stop = false;
    cfg.max_no_improve = 2;
    let computation = Algorithm::new(table, Residual::filled(4, 1.0).unwrap(), cfg)
        .compute(&mut Silent);
    assert!(computation.path().is_empty());
    assert_eq!(computation.reason(), StopReason::TooManyStalls);
    assert_eq!(computation.steps(), 2);
}

#[test]
fn single_nail_has_no_candidate() {
    let table = NailTable::from_points(vec![Point::new(2.0f64, 2.0)]);
    let computation = Algorithm::new(table, Residual::filled(4, 1.0).unwrap(), config(4, 2, 10))
        .compute(&mut Silent);
    assert!(computation.path().is_empty());
    assert_eq!(computation.reason(), StopReason::NoCandidate);
}

#[test]
fn zero_step_budget_draws_nothing() {
    let computation = compute(&config(16, 12, 0), pattern(16), &mut Silent).unwrap();
    assert!(computation.path().is_empty());
    assert_eq!(computation.reason(), StopReason::StepBudgetReached);
}

#[test]
fn single_precision_draws_the_same_number_of_chords() {
    let residual32 = Residual::filled(32, 1.0f32).unwrap();
    let residual64 = Residual::filled(32, 1.0f64).unwrap();
    let a = compute(
        &Config {
            nail_count: 12,
            max_steps: 3,
            ..Config::<f32>::for_size(32)
        },
        residual32,
        &mut Silent,
    )
    .unwrap();
    let b = compute(&config(32, 12, 3), residual64, &mut Silent).unwrap();
    assert_eq!(a.path().len(), b.path().len());
}
