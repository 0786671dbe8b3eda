use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fa_engine::config::EngineConfig;
use fa_engine::model::{RawState, Transition};
use std::rc::Rc;

/// A DFA over {0,1} with `n` states arranged as a binary counter mod `n`: state `i` on symbol
/// `b` goes to state `(2*i + b) % n`. Every state is reachable and the language is "dense"
/// enough that minimization, products and equivalence checks all do real work instead of
/// short-circuiting on a handful of states.
fn counter_dfa(n: usize) -> fa_engine::dfa::Dfa {
    let states: Vec<RawState> = (0..n).map(|i| RawState::new(format!("q{i}"))).collect();
    let alphabet = vec![Rc::from("0"), Rc::from("1")];
    let mut transitions = Vec::with_capacity(n * 2);
    for i in 0..n {
        transitions.push(Transition::symbol_transition(format!("q{i}"), "0", format!("q{}", (2 * i) % n)));
        transitions.push(Transition::symbol_transition(format!("q{i}"), "1", format!("q{}", (2 * i + 1) % n)));
    }
    let finals: Vec<Rc<str>> = (0..n).step_by(3).map(|i| Rc::from(format!("q{i}").as_str())).collect();
    fa_engine::dfa::build_dfa(&states, &alphabet, &transitions, "q0", &finals).unwrap().0
}

/// The classic "`n`th-from-last symbol is `a`" NFA: `n+1` states, each on `a` both stays put and
/// advances. Subset construction blows this up to up to `2^n` DFA states, making it the
/// standard worst case for determinization benchmarks.
fn nth_from_last_nfa(n: usize) -> fa_engine::nfa::Nfa {
    let states: Vec<RawState> = (0..=n).map(|i| RawState::new(format!("s{i}"))).collect();
    let mut transitions = Vec::new();
    for i in 0..=n {
        transitions.push(Transition::symbol_transition(format!("s{i}"), "a", format!("s{i}")));
        if i < n {
            transitions.push(Transition::symbol_transition(format!("s{i}"), "a", format!("s{}", i + 1)));
        }
    }
    fa_engine::nfa::build_nfa(&states, &[Rc::from("a")], &transitions, "s0", &[Rc::from(format!("s{n}").as_str())])
        .unwrap()
        .0
}

fn minimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimize");
    for size in [16, 64, 256] {
        let dfa = counter_dfa(size);
        group.bench_function(format!("counter_dfa/{size}"), |b| {
            b.iter(|| {
                let mut clone = dfa.clone();
                clone.minimize();
                black_box(clone)
            })
        });
    }
    group.finish();
}

fn determinize(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_to_dfa");
    let config = EngineConfig::default();
    for size in [8, 12, 16] {
        let nfa = nth_from_last_nfa(size);
        group.bench_function(format!("nth_from_last/{size}"), |b| {
            b.iter(|| black_box(nfa.to_dfa_with_config(&config).unwrap()))
        });
    }
    group.finish();
}

fn algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("algebra");
    let a = counter_dfa(64);
    let b = counter_dfa(48);
    group.bench_function("union/64x48", |bencher| bencher.iter(|| black_box(fa_engine::algebra::union(&a, &b).unwrap())));
    group.bench_function("intersection/64x48", |bencher| bencher.iter(|| black_box(fa_engine::algebra::intersection(&a, &b).unwrap())));
    group.finish();
}

fn equivalence_check(c: &mut Criterion) {
    let a = counter_dfa(128);
    let mut b = counter_dfa(128);
    b.minimize();
    c.bench_function("equivalent_to/128", |bencher| bencher.iter(|| black_box(a.equivalent_to(&b))));
}

criterion_group!(benches, minimize, determinize, algebra, equivalence_check);
criterion_main!(benches);
