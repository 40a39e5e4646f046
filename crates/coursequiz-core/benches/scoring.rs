use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use coursequiz_core::model::{Difficulty, Question};
use coursequiz_core::selection::{weighted_questions, DifficultyWeights};
use coursequiz_core::session::{QuizSession, ReviewFilter};

fn make_questions(n: u64) -> Vec<Question> {
    (0..n)
        .map(|i| {
            let mut q = Question::new(
                i,
                format!("Question {i}"),
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                (i % 4) as usize,
                "",
            );
            q.difficulty = Some(Difficulty::ALL[(i % 3) as usize]);
            q
        })
        .collect()
}

fn answered_session(n: u64) -> QuizSession {
    let mut session = QuizSession::new(make_questions(n)).expect("valid questions");
    for i in 0..n as usize {
        session.select_option(i, i % 3);
        session.advance();
    }
    session
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    group.bench_function("walkthrough_30", |b| b.iter(|| answered_session(black_box(30))));

    let finished = answered_session(400);
    group.bench_function("score_400", |b| b.iter(|| black_box(&finished).score()));
    group.bench_function("review_incorrect_400", |b| {
        b.iter(|| black_box(&finished).review(ReviewFilter::Incorrect))
    });

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let bank = make_questions(400);

    c.bench_function("weighted_30_of_400", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| weighted_questions(black_box(&bank), 30, DifficultyWeights::default(), &mut rng))
    });
}

criterion_group!(benches, bench_session, bench_selection);
criterion_main!(benches);
