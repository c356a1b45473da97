use criterion::{black_box, criterion_group, criterion_main, Criterion};

use qtipack_core::engine::{compile_document, CompileOptions};
use qtipack_core::expr::{evaluate, Value};
use qtipack_core::model::*;
use qtipack_core::scoring;

fn choice(id: &str, correct: bool) -> Choice {
    Choice {
        id: id.into(),
        body: format!("<p>{id}</p>"),
        correct,
        feedback: Some(format!("<p>feedback {id}</p>")),
    }
}

fn question(id: usize, kind: QuestionKind) -> Question {
    Question {
        id: id.to_string(),
        title: format!("Question {id}"),
        kind,
        prompt: format!("<p>Prompt {id}</p>"),
        points: 1.0,
        feedback: Feedback {
            general: Some("<p>general</p>".into()),
            correct: Some("<p>correct</p>".into()),
            incorrect: Some("<p>incorrect</p>".into()),
        },
        choices: vec![
            choice("a", true),
            choice("b", kind == QuestionKind::MultipleAnswers),
            choice("c", false),
            choice("d", false),
        ],
        numerical: None,
        gap_match: None,
    }
}

fn make_document(questions: usize) -> Document {
    let mut entities = Vec::new();
    for i in 0..questions {
        if i % 10 == 0 {
            entities.push(Entity::GroupStart(Group {
                id: format!("g{i}"),
                title: format!("Group {i}"),
                pick: 5,
            }));
        }
        let kind = if i % 2 == 0 {
            QuestionKind::MultipleChoice
        } else {
            QuestionKind::MultipleAnswers
        };
        entities.push(Entity::Question(question(i, kind)));
        if i % 10 == 9 {
            entities.push(Entity::GroupEnd);
        }
    }
    Document {
        id: "bench".into(),
        title: "Bench quiz".into(),
        description: String::new(),
        entities,
        images: Default::default(),
    }
}

fn bench_compile_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_document");
    let options = CompileOptions::default();

    for size in [10, 100, 500] {
        let doc = make_document(size);
        group.bench_function(format!("questions={size}"), |b| {
            b.iter(|| compile_document(black_box(&doc), &options))
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    let options = CompileOptions::default();
    let q = question(1, QuestionKind::MultipleAnswers);

    group.bench_function("compile_multiple_answers", |b| {
        b.iter(|| scoring::compile(black_box(&q), &options.ids))
    });

    if let Ok(compiled) = scoring::compile(&q, &options.ids) {
        group.bench_function("evaluate_multiple_answers", |b| {
            b.iter(|| {
                evaluate(
                    black_box(&compiled.processing),
                    Value::identifiers(["qtipack_choice_1_a", "qtipack_choice_1_b"]),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile_document, bench_scoring);
criterion_main!(benches);
