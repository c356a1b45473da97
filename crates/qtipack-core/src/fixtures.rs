//! Shared builders for unit tests.

use crate::model::*;

pub fn question(id: &str, kind: QuestionKind) -> Question {
    Question {
        id: id.into(),
        title: format!("Question {id}"),
        kind,
        prompt: format!("<p>Prompt {id}</p>"),
        points: 1.0,
        feedback: Feedback::default(),
        choices: vec![],
        numerical: None,
        gap_match: None,
    }
}

pub fn choice(id: &str, correct: bool) -> Choice {
    Choice {
        id: id.into(),
        body: format!("<p>{id}</p>"),
        correct,
        feedback: None,
    }
}

pub fn with_feedback(mut choice: Choice, text: &str) -> Choice {
    choice.feedback = Some(format!("<p>{text}</p>"));
    choice
}

pub fn multiple_choice(id: &str, correct: &str, others: &[&str]) -> Question {
    let mut q = question(id, QuestionKind::MultipleChoice);
    q.choices.push(choice(correct, true));
    q.choices.extend(others.iter().map(|o| choice(o, false)));
    q
}

pub fn multiple_answers(id: &str, correct: &[&str], wrong: &[&str]) -> Question {
    let mut q = question(id, QuestionKind::MultipleAnswers);
    q.points = 2.0;
    q.choices.extend(correct.iter().map(|c| choice(c, true)));
    q.choices.extend(wrong.iter().map(|c| choice(c, false)));
    q
}

pub fn short_answer(id: &str, accepted: &[&str]) -> Question {
    let mut q = question(id, QuestionKind::ShortAnswer);
    q.choices = accepted
        .iter()
        .enumerate()
        .map(|(i, a)| Choice {
            id: (i + 1).to_string(),
            body: a.to_string(),
            correct: true,
            feedback: None,
        })
        .collect();
    q
}

pub fn numerical(id: &str, target: f64, tolerance: f64) -> Question {
    let mut q = question(id, QuestionKind::Numerical);
    q.numerical = Some(NumericalAnswer::Tolerance { target, tolerance });
    q
}

pub fn essay(id: &str) -> Question {
    question(id, QuestionKind::Essay)
}

pub fn gap_match(id: &str) -> Question {
    let mut q = question(id, QuestionKind::GapMatch);
    q.points = 3.0;
    q.prompt = "<p>Now is the {G1} of our discontent, made glorious {G2}.</p>".into();
    q.gap_match = Some(GapMatch {
        gaps: vec!["G1".into(), "G2".into()],
        options: ["W:winter", "Sp:spring", "Su:summer"]
            .iter()
            .map(|s| {
                let (id, text) = s.split_once(':').unwrap();
                GapOption {
                    id: id.into(),
                    text: text.into(),
                }
            })
            .collect(),
        assignments: vec![
            GapAssignment {
                option: "W".into(),
                gap: "G1".into(),
            },
            GapAssignment {
                option: "Su".into(),
                gap: "G2".into(),
            },
        ],
    });
    q
}

pub fn group(id: &str, pick: u32) -> Group {
    Group {
        id: id.into(),
        title: format!("Group {id}"),
        pick,
    }
}

pub fn text(id: &str) -> TextRegion {
    TextRegion {
        id: id.into(),
        title: Some(format!("Text {id}")),
        body: format!("<p>Read {id}</p>"),
    }
}

pub fn document(entities: Vec<Entity>) -> Document {
    Document {
        id: "doc".into(),
        title: "Fixture quiz".into(),
        description: String::new(),
        entities,
        images: Default::default(),
    }
}
