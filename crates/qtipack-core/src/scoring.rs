//! Scoring compiler.
//!
//! Turns one [`Question`] into its response declaration, outcome
//! declarations, and scoring tree. The tree is dialect-agnostic; see
//! [`crate::expr`] for the algebra and its evaluator.

use crate::error::{CompileError, Diagnostic};
use crate::expr::*;
use crate::ids::{FeedbackRole, IdScheme};
use crate::model::{Choice, Question, QuestionKind};

/// Everything the scoring compiler derives for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledScoring {
    pub response: ResponseDeclaration,
    pub outcomes: Vec<OutcomeDeclaration>,
    pub processing: ResponseProcessing,
    pub warnings: Vec<Diagnostic>,
}

/// Response cardinality and base type for a question kind.
pub fn response_shape(kind: QuestionKind) -> (Cardinality, BaseType) {
    match kind {
        QuestionKind::TrueFalse | QuestionKind::MultipleChoice => {
            (Cardinality::Single, BaseType::Identifier)
        }
        QuestionKind::MultipleAnswers => (Cardinality::Multiple, BaseType::Identifier),
        QuestionKind::ShortAnswer | QuestionKind::Essay => (Cardinality::Single, BaseType::String),
        QuestionKind::Numerical => (Cardinality::Single, BaseType::Float),
        QuestionKind::FileUpload => (Cardinality::Single, BaseType::File),
        QuestionKind::GapMatch => (Cardinality::Multiple, BaseType::DirectedPair),
    }
}

/// Compile the scoring rules of a question.
pub fn compile(question: &Question, ids: &IdScheme) -> Result<CompiledScoring, CompileError> {
    if !question.points.is_finite() || question.points < 0.0 {
        return Err(CompileError::InvalidPoints {
            id: question.id.clone(),
            points: question.points,
        });
    }

    let mut warnings = Vec::new();
    let (correct_response, processing) = match question.kind {
        QuestionKind::TrueFalse | QuestionKind::MultipleChoice => {
            single_choice(question, ids, &mut warnings)?
        }
        QuestionKind::MultipleAnswers => multiple_answers(question, ids)?,
        QuestionKind::ShortAnswer => short_answer(question, ids)?,
        QuestionKind::Numerical => numerical(question, ids)?,
        QuestionKind::Essay | QuestionKind::FileUpload => (Vec::new(), manual(question, ids)),
        QuestionKind::GapMatch => gap_match(question, ids, &mut warnings)?,
    };

    let (cardinality, base_type) = response_shape(question.kind);
    Ok(CompiledScoring {
        response: ResponseDeclaration {
            identifier: RESPONSE.into(),
            cardinality,
            base_type,
            correct_response,
        },
        outcomes: vec![OutcomeDeclaration::score(), OutcomeDeclaration::feedback()],
        processing,
        warnings,
    })
}

type Compiled = (Vec<String>, ResponseProcessing);

fn single_choice(
    question: &Question,
    ids: &IdScheme,
    warnings: &mut Vec<Diagnostic>,
) -> Result<Compiled, CompileError> {
    require_choices(question)?;
    let correct: Vec<usize> = question
        .choices
        .iter()
        .enumerate()
        .filter(|(_, c)| c.correct)
        .map(|(i, _)| i)
        .collect();
    let Some(&correct_index) = correct.first() else {
        return Err(no_correct(question));
    };
    let correct_choice = &question.choices[correct_index];

    if correct.len() > 1 {
        let message = format!(
            "{} choices are marked correct; only '{}' is credited",
            correct.len(),
            correct_choice.id
        );
        warnings.push(Diagnostic::new(&question.id, message));
    }

    let correct_id = ids.choice(question, correct_choice);
    let if_branch = Branch {
        condition: Expr::matches(Expr::variable(RESPONSE), Expr::identifier(&correct_id)),
        actions: award(
            question,
            [
                marker(question, ids, FeedbackRole::Correct),
                choice_marker(question, ids, correct_choice),
                marker(question, ids, FeedbackRole::General),
            ],
        ),
    };

    let else_ifs = question
        .choices
        .iter()
        .enumerate()
        .filter(|(i, c)| *i != correct_index && c.feedback.is_some())
        .map(|(_, c)| Branch {
            condition: Expr::matches(
                Expr::variable(RESPONSE),
                Expr::identifier(ids.choice(question, c)),
            ),
            actions: feedback_action(vec![ids.choice_feedback(question, c)])
                .into_iter()
                .collect(),
        })
        .collect();

    let processing = ResponseProcessing {
        rules: vec![ResponseRule::Condition(ResponseCondition {
            if_branch,
            else_ifs,
            otherwise: fallback(question, ids),
        })],
    };
    Ok((vec![correct_id], processing))
}

fn multiple_answers(question: &Question, ids: &IdScheme) -> Result<Compiled, CompileError> {
    require_choices(question)?;
    if question.correct_choices().next().is_none() {
        return Err(no_correct(question));
    }

    let selected = |c: &Choice| {
        Expr::member(
            Expr::identifier(ids.choice(question, c)),
            Expr::variable(RESPONSE),
        )
    };

    // Exact subset: every correct choice selected, every other one not.
    let exact = question
        .choices
        .iter()
        .map(|c| {
            if c.correct {
                selected(c)
            } else {
                Expr::not(selected(c))
            }
        })
        .collect();

    let mut rules = vec![ResponseRule::Condition(ResponseCondition {
        if_branch: Branch {
            condition: Expr::all(exact),
            actions: award(
                question,
                [
                    marker(question, ids, FeedbackRole::Correct),
                    marker(question, ids, FeedbackRole::General),
                ],
            ),
        },
        else_ifs: vec![],
        otherwise: fallback(question, ids),
    })];

    for choice in question.choices.iter().filter(|c| c.feedback.is_some()) {
        rules.push(ResponseRule::Condition(ResponseCondition {
            if_branch: Branch {
                condition: selected(choice),
                actions: vec![SetOutcomeValue::new(
                    FEEDBACK,
                    Expr::Multiple(vec![
                        Expr::variable(FEEDBACK),
                        Expr::identifier(ids.choice_feedback(question, choice)),
                    ]),
                )],
            },
            else_ifs: vec![],
            otherwise: None,
        }));
    }

    let correct_response = question
        .correct_choices()
        .map(|c| ids.choice(question, c))
        .collect();
    Ok((correct_response, ResponseProcessing { rules }))
}

fn short_answer(question: &Question, ids: &IdScheme) -> Result<Compiled, CompileError> {
    require_choices(question)?;
    let mut branches: Vec<Branch> = question
        .correct_choices()
        .map(|c| Branch {
            condition: Expr::matches(
                Expr::variable(RESPONSE),
                Expr::literal(BaseType::String, c.body.clone()),
            ),
            actions: award(
                question,
                [
                    marker(question, ids, FeedbackRole::Correct),
                    choice_marker(question, ids, c),
                    marker(question, ids, FeedbackRole::General),
                ],
            ),
        })
        .collect();
    if branches.is_empty() {
        return Err(no_correct(question));
    }

    let correct_response = question
        .correct_choices()
        .take(1)
        .map(|c| c.body.clone())
        .collect();

    // Without per-answer feedback every branch does the same thing, so the
    // chain collapses into one disjunction.
    if question.correct_choices().all(|c| c.feedback.is_none()) && branches.len() > 1 {
        let actions = branches[0].actions.clone();
        let condition = Expr::any(branches.into_iter().map(|b| b.condition).collect());
        branches = vec![Branch { condition, actions }];
    }

    let if_branch = branches.remove(0);
    let processing = ResponseProcessing {
        rules: vec![ResponseRule::Condition(ResponseCondition {
            if_branch,
            else_ifs: branches,
            otherwise: fallback(question, ids),
        })],
    };
    Ok((correct_response, processing))
}

fn numerical(question: &Question, ids: &IdScheme) -> Result<Compiled, CompileError> {
    let answer = question
        .numerical
        .ok_or_else(|| CompileError::MissingNumericalAnswer {
            id: question.id.clone(),
        })?;
    let (min, max) = answer.bounds();
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(CompileError::InvalidNumericalRange {
            id: question.id.clone(),
            min,
            max,
        });
    }

    let in_range = Expr::And(vec![
        Expr::gte(Expr::variable(RESPONSE), Expr::float(min)),
        Expr::lte(Expr::variable(RESPONSE), Expr::float(max)),
    ]);
    let processing = ResponseProcessing {
        rules: vec![ResponseRule::Condition(ResponseCondition {
            if_branch: Branch {
                condition: in_range,
                actions: award(
                    question,
                    [
                        marker(question, ids, FeedbackRole::Correct),
                        marker(question, ids, FeedbackRole::General),
                    ],
                ),
            },
            else_ifs: vec![],
            otherwise: fallback(question, ids),
        })],
    };
    let correct_response = answer.target().map(format_float).into_iter().collect();
    Ok((correct_response, processing))
}

/// Essay and file-upload: never scored, general feedback only.
fn manual(question: &Question, ids: &IdScheme) -> ResponseProcessing {
    let Some(general) = marker(question, ids, FeedbackRole::General) else {
        return ResponseProcessing::default();
    };
    ResponseProcessing {
        rules: vec![ResponseRule::Condition(ResponseCondition {
            if_branch: Branch {
                // Outcome processing only runs once a response was submitted.
                condition: Expr::boolean(true),
                actions: feedback_action(vec![general]).into_iter().collect(),
            },
            else_ifs: vec![],
            otherwise: None,
        })],
    }
}

fn gap_match(
    question: &Question,
    ids: &IdScheme,
    warnings: &mut Vec<Diagnostic>,
) -> Result<Compiled, CompileError> {
    let missing = |what| CompileError::MissingGapMatch {
        id: question.id.clone(),
        what,
    };
    let data = question.gap_match.as_ref().ok_or_else(|| missing("gap data"))?;
    if data.gaps.is_empty() {
        return Err(missing("gaps"));
    }
    if data.options.is_empty() {
        return Err(missing("options"));
    }
    if data.assignments.is_empty() {
        return Err(missing("assignments"));
    }

    for a in &data.assignments {
        if !data.options.iter().any(|o| o.id == a.option) {
            return Err(CompileError::UnknownGapOption {
                id: question.id.clone(),
                option: a.option.clone(),
            });
        }
        if !data.gaps.contains(&a.gap) {
            return Err(CompileError::UnknownGap {
                id: question.id.clone(),
                gap: a.gap.clone(),
            });
        }
    }
    for gap in &data.gaps {
        match data.assignments.iter().filter(|a| &a.gap == gap).count() {
            0 => warnings.push(Diagnostic::new(
                &question.id,
                format!("gap '{gap}' has no assigned option"),
            )),
            1 => {}
            n => warnings.push(Diagnostic::new(
                &question.id,
                format!("gap '{gap}' has {n} assigned options but holds only one"),
            )),
        }
    }

    let pairs: Vec<String> = data
        .assignments
        .iter()
        .map(|a| format!("{} {}", a.option, a.gap))
        .collect();
    let condition = Expr::all(
        pairs
            .iter()
            .map(|p| {
                Expr::member(
                    Expr::literal(BaseType::DirectedPair, p.clone()),
                    Expr::variable(RESPONSE),
                )
            })
            .collect(),
    );
    let processing = ResponseProcessing {
        rules: vec![ResponseRule::Condition(ResponseCondition {
            if_branch: Branch {
                condition,
                actions: award(
                    question,
                    [
                        marker(question, ids, FeedbackRole::Correct),
                        marker(question, ids, FeedbackRole::General),
                    ],
                ),
            },
            else_ifs: vec![],
            otherwise: None,
        })],
    };
    Ok((pairs, processing))
}

fn require_choices(question: &Question) -> Result<(), CompileError> {
    if question.choices.is_empty() {
        return Err(CompileError::MissingChoices {
            id: question.id.clone(),
            kind: question.kind,
        });
    }
    Ok(())
}

fn no_correct(question: &Question) -> CompileError {
    CompileError::NoCorrectChoice {
        id: question.id.clone(),
        kind: question.kind,
    }
}

/// Marker of a question-level feedback body, if the body exists.
fn marker(question: &Question, ids: &IdScheme, role: FeedbackRole) -> Option<String> {
    let body = match role {
        FeedbackRole::General => &question.feedback.general,
        FeedbackRole::Correct => &question.feedback.correct,
        FeedbackRole::Incorrect => &question.feedback.incorrect,
    };
    body.as_ref().map(|_| ids.feedback(question, role))
}

fn choice_marker(question: &Question, ids: &IdScheme, choice: &Choice) -> Option<String> {
    choice
        .feedback
        .as_ref()
        .map(|_| ids.choice_feedback(question, choice))
}

fn feedback_action(markers: Vec<String>) -> Option<SetOutcomeValue> {
    if markers.is_empty() {
        return None;
    }
    Some(SetOutcomeValue::new(
        FEEDBACK,
        Expr::Multiple(markers.into_iter().map(Expr::identifier).collect()),
    ))
}

/// Full points plus whichever feedback markers exist.
fn award<const N: usize>(question: &Question, markers: [Option<String>; N]) -> Vec<SetOutcomeValue> {
    let mut actions = vec![SetOutcomeValue::new(SCORE, Expr::float(question.points))];
    actions.extend(feedback_action(markers.into_iter().flatten().collect()));
    actions
}

/// The `else` branch: incorrect and general feedback, no points.
fn fallback(question: &Question, ids: &IdScheme) -> Option<Vec<SetOutcomeValue>> {
    let markers = [
        marker(question, ids, FeedbackRole::Incorrect),
        marker(question, ids, FeedbackRole::General),
    ];
    feedback_action(markers.into_iter().flatten().collect()).map(|set| vec![set])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::fixtures::{gap_match, multiple_answers, numerical, short_answer};

    fn ids() -> IdScheme {
        IdScheme::new("t")
    }

    fn score(question: &Question, response: Value) -> f64 {
        let compiled = compile(question, &ids()).unwrap();
        evaluate(&compiled.processing, response).score
    }

    #[test]
    fn response_shapes_follow_kind() {
        assert_eq!(
            response_shape(QuestionKind::MultipleAnswers),
            (Cardinality::Multiple, BaseType::Identifier)
        );
        assert_eq!(
            response_shape(QuestionKind::FileUpload),
            (Cardinality::Single, BaseType::File)
        );
        assert_eq!(
            response_shape(QuestionKind::GapMatch),
            (Cardinality::Multiple, BaseType::DirectedPair)
        );
    }

    #[test]
    fn outcomes_always_declared() {
        for q in [essay("e"), numerical("n", 1.0, 0.1), gap_match("g")] {
            let compiled = compile(&q, &ids()).unwrap();
            assert_eq!(compiled.outcomes[0], OutcomeDeclaration::score());
            assert_eq!(compiled.outcomes[1], OutcomeDeclaration::feedback());
        }
    }

    #[test]
    fn single_choice_awards_only_the_correct_choice() {
        let q = multiple_choice("1", "c", &["a", "b", "d"]);
        assert_eq!(score(&q, Value::identifier("t_choice_1_c")), 1.0);
        for wrong in ["t_choice_1_a", "t_choice_1_b", "t_choice_1_d"] {
            assert_eq!(score(&q, Value::identifier(wrong)), 0.0);
        }
        assert_eq!(score(&q, Value::Null), 0.0);
    }

    #[test]
    fn single_choice_feedback_routing() {
        let mut q = multiple_choice("1", "c", &[]);
        q.choices.push(with_feedback(choice("a", false), "not a"));
        q.choices.push(choice("b", false));
        q.choices[0] = with_feedback(choice("c", true), "yes c");
        q.feedback.general = Some("<p>general</p>".into());
        q.feedback.incorrect = Some("<p>wrong</p>".into());

        let compiled = compile(&q, &ids()).unwrap();
        let ResponseRule::Condition(cond) = &compiled.processing.rules[0] else {
            panic!("expected a condition");
        };
        assert_eq!(cond.else_ifs.len(), 1);

        let hit = evaluate(&compiled.processing, Value::identifier("t_choice_1_c"));
        assert!(hit.feedback.contains("t_choice_1_c_fb"));
        assert!(hit.feedback.contains("t_question_1_general_fb"));
        assert!(!hit.feedback.contains("t_question_1_incorrect_fb"));

        let a = evaluate(&compiled.processing, Value::identifier("t_choice_1_a"));
        assert_eq!(a.score, 0.0);
        assert_eq!(
            a.feedback.into_iter().collect::<Vec<_>>(),
            vec!["t_choice_1_a_fb".to_string()]
        );

        let b = evaluate(&compiled.processing, Value::identifier("t_choice_1_b"));
        assert!(b.feedback.contains("t_question_1_incorrect_fb"));
        assert!(b.feedback.contains("t_question_1_general_fb"));
    }

    #[test]
    fn several_correct_choices_warn_and_credit_the_first() {
        let mut q = multiple_choice("1", "a", &["b"]);
        q.choices[1].correct = true;
        let compiled = compile(&q, &ids()).unwrap();
        assert_eq!(compiled.warnings.len(), 1);
        assert_eq!(compiled.warnings[0].entity_id, "1");
        assert_eq!(compiled.response.correct_response, vec!["t_choice_1_a"]);
        assert_eq!(score(&q, Value::identifier("t_choice_1_b")), 0.0);
    }

    #[test]
    fn choice_kinds_reject_missing_choices() {
        let q = question("9", QuestionKind::TrueFalse);
        assert!(matches!(
            compile(&q, &ids()),
            Err(CompileError::MissingChoices { ref id, .. }) if id == "9"
        ));

        let q = multiple_answers("8", &[], &["x"]);
        assert!(matches!(
            compile(&q, &ids()),
            Err(CompileError::NoCorrectChoice { .. })
        ));
    }

    #[test]
    fn multiple_answers_requires_the_exact_set() {
        let q = multiple_answers("2", &["b", "c"], &["a", "d"]);
        let set = |cs: &[&str]| {
            let owned: Vec<String> = cs.iter().map(|c| format!("t_choice_2_{c}")).collect();
            Value::identifiers(owned.iter().map(String::as_str))
        };

        assert_eq!(score(&q, set(&["b", "c"])), 2.0);
        assert_eq!(score(&q, set(&["c", "b"])), 2.0);
        assert_eq!(score(&q, set(&["b"])), 0.0, "proper subset");
        assert_eq!(score(&q, set(&["b", "c", "a"])), 0.0, "superset");
        assert_eq!(score(&q, set(&["a", "d"])), 0.0, "disjoint");
        assert_eq!(score(&q, Value::Null), 0.0);
    }

    #[test]
    fn multiple_answers_choice_feedback_is_appended() {
        let mut q = multiple_answers("2", &["b"], &["a"]);
        q.choices[1] = with_feedback(choice("a", false), "not a");
        q.feedback.incorrect = Some("<p>no</p>".into());
        let compiled = compile(&q, &ids()).unwrap();
        assert_eq!(compiled.processing.rules.len(), 2);

        let out = evaluate(
            &compiled.processing,
            Value::identifiers(["t_choice_2_a", "t_choice_2_b"]),
        );
        assert_eq!(out.score, 0.0);
        assert!(out.feedback.contains("t_question_2_incorrect_fb"));
        assert!(out.feedback.contains("t_choice_2_a_fb"));
    }

    #[test]
    fn short_answer_accepts_any_listed_string() {
        let q = short_answer("6", &["Santa", "Santa Claus", "Saint Nick"]);
        assert_eq!(score(&q, Value::string("Santa")), 1.0);
        assert_eq!(score(&q, Value::string("Saint Nick")), 1.0);
        assert_eq!(score(&q, Value::string("santa")), 0.0, "case-sensitive");
        assert_eq!(score(&q, Value::string("Rudolph")), 0.0);

        let compiled = compile(&q, &ids()).unwrap();
        let ResponseRule::Condition(cond) = &compiled.processing.rules[0] else {
            panic!("expected a condition");
        };
        assert!(cond.else_ifs.is_empty());
        let Expr::Or(matches) = &cond.if_branch.condition else {
            panic!("expected a disjunction, got {:?}", cond.if_branch.condition);
        };
        assert_eq!(matches.len(), 3);
        assert_eq!(compiled.response.correct_response, vec!["Santa"]);
    }

    #[test]
    fn short_answer_feedback_keeps_one_branch_per_string() {
        let mut q = short_answer("6", &["Santa", "Santa Claus", "Saint Nick"]);
        q.choices[2] = with_feedback(q.choices[2].clone(), "nickname");

        let compiled = compile(&q, &ids()).unwrap();
        let ResponseRule::Condition(cond) = &compiled.processing.rules[0] else {
            panic!("expected a condition");
        };
        assert_eq!(cond.else_ifs.len(), 2);

        let out = evaluate(&compiled.processing, Value::string("Saint Nick"));
        assert_eq!(out.score, 1.0);
        assert!(out.feedback.contains("t_choice_6_3_fb"));
        assert_eq!(score(&q, Value::string("Santa Claus")), 1.0);
    }

    #[test]
    fn numerical_range_is_inclusive() {
        let q = numerical("4", 1.4142, 0.0001);
        let (min, max) = q.numerical.unwrap().bounds();
        assert_eq!(score(&q, Value::float(1.4142)), 1.0);
        assert_eq!(score(&q, Value::float(min)), 1.0);
        assert_eq!(score(&q, Value::float(max)), 1.0);
        assert_eq!(score(&q, Value::float(min - 1e-9)), 0.0);
        assert_eq!(score(&q, Value::float(max + 1e-9)), 0.0);
        assert_eq!(score(&q, Value::string("abc")), 0.0);
    }

    #[test]
    fn numerical_boundary_answers_score() {
        let q = numerical("4", 0.7, 0.1);
        assert_eq!(score(&q, Value::float(0.8)), 1.0);
        assert_eq!(score(&q, Value::float(0.6)), 1.0);
        assert_eq!(score(&q, Value::float(0.81)), 0.0);
        assert_eq!(score(&q, Value::float(0.59)), 0.0);

        let compiled = compile(&q, &ids()).unwrap();
        let ResponseRule::Condition(cond) = &compiled.processing.rules[0] else {
            panic!("expected a condition");
        };
        assert_eq!(
            cond.if_branch.condition,
            Expr::And(vec![
                Expr::gte(Expr::variable(RESPONSE), Expr::float(0.6)),
                Expr::lte(Expr::variable(RESPONSE), Expr::float(0.8)),
            ])
        );
    }

    #[test]
    fn numerical_rejects_bad_answers() {
        let mut q = numerical("4", 1.0, -1.0);
        assert!(matches!(
            compile(&q, &ids()),
            Err(CompileError::InvalidNumericalRange { .. })
        ));
        q.numerical = None;
        assert!(matches!(
            compile(&q, &ids()),
            Err(CompileError::MissingNumericalAnswer { .. })
        ));
    }

    #[test]
    fn essay_never_scores() {
        let mut q = essay("7");
        q.points = 5.0;
        let compiled = compile(&q, &ids()).unwrap();
        assert!(compiled.processing.is_empty());
        assert!(compiled.response.correct_response.is_empty());

        q.feedback.general = Some("<p>thanks</p>".into());
        let compiled = compile(&q, &ids()).unwrap();
        let out = evaluate(&compiled.processing, Value::string("anything"));
        assert_eq!(out.score, 0.0);
        assert!(out.feedback.contains("t_question_7_general_fb"));
    }

    #[test]
    fn gap_match_requires_every_assignment() {
        let q = gap_match("9");
        assert_eq!(score(&q, Value::pairs([("W", "G1"), ("Su", "G2")])), 3.0);
        assert_eq!(score(&q, Value::pairs([("W", "G1")])), 0.0);
        assert_eq!(score(&q, Value::pairs([("Sp", "G1"), ("Su", "G2")])), 0.0);
    }

    #[test]
    fn gap_match_has_no_else_branch() {
        let mut q = gap_match("9");
        q.feedback.incorrect = Some("<p>no</p>".into());
        let compiled = compile(&q, &ids()).unwrap();
        let ResponseRule::Condition(cond) = &compiled.processing.rules[0] else {
            panic!("expected a condition");
        };
        assert!(cond.otherwise.is_none());
    }

    #[test]
    fn gap_match_validates_references() {
        let mut q = gap_match("9");
        q.gap_match.as_mut().unwrap().assignments[0].option = "X".into();
        assert!(matches!(
            compile(&q, &ids()),
            Err(CompileError::UnknownGapOption { ref option, .. }) if option == "X"
        ));

        let mut q = gap_match("9");
        q.gap_match.as_mut().unwrap().assignments[0].gap = "G7".into();
        assert!(matches!(
            compile(&q, &ids()),
            Err(CompileError::UnknownGap { ref gap, .. }) if gap == "G7"
        ));

        let mut q = gap_match("9");
        q.gap_match.as_mut().unwrap().gaps.push("G3".into());
        let compiled = compile(&q, &ids()).unwrap();
        assert!(compiled.warnings[0].message.contains("G3"));
    }

    #[test]
    fn negative_points_are_fatal() {
        let mut q = multiple_choice("1", "a", &["b"]);
        q.points = -1.0;
        assert!(matches!(
            compile(&q, &ids()),
            Err(CompileError::InvalidPoints { .. })
        ));
    }
}
