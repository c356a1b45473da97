//! Shared renderer for item and test documents.
//!
//! Structure is fixed here; names come from the [`Dialect`].

use qtipack_core::expr::{
    Expr, OutcomeDeclaration, ResponseDeclaration, ResponseProcessing, ResponseRule,
    SetOutcomeValue, FEEDBACK,
};
use qtipack_core::interaction::{BodyBlock, BodyFragment, Interaction};
use qtipack_core::item::{escape, ItemRecord};
use qtipack_core::structure::{
    Section, TestEntry, TestStructure, NAVIGATION_MODE, SUBMISSION_MODE,
};

use crate::dialect::{Attr, Dialect, Element, XSI_NAMESPACE};
use crate::package::ITEMS_DIR;
use crate::xml::{Attrs, XmlWriter};

fn bool_str(value: bool) -> String {
    String::from(if value { "true" } else { "false" })
}

/// Namespace attributes of a root element.
fn root_attrs<D: Dialect + ?Sized>(d: &D) -> Attrs<'static> {
    vec![
        ("xmlns", d.namespace().to_string()),
        ("xmlns:xsi", XSI_NAMESPACE.to_string()),
        (
            "xsi:schemaLocation",
            format!("{} {}", d.namespace(), d.schema_location()),
        ),
    ]
}

/// Render one item document.
pub fn item<D: Dialect + ?Sized>(d: &D, record: &ItemRecord) -> String {
    let mut w = XmlWriter::document();
    let root = d.element(Element::AssessmentItem);
    let mut attrs = root_attrs(d);
    attrs.extend([
        (d.attr(Attr::Identifier), record.identifier.clone()),
        (d.attr(Attr::Title), record.title.clone()),
        (d.attr(Attr::Adaptive), bool_str(false)),
        (d.attr(Attr::TimeDependent), bool_str(false)),
    ]);
    w.open(root, &attrs);

    if let Some(response) = &record.response {
        response_declaration(d, &mut w, response);
    }
    for outcome in &record.outcomes {
        outcome_declaration(d, &mut w, outcome);
    }

    let body = d.element(Element::ItemBody);
    w.open(body, &[]);
    for block in &record.body.blocks {
        match block {
            BodyBlock::Markup(markup) => w.raw(markup),
            BodyBlock::Interaction(interaction) => self::interaction(d, &mut w, interaction),
        }
    }
    w.close(body);

    if !record.processing.is_empty() {
        processing(d, &mut w, &record.processing);
    }

    for block in &record.feedback {
        w.raw_element(
            d.element(Element::ModalFeedback),
            &[
                (d.attr(Attr::OutcomeIdentifier), FEEDBACK.to_string()),
                (d.attr(Attr::Identifier), block.identifier.clone()),
                (d.attr(Attr::ShowHide), "show".to_string()),
            ],
            &block.body,
        );
    }

    w.close(root);
    w.finish()
}

fn response_declaration<D: Dialect + ?Sized>(
    d: &D,
    w: &mut XmlWriter,
    decl: &ResponseDeclaration,
) {
    let name = d.element(Element::ResponseDeclaration);
    let attrs = [
        (d.attr(Attr::Identifier), decl.identifier.clone()),
        (d.attr(Attr::Cardinality), decl.cardinality.to_string()),
        (d.attr(Attr::BaseType), decl.base_type.to_string()),
    ];
    if decl.correct_response.is_empty() {
        w.empty(name, &attrs);
        return;
    }
    w.open(name, &attrs);
    let correct = d.element(Element::CorrectResponse);
    w.open(correct, &[]);
    for value in &decl.correct_response {
        w.text(d.element(Element::Value), &[], value);
    }
    w.close(correct);
    w.close(name);
}

fn outcome_declaration<D: Dialect + ?Sized>(d: &D, w: &mut XmlWriter, decl: &OutcomeDeclaration) {
    let name = d.element(Element::OutcomeDeclaration);
    let attrs = [
        (d.attr(Attr::Identifier), decl.identifier.clone()),
        (d.attr(Attr::Cardinality), decl.cardinality.to_string()),
        (d.attr(Attr::BaseType), decl.base_type.to_string()),
    ];
    let Some(default) = &decl.default_value else {
        w.empty(name, &attrs);
        return;
    };
    w.open(name, &attrs);
    let default_el = d.element(Element::DefaultValue);
    w.open(default_el, &[]);
    w.text(d.element(Element::Value), &[], default);
    w.close(default_el);
    w.close(name);
}

fn interaction<D: Dialect + ?Sized>(d: &D, w: &mut XmlWriter, interaction: &Interaction) {
    match interaction {
        Interaction::Choice {
            response,
            prompt,
            shuffle,
            max_choices,
            choices,
        } => {
            let name = d.element(Element::ChoiceInteraction);
            w.open(
                name,
                &[
                    (d.attr(Attr::ResponseIdentifier), response.clone()),
                    (d.attr(Attr::Shuffle), bool_str(*shuffle)),
                    (d.attr(Attr::MaxChoices), max_choices.to_string()),
                ],
            );
            w.raw_element(d.element(Element::Prompt), &[], prompt);
            for choice in choices {
                w.raw_element(
                    d.element(Element::SimpleChoice),
                    &[(d.attr(Attr::Identifier), choice.identifier.clone())],
                    &choice.body,
                );
            }
            w.close(name);
        }
        Interaction::TextEntry {
            response,
            expected_length,
        } => {
            // Text entry is inline content and needs a block container.
            w.open("p", &[]);
            w.empty(
                d.element(Element::TextEntryInteraction),
                &[
                    (d.attr(Attr::ResponseIdentifier), response.clone()),
                    (d.attr(Attr::ExpectedLength), expected_length.to_string()),
                ],
            );
            w.close("p");
        }
        Interaction::ExtendedText {
            response,
            prompt,
            expected_lines,
        } => {
            let name = d.element(Element::ExtendedTextInteraction);
            w.open(
                name,
                &[
                    (d.attr(Attr::ResponseIdentifier), response.clone()),
                    (d.attr(Attr::ExpectedLines), expected_lines.to_string()),
                ],
            );
            w.raw_element(d.element(Element::Prompt), &[], prompt);
            w.close(name);
        }
        Interaction::GapMatch {
            response,
            shuffle,
            gap_texts,
            content,
        } => {
            let name = d.element(Element::GapMatchInteraction);
            w.open(
                name,
                &[
                    (d.attr(Attr::ResponseIdentifier), response.clone()),
                    (d.attr(Attr::Shuffle), bool_str(*shuffle)),
                ],
            );
            for gap_text in gap_texts {
                w.text(
                    d.element(Element::GapText),
                    &[
                        (d.attr(Attr::Identifier), gap_text.identifier.clone()),
                        (d.attr(Attr::MatchMax), gap_text.match_max.to_string()),
                    ],
                    &gap_text.text,
                );
            }
            let mut markup = String::new();
            for fragment in content {
                match fragment {
                    BodyFragment::Markup(m) => markup.push_str(m),
                    BodyFragment::Gap(gap) => markup.push_str(&format!(
                        "<{} {}=\"{}\"/>",
                        d.element(Element::Gap),
                        d.attr(Attr::Identifier),
                        escape(gap)
                    )),
                }
            }
            w.raw(&markup);
            w.close(name);
        }
    }
}

fn processing<D: Dialect + ?Sized>(d: &D, w: &mut XmlWriter, processing: &ResponseProcessing) {
    let name = d.element(Element::ResponseProcessing);
    w.open(name, &[]);
    for rule in &processing.rules {
        match rule {
            ResponseRule::SetOutcome(set) => set_outcome(d, w, set),
            ResponseRule::Condition(cond) => {
                let cond_el = d.element(Element::ResponseCondition);
                w.open(cond_el, &[]);
                let if_branch = &cond.if_branch;
                branch(d, w, Element::ResponseIf, Some(&if_branch.condition), &if_branch.actions);
                for b in &cond.else_ifs {
                    branch(d, w, Element::ResponseElseIf, Some(&b.condition), &b.actions);
                }
                if let Some(otherwise) = &cond.otherwise {
                    branch(d, w, Element::ResponseElse, None, otherwise);
                }
                w.close(cond_el);
            }
        }
    }
    w.close(name);
}

fn branch<D: Dialect + ?Sized>(
    d: &D,
    w: &mut XmlWriter,
    element: Element,
    condition: Option<&Expr>,
    actions: &[SetOutcomeValue],
) {
    let name = d.element(element);
    w.open(name, &[]);
    if let Some(condition) = condition {
        expr(d, w, condition);
    }
    for action in actions {
        set_outcome(d, w, action);
    }
    w.close(name);
}

fn set_outcome<D: Dialect + ?Sized>(d: &D, w: &mut XmlWriter, set: &SetOutcomeValue) {
    let name = d.element(Element::SetOutcomeValue);
    w.open(name, &[(d.attr(Attr::Identifier), set.identifier.clone())]);
    expr(d, w, &set.value);
    w.close(name);
}

fn expr<D: Dialect + ?Sized>(d: &D, w: &mut XmlWriter, e: &Expr) {
    let nested = |element: Element, children: &[&Expr], w: &mut XmlWriter| {
        let name = d.element(element);
        w.open(name, &[]);
        for child in children {
            expr(d, w, child);
        }
        w.close(name);
    };
    match e {
        Expr::Variable(id) => w.empty(
            d.element(Element::Variable),
            &[(d.attr(Attr::Identifier), id.clone())],
        ),
        Expr::TestVariables(id) => w.empty(
            d.element(Element::TestVariables),
            &[(d.attr(Attr::VariableIdentifier), id.clone())],
        ),
        Expr::BaseValue { base_type, value } => w.text(
            d.element(Element::BaseValue),
            &[(d.attr(Attr::BaseType), base_type.to_string())],
            value,
        ),
        Expr::Match(a, b) => nested(Element::Match, &[a.as_ref(), b.as_ref()], w),
        Expr::Member(a, b) => nested(Element::Member, &[a.as_ref(), b.as_ref()], w),
        Expr::Gte(a, b) => nested(Element::Gte, &[a.as_ref(), b.as_ref()], w),
        Expr::Lte(a, b) => nested(Element::Lte, &[a.as_ref(), b.as_ref()], w),
        Expr::Not(inner) => nested(Element::Not, &[inner.as_ref()], w),
        Expr::And(items) => nested(Element::And, &items.iter().collect::<Vec<_>>(), w),
        Expr::Or(items) => nested(Element::Or, &items.iter().collect::<Vec<_>>(), w),
        Expr::Multiple(items) => nested(Element::Multiple, &items.iter().collect::<Vec<_>>(), w),
        Expr::Sum(items) => nested(Element::Sum, &items.iter().collect::<Vec<_>>(), w),
    }
}

/// Render the assessment test document.
pub fn test<D: Dialect + ?Sized>(d: &D, structure: &TestStructure) -> String {
    let mut w = XmlWriter::document();
    let root = d.element(Element::AssessmentTest);
    let mut attrs = root_attrs(d);
    attrs.extend([
        (d.attr(Attr::Identifier), structure.identifier.clone()),
        (d.attr(Attr::Title), structure.title.clone()),
    ]);
    w.open(root, &attrs);

    for outcome in &structure.outcomes {
        outcome_declaration(d, &mut w, outcome);
    }

    let part = d.element(Element::TestPart);
    w.open(
        part,
        &[
            (d.attr(Attr::Identifier), structure.part_identifier.clone()),
            (d.attr(Attr::NavigationMode), NAVIGATION_MODE.to_string()),
            (d.attr(Attr::SubmissionMode), SUBMISSION_MODE.to_string()),
        ],
    );
    let session = &structure.session;
    w.empty(
        d.element(Element::ItemSessionControl),
        &[
            (d.attr(Attr::MaxAttempts), session.max_attempts.to_string()),
            (d.attr(Attr::ShowFeedback), bool_str(session.show_feedback)),
            (d.attr(Attr::ShowSolution), bool_str(session.show_solution)),
            (d.attr(Attr::AllowComment), bool_str(session.allow_comment)),
            (d.attr(Attr::AllowSkipping), bool_str(session.allow_skipping)),
            (d.attr(Attr::ValidateResponses), bool_str(session.validate_responses)),
        ],
    );
    section(d, &mut w, &structure.main);
    w.close(part);

    if !structure.outcome_processing.is_empty() {
        let name = d.element(Element::OutcomeProcessing);
        w.open(name, &[]);
        for set in &structure.outcome_processing {
            set_outcome(d, &mut w, set);
        }
        w.close(name);
    }

    w.close(root);
    w.finish()
}

fn section<D: Dialect + ?Sized>(d: &D, w: &mut XmlWriter, section: &Section) {
    let name = d.element(Element::AssessmentSection);
    w.open(
        name,
        &[
            (d.attr(Attr::Identifier), section.identifier.clone()),
            (d.attr(Attr::Title), section.title.clone()),
            (d.attr(Attr::Visible), bool_str(true)),
        ],
    );
    if let Some(select) = section.select {
        w.empty(
            d.element(Element::Selection),
            &[(d.attr(Attr::Select), select.to_string())],
        );
    }
    if section.shuffle {
        w.empty(
            d.element(Element::Ordering),
            &[(d.attr(Attr::Shuffle), bool_str(true))],
        );
    }
    for entry in &section.entries {
        match entry {
            TestEntry::ItemRef(identifier) => w.empty(
                d.element(Element::AssessmentItemRef),
                &[
                    (d.attr(Attr::Identifier), identifier.clone()),
                    (
                        d.attr(Attr::Href),
                        format!("../{ITEMS_DIR}/{}", qtipack_core::ids::file_name(identifier)),
                    ),
                ],
            ),
            TestEntry::Section(child) => self::section(d, w, child),
        }
    }
    w.close(name);
}
