//! End-to-end compile and render scenarios over both dialects.

use std::collections::BTreeSet;

use qtipack_core::engine::{compile_document, CompileOptions, CompiledDocument};
use qtipack_core::error::CompileError;
use qtipack_core::interaction::InteractionKind;
use qtipack_core::model::{
    Choice, Document, Entity, Feedback, GapAssignment, GapMatch, GapOption, Group, Image,
    NumericalAnswer, Question, QuestionKind,
};
use qtipack_dialect::dialect::{Attr, Element, ResourceKind};
use qtipack_dialect::{Dialect, DialectKind, Qti21, Qti30, RenderError};

fn question(id: &str, kind: QuestionKind, prompt: &str) -> Question {
    Question {
        id: id.into(),
        title: format!("Question {id}"),
        kind,
        prompt: prompt.into(),
        points: 1.0,
        feedback: Feedback::default(),
        choices: vec![],
        numerical: None,
        gap_match: None,
    }
}

fn choice(id: &str, body: &str, correct: bool, feedback: Option<&str>) -> Choice {
    Choice {
        id: id.into(),
        body: body.into(),
        correct,
        feedback: feedback.map(String::from),
    }
}

fn document(entities: Vec<Entity>) -> Document {
    Document {
        id: "quiz".into(),
        title: "Scenario quiz".into(),
        description: String::new(),
        entities,
        images: Default::default(),
    }
}

fn three_item_document() -> Document {
    let mut tf = question("1", QuestionKind::TrueFalse, "<p>Water boils at 100 C at sea level.</p>");
    tf.choices = vec![
        choice("true", "<p>True</p>", true, Some("<p>Right.</p>")),
        choice("false", "<p>False</p>", false, Some("<p>Check a steam table.</p>")),
    ];

    let mut num = question("2", QuestionKind::Numerical, "<p>Square root of 2?</p>");
    num.numerical = Some(NumericalAnswer::Tolerance {
        target: 1.4142,
        tolerance: 0.0001,
    });

    let essay = question("3", QuestionKind::Essay, "<p>Discuss.</p>");

    document(vec![
        Entity::Question(tf),
        Entity::Question(num),
        Entity::Question(essay),
    ])
}

fn compile(doc: &Document) -> CompiledDocument {
    compile_document(doc, &CompileOptions::with_prefix("s")).unwrap()
}

/// Values of every ` identifier="..."` attribute, in either dialect.
fn identifiers(markup: &str) -> BTreeSet<String> {
    markup
        .split(" identifier=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(String::from)
        .collect()
}

/// Feedback marker identifiers mentioned anywhere in the markup.
fn markers(markup: &str) -> BTreeSet<String> {
    markup
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| word.ends_with("_fb"))
        .map(String::from)
        .collect()
}

#[test]
fn three_item_document_renders_in_both_dialects() {
    let compiled = compile(&three_item_document());
    assert_eq!(compiled.items.len(), 3);

    let a = Qti21.render(&compiled).unwrap();
    let b = Qti30.render(&compiled).unwrap();
    assert_eq!(a.items.len(), 3);
    assert_eq!(b.items.len(), 3);

    for (item_a, item_b) in a.items.iter().zip(&b.items) {
        assert_eq!(item_a.identifier, item_b.identifier);
        assert_eq!(item_a.path, item_b.path);

        let xa = &item_a.content;
        let xb = &item_b.content;
        assert!(xa.contains("<assessmentItem "));
        assert!(!xa.contains("<qti-"));
        assert!(xb.contains("<qti-assessment-item "));

        // Every element of dialect B carries the prefix.
        for tag in xb.split('<').skip(2) {
            let name: String = tag
                .trim_start_matches('/')
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect();
            if matches!(name.as_str(), "p" | "") {
                continue;
            }
            assert!(name.starts_with("qti-"), "unprefixed element {name} in {}", item_b.identifier);
        }

        for xml in [xa, xb] {
            assert!(xml.contains(">0</"), "SCORE default missing in {}", item_a.identifier);
        }
        assert_eq!(identifiers(xa), identifiers(xb));
        assert_eq!(markers(xa), markers(xb));
    }

    let tf = &a.items[0].content;
    assert!(tf.contains("<choiceInteraction "));
    assert_eq!(
        markers(tf),
        ["s_choice_1_false_fb", "s_choice_1_true_fb"]
            .into_iter()
            .map(String::from)
            .collect::<BTreeSet<_>>()
    );

    let num = &b.items[1].content;
    assert!(num.contains("<qti-text-entry-interaction "));
    assert!(num.contains("<qti-value>1.4142</qti-value>"));
    assert!(num.contains("<qti-gte>"));
    assert!(num.contains("<qti-lte>"));

    let essay = &a.items[2].content;
    assert!(essay.contains("<extendedTextInteraction responseIdentifier=\"RESPONSE\" expectedLines=\"10\">"));
}

#[test]
fn both_dialects_credit_the_same_points() {
    let mut doc = three_item_document();
    if let Entity::Question(q) = &mut doc.entities[0] {
        q.points = 2.5;
    }
    let compiled = compile(&doc);
    for kind in DialectKind::ALL {
        let package = kind.dialect().render(&compiled).unwrap();
        let tf = &package.items[0].content;
        assert!(tf.contains(">2.5</"), "{kind} lost the point value");
    }
}

#[test]
fn group_of_four_with_pick_two_becomes_one_section() {
    let mut entities = vec![Entity::Question(question("0", QuestionKind::Essay, "<p>Intro</p>"))];
    entities.push(Entity::GroupStart(Group {
        id: "pool".into(),
        title: "Pool".into(),
        pick: 2,
    }));
    for id in ["1", "2", "3", "4"] {
        entities.push(Entity::Question(question(id, QuestionKind::Essay, "<p>Essay</p>")));
    }
    entities.push(Entity::GroupEnd);
    let compiled = compile(&document(entities));

    for dialect in [&Qti21 as &dyn Dialect, &Qti30] {
        let package = dialect.render(&compiled).unwrap();
        let xml = &package.test.content;
        let section_tag = dialect.element(Element::AssessmentSection);
        let ref_tag = dialect.element(Element::AssessmentItemRef);

        let open = format!("<{section_tag} {}=\"s_group_pool\"", dialect.attr(Attr::Identifier));
        let start = xml.find(&open).expect("group section rendered");
        let close = format!("</{section_tag}>");
        let end = start + xml[start..].find(&close).expect("group section closed");
        let inside = &xml[start..end];
        let outside = format!("{}{}", &xml[..start], &xml[end..]);

        assert_eq!(xml.matches(&format!("<{section_tag} ")).count(), 2);
        assert!(inside.contains(&format!(
            "<{} {}=\"2\"/>",
            dialect.element(Element::Selection),
            dialect.attr(Attr::Select)
        )));

        let member_refs: Vec<usize> = ["1", "2", "3", "4"]
            .iter()
            .map(|id| {
                let needle = format!("{}=\"s_question_{id}\"", dialect.attr(Attr::Identifier));
                assert!(!outside.contains(&needle), "{id} referenced outside the group");
                inside.find(&needle).expect("member referenced in the group")
            })
            .collect();
        assert!(member_refs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(inside.matches(&format!("<{ref_tag} ")).count(), 4);
        assert!(outside.contains("s_question_0"));
    }
}

#[test]
fn unmatched_group_end_is_a_structural_error() {
    let doc = document(vec![
        Entity::Question(question("1", QuestionKind::Essay, "<p>a</p>")),
        Entity::GroupEnd,
    ]);
    // Compilation precedes rendering, so neither dialect gets a package.
    let err = compile_document(&doc, &CompileOptions::default()).unwrap_err();
    assert_eq!(err, CompileError::UnmatchedGroupEnd { position: 1 });
    assert!(err.is_structural());
    assert!(err.to_string().starts_with("entity 1:"));
}

/// QTI 2.1 without gap-match support.
struct NoGaps;

impl Dialect for NoGaps {
    fn name(&self) -> &'static str {
        "nogaps"
    }
    fn label(&self) -> &'static str {
        "QTI 2.1 without gaps"
    }
    fn namespace(&self) -> &'static str {
        Qti21.namespace()
    }
    fn schema_location(&self) -> &'static str {
        Qti21.schema_location()
    }
    fn element(&self, element: Element) -> &'static str {
        Qti21.element(element)
    }
    fn attr(&self, attr: Attr) -> &'static str {
        Qti21.attr(attr)
    }
    fn manifest_namespace(&self) -> &'static str {
        Qti21.manifest_namespace()
    }
    fn manifest_schema_location(&self) -> &'static str {
        Qti21.manifest_schema_location()
    }
    fn metadata_namespace(&self) -> &'static str {
        Qti21.metadata_namespace()
    }
    fn manifest_schema(&self) -> (&'static str, &'static str) {
        Qti21.manifest_schema()
    }
    fn resource_type(&self, kind: ResourceKind) -> &'static str {
        Qti21.resource_type(kind)
    }
    fn interaction_token(&self, kind: InteractionKind) -> Option<&'static str> {
        match kind {
            InteractionKind::GapMatch => None,
            other => Qti21.interaction_token(other),
        }
    }
}

fn gap_question() -> Question {
    let mut q = question("g", QuestionKind::GapMatch, "<p>{A} and {B}</p>");
    q.gap_match = Some(GapMatch {
        gaps: vec!["A".into(), "B".into()],
        options: vec![
            GapOption {
                id: "x".into(),
                text: "salt".into(),
            },
            GapOption {
                id: "y".into(),
                text: "pepper".into(),
            },
        ],
        assignments: vec![
            GapAssignment {
                option: "x".into(),
                gap: "A".into(),
            },
            GapAssignment {
                option: "y".into(),
                gap: "B".into(),
            },
        ],
    });
    q
}

#[test]
fn custom_dialect_rejects_what_it_cannot_express() {
    let compiled = compile(&document(vec![Entity::Question(gap_question())]));
    assert_eq!(
        NoGaps.render(&compiled).unwrap_err(),
        RenderError::Unsupported {
            dialect: "nogaps".into(),
            construct: "gap-match".into(),
            item: "s_question_g".into(),
        }
    );

    let package = Qti30.render(&compiled).unwrap();
    let xml = &package.items[0].content;
    assert!(xml.contains("<qti-gap-text identifier=\"x\" match-max=\"1\">salt</qti-gap-text>"));
    assert!(xml.contains("<p><qti-gap identifier=\"A\"/> and <qti-gap identifier=\"B\"/></p>"));
    assert!(package.manifest.contains("qti-gap-match-interaction"));
}

#[test]
fn rendering_is_deterministic() {
    let doc = three_item_document();
    for kind in DialectKind::ALL {
        let first = kind.dialect().render(&compile(&doc)).unwrap();
        let second = kind.dialect().render(&compile(&doc)).unwrap();
        assert_eq!(first.files(), second.files());
    }
}

#[test]
fn every_reference_resolves_to_an_emitted_file() {
    let compiled = compile(&three_item_document());
    for kind in DialectKind::ALL {
        let package = kind.dialect().render(&compiled).unwrap();
        let paths: BTreeSet<&str> = package.files().into_iter().map(|(p, _)| p).collect();
        for item in &package.items {
            assert!(package.test.content.contains(&format!("../{}", item.path)));
            assert!(package.manifest.contains(&format!("href=\"{}\"", item.path)));
            assert!(paths.contains(item.path.as_str()));
        }
        assert!(package
            .manifest
            .contains(&format!("href=\"{}\"", package.test.path)));
    }
}

#[test]
fn manifest_lists_interactions_and_image_dependencies() {
    let mut doc = three_item_document();
    if let Entity::Question(q) = &mut doc.entities[2] {
        q.prompt = "<p><img src=\"../images/plot.png\" alt=\"plot\"/></p>".into();
    }
    doc.images.insert(
        "plot.png".into(),
        Image {
            name: "plot.png".into(),
            archive_path: "images/plot.png".into(),
            data: vec![1, 2, 3],
        },
    );
    let compiled = compile(&doc);

    let a = Qti21.render(&compiled).unwrap();
    assert!(a.manifest.contains("<schema>QTIv2.1 Package</schema>"));
    assert!(a.manifest.contains("type=\"imsqti_item_xmlv2p1\""));
    assert!(a
        .manifest
        .contains("<imsqti:interactionType>textEntryInteraction</imsqti:interactionType>"));
    assert!(a
        .manifest
        .contains("<dependency identifierref=\"s_manifest_quiz_image_0\"/>"));
    assert_eq!(
        a.manifest.matches("identifierref=\"s_manifest_quiz_image_0\"").count(),
        1
    );
    assert!(a.manifest.contains(
        "<resource identifier=\"s_manifest_quiz_image_0\" type=\"webcontent\" href=\"images/plot.png\">"
    ));

    let b = Qti30.render(&compiled).unwrap();
    assert!(b.manifest.contains("<schemaversion>3.0.0</schemaversion>"));
    assert!(b
        .manifest
        .contains("<imsqti:interactionType>qti-extended-text-interaction</imsqti:interactionType>"));
}

#[test]
fn package_is_written_as_a_tree() {
    let mut doc = three_item_document();
    doc.images.insert(
        "plot.png".into(),
        Image {
            name: "plot.png".into(),
            archive_path: "images/plot.png".into(),
            data: vec![0x89, b'P', b'N', b'G'],
        },
    );
    let compiled = compile(&doc);
    let package = Qti30.render(&compiled).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = package.write_to_dir(dir.path()).unwrap();
    assert_eq!(written, 6);

    let manifest = std::fs::read_to_string(dir.path().join("imsmanifest.xml")).unwrap();
    assert_eq!(manifest, package.manifest);
    assert!(dir
        .path()
        .join("assessmentTests/s_test_quiz.xml")
        .is_file());
    assert!(dir
        .path()
        .join("assessmentItems/s_question_2.xml")
        .is_file());
    assert_eq!(
        std::fs::read(dir.path().join("images/plot.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
}

#[test]
fn traversal_ids_never_reach_the_filesystem() {
    let doc = Document {
        id: "quiz".into(),
        title: "Quiz".into(),
        description: String::new(),
        entities: vec![Entity::Question(question(
            "x/../../../escaped",
            QuestionKind::Essay,
            "<p>Discuss.</p>",
        ))],
        images: Default::default(),
    };
    let err = compile_document(&doc, &CompileOptions::with_prefix("s")).unwrap_err();
    assert!(matches!(err, CompileError::InvalidIdentifier { ref id, .. } if id == "x/../../../escaped"));

    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("out");
    let mut package = Qti21.render(&compile(&three_item_document())).unwrap();
    package.items[0].path = "../../escaped.xml".into();
    assert!(package.write_to_dir(&out).is_err());
    assert!(!root.path().join("escaped.xml").exists());
    assert!(!out.exists());
}
