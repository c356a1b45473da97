//! Test structure builder.
//!
//! Walks the entity sequence once and turns group markers into nested
//! sections. Group nesting is not supported; every misplaced marker is an
//! error naming its position in the sequence.

use crate::error::CompileError;
use crate::expr::{Expr, OutcomeDeclaration, SetOutcomeValue, SCORE};
use crate::ids::IdScheme;
use crate::model::{Document, Entity, Group};

pub const TEST_PART_ID: &str = "testPart1";
pub const MAIN_SECTION_ID: &str = "main_section";
pub const MAIN_SECTION_TITLE: &str = "Questions";

/// Candidates move through the test part in order.
pub const NAVIGATION_MODE: &str = "linear";
/// Each item is submitted on its own.
pub const SUBMISSION_MODE: &str = "individual";

/// Session settings applied to every item of the test part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSessionControl {
    pub max_attempts: u32,
    pub show_feedback: bool,
    pub show_solution: bool,
    pub allow_comment: bool,
    pub allow_skipping: bool,
    pub validate_responses: bool,
}

impl Default for ItemSessionControl {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            show_feedback: true,
            show_solution: false,
            allow_comment: false,
            allow_skipping: true,
            validate_responses: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestEntry {
    /// Reference to an item by identifier.
    ItemRef(String),
    Section(Section),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub identifier: String,
    pub title: String,
    /// Number of child entries delivered, when selection applies.
    pub select: Option<u32>,
    pub shuffle: bool,
    pub entries: Vec<TestEntry>,
}

impl Section {
    /// Identifiers of every referenced item, depth first.
    pub fn item_refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                TestEntry::ItemRef(id) => out.push(id.as_str()),
                TestEntry::Section(section) => out.extend(section.item_refs()),
            }
        }
        out
    }
}

/// The organizational tree of the assessment test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestStructure {
    pub identifier: String,
    pub title: String,
    pub part_identifier: String,
    pub session: ItemSessionControl,
    pub main: Section,
    /// Test-level outcomes.
    pub outcomes: Vec<OutcomeDeclaration>,
    /// Rules run after every item: the test `SCORE` is the sum of item scores.
    pub outcome_processing: Vec<SetOutcomeValue>,
}

impl TestStructure {
    pub fn item_refs(&self) -> Vec<&str> {
        self.main.item_refs()
    }
}

enum State<'a> {
    Outside,
    Inside {
        group: &'a Group,
        position: usize,
        refs: Vec<TestEntry>,
    },
}

/// Build the test structure of a document.
pub fn build(document: &Document, ids: &IdScheme) -> Result<TestStructure, CompileError> {
    let mut main = Vec::new();
    let mut state = State::Outside;

    for (position, entity) in document.entities.iter().enumerate() {
        state = match (state, entity) {
            (State::Outside, Entity::GroupStart(group)) => State::Inside {
                group,
                position,
                refs: Vec::new(),
            },
            (State::Inside { group: open, .. }, Entity::GroupStart(group)) => {
                return Err(CompileError::NestedGroup {
                    position,
                    group_id: group.id.clone(),
                    open_id: open.id.clone(),
                });
            }
            (State::Outside, Entity::GroupEnd) => {
                return Err(CompileError::UnmatchedGroupEnd { position });
            }
            (State::Inside { group, refs, .. }, Entity::GroupEnd) => {
                main.push(TestEntry::Section(group_section(group, refs, ids)?));
                State::Outside
            }
            (state, Entity::Question(q)) => push_ref(state, &mut main, ids.question(q)),
            (state, Entity::TextRegion(r)) => push_ref(state, &mut main, ids.text(r)),
        };
    }

    if let State::Inside {
        group, position, ..
    } = state
    {
        return Err(CompileError::UnclosedGroup {
            position,
            group_id: group.id.clone(),
        });
    }

    Ok(TestStructure {
        identifier: ids.test(&document.id),
        title: document.title.clone(),
        part_identifier: TEST_PART_ID.into(),
        session: ItemSessionControl::default(),
        main: Section {
            identifier: MAIN_SECTION_ID.into(),
            title: MAIN_SECTION_TITLE.into(),
            select: None,
            shuffle: false,
            entries: main,
        },
        outcomes: vec![OutcomeDeclaration::score()],
        outcome_processing: vec![SetOutcomeValue::new(
            SCORE,
            Expr::Sum(vec![Expr::TestVariables(SCORE.into())]),
        )],
    })
}

fn push_ref<'a>(state: State<'a>, main: &mut Vec<TestEntry>, identifier: String) -> State<'a> {
    match state {
        State::Outside => {
            main.push(TestEntry::ItemRef(identifier));
            State::Outside
        }
        State::Inside {
            group,
            position,
            mut refs,
        } => {
            refs.push(TestEntry::ItemRef(identifier));
            State::Inside {
                group,
                position,
                refs,
            }
        }
    }
}

fn group_section(
    group: &Group,
    refs: Vec<TestEntry>,
    ids: &IdScheme,
) -> Result<Section, CompileError> {
    if group.pick == 0 || group.pick as usize > refs.len() {
        return Err(CompileError::InvalidPick {
            group_id: group.id.clone(),
            pick: group.pick,
            members: refs.len(),
        });
    }
    Ok(Section {
        identifier: ids.group(group),
        title: group.title.clone(),
        select: Some(group.pick),
        shuffle: true,
        entries: refs,
    })
}
