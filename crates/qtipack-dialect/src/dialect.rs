//! The dialect contract.
//!
//! A dialect is a vocabulary: element and attribute names, namespaces, and
//! manifest tokens. Everything structural lives in the shared renderer, so a
//! new dialect only has to answer these lookups.

use std::fmt;
use std::str::FromStr;

use qtipack_core::engine::CompiledDocument;
use qtipack_core::interaction::InteractionKind;

use crate::package::{self, RenderError, RenderedPackage};
use crate::qti21::Qti21;
use crate::qti30::Qti30;

/// Namespace of `xsi:schemaLocation`.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Every QTI element the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    AssessmentItem,
    ResponseDeclaration,
    OutcomeDeclaration,
    CorrectResponse,
    DefaultValue,
    Value,
    ItemBody,
    Prompt,
    ChoiceInteraction,
    SimpleChoice,
    TextEntryInteraction,
    ExtendedTextInteraction,
    GapMatchInteraction,
    GapText,
    Gap,
    ResponseProcessing,
    ResponseCondition,
    ResponseIf,
    ResponseElseIf,
    ResponseElse,
    SetOutcomeValue,
    Variable,
    BaseValue,
    Match,
    Member,
    And,
    Or,
    Not,
    Gte,
    Lte,
    Multiple,
    Sum,
    TestVariables,
    ModalFeedback,
    AssessmentTest,
    TestPart,
    ItemSessionControl,
    AssessmentSection,
    Selection,
    Ordering,
    AssessmentItemRef,
    OutcomeProcessing,
}

/// Every QTI attribute the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Identifier,
    Title,
    Adaptive,
    TimeDependent,
    Cardinality,
    BaseType,
    ResponseIdentifier,
    Shuffle,
    MaxChoices,
    ExpectedLength,
    ExpectedLines,
    MatchMax,
    OutcomeIdentifier,
    ShowHide,
    NavigationMode,
    SubmissionMode,
    MaxAttempts,
    ShowFeedback,
    ShowSolution,
    AllowComment,
    AllowSkipping,
    ValidateResponses,
    Visible,
    Select,
    Href,
    VariableIdentifier,
}

/// Resource types listed in the package manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Test,
    Item,
    WebContent,
}

/// One output vocabulary.
pub trait Dialect: Send + Sync {
    /// Short machine name, e.g. `qti21`.
    fn name(&self) -> &'static str;

    /// Human label, e.g. `QTI 2.1`.
    fn label(&self) -> &'static str;

    /// Default namespace of item and test documents.
    fn namespace(&self) -> &'static str;

    /// Schema document paired with [`Dialect::namespace`].
    fn schema_location(&self) -> &'static str;

    fn element(&self, element: Element) -> &'static str;

    fn attr(&self, attr: Attr) -> &'static str;

    /// Default namespace of the manifest.
    fn manifest_namespace(&self) -> &'static str;

    fn manifest_schema_location(&self) -> &'static str;

    /// Namespace bound to the `imsqti` prefix in manifest metadata.
    fn metadata_namespace(&self) -> &'static str;

    /// `(schema, schemaversion)` recorded in the manifest metadata.
    fn manifest_schema(&self) -> (&'static str, &'static str);

    fn resource_type(&self, kind: ResourceKind) -> &'static str;

    /// Token recorded in manifest metadata for an interaction kind.
    ///
    /// `None` means the dialect cannot express the interaction.
    fn interaction_token(&self, kind: InteractionKind) -> Option<&'static str>;

    /// Render a compiled document into a package.
    fn render(&self, compiled: &CompiledDocument) -> Result<RenderedPackage, RenderError> {
        package::render(self, compiled)
    }
}

/// The built-in dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DialectKind {
    Qti21,
    Qti30,
}

impl DialectKind {
    pub const ALL: [DialectKind; 2] = [DialectKind::Qti21, DialectKind::Qti30];

    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::Qti21 => &Qti21,
            DialectKind::Qti30 => &Qti30,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dialect().name())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['.', '-', '_', ' '], "").as_str() {
            "qti21" | "21" => Ok(DialectKind::Qti21),
            "qti30" | "qti3" | "30" => Ok(DialectKind::Qti30),
            other => Err(format!("unknown dialect: {other} (expected qti21 or qti30)")),
        }
    }
}
