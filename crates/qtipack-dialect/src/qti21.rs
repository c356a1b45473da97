//! QTI 2.1: lower-camel element and attribute names, no element prefix.

use qtipack_core::interaction::InteractionKind;

use crate::dialect::{Attr, Dialect, Element, ResourceKind};

pub const NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsqti_v2p1";
pub const SCHEMA: &str = "http://www.imsglobal.org/xsd/imsqti_v2p1.xsd";

#[derive(Debug, Clone, Copy, Default)]
pub struct Qti21;

impl Dialect for Qti21 {
    fn name(&self) -> &'static str {
        "qti21"
    }

    fn label(&self) -> &'static str {
        "QTI 2.1"
    }

    fn namespace(&self) -> &'static str {
        NAMESPACE
    }

    fn schema_location(&self) -> &'static str {
        SCHEMA
    }

    fn element(&self, element: Element) -> &'static str {
        match element {
            Element::AssessmentItem => "assessmentItem",
            Element::ResponseDeclaration => "responseDeclaration",
            Element::OutcomeDeclaration => "outcomeDeclaration",
            Element::CorrectResponse => "correctResponse",
            Element::DefaultValue => "defaultValue",
            Element::Value => "value",
            Element::ItemBody => "itemBody",
            Element::Prompt => "prompt",
            Element::ChoiceInteraction => "choiceInteraction",
            Element::SimpleChoice => "simpleChoice",
            Element::TextEntryInteraction => "textEntryInteraction",
            Element::ExtendedTextInteraction => "extendedTextInteraction",
            Element::GapMatchInteraction => "gapMatchInteraction",
            Element::GapText => "gapText",
            Element::Gap => "gap",
            Element::ResponseProcessing => "responseProcessing",
            Element::ResponseCondition => "responseCondition",
            Element::ResponseIf => "responseIf",
            Element::ResponseElseIf => "responseElseIf",
            Element::ResponseElse => "responseElse",
            Element::SetOutcomeValue => "setOutcomeValue",
            Element::Variable => "variable",
            Element::BaseValue => "baseValue",
            Element::Match => "match",
            Element::Member => "member",
            Element::And => "and",
            Element::Or => "or",
            Element::Not => "not",
            Element::Gte => "gte",
            Element::Lte => "lte",
            Element::Multiple => "multiple",
            Element::Sum => "sum",
            Element::TestVariables => "testVariables",
            Element::ModalFeedback => "modalFeedback",
            Element::AssessmentTest => "assessmentTest",
            Element::TestPart => "testPart",
            Element::ItemSessionControl => "itemSessionControl",
            Element::AssessmentSection => "assessmentSection",
            Element::Selection => "selection",
            Element::Ordering => "ordering",
            Element::AssessmentItemRef => "assessmentItemRef",
            Element::OutcomeProcessing => "outcomeProcessing",
        }
    }

    fn attr(&self, attr: Attr) -> &'static str {
        match attr {
            Attr::Identifier => "identifier",
            Attr::Title => "title",
            Attr::Adaptive => "adaptive",
            Attr::TimeDependent => "timeDependent",
            Attr::Cardinality => "cardinality",
            Attr::BaseType => "baseType",
            Attr::ResponseIdentifier => "responseIdentifier",
            Attr::Shuffle => "shuffle",
            Attr::MaxChoices => "maxChoices",
            Attr::ExpectedLength => "expectedLength",
            Attr::ExpectedLines => "expectedLines",
            Attr::MatchMax => "matchMax",
            Attr::OutcomeIdentifier => "outcomeIdentifier",
            Attr::ShowHide => "showHide",
            Attr::NavigationMode => "navigationMode",
            Attr::SubmissionMode => "submissionMode",
            Attr::MaxAttempts => "maxAttempts",
            Attr::ShowFeedback => "showFeedback",
            Attr::ShowSolution => "showSolution",
            Attr::AllowComment => "allowComment",
            Attr::AllowSkipping => "allowSkipping",
            Attr::ValidateResponses => "validateResponses",
            Attr::Visible => "visible",
            Attr::Select => "select",
            Attr::Href => "href",
            Attr::VariableIdentifier => "variableIdentifier",
        }
    }

    fn manifest_namespace(&self) -> &'static str {
        "http://www.imsglobal.org/xsd/imscp_v1p1"
    }

    fn manifest_schema_location(&self) -> &'static str {
        "http://www.imsglobal.org/xsd/imscp_v1p1 http://www.imsglobal.org/xsd/imscp_v1p2.xsd"
    }

    fn metadata_namespace(&self) -> &'static str {
        "http://www.imsglobal.org/xsd/imsqti_metadata_v2p1"
    }

    fn manifest_schema(&self) -> (&'static str, &'static str) {
        ("QTIv2.1 Package", "1.0.0")
    }

    fn resource_type(&self, kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Test => "imsqti_test_xmlv2p1",
            ResourceKind::Item => "imsqti_item_xmlv2p1",
            ResourceKind::WebContent => "webcontent",
        }
    }

    fn interaction_token(&self, kind: InteractionKind) -> Option<&'static str> {
        Some(match kind {
            InteractionKind::Choice => "choiceInteraction",
            InteractionKind::TextEntry => "textEntryInteraction",
            InteractionKind::ExtendedText => "extendedTextInteraction",
            InteractionKind::Upload => "uploadInteraction",
            InteractionKind::GapMatch => "gapMatchInteraction",
        })
    }
}
