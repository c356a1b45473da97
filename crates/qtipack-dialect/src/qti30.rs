//! QTI 3.0: every element carries the `qti-` prefix, names are kebab-cased.

use qtipack_core::interaction::InteractionKind;

use crate::dialect::{Attr, Dialect, Element, ResourceKind};

pub const NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsqtiasi_v3p0";
pub const SCHEMA: &str =
    "https://purl.imsglobal.org/spec/qti/v3p0/schema/xsd/imsqti_asiv3p0_v1p0.xsd";

#[derive(Debug, Clone, Copy, Default)]
pub struct Qti30;

impl Dialect for Qti30 {
    fn name(&self) -> &'static str {
        "qti30"
    }

    fn label(&self) -> &'static str {
        "QTI 3.0"
    }

    fn namespace(&self) -> &'static str {
        NAMESPACE
    }

    fn schema_location(&self) -> &'static str {
        SCHEMA
    }

    fn element(&self, element: Element) -> &'static str {
        match element {
            Element::AssessmentItem => "qti-assessment-item",
            Element::ResponseDeclaration => "qti-response-declaration",
            Element::OutcomeDeclaration => "qti-outcome-declaration",
            Element::CorrectResponse => "qti-correct-response",
            Element::DefaultValue => "qti-default-value",
            Element::Value => "qti-value",
            Element::ItemBody => "qti-item-body",
            Element::Prompt => "qti-prompt",
            Element::ChoiceInteraction => "qti-choice-interaction",
            Element::SimpleChoice => "qti-simple-choice",
            Element::TextEntryInteraction => "qti-text-entry-interaction",
            Element::ExtendedTextInteraction => "qti-extended-text-interaction",
            Element::GapMatchInteraction => "qti-gap-match-interaction",
            Element::GapText => "qti-gap-text",
            Element::Gap => "qti-gap",
            Element::ResponseProcessing => "qti-response-processing",
            Element::ResponseCondition => "qti-response-condition",
            Element::ResponseIf => "qti-response-if",
            Element::ResponseElseIf => "qti-response-else-if",
            Element::ResponseElse => "qti-response-else",
            Element::SetOutcomeValue => "qti-set-outcome-value",
            Element::Variable => "qti-variable",
            Element::BaseValue => "qti-base-value",
            Element::Match => "qti-match",
            Element::Member => "qti-member",
            Element::And => "qti-and",
            Element::Or => "qti-or",
            Element::Not => "qti-not",
            Element::Gte => "qti-gte",
            Element::Lte => "qti-lte",
            Element::Multiple => "qti-multiple",
            Element::Sum => "qti-sum",
            Element::TestVariables => "qti-test-variables",
            Element::ModalFeedback => "qti-modal-feedback",
            Element::AssessmentTest => "qti-assessment-test",
            Element::TestPart => "qti-test-part",
            Element::ItemSessionControl => "qti-item-session-control",
            Element::AssessmentSection => "qti-assessment-section",
            Element::Selection => "qti-selection",
            Element::Ordering => "qti-ordering",
            Element::AssessmentItemRef => "qti-assessment-item-ref",
            Element::OutcomeProcessing => "qti-outcome-processing",
        }
    }

    fn attr(&self, attr: Attr) -> &'static str {
        match attr {
            Attr::Identifier => "identifier",
            Attr::Title => "title",
            Attr::Adaptive => "adaptive",
            Attr::TimeDependent => "time-dependent",
            Attr::Cardinality => "cardinality",
            Attr::BaseType => "base-type",
            Attr::ResponseIdentifier => "response-identifier",
            Attr::Shuffle => "shuffle",
            Attr::MaxChoices => "max-choices",
            Attr::ExpectedLength => "expected-length",
            Attr::ExpectedLines => "expected-lines",
            Attr::MatchMax => "match-max",
            Attr::OutcomeIdentifier => "outcome-identifier",
            Attr::ShowHide => "show-hide",
            Attr::NavigationMode => "navigation-mode",
            Attr::SubmissionMode => "submission-mode",
            Attr::MaxAttempts => "max-attempts",
            Attr::ShowFeedback => "show-feedback",
            Attr::ShowSolution => "show-solution",
            Attr::AllowComment => "allow-comment",
            Attr::AllowSkipping => "allow-skipping",
            Attr::ValidateResponses => "validate-responses",
            Attr::Visible => "visible",
            Attr::Select => "select",
            Attr::Href => "href",
            Attr::VariableIdentifier => "variable-identifier",
        }
    }

    fn manifest_namespace(&self) -> &'static str {
        "http://www.imsglobal.org/xsd/qti/qtiv3p0/imscp_v1p1"
    }

    fn manifest_schema_location(&self) -> &'static str {
        "http://www.imsglobal.org/xsd/qti/qtiv3p0/imscp_v1p1 \
         https://purl.imsglobal.org/spec/qti/v3p0/schema/xsd/imsqtiv3p0_imscpv1p2_v1p0.xsd"
    }

    fn metadata_namespace(&self) -> &'static str {
        "http://www.imsglobal.org/xsd/qti/qtiv3p0/imsqti_metadatav3p0"
    }

    fn manifest_schema(&self) -> (&'static str, &'static str) {
        ("QTI Package", "3.0.0")
    }

    fn resource_type(&self, kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Test => "imsqti_test_xmlv3p0",
            ResourceKind::Item => "imsqti_item_xmlv3p0",
            ResourceKind::WebContent => "webcontent",
        }
    }

    fn interaction_token(&self, kind: InteractionKind) -> Option<&'static str> {
        Some(match kind {
            InteractionKind::Choice => "qti-choice-interaction",
            InteractionKind::TextEntry => "qti-text-entry-interaction",
            InteractionKind::ExtendedText => "qti-extended-text-interaction",
            InteractionKind::Upload => "qti-upload-interaction",
            InteractionKind::GapMatch => "qti-gap-match-interaction",
        })
    }
}
