//! Descriptor of the standard document rendering listener.

use crate::{DescriptorError, DescriptorRegistry};

const PARAMETERS: &str = "map<string,string>";

/// Method signatures of the rendering listener, as textual types.
const SIGNATURES: &[(&str, &[&str])] = &[
    ("beginDocument", &["record:MetaData"]),
    ("beginGroup", &[PARAMETERS]),
    ("beginFormat", &["enum:Format", PARAMETERS]),
    ("beginParagraph", &[PARAMETERS]),
    ("beginLink", &["record:ResourceReference", "bool", PARAMETERS]),
    ("beginList", &["enum:ListType", PARAMETERS]),
    ("beginListItem", &[PARAMETERS]),
    ("beginDefinitionList", &[PARAMETERS]),
    ("beginDefinitionTerm", &[]),
    ("beginDefinitionDescription", &[]),
    ("beginMacroMarker", &["string", PARAMETERS, "string", "bool"]),
    ("beginQuotation", &[PARAMETERS]),
    ("beginQuotationLine", &[]),
    ("beginSection", &[PARAMETERS]),
    ("beginHeader", &["enum:HeaderLevel", "string", PARAMETERS]),
    ("beginFigure", &[PARAMETERS]),
    ("beginFigureCaption", &[PARAMETERS]),
    ("beginTable", &[PARAMETERS]),
    ("beginTableRow", &[PARAMETERS]),
    ("beginTableCell", &[PARAMETERS]),
    ("beginTableHeadCell", &[PARAMETERS]),
    ("beginMetaData", &["record:MetaData"]),
    ("onNewLine", &[]),
    ("onMacro", &["string", PARAMETERS, "string", "bool"]),
    ("onWord", &["string"]),
    ("onSpace", &[]),
    ("onSpecialSymbol", &["char"]),
    ("onId", &["string"]),
    ("onHorizontalLine", &[PARAMETERS]),
    ("onEmptyLines", &["int"]),
    ("onVerbatim", &["string", "bool", PARAMETERS]),
    ("onRawText", &["string", "record:Syntax"]),
    ("onImage", &["record:ResourceReference", "bool", PARAMETERS]),
];

pub(crate) fn wiki_listener() -> Result<DescriptorRegistry, DescriptorError> {
    DescriptorRegistry::from_signatures(SIGNATURES.iter().copied())
}
