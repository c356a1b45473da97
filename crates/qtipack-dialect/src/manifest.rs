//! IMS content package manifest.

use qtipack_core::engine::CompiledDocument;
use qtipack_core::item::ItemRecord;

use crate::dialect::{Dialect, ResourceKind, XSI_NAMESPACE};
use crate::package::{item_path, test_path, RenderError, RenderedFile};
use crate::xml::XmlWriter;

/// Manifest tokens of every interaction in an item, deduplicated in order.
///
/// Fails on the first interaction the dialect cannot express.
pub fn interaction_tokens<D: Dialect + ?Sized>(
    d: &D,
    record: &ItemRecord,
) -> Result<Vec<&'static str>, RenderError> {
    let mut tokens = Vec::new();
    for kind in &record.interactions {
        let token = d
            .interaction_token(*kind)
            .ok_or_else(|| RenderError::Unsupported {
                dialect: d.name().to_string(),
                construct: kind.as_str().to_string(),
                item: record.identifier.clone(),
            })?;
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    Ok(tokens)
}

/// Identifier of the web-content resource of the `index`th image.
pub fn image_resource_id(compiled: &CompiledDocument, index: usize) -> String {
    format!("{}_image_{index}", compiled.manifest_identifier)
}

/// Render `imsmanifest.xml`.
///
/// `tokens` holds the interaction tokens of each item, aligned with
/// `compiled.items`; `items` holds the rendered item files, in the same order.
pub fn render<D: Dialect + ?Sized>(
    d: &D,
    compiled: &CompiledDocument,
    tokens: &[Vec<&'static str>],
    items: &[RenderedFile],
) -> String {
    let mut w = XmlWriter::document();
    w.open(
        "manifest",
        &[
            ("xmlns", d.manifest_namespace().to_string()),
            ("xmlns:imsqti", d.metadata_namespace().to_string()),
            ("xmlns:xsi", XSI_NAMESPACE.to_string()),
            ("xsi:schemaLocation", d.manifest_schema_location().to_string()),
            ("identifier", compiled.manifest_identifier.clone()),
        ],
    );

    let (schema, version) = d.manifest_schema();
    w.open("metadata", &[]);
    w.text("schema", &[], schema);
    w.text("schemaversion", &[], version);
    w.close("metadata");
    w.empty("organizations", &[]);

    w.open("resources", &[]);

    let test_href = test_path(&compiled.structure.identifier);
    w.open(
        "resource",
        &[
            ("identifier", compiled.structure.identifier.clone()),
            ("type", d.resource_type(ResourceKind::Test).to_string()),
            ("href", test_href.clone()),
        ],
    );
    w.empty("file", &[("href", test_href)]);
    for record in &compiled.items {
        w.empty("dependency", &[("identifierref", record.identifier.clone())]);
    }
    w.close("resource");

    for (index, record) in compiled.items.iter().enumerate() {
        let href = item_path(&record.identifier);
        w.open(
            "resource",
            &[
                ("identifier", record.identifier.clone()),
                ("type", d.resource_type(ResourceKind::Item).to_string()),
                ("href", href.clone()),
            ],
        );
        let item_tokens = tokens.get(index).map(Vec::as_slice).unwrap_or_default();
        if !item_tokens.is_empty() {
            w.open("metadata", &[]);
            w.open("imsqti:qtiMetadata", &[]);
            for token in item_tokens {
                w.text("imsqti:interactionType", &[], token);
            }
            w.close("imsqti:qtiMetadata");
            w.close("metadata");
        }
        w.empty("file", &[("href", href)]);
        let markup = items.get(index).map(|f| f.content.as_str()).unwrap_or_default();
        for (image_index, image) in compiled.images.iter().enumerate() {
            if markup.contains(&image.archive_path) {
                w.empty(
                    "dependency",
                    &[("identifierref", image_resource_id(compiled, image_index))],
                );
            }
        }
        w.close("resource");
    }

    for (index, image) in compiled.images.iter().enumerate() {
        w.open(
            "resource",
            &[
                ("identifier", image_resource_id(compiled, index)),
                ("type", d.resource_type(ResourceKind::WebContent).to_string()),
                ("href", image.archive_path.clone()),
            ],
        );
        w.empty("file", &[("href", image.archive_path.clone())]);
        w.close("resource");
    }

    w.close("resources");
    w.close("manifest");
    w.finish()
}
