//! Document extraction from JSON-LD site graphs

use serde::{Deserialize, Serialize};
use serde_json::Value;

const GRAPH_KEY: &str = "@graph";
const ID_KEY: &str = "@id";
const LABEL_KEY: &str = "rdfs:label";
const DESCRIPTION_KEY: &str = "description";
const VALUE_KEY: &str = "@value";

/// A document ready to be added to a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedDocument {
    pub id: String,
    pub text: String,
}

/// Extract one document per `@graph` node carrying a label or a description.
///
/// Text is `"{label}\n{description}"` with a missing part rendered empty.
/// Nodes without `@id` get `doc-{n}`, n being the count of documents extracted
/// before them. A missing or non-array `@graph` yields nothing.
pub fn extract_documents(graph: &Value) -> Vec<LoadedDocument> {
    let Some(nodes) = graph.get(GRAPH_KEY).and_then(Value::as_array) else {
        return vec![];
    };

    let mut documents = Vec::new();
    for node in nodes {
        let label = node.get(LABEL_KEY).and_then(literal);
        let description = node.get(DESCRIPTION_KEY).and_then(literal);
        if label.is_none() && description.is_none() {
            continue;
        }

        let id = node
            .get(ID_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("doc-{}", documents.len()));

        documents.push(LoadedDocument {
            id,
            text: format!(
                "{}\n{}",
                label.unwrap_or_default(),
                description.unwrap_or_default()
            ),
        });
    }

    documents
}

/// Render a JSON-LD literal; empty values count as absent
fn literal(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Object(map) => return map.get(VALUE_KEY).and_then(literal),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(literal).collect();
            parts.join(", ")
        }
        other => other.to_string(),
    };

    (!rendered.is_empty()).then_some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_label_and_description() {
        let graph = json!({
            "@graph": [
                { "@id": "https://example.org/a", "rdfs:label": "Alpha", "description": "First" },
                { "@id": "https://example.org/b", "rdfs:label": "Beta" }
            ]
        });

        let documents = extract_documents(&graph);
        assert_eq!(
            documents,
            vec![
                LoadedDocument {
                    id: "https://example.org/a".into(),
                    text: "Alpha\nFirst".into()
                },
                LoadedDocument {
                    id: "https://example.org/b".into(),
                    text: "Beta\n".into()
                },
            ]
        );
    }

    #[test]
    fn test_skips_nodes_without_text() {
        let graph = json!({
            "@graph": [
                { "@id": "x", "@type": "WebSite" },
                { "@id": "y", "rdfs:label": "" , "description": null },
                { "@id": "z", "description": "Only description" }
            ]
        });

        let documents = extract_documents(&graph);
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].text, "\nOnly description");
    }

    #[test]
    fn test_generated_ids_count_extracted_documents() {
        let graph = json!({
            "@graph": [
                { "rdfs:label": "one" },
                { "@type": "Skipped" },
                { "@id": "named", "rdfs:label": "two" },
                { "rdfs:label": "three" }
            ]
        });

        let ids: Vec<String> = extract_documents(&graph)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["doc-0", "named", "doc-2"]);
    }

    #[test]
    fn test_value_objects_and_lists() {
        let graph = json!({
            "@graph": [
                {
                    "@id": "a",
                    "rdfs:label": { "@value": "Typed", "@language": "en" },
                    "description": ["one", "two"]
                }
            ]
        });

        assert_eq!(extract_documents(&graph)[0].text, "Typed\none, two");
    }

    #[test]
    fn test_missing_graph_is_empty() {
        assert!(extract_documents(&json!({ "@context": "https://schema.org" })).is_empty());
        assert!(extract_documents(&json!({ "@graph": {} })).is_empty());
    }
}
