//! Output contract for the analysis model.
//!
//! The contract is declared once as a [`SchemaNode`] tree and emitted in two
//! dialects: the Gemini `responseSchema` dialect that constrains generation,
//! and a JSON Schema that validates what actually comes back. Payloads that do
//! not conform are rejected with every violation listed, never coerced.

use jsonschema::JSONSchema;
use serde_json::{json, Map, Value};

use crate::types::{AppError, AppResult};

/// Kind of value a schema node accepts
#[derive(Debug, Clone)]
pub enum SchemaType {
    Object(Vec<Property>),
    Array(Box<SchemaNode>),
    String,
    Integer { minimum: Option<i64>, maximum: Option<i64> },
    Boolean,
}

#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub kind: SchemaType,
    pub description: Option<&'static str>,
    pub nullable: bool,
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: &'static str,
    pub node: SchemaNode,
    pub required: bool,
}

impl Property {
    pub fn required(name: &'static str, node: SchemaNode) -> Self {
        Self { name, node, required: true }
    }

    pub fn optional(name: &'static str, node: SchemaNode) -> Self {
        Self { name, node, required: false }
    }
}

impl SchemaNode {
    fn of(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            nullable: false,
        }
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Self::of(SchemaType::Object(properties))
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::of(SchemaType::Array(Box::new(items)))
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer {
            minimum: None,
            maximum: None,
        })
    }

    /// Integer restricted to `[0, 100]`
    pub fn percentage() -> Self {
        Self::of(SchemaType::Integer {
            minimum: Some(0),
            maximum: Some(100),
        })
    }

    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Render in the Gemini `responseSchema` dialect
    pub fn to_gemini(&self) -> Value {
        let mut out = Map::new();

        match &self.kind {
            SchemaType::Object(properties) => {
                out.insert("type".into(), json!("OBJECT"));
                let mut props = Map::new();
                for p in properties {
                    props.insert(p.name.into(), p.node.to_gemini());
                }
                out.insert("properties".into(), Value::Object(props));
                out.insert(
                    "propertyOrdering".into(),
                    json!(properties.iter().map(|p| p.name).collect::<Vec<_>>()),
                );
                let required = required_names(properties);
                if !required.is_empty() {
                    out.insert("required".into(), json!(required));
                }
            }
            SchemaType::Array(items) => {
                out.insert("type".into(), json!("ARRAY"));
                out.insert("items".into(), items.to_gemini());
            }
            SchemaType::String => {
                out.insert("type".into(), json!("STRING"));
            }
            SchemaType::Integer { minimum, maximum } => {
                out.insert("type".into(), json!("INTEGER"));
                insert_bounds(&mut out, *minimum, *maximum);
            }
            SchemaType::Boolean => {
                out.insert("type".into(), json!("BOOLEAN"));
            }
        }

        if let Some(description) = self.description {
            out.insert("description".into(), json!(description));
        }
        if self.nullable {
            out.insert("nullable".into(), json!(true));
        }

        Value::Object(out)
    }

    /// Render as a JSON Schema (draft 7) with closed objects
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();

        let type_name = match &self.kind {
            SchemaType::Object(properties) => {
                let mut props = Map::new();
                for p in properties {
                    props.insert(p.name.into(), p.node.to_json_schema());
                }
                out.insert("properties".into(), Value::Object(props));
                out.insert("required".into(), json!(required_names(properties)));
                out.insert("additionalProperties".into(), json!(false));
                "object"
            }
            SchemaType::Array(items) => {
                out.insert("items".into(), items.to_json_schema());
                "array"
            }
            SchemaType::String => "string",
            SchemaType::Integer { minimum, maximum } => {
                insert_bounds(&mut out, *minimum, *maximum);
                "integer"
            }
            SchemaType::Boolean => "boolean",
        };

        let type_value = if self.nullable {
            json!([type_name, "null"])
        } else {
            json!(type_name)
        };
        out.insert("type".into(), type_value);

        if let Some(description) = self.description {
            out.insert("description".into(), json!(description));
        }

        Value::Object(out)
    }
}

fn required_names(properties: &[Property]) -> Vec<&'static str> {
    properties
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name)
        .collect()
}

fn insert_bounds(out: &mut Map<String, Value>, minimum: Option<i64>, maximum: Option<i64>) {
    if let Some(min) = minimum {
        out.insert("minimum".into(), json!(min));
    }
    if let Some(max) = maximum {
        out.insert("maximum".into(), json!(max));
    }
}

fn paper_schema() -> SchemaNode {
    SchemaNode::object(vec![
        Property::required(
            "title",
            SchemaNode::string().describe("Exact title of a real existing paper."),
        ),
        Property::required("year", SchemaNode::integer()),
        Property::required(
            "oneLiner",
            SchemaNode::string().describe("A very short takeaway."),
        ),
        Property::required(
            "abstract",
            SchemaNode::string().describe("2-3 sentences summary of the paper."),
        ),
        Property::optional(
            "github",
            SchemaNode::string()
                .describe("Leave empty/null if unsure. Do not hallucinate.")
                .nullable(),
        ),
    ])
}

fn conference_schema() -> SchemaNode {
    SchemaNode::object(vec![
        Property::required(
            "name",
            SchemaNode::string().describe("Conference Name (e.g. CVPR 2026)"),
        ),
        Property::required("url", SchemaNode::string().describe("Official homepage URL")),
        Property::required("reason", SchemaNode::string().describe("Why it fits")),
        Property::required(
            "relevantPapers",
            SchemaNode::array(paper_schema())
                .describe("3 REAL, EXISTING papers relevant to this specific conference."),
        ),
    ])
}

/// The full analysis contract
pub fn analysis_contract() -> SchemaNode {
    SchemaNode::object(vec![
        Property::required(
            "isValid",
            SchemaNode::boolean().describe(
                "Set to FALSE if the user input is gibberish, random numbers, too short to be \
                 meaningful, or completely unrelated to research/tech. Otherwise TRUE.",
            ),
        ),
        Property::optional(
            "validationFeedback",
            SchemaNode::string()
                .describe(
                    "If isValid is false, explain why and ask the user to revise. \
                     If isValid is true, leave empty or null.",
                )
                .nullable(),
        ),
        Property::optional(
            "generatedAbstract",
            SchemaNode::string()
                .describe("If mode is 'Ideation' and valid, this is the generated abstract. Else null.")
                .nullable(),
        ),
        Property::optional(
            "keywords",
            SchemaNode::array(SchemaNode::string())
                .describe("3-4 core technical keywords extracted from the idea.")
                .nullable(),
        ),
        Property::optional(
            "trendMatchScore",
            SchemaNode::percentage()
                .describe("Strict Match score (0-100). 50 is average. 80+ is rare/exceptional. Do not inflate.")
                .nullable(),
        ),
        Property::optional(
            "oneLiner",
            SchemaNode::string()
                .describe("A punchy one-sentence summary.")
                .nullable(),
        ),
        Property::optional(
            "methodology",
            SchemaNode::object(vec![
                Property::required(
                    "mermaidCode",
                    SchemaNode::string().describe(
                        "Professional Mermaid.js 'graph TD' code. MUST use 'subgraph' to group \
                         components. MUST use 'classDef' for modern styling (rounded corners, \
                         pastel colors). MUST use distinct shapes (cylinder for data, rhombus \
                         for decision).",
                    ),
                ),
                Property::required(
                    "description",
                    SchemaNode::string().describe("Brief text explanation of the methodology figure."),
                ),
            ])
            .describe("Proposed methodology visualization and description.")
            .nullable(),
        ),
        Property::optional(
            "conferences",
            SchemaNode::array(conference_schema())
                .describe("Top 3 recommended conferences.")
                .nullable(),
        ),
        Property::optional(
            "metrics",
            SchemaNode::array(SchemaNode::object(vec![
                Property::required("metric", SchemaNode::string()),
                Property::required("value", SchemaNode::percentage()),
            ]))
            .describe("5 radar chart metrics.")
            .nullable(),
        ),
        Property::optional(
            "roadmap",
            SchemaNode::array(SchemaNode::object(vec![
                Property::required("phase", SchemaNode::string()),
                Property::required("description", SchemaNode::string()),
                Property::required("timeline", SchemaNode::string()),
            ]))
            .describe("Implementation roadmap steps.")
            .nullable(),
        ),
    ])
}

/// Contract in the Gemini dialect, attached to every analysis request
pub fn response_schema() -> Value {
    analysis_contract().to_gemini()
}

/// Contract as JSON Schema, used to validate responses
pub fn json_schema() -> Value {
    let mut schema = analysis_contract().to_json_schema();
    schema["$schema"] = json!("http://json-schema.org/draft-07/schema#");
    schema
}

/// A payload that does not conform to the contract
#[derive(Debug, Clone, thiserror::Error)]
#[error("payload violates the analysis contract: {}", .issues.join("; "))]
pub struct SchemaViolation {
    pub issues: Vec<String>,
}

/// Compiled validator for model payloads
pub struct ContractValidator {
    compiled: JSONSchema,
}

impl ContractValidator {
    pub fn new() -> AppResult<Self> {
        let schema = json_schema();
        let compiled = JSONSchema::compile(&schema)
            .map_err(|e| AppError::Internal(format!("Analysis contract does not compile: {}", e)))?;
        Ok(Self { compiled })
    }

    pub fn validate(&self, payload: &Value) -> Result<(), SchemaViolation> {
        match self.compiled.validate(payload) {
            Ok(()) => Ok(()),
            Err(errors) => {
                let issues = errors
                    .map(|e| {
                        let path = e.instance_path.to_string();
                        let path = if path.is_empty() { "/".to_string() } else { path };
                        format!("{}: {}", path, e)
                    })
                    .collect();
                Err(SchemaViolation { issues })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ContractValidator {
        ContractValidator::new().unwrap()
    }

    #[test]
    fn test_gemini_dialect_top_level() {
        let schema = response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["isValid"]));
        assert_eq!(schema["properties"]["isValid"]["type"], "BOOLEAN");
        assert_eq!(schema["properties"]["keywords"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["keywords"]["items"]["type"], "STRING");
        assert_eq!(schema["properties"]["keywords"]["nullable"], true);
        assert_eq!(schema["properties"]["trendMatchScore"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["trendMatchScore"]["maximum"], 100);
        assert_eq!(schema["propertyOrdering"][0], "isValid");
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_gemini_dialect_nested_required_sets() {
        let schema = response_schema();
        let conference = &schema["properties"]["conferences"]["items"];
        assert_eq!(
            conference["required"],
            json!(["name", "url", "reason", "relevantPapers"])
        );
        assert_eq!(
            conference["properties"]["relevantPapers"]["items"]["required"],
            json!(["title", "year", "oneLiner", "abstract"])
        );
        assert_eq!(
            schema["properties"]["metrics"]["items"]["required"],
            json!(["metric", "value"])
        );
        assert_eq!(
            schema["properties"]["roadmap"]["items"]["required"],
            json!(["phase", "description", "timeline"])
        );
    }

    #[test]
    fn test_json_schema_closes_objects() {
        let schema = json_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["methodology"]["additionalProperties"], false);
        assert_eq!(schema["properties"]["oneLiner"]["type"], json!(["string", "null"]));
        assert_eq!(schema["properties"]["isValid"]["type"], "boolean");
    }

    #[test]
    fn test_accepts_minimal_invalid_payload() {
        let payload = json!({"isValid": false, "validationFeedback": "Too short."});
        assert!(validator().validate(&payload).is_ok());
    }

    #[test]
    fn test_accepts_nulls_on_nullable_fields() {
        let payload = json!({
            "isValid": true,
            "keywords": null,
            "methodology": null,
            "trendMatchScore": null,
            "conferences": [{
                "name": "NeurIPS 2026",
                "url": "https://neurips.cc",
                "reason": "Core ML venue",
                "relevantPapers": [{
                    "title": "Attention Is All You Need",
                    "year": 2017,
                    "oneLiner": "Transformers.",
                    "abstract": "Introduces the transformer.",
                    "github": null
                }]
            }]
        });
        assert!(validator().validate(&payload).is_ok());
    }

    #[test]
    fn test_rejects_missing_is_valid() {
        let err = validator().validate(&json!({"keywords": ["a"]})).unwrap_err();
        assert!(err.issues.iter().any(|i| i.contains("isValid")));
    }

    #[test]
    fn test_rejects_wrong_types_with_paths() {
        let payload = json!({
            "isValid": "yes",
            "trendMatchScore": 72.5,
            "metrics": [{"metric": "Novelty", "value": "high"}]
        });
        let err = validator().validate(&payload).unwrap_err();
        assert!(err.issues.len() >= 3);
        assert!(err.issues.iter().any(|i| i.starts_with("/isValid")));
        assert!(err.issues.iter().any(|i| i.starts_with("/trendMatchScore")));
        assert!(err.issues.iter().any(|i| i.starts_with("/metrics/0/value")));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let payload = json!({"isValid": true, "confidence": 0.9});
        assert!(validator().validate(&payload).is_err());

        let nested = json!({
            "isValid": true,
            "roadmap": [{"phase": "P1", "description": "d", "timeline": "Jan", "owner": "me"}]
        });
        assert!(validator().validate(&nested).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_scores() {
        let payload = json!({"isValid": true, "trendMatchScore": 140});
        let err = validator().validate(&payload).unwrap_err();
        assert!(err.to_string().contains("trendMatchScore"));
    }

    #[test]
    fn test_rejects_incomplete_nested_objects() {
        let payload = json!({
            "isValid": true,
            "conferences": [{"name": "ICML 2026", "url": "https://icml.cc"}]
        });
        let err = validator().validate(&payload).unwrap_err();
        assert!(err.issues.iter().any(|i| i.starts_with("/conferences/0")));
    }
}
