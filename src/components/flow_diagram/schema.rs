//! Machine-readable description of the flow diagram input, for callers that
//! generate diagrams automatically. Nothing here validates input.

use serde_json::{Value, json};

/// Component name as callers refer to it.
pub const COMPONENT_NAME: &str = "FlowDiagram";
/// One-line summary for catalogs.
pub const COMPONENT_DESCRIPTION: &str =
	"Node and edge diagram for processes, pipelines and decision flows.";

fn string_enum(values: &[&str], default: &str) -> Value {
	json!({ "type": "string", "enum": values, "default": default })
}

fn node_schema() -> Value {
	json!({
		"type": "object",
		"required": ["id", "position"],
		"properties": {
			"id": { "type": "string", "description": "Unique node identifier" },
			"label": { "type": "string" },
			"position": {
				"type": "object",
				"required": ["x", "y"],
				"properties": {
					"x": { "type": "number" },
					"y": { "type": "number" }
				}
			},
			"type": string_enum(&["start", "end", "default", "custom", "input", "output"], "default"),
			"style": {
				"type": "object",
				"properties": {
					"backgroundColor": { "type": "string" },
					"borderColor": { "type": "string" },
					"color": { "type": "string" },
					"borderWidth": { "type": "number", "minimum": 0 },
					"borderRadius": { "type": "number", "minimum": 0 },
					"width": { "type": "number", "minimum": 0 },
					"height": { "type": "number", "minimum": 0 },
					"padding": { "type": "number", "minimum": 0 }
				}
			}
		}
	})
}

fn edge_schema() -> Value {
	json!({
		"type": "object",
		"required": ["id", "source", "target"],
		"properties": {
			"id": { "type": "string" },
			"source": { "type": "string", "description": "Id of the source node" },
			"target": { "type": "string", "description": "Id of the target node" },
			"label": { "type": "string" },
			"type": string_enum(&["default", "straight", "step", "smoothstep", "bezier"], "default"),
			"animated": { "type": "boolean", "default": false },
			"style": {
				"type": "object",
				"properties": {
					"stroke": { "type": "string" },
					"strokeWidth": { "type": "number", "minimum": 0 }
				}
			}
		}
	})
}

/// JSON-Schema style description of [`FlowDiagramData`](super::FlowDiagramData).
pub fn props_schema() -> Value {
	json!({
		"title": COMPONENT_NAME,
		"description": COMPONENT_DESCRIPTION,
		"type": "object",
		"required": ["nodes"],
		"properties": {
			"nodes": { "type": "array", "items": node_schema() },
			"edges": { "type": "array", "items": edge_schema(), "default": [] },
			"title": { "type": "string" },
			"variant": string_enum(&["default", "solid", "bordered"], "default"),
			"size": string_enum(&["sm", "default", "lg", "full"], "default"),
			"fitView": { "type": "boolean", "default": true },
			"interactive": { "type": "boolean", "default": false },
			"className": { "type": "string" }
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_diagram::FlowDiagramData;

	#[test]
	fn schema_lists_every_payload_field() {
		let schema = props_schema();
		let props = schema["properties"].as_object().unwrap();
		let payload = serde_json::to_value(FlowDiagramData {
			title: Some("t".into()),
			class_name: "c".into(),
			..Default::default()
		})
		.unwrap();
		for key in payload.as_object().unwrap().keys() {
			assert!(props.contains_key(key), "schema is missing `{key}`");
		}
	}

	#[test]
	fn schema_defaults_match_payload_defaults() {
		let schema = props_schema();
		let data = FlowDiagramData::from_json(r#"{"nodes": []}"#).unwrap();
		assert_eq!(schema["properties"]["fitView"]["default"], json!(data.fit_view));
		assert_eq!(
			schema["properties"]["interactive"]["default"],
			json!(data.interactive)
		);
		assert_eq!(
			schema["properties"]["edges"]["items"]["properties"]["type"]["enum"][3],
			json!("smoothstep")
		);
	}
}
