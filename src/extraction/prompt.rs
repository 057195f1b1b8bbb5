//! Prompts and response schemas for document and rule extraction.
//!
//! Both calls run with a strict JSON response schema so the model cannot
//! drift into prose; the parser still validates everything it returns.

use serde_json::{json, Value};

/// Three-phase instruction: classify the document and pick a layout,
/// extract every data point, then infer presentation metadata.
pub const DOCUMENT_PROMPT: &str = "\
You are an expert document analyst. You receive one or more photographs of a \
single business document. Work in three phases and return one JSON object.

PHASE 1 - CLASSIFICATION & LAYOUT. Decide what kind of document this is \
(invoice, product catalog, price list, inspection checklist, intake form, \
inventory sheet, etc.) and choose the interaction layout that best serves it:
- \"catalog\" when the document lists purchasable entities with prices \
(menus, product lists, price sheets).
- \"checklist\" when it lists tasks or checks to complete (audits, \
inspections, to-do sheets).
- \"form\" for everything else: documents whose data points are fields to \
read or fill (invoices, applications, reports).

PHASE 2 - INTELLIGENT EXTRACTION. Extract every distinct data point as an \
item with a unique snake_case id, a human-readable name, a value, and a \
category grouping related items. For catalog layouts the value MUST be the \
numeric price with currency symbols stripped (\"4.50\", not \"$4.50\"); use \
\"0\" when no price is printed. For forms the value is the pre-filled \
content, or an empty string for blank fields. For checklists the value is \
any quantity or amount attached to the task, else an empty string. Use the \
description field for fine print worth keeping and the type field to hint \
how a form field should be rendered.

PHASE 3 - METADATA. Infer a short appTitle for the generated application, \
an actionButtonLabel for its primary action (e.g. \"Place Order\", \
\"Complete Inspection\", \"Submit Invoice\"), a summaryLabel naming what \
the summary panel counts (e.g. \"Items\", \"Tasks\", \"Fields\"), and the \
detectedType from phase 1.

Return strictly the JSON object. No markdown, no commentary.";

/// Instruction for turning one spoken or written sentence into a
/// machine-readable threshold rule.
pub const RULE_PROMPT: &str = "\
You receive a short business instruction, as free text or as an audio \
recording. Convert it into exactly one threshold rule.

- type is \"threshold_discount\" when crossing the threshold grants a \
percentage benefit, otherwise \"threshold_action\".
- threshold is the numeric boundary mentioned in the instruction.
- benefitValue is the percentage for discounts (required for \
threshold_discount, 0 otherwise).
- actionName is a short label for the required action (e.g. \"Manager \
Approval\"), only for threshold_action rules that name one.
- originalText restates the instruction in one sentence.

If no usable rule is present, still return the object with type \
\"threshold_action\", threshold 1000000 and originalText \
\"No specific rule detected.\". Return strictly the JSON object.";

/// Response schema for document analysis: classification context plus the
/// extracted item list.
pub fn document_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "context": {
                "type": "OBJECT",
                "properties": {
                    "detectedType": { "type": "STRING" },
                    "appTitle": { "type": "STRING" },
                    "actionButtonLabel": { "type": "STRING" },
                    "summaryLabel": { "type": "STRING" },
                    "layoutType": {
                        "type": "STRING",
                        "enum": ["form", "catalog", "checklist"]
                    }
                },
                "required": [
                    "detectedType",
                    "appTitle",
                    "actionButtonLabel",
                    "summaryLabel",
                    "layoutType"
                ]
            },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "value": { "type": "STRING" },
                        "category": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "type": {
                            "type": "STRING",
                            "enum": [
                                "text", "number", "date",
                                "textarea", "currency", "boolean"
                            ]
                        }
                    },
                    "required": ["id", "name", "value", "category"]
                }
            }
        },
        "required": ["context", "items"]
    })
}

/// Response schema for rule extraction.
pub fn rule_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "type": {
                "type": "STRING",
                "enum": ["threshold_action", "threshold_discount"]
            },
            "threshold": { "type": "NUMBER" },
            "benefitValue": { "type": "NUMBER" },
            "actionName": { "type": "STRING" },
            "originalText": { "type": "STRING" }
        },
        "required": ["type", "threshold", "originalText"]
    })
}
