//! Integration tests for mapping payload normalization.

use pdf_field_mapper::config::MappingConfig;
use pdf_field_mapper::fields::{
    normalize_mapping, normalize_mapping_with_report, FieldKind, FieldNormalizer, FieldStyle, FieldType,
    FieldValue, FontWeight, IssueKind, MappingPayload, TextAlign,
};
use pdf_field_mapper::geometry::{PdfRect, Position};
use serde_json::json;

fn payload(value: serde_json::Value) -> MappingPayload {
    MappingPayload::from_value(value)
}

fn full_payload() -> MappingPayload {
    payload(json!({
        "mapping_stamp": [
            {"section": "1", "stampType": "ต้นสัญญา", "pageNumber": 2},
            {"section": "1", "stampType": "คู่สัญญา", "pageNumber": 2}
        ],
        "mapping_text": [
            {
                "text": "Full name", "step_index": "1", "pageNumber": "1",
                "left": "100", "top": "150.7",
                "llx": "0.1", "lly": "0.7", "urx": "0.4", "ury": "0.75",
                "required": "true", "max_length": "60", "placeholder": "Name",
                "font_size": "16", "font_weight": "bold", "text_align": "right"
            }
        ],
        "mapping_signature": [
            {"signature_name": "Buyer", "actor_id": "a-1", "signature_type": "draw", "scale_X": 40, "scale_Y": 60}
        ],
        "mapping_date_time": [{"date_time_name": "Signed on"}],
        "mapping_checkbox": [{"option_name": "Agree", "value": "true"}],
        "mapping_radiobox": [{"text": "Option A"}, {"text": "Option B", "value": true}],
        "mapping_doc_no": [{"value": "CN-001"}],
        "mapping_more_file": [{}],
        "mapping_eseal": [{"pageNumber": 3}]
    }))
}

#[test]
fn test_collection_order_and_ids() {
    let fields = normalize_mapping(&full_payload());
    let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "text-0",
            "signature-0",
            "date-0",
            "checkbox-0",
            "radio-0",
            "radio-1",
            "doc_no-0",
            "more_file-0",
            "eseal-0",
            "stamp-1-0-0",
            "stamp-1-1-1",
        ]
    );
}

#[test]
fn test_stamp_id_discrimination() {
    let fields = normalize_mapping(&full_payload());
    let stamps: Vec<_> = fields.iter().filter(|f| f.field_type() == FieldType::Stamp).collect();
    assert!(stamps[0].id.ends_with("-0-0"));
    assert!(stamps[1].id.ends_with("-1-1"));
    assert!(stamps.iter().all(|s| s.page_number == 2));
}

#[test]
fn test_text_record_fully_resolved() {
    let fields = normalize_mapping(&full_payload());
    let text = &fields[0];
    assert_eq!(text.label, "Full name");
    assert_eq!(text.step_index, "1");
    assert_eq!(text.page_number, 1);
    assert_eq!(text.position, Position::new(100, 150));
    assert_eq!(text.coordinates, PdfRect::new(0.1, 0.7, 0.4, 0.75));
    assert!(text.config.required);
    assert_eq!(text.config.max_length, 60);
    assert_eq!(text.config.placeholder.as_deref(), Some("Name"));
    assert_eq!(text.style.font_size, 16.0);
    assert_eq!(text.style.font_weight, FontWeight::Bold);
    assert_eq!(text.style.text_align, TextAlign::Right);
}

#[test]
fn test_type_extensions_only_on_matching_types() {
    let fields = normalize_mapping(&full_payload());
    let json = serde_json::to_value(&fields).unwrap();

    let signature = &json[1];
    assert_eq!(signature["label"], "Buyer");
    assert_eq!(signature["actorId"], "a-1");
    assert_eq!(signature["signatureType"], "draw");
    assert_eq!(signature["position"], json!({"x": 40, "y": 60}));
    assert!(signature.get("checkboxOptions").is_none());

    let checkbox = &json[3];
    assert_eq!(checkbox["checkboxOptions"], json!(["Agree"]));
    assert_eq!(checkbox["value"], true);
    assert!(checkbox.get("actorId").is_none());

    let radio_b = &json[5];
    assert_eq!(radio_b["radioOptions"], json!(["Option B"]));
    assert_eq!(radio_b["value"], true);

    let date = &json[2];
    assert_eq!(date["label"], "Signed on");
    assert_eq!(date["value"], "");
    assert_eq!(date["config"]["maxLength"], 0);
    for key in ["checkboxOptions", "radioOptions", "actorId", "signatureType"] {
        assert!(date.get(key).is_none(), "date field carries {}", key);
    }
}

#[test]
fn test_defaults_for_sparse_records() {
    let fields = normalize_mapping(&full_payload());
    let more_file = fields.iter().find(|f| f.id == "more_file-0").unwrap();
    assert_eq!(more_file.label, "more_file");
    assert_eq!(more_file.step_index, "0");
    assert_eq!(more_file.page_number, 1);
    assert_eq!(more_file.position, Position::default());
    assert!(!more_file.coordinates.is_placed());
    assert_eq!(more_file.value, FieldValue::Text(String::new()));
    assert_eq!(more_file.style, FieldStyle::default());

    let doc_no = fields.iter().find(|f| f.id == "doc_no-0").unwrap();
    assert_eq!(doc_no.value.as_text(), Some("CN-001"));
    assert_eq!(doc_no.kind, FieldKind::DocNo);
}

#[test]
fn test_well_formed_payload_has_clean_report() {
    let (_, report) = normalize_mapping_with_report(&full_payload());
    assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
}

#[test]
fn test_report_collects_upstream_problems() {
    let (fields, report) = normalize_mapping_with_report(&payload(json!({
        "mapping_text": [
            {"pageNumber": "abc", "left": "x1"},
            {"llx": 0.2, "lly": 0.2},
            {"llx": 0.5, "lly": 0.5, "urx": 0.2, "ury": 0.9},
            42
        ],
        "mapping_signature": {"not": "an array"},
        "mapping_unknown": [],
        "other_key": "ignored"
    })));

    // Every record still yields a field.
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].page_number, 1);
    assert_eq!(fields[0].position.x, 0);
    assert_eq!(fields[1].coordinates, PdfRect::ZERO);
    assert_eq!(fields[2].coordinates.urx, 0.2);

    let kinds: Vec<&IssueKind> = report.issues.iter().map(|i| &i.kind).collect();
    assert!(kinds.contains(&&IssueKind::UnknownCollection));
    assert!(kinds.contains(&&IssueKind::NotAnArray));
    assert!(kinds.contains(&&IssueKind::NotAnObject));
    assert!(kinds
        .iter()
        .any(|k| matches!(k, IssueKind::MalformedNumber { attribute, .. } if attribute == "pageNumber")));
    assert!(kinds
        .iter()
        .any(|k| matches!(k, IssueKind::MalformedNumber { attribute, .. } if attribute == "left")));
    assert!(kinds
        .iter()
        .any(|k| matches!(k, IssueKind::PartialCoordinates { .. })));
    assert!(kinds
        .iter()
        .any(|k| matches!(k, IssueKind::InvalidCoordinates { .. })));

    assert_eq!(report.for_field("text-0").count(), 2);
    assert_eq!(report.for_field("text-3").count(), 1);
}

#[test]
fn test_configured_defaults() {
    let config = MappingConfig::new().with_text_max_length(250).with_step_index("9");
    let normalizer = FieldNormalizer::new(config);
    let fields = normalizer.normalize(&payload(json!({"mapping_text": [{"text": "x"}]})));
    assert_eq!(fields[0].config.max_length, 250);
    assert_eq!(fields[0].step_index, "9");
}

#[test]
fn test_parses_payload_text() {
    let payload = MappingPayload::from_json_str(r#"{"mapping_eseal": [{"pageNumber": 4}]}"#).unwrap();
    let fields = normalize_mapping(&payload);
    assert_eq!(fields[0].page_number, 4);
    assert!(MappingPayload::from_json_str("{broken").is_err());
}

#[test]
fn test_empty_payload() {
    assert!(normalize_mapping(&payload(json!({}))).is_empty());
}
