//! Integration tests for JSON decoding, re-typing and snapshots

use pretty_assertions::assert_eq;
use rolecast_core::{
    field_map_from_json, merge_map_into, retype_map_fields, set_field, to_json_readable,
    to_json_writable, ErrorKind, FieldType, Record, RecordType, RoleSet, Value,
};

#[derive(Record, Default, Debug, Clone, PartialEq)]
pub struct Device {
    #[field(read = "*", write = "*")]
    pub serial: String,
    #[field(read = "*", write = "*")]
    pub port: u16,
    #[field(read = "*", write = "*")]
    pub ratio: f32,
    #[field(read = "*", write = "*")]
    pub label: Option<String>,
    #[field(read = "*", write = "*", alias = "ports")]
    pub open_ports: Vec<u16>,
    #[field(read = "admin", write = "admin", alias = "-")]
    pub token: String,
}

fn device_type() -> FieldType {
    FieldType::Record(RecordType::of::<Device>())
}

#[test]
fn test_json_map_merges_into_record() {
    let map = field_map_from_json(r#"{"serial": "X-1", "port": 8080, "label": null}"#).unwrap();
    let mut device = Device {
        label: Some("old".to_string()),
        ..Device::default()
    };
    merge_map_into(&mut device, &map).unwrap();

    assert_eq!(device.serial, "X-1");
    assert_eq!(device.port, 8080);
    assert_eq!(device.label, None);
}

#[test]
fn test_json_float_into_integer_field_fails() {
    let map = field_map_from_json(r#"{"port": 80.5}"#).unwrap();
    let mut device = Device::default();
    let err = merge_map_into(&mut device, &map).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.field(), Some("port"));
}

#[test]
fn test_json_rejects_non_object() {
    let err = field_map_from_json("[1, 2]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(field_map_from_json("{not json").is_err());
}

#[test]
fn test_retype_untyped_arrays() {
    let map = field_map_from_json(r#"{"ports": [22, 443], "serial": "X-2", "extra": true}"#).unwrap();
    let retyped = retype_map_fields(&map, &device_type(), false).unwrap();

    assert_eq!(retyped.keys().collect::<Vec<_>>(), vec!["ports", "serial"]);
    let ports = &retyped["ports"];
    assert_eq!(ports.type_of(), FieldType::seq(FieldType::Uint(rolecast_core::IntWidth::W16)));

    let mut device = Device::default();
    set_field(&mut device, "open_ports", ports, &RoleSet::new()).unwrap();
    assert_eq!(device.open_ports, vec![22, 443]);
}

#[test]
fn test_retype_incompatible_elements() {
    let map = field_map_from_json(r#"{"ports": [22, "ssh"]}"#).unwrap();
    let err = retype_map_fields(&map, &device_type(), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.field(), Some("open_ports"));

    let lenient = retype_map_fields(&map, &device_type(), true).unwrap();
    assert_eq!(lenient["ports"].as_seq().map(<[Value]>::len), Some(1));

    let err = retype_map_fields(&map, &FieldType::String, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn test_json_snapshots() {
    let device = Device {
        serial: "X-3".to_string(),
        port: 443,
        ratio: 0.5,
        label: None,
        open_ports: vec![443],
        token: "t0k3n".to_string(),
    };

    let writable: serde_json::Value =
        serde_json::from_str(&to_json_writable(&device, &RoleSet::from(["admin"]), true).unwrap())
            .unwrap();
    let keys: Vec<&String> = writable.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["port", "ports", "ratio", "serial"]);

    let readable: serde_json::Value =
        serde_json::from_str(&to_json_readable(&device, &RoleSet::new()).unwrap()).unwrap();
    assert_eq!(readable["serial"], "X-3");
    assert_eq!(readable["label"], serde_json::Value::Null);
    assert!(readable.get("token").is_none());
}
