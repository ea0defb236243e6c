//! Property tests for spec extraction and normalization.

use proptest::prelude::*;
use serde_json::{Map, Value};

use rackfit::domain::services::extraction::{
    extract_pcie_lanes, normalize_socket, parse_capacity_gb, parse_spec, sockets_match,
};
use rackfit::ComponentType;

fn socket_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("(LGA|AM|SP|FCLGA)[0-9]{1,4}").unwrap()
}

/// Same socket, written the sloppy ways people write it
fn sloppy(socket: &str, lower: bool, sep: &str) -> String {
    let (letters, digits): (String, String) = socket.chars().partition(|c| c.is_ascii_alphabetic());
    let letters = if lower { letters.to_lowercase() } else { letters };
    format!("  {}{}{} ", letters, sep, digits)
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        ".{0,24}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            proptest::collection::btree_map(field_name(), inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("socket".to_string()),
        Just("pcie_slots".to_string()),
        Just("riser_slots".to_string()),
        Just("memory_types".to_string()),
        Just("capacity".to_string()),
        Just("interface".to_string()),
        Just("ports".to_string()),
        Just("port_type".to_string()),
        Just("speed".to_string()),
        Just("drive_bays".to_string()),
        Just("provides_slots".to_string()),
        "[a-z_]{1,12}",
    ]
}

fn component_type() -> impl Strategy<Value = ComponentType> {
    proptest::sample::select(ComponentType::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: socket matching ignores case, padding and separators.
    #[test]
    fn property_socket_match_ignores_spelling(
        socket in socket_name(),
        lower in any::<bool>(),
        sep in prop_oneof![Just(""), Just(" "), Just("-"), Just("_")],
    ) {
        let written = sloppy(&socket, lower, sep);
        prop_assert!(sockets_match(&socket, &written), "{socket} vs {written:?}");
        prop_assert_eq!(normalize_socket(&written), normalize_socket(&socket));
    }

    /// PROPERTY: different canonical sockets never match.
    #[test]
    fn property_distinct_sockets_do_not_match(a in socket_name(), b in socket_name()) {
        prop_assume!(normalize_socket(&a) != normalize_socket(&b));
        prop_assert!(!sockets_match(&a, &b));
    }

    /// PROPERTY: lane extraction always yields a usable link width.
    #[test]
    fn property_pcie_lanes_in_range(raw in ".{0,40}") {
        let lanes = extract_pcie_lanes(&raw).value();
        prop_assert!((1..=32).contains(&lanes));
    }

    /// PROPERTY: capacity parsing never panics on arbitrary input.
    #[test]
    fn property_capacity_parse_never_panics(raw in ".{0,40}") {
        let _ = parse_capacity_gb(&raw);
    }

    /// PROPERTY: parsing an attribute map never fails, whatever it holds.
    #[test]
    fn property_parse_spec_accepts_any_object(
        ty in component_type(),
        fields in proptest::collection::btree_map(field_name(), json_value(), 0..8),
    ) {
        let doc = Value::Object(fields.into_iter().collect());
        let spec = parse_spec(ty, "prop-1", &doc);
        prop_assert!(spec.is_ok(), "{:?}", spec.err());
        let spec = spec.unwrap();
        prop_assert_eq!(spec.component_type(), ty);
        prop_assert_eq!(spec.uuid(), "prop-1");
    }

    /// PROPERTY: non-object documents are rejected, not panicked on.
    #[test]
    fn property_parse_spec_rejects_non_objects(ty in component_type(), value in json_value()) {
        prop_assume!(!value.is_object());
        prop_assert!(parse_spec(ty, "prop-2", &value).is_err());
    }
}
