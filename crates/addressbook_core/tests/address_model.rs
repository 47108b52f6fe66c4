use addressbook_core::{
    check_coordinates, AddressRecord, AddressValidationError, NewAddress, MAX_TEXT_CHARS,
};

#[test]
fn validate_accepts_boundary_coordinates() {
    for (latitude, longitude) in [(-90.0, -180.0), (90.0, 180.0), (-90.0, 180.0), (90.0, -180.0)] {
        let address = NewAddress::new("Edge", "World", latitude, longitude);
        assert!(address.validate().is_ok(), "({latitude}, {longitude})");
    }
}

#[test]
fn out_of_range_message_names_pair_and_ranges() {
    let err = check_coordinates(95.0, 0.0).unwrap_err();
    assert_eq!(
        err,
        AddressValidationError::CoordinatesOutOfRange {
            latitude: 95.0,
            longitude: 0.0,
        }
    );
    assert_eq!(
        err.to_string(),
        "coordinate (95, 0) not in range latitude(-90, 90) and longitude(-180, 180)"
    );
}

#[test]
fn text_fields_are_limited_to_max_chars() {
    let at_limit = "ß".repeat(MAX_TEXT_CHARS);
    assert!(NewAddress::new(at_limit.clone(), "City", 0.0, 0.0)
        .validate()
        .is_ok());

    let too_long = format!("{at_limit}x");
    let err = NewAddress::new("Locality", too_long, 0.0, 0.0)
        .validate()
        .unwrap_err();
    assert_eq!(
        err,
        AddressValidationError::FieldTooLong {
            field: "city",
            max_chars: MAX_TEXT_CHARS,
            actual_chars: MAX_TEXT_CHARS + 1,
        }
    );
}

#[test]
fn empty_text_fields_are_accepted() {
    assert!(NewAddress::new("", "", 0.0, 0.0).validate().is_ok());
}

#[test]
fn record_serialization_uses_expected_wire_fields() {
    let record = AddressRecord {
        id: 7,
        locality: "Main St".to_string(),
        city: "Springfield".to_string(),
        latitude: 40.0,
        longitude: -75.0,
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["locality"], "Main St");
    assert_eq!(json["city"], "Springfield");
    assert_eq!(json["latitude"], 40.0);
    assert_eq!(json["longitude"], -75.0);
    assert_eq!(json.as_object().unwrap().len(), 5);

    let decoded: AddressRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn input_shape_has_no_id() {
    let value = serde_json::json!({
        "locality": "Oak Ave",
        "city": "Springfield",
        "latitude": 40.5,
        "longitude": -75.5
    });

    let input: NewAddress = serde_json::from_value(value).unwrap();
    assert_eq!(input, NewAddress::new("Oak Ave", "Springfield", 40.5, -75.5));
    assert!(serde_json::to_value(&input).unwrap().get("id").is_none());
}
