use addressbook_core::db::open_db_in_memory;
use addressbook_core::{
    distance_km, AddressRecord, AddressService, DistanceModel, NewAddress, ProximityQuery,
    ServiceError, SqliteAddressRepository,
};

fn ids(records: &[AddressRecord]) -> Vec<i64> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn springfield_scenario_filters_by_radius() {
    let conn = open_db_in_memory().unwrap();
    let service = AddressService::new(SqliteAddressRepository::try_new(&conn).unwrap());

    let main_st = service
        .create_address(&NewAddress::new("Main St", "Springfield", 40.0, -75.0))
        .unwrap();
    let oak_ave = service
        .create_address(&NewAddress::new("Oak Ave", "Springfield", 40.5, -75.5))
        .unwrap();

    let near = service
        .find_nearby(&ProximityQuery::new(10.0, 40.0, -75.0))
        .unwrap();
    assert_eq!(ids(&near), vec![main_st.id]);

    let wide = service
        .find_nearby(&ProximityQuery::new(100.0, 40.0, -75.0))
        .unwrap();
    assert_eq!(ids(&wide), vec![main_st.id, oak_ave.id]);
}

#[test]
fn boundary_record_is_included_and_farther_record_excluded() {
    let conn = open_db_in_memory().unwrap();
    for model in [DistanceModel::Vincenty, DistanceModel::Haversine] {
        let service = AddressService::with_distance_model(
            SqliteAddressRepository::try_new(&conn).unwrap(),
            model,
        );
        let target = service
            .create_address(&NewAddress::new("Pier 39", "San Francisco", 37.808673, -122.409821))
            .unwrap();
        let origin = (37.774929, -122.419416);
        let radius = distance_km(model, origin, target.coordinates());

        let at_radius = service
            .find_nearby(&ProximityQuery::new(radius, origin.0, origin.1))
            .unwrap();
        assert!(ids(&at_radius).contains(&target.id), "{model}");

        let below = service
            .find_nearby(&ProximityQuery::new(radius - 0.001, origin.0, origin.1))
            .unwrap();
        assert!(!ids(&below).contains(&target.id), "{model}");

        service.delete_address(target.id).unwrap();
    }
}

#[test]
fn zero_radius_returns_only_coincident_records() {
    let conn = open_db_in_memory().unwrap();
    let service = AddressService::new(SqliteAddressRepository::try_new(&conn).unwrap());

    let exact = service
        .create_address(&NewAddress::new("A", "X", 12.345678, 98.765432))
        .unwrap();
    let twin = service
        .create_address(&NewAddress::new("B", "X", 12.345678, 98.765432))
        .unwrap();
    service
        .create_address(&NewAddress::new("C", "X", 12.345679, 98.765432))
        .unwrap();

    let found = service
        .find_nearby(&ProximityQuery::new(0.0, 12.345678, 98.765432))
        .unwrap();
    assert_eq!(ids(&found), vec![exact.id, twin.id]);
}

#[test]
fn query_point_with_extra_decimals_is_measured_as_given() {
    let conn = open_db_in_memory().unwrap();
    let service = AddressService::new(SqliteAddressRepository::try_new(&conn).unwrap());

    let main_st = service
        .create_address(&NewAddress::new("Main St", "Springfield", 40.0, -75.0))
        .unwrap();
    let oak_ave = service
        .create_address(&NewAddress::new("Oak Ave", "Springfield", 40.5, -75.5))
        .unwrap();
    let origin = (40.0000004, -75.0000004);

    let radius = distance_km(DistanceModel::Vincenty, origin, oak_ave.coordinates());
    let at_radius = service
        .find_nearby(&ProximityQuery::new(radius, origin.0, origin.1))
        .unwrap();
    assert!(ids(&at_radius).contains(&oak_ave.id));

    let zero = service
        .find_nearby(&ProximityQuery::new(0.0, origin.0, origin.1))
        .unwrap();
    assert!(!ids(&zero).contains(&main_st.id));
    assert!(zero.is_empty());
}

#[test]
fn invalid_query_is_rejected_before_search() {
    let conn = open_db_in_memory().unwrap();
    let service = AddressService::new(SqliteAddressRepository::try_new(&conn).unwrap());

    let err = service
        .find_nearby(&ProximityQuery::new(10.0, -91.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidAddress(_)));
    assert!(err.to_string().contains("(-91, 0)"));

    let err = service
        .find_nearby(&ProximityQuery::new(f64::NAN, 0.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRadius(_)));
}

#[test]
fn invalid_create_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = AddressService::new(SqliteAddressRepository::try_new(&conn).unwrap());

    let err = service
        .create_address(&NewAddress::new("Nowhere", "Atlantis", 95.0, 0.0))
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(service.list_addresses().unwrap().is_empty());
}

#[test]
fn service_crud_maps_missing_ids_to_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = AddressService::new(SqliteAddressRepository::try_new(&conn).unwrap());
    let input = NewAddress::new("Main St", "Springfield", 40.0, -75.0);

    assert!(matches!(service.get_address(5), Err(ServiceError::NotFound(5))));
    assert!(matches!(
        service.update_address(5, &input),
        Err(ServiceError::NotFound(5))
    ));
    assert!(matches!(service.delete_address(5), Err(ServiceError::NotFound(5))));

    let created = service.create_address(&input).unwrap();
    service.delete_address(created.id).unwrap();
    assert!(matches!(
        service.get_address(created.id),
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_address(created.id),
        Err(ServiceError::NotFound(_))
    ));
}
