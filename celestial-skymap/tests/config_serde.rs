#![cfg(feature = "serde")]

use celestial_skymap::{CoordSystem, HealpixOrdering, MapGeometry, Skymap, SkymapConfig};

#[test]
fn test_healpix_config_from_json() {
    let json = r#"{
        "system": "galactic",
        "nmaps": 2,
        "geometry": { "kind": "healpix", "nside": 2, "ordering": "NEST" }
    }"#;
    let config: SkymapConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.system, CoordSystem::Galactic);
    assert_eq!(
        config.geometry,
        MapGeometry::Healpix {
            nside: 2,
            ordering: HealpixOrdering::Nested
        }
    );

    let map = Skymap::from_config(&config).unwrap();
    assert_eq!(map.npix(), 48);
    assert_eq!(map.nmaps(), 2);
}

#[test]
fn test_wcs_config_defaults() {
    let json = r#"{
        "geometry": {
            "kind": "wcs", "projection": "TAN",
            "crval": [83.6331, 22.0145], "cdelt": [-0.0616, 0.0433],
            "nx": 5, "ny": 5
        }
    }"#;
    let config: SkymapConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.system, CoordSystem::Equatorial);
    assert_eq!(config.nmaps, 1);

    let map = Skymap::from_config(&config).unwrap();
    let wcs = map.projection().wcs_grid().unwrap().wcs();
    assert_eq!(wcs.crpix(), [3.0, 3.0]);
}

#[test]
fn test_config_json_round_trip() {
    let config = SkymapConfig::wcs(
        CoordSystem::Galactic,
        "AZP",
        [0.0, 90.0],
        [-0.5, 0.5],
        20,
        20,
    )
    .with_pv(1, 2.0)
    .with_crpix(10.0, 10.0)
    .with_nmaps(4);

    let text = serde_json::to_string(&config).unwrap();
    let back: SkymapConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, config);
    assert!(Skymap::from_config(&back).is_ok());
}

#[test]
fn test_wcs_config_with_pv_from_json() {
    let json = r#"{
        "system": "galactic",
        "geometry": {
            "kind": "wcs", "projection": "CEA",
            "crval": [0.0, 0.0], "cdelt": [-1.0, 1.0],
            "nx": 10, "ny": 10, "pv": { "1": 0.5 }
        }
    }"#;
    let config: SkymapConfig = serde_json::from_str(json).unwrap();
    match &config.geometry {
        MapGeometry::Wcs { pv, .. } => assert_eq!(pv.get(&1), Some(&0.5)),
        other => panic!("expected WCS geometry, got {:?}", other),
    }
    let map = Skymap::from_config(&config).unwrap();
    let wcs = map.projection().wcs_grid().unwrap().wcs();
    assert_eq!(wcs.projection().pv_params(), vec![(1, 0.5)]);

    let bad = json.replace(r#""1": 0.5"#, r#""one": 0.5"#);
    assert!(serde_json::from_str::<SkymapConfig>(&bad).is_err());
}

#[test]
fn test_unknown_kind_is_rejected() {
    let json = r#"{ "geometry": { "kind": "mollweide" } }"#;
    assert!(serde_json::from_str::<SkymapConfig>(json).is_err());
}
