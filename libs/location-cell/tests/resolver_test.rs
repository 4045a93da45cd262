use location_cell::gazetteer::DistrictTable;
use location_cell::services::resolver::MAX_SUGGESTIONS;
use location_cell::{Gazetteer, LocationMatch, LocationResolver};

const SMALL: &[(&str, DistrictTable)] = &[
    (
        "Hill Province",
        &[
            ("Upper Vale", &["Ridgeton", "Stonebridge"]),
            ("Lower Vale", &["Millbrook", "Riverside", "Hillcrest"]),
        ],
    ),
    (
        "Coast Province",
        &[
            ("Harbour", &["Portsmere", "Hillport"]),
            ("Dunes", &["Sandby"]),
        ],
    ),
];

fn cities(matches: &[LocationMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.city.as_str()).collect()
}

#[test]
fn province_match_returns_every_city_of_the_province() {
    let gazetteer = Gazetteer::from_table(SMALL);
    let resolver = LocationResolver::new(&gazetteer);

    let matches = resolver.resolve("coast");

    assert_eq!(cities(&matches), vec!["Portsmere", "Hillport", "Sandby"]);
    assert!(matches.iter().all(|m| m.province == "Coast Province"));
}

#[test]
fn scan_order_is_province_then_district_then_city() {
    let gazetteer = Gazetteer::from_table(SMALL);
    let resolver = LocationResolver::new(&gazetteer);

    // "hill" hits the first province name, then a city inside the second province.
    let matches = resolver.resolve("hill");

    assert_eq!(
        cities(&matches),
        vec!["Ridgeton", "Stonebridge", "Millbrook", "Riverside", "Hillcrest", "Hillport"]
    );
    assert_eq!(matches[5].district, "Harbour");
}

#[test]
fn district_match_does_not_pull_in_sibling_districts() {
    let gazetteer = Gazetteer::from_table(SMALL);
    let matches = LocationResolver::new(&gazetteer).resolve("lower");
    assert_eq!(cities(&matches), vec!["Millbrook", "Riverside", "Hillcrest"]);
}

#[test]
fn results_never_exceed_the_cap() {
    let resolver = LocationResolver::nepal();
    for query in ["province", "an", "Bagmati Province", "pur", "ma"] {
        assert!(resolver.resolve(query).len() <= MAX_SUGGESTIONS, "query {query}");
    }
    assert_eq!(resolver.resolve("province").len(), MAX_SUGGESTIONS);
}

#[test]
fn cap_truncates_in_gazetteer_order() {
    let matches = LocationResolver::nepal().resolve("Koshi");
    assert_eq!(
        cities(&matches),
        vec![
            "Bhojpur",
            "Shadananda",
            "Dhankuta",
            "Pakhribas",
            "Mahalaxmi",
            "Ilam",
            "Deumai",
            "Mai",
            "Suryodaya",
            "Birtamod",
        ]
    );
}

#[test]
fn kathmandu_query_finds_the_capital() {
    let matches = LocationResolver::nepal().resolve("Kathman");
    assert!(matches.contains(&LocationMatch::new("Kathmandu", "Kathmandu", "Bagmati Province")));
}

#[test]
fn resolving_is_repeatable() {
    let resolver = LocationResolver::nepal();
    assert_eq!(resolver.resolve("lal"), resolver.resolve("lal"));
}

#[test]
fn matches_serialize_with_display_label() {
    let value = serde_json::to_value(LocationMatch::new("Pokhara", "Kaski", "Gandaki Province")).unwrap();
    assert_eq!(value["display"], "Pokhara, Kaski, Gandaki Province");
    assert_eq!(value["district"], "Kaski");
}
