use test_log::test;
use tilegen::{rotation_degrees, split_label, Catalog, Error, Model, Outcome};

fn samples(model: &Model) -> Vec<String> {
    model
        .render()
        .into_iter()
        .map(|x| x.unwrap_or("-").to_string())
        .collect()
}

#[test]
fn self_rule_fills_grid() {
    let catalog = Catalog::new(false)
        .with_tile("A", None, 1.0)
        .with_tile("B", None, 1.0)
        .with_neighbor("A", "A");
    let mut model = Model::build(&catalog, "", 3, 1, false).unwrap();

    assert!(model.run_wfc(42, 0));
    for x in 0..3 {
        let label = model.get_sample(x, 0).unwrap().unwrap();
        assert_eq!(label, "0A");
        assert_eq!(split_label(label), Some((0, "A")));
    }
}

#[test]
fn straight_tile_has_two_orientations() {
    let catalog = Catalog::new(false)
        .with_tile("C", Some("I"), 1.0)
        .with_neighbor("C", "C");

    let mut row = Model::build(&catalog, "", 4, 1, false).unwrap();
    let labels: Vec<&str> = row.tiles().variants().iter().map(|x| x.label.as_str()).collect();
    assert_eq!(labels, ["0C", "1C"]);

    assert!(row.run_wfc(1, 0));
    assert_eq!(samples(&row), ["0C"; 4]);

    let mut column = Model::build(&catalog, "", 1, 4, false).unwrap();
    assert!(column.run_wfc(1, 0));
    assert_eq!(samples(&column), ["1C"; 4]);

    for label in samples(&row).iter().chain(samples(&column).iter()) {
        let (rotation, base) = split_label(label).unwrap();
        assert_eq!(base, "C");
        assert!(rotation == 0 || rotation == 1);
    }
    assert_eq!(rotation_degrees(1), 270.0);
}

#[test]
fn subset_drops_tile_and_its_rules() {
    let catalog = Catalog::new(false)
        .with_tile("A", None, 1.0)
        .with_tile("B", Some("T"), 1.0)
        .with_neighbor("A", "A")
        .with_neighbor("A", "B 2")
        .with_neighbor("B", "B")
        .with_subset("plain", &["A"]);

    let model = Model::build(&catalog, "plain", 3, 3, false).unwrap();

    assert_eq!(model.tiles().len(), 1);
    assert!(model.tiles().variants().iter().all(|x| x.base != "B"));
    assert_eq!(model.rules().variant_count(), 1);
    assert_eq!(model.rules().adjacency_count(), 4);

    let full = Model::build(&catalog, "", 3, 3, false).unwrap();
    assert_eq!(full.tiles().len(), 5);
}

#[test]
fn unsatisfiable_catalogs_fail() {
    // nothing may sit next to anything
    let catalog = Catalog::new(false)
        .with_tile("A", None, 1.0)
        .with_tile("B", None, 1.0);
    let mut model = Model::build(&catalog, "", 2, 1, false).unwrap();
    assert!(!model.run_wfc(7, 0));
    assert_eq!(model.get_sample(0, 0).unwrap(), None);

    // a single periodic cell is its own neighbor, and A only touches B
    let catalog = catalog.with_neighbor("A", "B");
    let mut model = Model::build(&catalog, "", 1, 1, true).unwrap();
    assert_eq!(model.run(7, 0), Outcome::Contradiction);
}

#[test]
fn same_seed_same_map() {
    let catalog = Catalog::new(false)
        .with_tile("deep", None, 3.0)
        .with_tile("shore", Some("T"), 1.0)
        .with_tile("land", None, 2.0)
        .with_neighbor("deep", "deep")
        .with_neighbor("land", "land")
        .with_neighbor("deep", "shore 1")
        .with_neighbor("shore 3", "land")
        .with_neighbor("shore", "shore")
        .with_neighbor("shore 1", "shore 1");

    let mut a = Model::build(&catalog, "", 9, 7, true).unwrap();
    let mut b = Model::build(&catalog, "", 9, 7, true).unwrap();

    for seed in [1, 17, 4242] {
        assert_eq!(a.run_wfc(seed, 0), b.run_wfc(seed, 0));
        assert_eq!(samples(&a), samples(&b));
    }
}

#[test]
fn iteration_limit_stops_early() {
    let catalog = Catalog::new(false)
        .with_tile("A", None, 1.0)
        .with_tile("B", None, 1.0)
        .with_neighbor("A", "A")
        .with_neighbor("A", "B")
        .with_neighbor("B", "B");
    let mut model = Model::build(&catalog, "", 6, 6, false).unwrap();

    assert_eq!(model.run(3, 1), Outcome::InProgress);
    assert!(model.run_wfc(3, 1));
    assert!(samples(&model).iter().any(|x| x == "-"));

    assert_eq!(model.run(3, 0), Outcome::Complete);
}

#[test]
fn out_of_range_samples() {
    let catalog = Catalog::new(false)
        .with_tile("A", None, 1.0)
        .with_neighbor("A", "A");
    let model = Model::build(&catalog, "", 2, 2, false).unwrap();

    assert_eq!(
        model.get_sample(0, 2),
        Err(Error::OutOfBounds {
            x: 0,
            y: 2,
            width: 2,
            height: 2
        })
    );
    assert!(!model.get_sample(5, 5).unwrap_err().is_configuration());
}

#[test]
fn seeds_fix_regions() {
    let catalog = Catalog::new(false)
        .with_tile("A", None, 1.0)
        .with_tile("B", None, 1.0)
        .with_neighbor("A", "A")
        .with_neighbor("B", "B");
    let mut model = Model::build(&catalog, "", 3, 1, false).unwrap();

    model.apply_seed(&[(2, 0, "B")]).unwrap();
    for seed in [1, 2, 3] {
        assert!(model.run_wfc(seed, 0));
        assert_eq!(samples(&model), ["0B"; 3]);
    }

    // A and B never touch
    model.apply_seed(&[(0, 0, "0A")]).unwrap();
    assert!(!model.run_wfc(1, 0));

    model.clear_seed();
    assert!(model.run_wfc(1, 0));
}

#[test]
fn backslash_is_not_a_symmetry() {
    let catalog = Catalog::new(false).with_tile("ramp", Some("\\"), 1.0);

    assert_eq!(
        Model::build(&catalog, "", 2, 2, false).unwrap_err(),
        Error::BadSymmetry {
            tile: "ramp".to_string(),
            symmetry: "\\".to_string()
        }
    );

    let catalog = Catalog::new(false).with_tile("ramp", Some("Slash"), 1.0);
    assert_eq!(Model::build(&catalog, "", 2, 2, false).unwrap().tiles().len(), 2);
}

#[test]
fn catalog_from_json() {
    let json = r#"{
        "tiles": [
            { "name": "grass", "weight": 2.0 },
            { "name": "path", "symmetry": "L" },
            { "name": "ramp", "symmetry": "Slash" }
        ],
        "neighbors": [
            { "left": "grass", "right": "grass" },
            { "left": "path 1", "right": "grass" },
            { "left": "ramp", "right": "ramp 1" }
        ],
        "subsets": [
            { "name": "open", "tiles": ["grass"] }
        ]
    }"#;
    let catalog: Catalog = serde_json::from_str(json).unwrap();

    let model = Model::build(&catalog, "", 4, 4, false).unwrap();
    assert_eq!(model.tiles().len(), 1 + 4 + 2);
    assert_eq!(model.tiles().variant(1).weight, 1.0);

    let mut open = Model::build(&catalog, "open", 4, 4, false).unwrap();
    assert!(open.run_wfc(5, 0));
    assert_eq!(samples(&open), ["0grass"; 16]);

    assert_eq!(
        Model::build(&catalog, "closed", 4, 4, false).unwrap_err(),
        Error::UnknownSubset {
            name: "closed".to_string()
        }
    );
}
