use super::*;
use crate::config::ItemConfig;
use crate::error::MotionError;
use crate::registry::Registry;
use crate::space::Axis;

fn xy_space() -> MotionSpace {
    MotionSpace::new(vec![
        Axis::new("x", (-10.0, 10.0), 21).unwrap(),
        Axis::new("y", (-10.0, 10.0), 21).unwrap(),
    ])
    .unwrap()
}

fn corner_grid() -> ItemConfig {
    ItemConfig::new("grid")
        .with("limits", serde_json::json!([[-10.0, 10.0], [-10.0, 10.0]]))
        .with("steps", serde_json::json!([3, 3]))
}

fn circle(radius: f64) -> ItemConfig {
    ItemConfig::new("circle")
        .with("radius", radius)
        .with("exclude", "outside")
}

#[test]
fn circle_filter_keeps_only_the_center_point() {
    // 3x3 grid layer over a 21x21 space, circle of radius 5: all eight
    // corner and edge-midpoint candidates lie at distance >= 10 and are
    // removed; only the center survives.
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    list.add_exclusion(&circle(5.0)).unwrap();

    assert_eq!(list.points().unwrap(), &[vec![0.0, 0.0]]);
}

#[test]
fn no_exclusions_accepts_every_candidate() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    let points = list.points().unwrap();
    assert_eq!(points.len(), 9);
    assert_eq!(points[0], vec![-10.0, -10.0]);
    assert_eq!(points[8], vec![10.0, 10.0]);
}

#[test]
fn layer_order_is_visitation_order() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(
        &ItemConfig::new("grid")
            .with("limits", serde_json::json!([[5.0, 5.0], [5.0, 5.0]]))
            .with("steps", 1),
    )
    .unwrap();
    list.add_layer(&corner_grid()).unwrap();

    let points = list.points().unwrap();
    // First layer's single point leads; duplicates are not removed.
    assert_eq!(points.len(), 10);
    assert_eq!(points[0], vec![5.0, 5.0]);
    assert_eq!(points[1], vec![-10.0, -10.0]);
}

#[test]
fn removing_an_exclusion_restores_points() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    let name = list.add_exclusion(&circle(5.0)).unwrap();
    assert_eq!(list.points().unwrap().len(), 1);

    assert!(list.remove_exclusion(&name));
    assert_eq!(list.points().unwrap().len(), 9);
    assert_eq!(list.mask().count_true(), 21 * 21);
}

#[test]
fn remove_with_unknown_name_is_a_no_op() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    assert!(!list.remove_exclusion("mask_ex99"));
    assert!(!list.remove_layer("point_layer99"));
    assert_eq!(list.points().unwrap().len(), 9);
}

#[test]
fn rebuild_is_idempotent() {
    let mut list = MotionList::new(xy_space());
    list.add_exclusion(&circle(5.0)).unwrap();
    list.add_exclusion(
        &ItemConfig::new("divider")
            .with("mb", serde_json::json!([0.0, 0.0]))
            .with("exclude", "-e1"),
    )
    .unwrap();

    list.rebuild();
    let first = list.mask().clone();
    list.rebuild();
    assert_eq!(list.mask(), &first);
}

#[test]
fn mask_is_the_and_of_all_contributions() {
    let mut list = MotionList::new(xy_space());
    list.add_exclusion(&circle(5.0)).unwrap();
    list.add_exclusion(
        &ItemConfig::new("divider")
            .with("mb", serde_json::json!([0.0, 0.0]))
            .with("exclude", "-e1"),
    )
    .unwrap();

    // (0, 3): inside the circle, above the line → allowed.
    assert!(!list.is_excluded(&[0.0, 3.0]).unwrap());
    // (0, -3): inside the circle but on the removed side of the line.
    assert!(list.is_excluded(&[0.0, -3.0]).unwrap());
    // (0, 8): above the line but outside the circle.
    assert!(list.is_excluded(&[0.0, 8.0]).unwrap());
}

#[test]
fn is_excluded_agrees_with_generation() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    list.add_layer(
        &ItemConfig::new("grid")
            .with("limits", serde_json::json!([[-4.0, 4.0], [-4.0, 4.0]]))
            .with("steps", 5),
    )
    .unwrap();
    list.add_exclusion(&circle(5.0)).unwrap();

    let points = list.points().unwrap().to_vec();
    assert!(!points.is_empty());
    for point in points {
        assert!(!list.is_excluded(&point).unwrap(), "point {point:?}");
    }
}

#[test]
fn is_excluded_checks_arity() {
    let mut list = MotionList::new(xy_space());
    assert_eq!(
        list.is_excluded(&[0.0]).unwrap_err(),
        MotionError::DimensionMismatch {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn failed_add_leaves_the_list_unchanged() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    let before = list.points().unwrap().to_vec();

    let bad_exclusion = ItemConfig::new("circle").with("radius", 5.0).with("exclude", "sideways");
    assert!(list.add_exclusion(&bad_exclusion).is_err());
    let bad_layer = ItemConfig::new("grid")
        .with("limits", serde_json::json!([[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]]))
        .with("steps", 2);
    assert!(list.add_layer(&bad_layer).is_err());

    assert_eq!(list.exclusion_names().count(), 0);
    assert_eq!(list.layer_names().count(), 1);
    assert_eq!(list.points().unwrap(), before.as_slice());
}

#[test]
fn config_round_trip_reproduces_the_sequence() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    list.add_layer(
        &ItemConfig::new("grid")
            .with("limits", serde_json::json!([[-4.0, 4.0], [-4.0, 4.0]]))
            .with("steps", 5),
    )
    .unwrap();
    list.add_exclusion(&circle(5.0)).unwrap();
    list.add_exclusion(
        &ItemConfig::new("divider")
            .with("mb", serde_json::json!([0.0, 0.0]))
            .with("exclude", "-e1"),
    )
    .unwrap();

    let config = list.config().unwrap();
    let mut rebuilt = MotionList::from_config(&config).unwrap();
    assert_eq!(rebuilt.points().unwrap(), list.points().unwrap());
    assert_eq!(rebuilt.config().unwrap(), config);
}

#[test]
fn config_survives_json_serialization() {
    let mut list = MotionList::new(xy_space());
    list.add_layer(&corner_grid()).unwrap();
    list.add_exclusion(
        &ItemConfig::new("divider")
            .with("mb", serde_json::json!(["inf", 2.0]))
            .with("exclude", "-e0"),
    )
    .unwrap();

    let text = serde_json::to_string(&list.config().unwrap()).unwrap();
    let config: MotionListConfig = serde_json::from_str(&text).unwrap();
    let mut rebuilt = MotionList::from_config(&config).unwrap();
    assert_eq!(rebuilt.points().unwrap(), list.points().unwrap());
}

#[test]
fn lapd_round_trip_over_the_preset_space() {
    let mut list = MotionList::new(MotionSpace::preset("lapd_xy").unwrap());
    list.add_layer(
        &ItemConfig::new("grid")
            .with("limits", serde_json::json!([[-50.0, 50.0], [-50.0, 50.0]]))
            .with("steps", 11),
    )
    .unwrap();
    list.add_exclusion(&ItemConfig::new("lapd")).unwrap();

    let points = list.points().unwrap().to_vec();
    assert!(!points.is_empty());
    assert!(points.len() < 121);

    let mut rebuilt = MotionList::from_config(&list.config().unwrap()).unwrap();
    assert_eq!(rebuilt.points().unwrap(), points.as_slice());
}

// A minimal custom exclusion exercising the registry extension point: it
// removes a single axis-0 grid column.
#[derive(Debug)]
struct ColumnExclusion {
    column: usize,
    mask: Mask,
}

impl Exclusion for ColumnExclusion {
    fn kind(&self) -> &str {
        "column"
    }

    fn mask(&self) -> &Mask {
        &self.mask
    }

    fn config(&self) -> crate::error::Result<ItemConfig> {
        Ok(ItemConfig::new("column").with("column", self.column))
    }
}

fn build_column(space: &MotionSpace, config: &ItemConfig) -> crate::error::Result<Box<dyn Exclusion>> {
    let column = config.params["column"]
        .as_u64()
        .ok_or_else(|| MotionError::validation("column exclusion", "'column' must be an index"))?
        as usize;
    let mut mask = Mask::filled(&space.shape(), true);
    for index in space.indices() {
        if index[0] == column {
            mask.set(&index, false);
        }
    }
    Ok(Box::new(ColumnExclusion { column, mask }))
}

#[test]
fn custom_variant_registers_and_round_trips() {
    let mut exclusion_registry = crate::exclusions::builtin_registry();
    exclusion_registry.register("column", build_column).unwrap();
    let layer_registry = crate::layers::builtin_registry();

    let mut list = MotionList::with_registries(
        xy_space(),
        exclusion_registry.clone(),
        layer_registry.clone(),
    );
    list.add_layer(&corner_grid()).unwrap();
    list.add_exclusion(&ItemConfig::new("column").with("column", 0)).unwrap();

    // Column 0 holds x = -10; those three candidates disappear.
    let points = list.points().unwrap().to_vec();
    assert_eq!(points.len(), 6);
    assert!(points.iter().all(|p| p[0] != -10.0));

    let config = list.config().unwrap();
    let mut rebuilt =
        MotionList::from_config_with(&config, exclusion_registry, layer_registry).unwrap();
    assert_eq!(rebuilt.points().unwrap(), points.as_slice());
}

#[test]
fn custom_tag_is_unknown_to_the_builtin_registry() {
    let mut list = MotionList::new(xy_space());
    let err = list
        .add_exclusion(&ItemConfig::new("column").with("column", 0))
        .unwrap_err();
    assert_eq!(
        err,
        MotionError::UnknownKind {
            registry: "exclusion",
            kind: "column".to_string(),
        }
    );
}

#[test]
fn names_are_assigned_in_insertion_order() {
    let mut list = MotionList::new(xy_space());
    assert_eq!(list.add_exclusion(&circle(5.0)).unwrap(), "mask_ex1");
    assert_eq!(list.add_exclusion(&circle(7.0)).unwrap(), "mask_ex2");
    assert_eq!(list.add_layer(&corner_grid()).unwrap(), "point_layer1");
    // Names are never recycled, even after a removal.
    assert!(list.remove_exclusion("mask_ex2"));
    assert_eq!(list.add_exclusion(&circle(7.0)).unwrap(), "mask_ex3");
}

#[test]
fn duplicate_registration_on_a_custom_registry_fails() {
    let mut registry: Registry<dyn Exclusion> = Registry::empty("exclusion");
    registry.register("column", build_column).unwrap();
    assert_eq!(
        registry.register("column", build_column).unwrap_err(),
        MotionError::DuplicateKind {
            registry: "exclusion",
            kind: "column".to_string(),
        }
    );
}
