use serde_json::Value;
use sprout_registry::{CatalogError, CatalogSet, EntityCatalog, FileEntitySource};
use sprout_types::EntityKind;

fn fixture_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/catalog_bundle.json")
}

fn load_fixture(kind: EntityKind) -> sprout_registry::CatalogLoad {
    let bundle: Value = serde_json::from_str(include_str!("data/catalog_bundle.json")).expect("parse fixture");
    let records = bundle[kind.bundle_key()].as_array().cloned().unwrap_or_default();
    EntityCatalog::load(kind, &records)
}

#[test]
fn nested_cultivars_load_with_one_reject() {
    let load = load_fixture(EntityKind::Cultivar);
    assert_eq!(load.catalog.len(), 3);
    assert_eq!(load.rejected_count(), 1);
    assert_eq!(
        load.rejected[0],
        CatalogError::MalformedEntity {
            kind: EntityKind::Cultivar,
            index: 3,
            field: "id".into()
        }
    );
}

#[test]
fn kale_search_finds_both_kales_in_file_order() {
    let load = load_fixture(EntityKind::Cultivar);
    let names: Vec<&str> = load.catalog.search("KALE").iter().map(|entity| entity.name.as_str()).collect();
    assert_eq!(names, vec!["Scarlet Kale", "Lacinato Kale"]);
}

#[test]
fn methods_carry_verbose_descriptions() {
    let load = load_fixture(EntityKind::CultivationMethod);
    let method = load.catalog.lookup("30cbbded-07a7-4c49-a47b-e34fc99eefd0").expect("method present");
    assert!(method.description.starts_with("A hydroponic cultivation method"));
}

#[tokio::test]
async fn catalog_set_initializes_from_file() {
    let source = FileEntitySource::new(fixture_path());
    let set = CatalogSet::initialize(&source).await.expect("initialize from file");
    assert_eq!(set.cultivars().len(), 3);
    assert_eq!(set.cultivation_methods().len(), 2);
    assert_eq!(set.rejected().len(), 1);
}
