use std::path::PathBuf;

use serde_json::{Value, json};
use sprout_engine::{
    BuildError, FormSchema, JsonWriterSubmission, RecipeSession, StaleSelection, Submission, load_draft_from_file,
};
use sprout_registry::{CatalogSet, EntityCatalog, StaticEntitySource};
use sprout_types::{DuplicatePolicy, Entity, EntityKind};

const SCARLET: &str = "d6d76ff9-b12e-47bb-8e83-f872c7870856";
const BASIL: &str = "5a0c7e0e-6d0f-4c43-9a3e-2d0f3f1c9b11";
const LACINATO: &str = "b3f0e7a2-1c55-4f0c-8c1c-9f5bd2a1e4c7";

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

async fn catalogs() -> CatalogSet {
    let bundle: Value = serde_json::from_str(include_str!("data/catalog_bundle.json")).expect("parse fixture");
    let source = StaticEntitySource::from_bundle(&bundle).expect("bundle shape");
    CatalogSet::initialize(&source).await.expect("catalogs load")
}

#[tokio::test]
async fn draft_builds_the_expected_document() {
    let catalogs = catalogs().await;
    let mut session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
    let draft = load_draft_from_file(data_path("kale_sprint.yaml")).expect("draft loads");

    let report = session.apply_draft(&draft);
    assert!(report.is_clean(), "unexpected draft problems: {:?}", report.problems);

    let assembled = session.build_document().expect("document builds");
    assert!(assembled.issues.is_empty());

    let document = serde_json::to_value(&assembled.document).unwrap();
    assert_eq!(document["name"], json!("Kale Sprint"));
    assert_eq!(document["description"]["brief"], json!("Fast kale"));
    assert_eq!(document["cultivars"][0]["id"], json!(SCARLET));
    assert_eq!(document["cultivars"][0]["average_duration_days"], json!(60));
    assert_eq!(document["cultivationMethods"][0]["name"], json!("Shallow Water Culture"));
    assert_eq!(
        document["environments"],
        json!([{
            "name": "Tent1",
            "light_spectrum_taurus": "[10, 20, 30]",
            "light_intensity_par": 400,
            "air_temperature_celsius": 22
        }])
    );
    assert_eq!(
        document["phases"],
        json!([{
            "name": "Veg",
            "repeat": "3",
            "cycles": [
                {"name": "Light", "environment": "Tent1", "duration_hours": 12},
                {"name": "Dark", "environment": "Tent1", "duration_hours": 12}
            ]
        }])
    );
}

#[tokio::test]
async fn add_remove_sequence_serializes_in_display_order() {
    let catalogs = catalogs().await;
    let mut session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
    let picker = session.picker_mut(EntityKind::Cultivar);

    let first = picker.on_add(LACINATO).unwrap();
    picker.on_add(BASIL);
    let third = picker.on_add(SCARLET).unwrap();
    picker.on_add(LACINATO);
    assert!(picker.on_remove(first));
    assert!(picker.on_remove(third));
    assert!(!picker.on_remove(third));

    let ids: Vec<String> = picker.serialize().unwrap().into_iter().map(|entity| entity.id).collect();
    assert_eq!(ids, vec![BASIL, LACINATO]);
}

#[tokio::test]
async fn search_then_add_through_result_rows() {
    let catalogs = catalogs().await;
    let mut session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
    let picker = session.picker_mut(EntityKind::Cultivar);

    picker.on_search_input("kale");
    let rows: Vec<String> = picker.results().iter().map(|row| row.id.clone()).collect();
    assert_eq!(rows, vec![SCARLET, LACINATO]);

    assert!(picker.on_result_selected(&rows[1]));
    assert_eq!(picker.detail().unwrap().field("name"), Some(&json!("Lacinato Kale")));
    picker.on_add(&rows[1]);

    let document = session.build_document().unwrap().document;
    assert_eq!(document.cultivars[0].name, "Lacinato Kale");
}

#[tokio::test]
async fn reloading_without_a_selected_entity_is_a_stale_selection() {
    let catalogs = catalogs().await;
    let mut session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
    session.cultivars.on_add(BASIL);

    let without_basil = CatalogSet::from_catalogs(
        catalogs.cultivars().filtered(|entity| entity.id != BASIL),
        EntityCatalog::clone(&catalogs.cultivation_methods()),
    );
    session.reload(&without_basil);

    assert_eq!(
        session.build_document(),
        Err(BuildError::StaleSelection(StaleSelection {
            kind: EntityKind::Cultivar,
            id: BASIL.into()
        }))
    );
}

#[tokio::test]
async fn bad_numbers_are_issues_and_still_submit() {
    let catalogs = catalogs().await;
    let mut session = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
    let tent = session.form.add_environment();
    let environment = session.form.environment_mut(tent).unwrap();
    environment.set("name", "Tent1").unwrap();
    environment.set("light_intensity_par", "bright").unwrap();
    environment.set("air_temperature_celsius", "22").unwrap();

    let assembled = session.build_document().unwrap();
    assert_eq!(assembled.issues.len(), 1);
    assert_eq!(assembled.issues[0].path.as_str(), "environments[0].light_intensity_par");

    let mut submission = JsonWriterSubmission::new(Vec::new());
    submission.submit(&assembled.document).unwrap();
    let written: Value = serde_json::from_slice(&submission.into_inner()).unwrap();
    assert_eq!(written["environments"][0]["light_intensity_par"], Value::Null);
}

#[test]
fn catalogs_are_shared_between_sessions() {
    let catalogs = CatalogSet::from_catalogs(
        EntityCatalog::from_entities(EntityKind::Cultivar, [Entity::new("u1", "Kale", "")]),
        EntityCatalog::from_entities(EntityKind::CultivationMethod, Vec::<Entity>::new()),
    );
    let first = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Allow);
    let second = RecipeSession::new(&catalogs, FormSchema::default(), DuplicatePolicy::Reject);
    assert!(std::ptr::eq(first.cultivars.catalog(), second.cultivars.catalog()));
    assert!(!std::ptr::eq(first.cultivars.catalog(), first.cultivation_methods.catalog()));
}
