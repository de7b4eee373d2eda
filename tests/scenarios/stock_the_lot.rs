//! Scenario: Stocking a new lot
//!
//! Journey: An operator sets up the catalog from nothing.
//!
//! Steps:
//! 1. Creates a manufacturer, twice by accident
//! 2. Creates two vehicle types and a vehicle that belongs to both
//! 3. Adds two rentable instances
//! 4. Reviews the vehicle, the listings and the summary
//!
//! Success Criteria:
//! - The duplicate manufacturer is handed back, not stored again
//! - Detail views carry the related records with their reference paths

use crate::common::*;

#[test]
fn scenario_stock_the_lot_from_empty() {
    let env = TestEnv::new();

    // Step 1: the second create returns the first record
    let first = env.run(&["manufacturer", "create", "-f", "name=Ford", "-f", "country=USA"]);
    let ford = first.created_id();
    assert_eq!(first.json()["action"], "created");

    let again = env.run(&["manufacturer", "create", "-f", "name=  Ford "]);
    assert!(again.success, "Output:\n{}", again.combined_output());
    assert_eq!(again.json()["action"], "existing");
    assert_eq!(again.json()["id"], ford.as_str());

    // Step 2
    let suv = env
        .run(&["vehicle-type", "create", "-f", "name=SUV"])
        .created_id();
    let family = env
        .run(&["vehicle-type", "create", "-f", "name=Family"])
        .created_id();
    let manufacturer_field = format!("manufacturer={}", ford);
    let suv_field = format!("vehicle_types={}", suv);
    let family_field = format!("vehicle_types={}", family);
    let explorer = env
        .run(&[
            "vehicle",
            "create",
            "-f",
            "model=Explorer",
            "-f",
            manufacturer_field.as_str(),
            "-f",
            suv_field.as_str(),
            "-f",
            family_field.as_str(),
            "-f",
            "price=120.5",
        ])
        .created_id();

    // Step 3
    let vehicle_field = format!("vehicle={}", explorer);
    env.run(&[
        "instance",
        "create",
        "-f",
        vehicle_field.as_str(),
        "-f",
        "status=Available",
        "-f",
        "dueBack=2026-10-14",
    ])
    .created_id();
    env.run(&["instance", "create", "-f", vehicle_field.as_str()])
        .created_id();

    // Step 4
    let detail = env.run(&["vehicle", "show", explorer.as_str()]).json();
    assert_eq!(detail["vehicle"]["model"], "Explorer");
    assert_eq!(detail["vehicle"]["manufacturer"]["name"], "Ford");
    assert_eq!(
        detail["vehicle"]["manufacturer"]["url"],
        format!("/manufacturer/{}", ford)
    );
    assert_eq!(detail["vehicle"]["vehicle_types"].as_array().unwrap().len(), 2);
    assert_eq!(detail["instances"].as_array().unwrap().len(), 2);

    let types = env.run(&["vehicle-type", "list"]).json();
    let names: Vec<&str> = types
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Family", "SUV"]);

    let instances = env.run(&["instance", "list", "--status", "Available"]).json();
    assert_eq!(instances.as_array().unwrap().len(), 1);
    assert_eq!(instances[0]["due_back_formatted"], "October 14th, 2026");

    let summary = env.run(&["summary"]).json();
    assert_eq!(summary["manufacturers"], 1);
    assert_eq!(summary["vehicle_types"], 2);
    assert_eq!(summary["vehicles"], 1);
    assert_eq!(summary["instances"], 2);
    assert_eq!(summary["available_instances"], 1);
}

/// SCENARIO: the catalog survives between runs in the data directory
#[test]
fn scenario_records_persist_across_runs() {
    let env = TestEnv::new();
    let id = env
        .run(&["manufacturer", "create", "-f", "name=Audi"])
        .created_id();

    assert!(env.data_dir().join("manufacturers.json").exists());

    let detail = env.run(&["manufacturer", "show", id.as_str()]).json();
    assert_eq!(detail["manufacturer"]["name"], "Audi");
}

/// SCENARIO: the memory backend from config keeps nothing on disk
#[test]
fn scenario_memory_backend_from_config() {
    let env = TestEnv::new();
    env.write_config("[store]\nbackend = \"memory\"\n");

    env.run(&["manufacturer", "create", "-f", "name=Audi"])
        .created_id();
    let list = env.run(&["manufacturer", "list"]).json();
    assert!(list.as_array().unwrap().is_empty());
    assert!(!env.data_dir().join("manufacturers.json").exists());
}
