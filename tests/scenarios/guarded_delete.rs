//! Scenario: Retiring a manufacturer
//!
//! Journey: An operator removes a manufacturer that still has stock.
//!
//! Steps:
//! 1. Tries to delete the manufacturer and is refused
//! 2. Previews the delete to see what blocks it
//! 3. Deletes the blocking records bottom-up
//! 4. Deletes the manufacturer
//!
//! Success Criteria:
//! - Refusals name every dependent and change nothing
//! - A deleted record is reported as not found afterwards

use crate::common::*;

#[test]
fn scenario_delete_is_blocked_until_dependents_are_gone() {
    let env = TestEnv::new();
    let ford = env
        .run(&["manufacturer", "create", "-f", "name=Ford"])
        .created_id();
    let manufacturer_field = format!("manufacturer={}", ford);
    let focus = env
        .run(&["vehicle", "create", "-f", "model=Focus", "-f", manufacturer_field.as_str()])
        .created_id();
    let vehicle_field = format!("vehicle={}", focus);
    let instance = env
        .run(&["instance", "create", "-f", vehicle_field.as_str()])
        .created_id();

    // Step 1
    let refused = env.run(&["manufacturer", "delete", ford.as_str()]);
    assert!(!refused.success);
    assert_eq!(refused.exit_code, 1);
    let report = refused.json();
    assert_eq!(report["error"], "integrity_violation");
    assert_eq!(report["dependents"]["kind"], "vehicles");
    assert_eq!(report["dependents"]["records"][0]["id"], focus.as_str());

    // Step 2
    let preview = env
        .run(&["vehicle", "delete", focus.as_str(), "--preview"])
        .json();
    assert_eq!(preview["deletable"], false);
    assert_eq!(preview["record"]["kind"], "vehicle");
    assert_eq!(preview["dependents"]["kind"], "instances");

    // Step 3
    let gone = env.run(&["instance", "delete", instance.as_str()]);
    assert!(gone.success, "Output:\n{}", gone.combined_output());
    assert_eq!(gone.json()["action"], "deleted");
    assert!(env.run(&["vehicle", "delete", focus.as_str()]).success);

    // Step 4
    assert!(env.run(&["manufacturer", "delete", ford.as_str()]).success);
    let missing = env.run(&["manufacturer", "show", ford.as_str()]);
    assert_eq!(missing.exit_code, 2);
    assert!(missing.stderr.contains("not found"));
}

/// SCENARIO: a vehicle type still assigned to a vehicle cannot be deleted
#[test]
fn scenario_assigned_vehicle_type_is_protected() {
    let env = TestEnv::new();
    let kia = env
        .run(&["manufacturer", "create", "-f", "name=Kia"])
        .created_id();
    let van = env
        .run(&["vehicle-type", "create", "-f", "name=Van"])
        .created_id();
    let manufacturer_field = format!("manufacturer={}", kia);
    let type_field = format!("vehicleType={}", van);
    env.run(&[
        "vehicle",
        "create",
        "-f",
        "model=Carnival",
        "-f",
        manufacturer_field.as_str(),
        "-f",
        type_field.as_str(),
    ])
    .created_id();

    let refused = env.run(&["vehicle-type", "delete", van.as_str()]);
    assert_eq!(refused.exit_code, 1);
    assert_eq!(refused.json()["kind"], "vehicle_type");

    let still_there = env.run(&["vehicle-type", "show", van.as_str()]);
    assert!(still_there.success);
}
