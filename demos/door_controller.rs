//! Door Controller
//!
//! This example demonstrates remembered history: resume and restart.
//!
//! Key concepts:
//! - A region remembers the child it last had active
//! - Resume re-enters a region through that memory
//! - Restart forces the first declared child and rewrites the memory
//! - Enter/exit callbacks observe every activation change
//!
//! Run with: cargo run --example door_controller

use canopy::MachineBuilder;

fn main() {
    println!("=== Door Controller Example ===\n");

    let mut machine = MachineBuilder::with_context(Vec::<String>::new())
        .state("Maintenance")
        .region("Operating", |r| {
            r.state_with("Closed", |s| {
                s.on_enter(|log| log.push("door closed".to_string()))
                    .on_exit(|log| log.push("door leaving closed".to_string()));
            });
            r.state_with("Open", |s| {
                s.on_enter(|log| log.push("door open".to_string()));
            });
            r.state_with("Locked", |s| {
                s.on_enter(|log| log.push("door locked".to_string()));
            });
        })
        .build()
        .unwrap();

    println!("Initial state: {}", machine.active_leaf());

    machine.immediate_change_to("Locked").unwrap();
    println!("After change_to(Locked): {}", machine.active_leaf());

    // Maintenance interrupts; Operating remembers Locked
    machine.immediate_change_to("Maintenance").unwrap();
    println!("After change_to(Maintenance): {}", machine.active_leaf());
    println!("Locked is resumable: {}", machine.is_resumable("Locked"));

    // Resume honors the memory...
    machine.immediate_resume("Operating").unwrap();
    println!("After resume(Operating): {}", machine.active_leaf());

    // ...restart discards it
    machine.immediate_change_to("Maintenance").unwrap();
    machine.immediate_restart("Operating").unwrap();
    println!("After restart(Operating): {}", machine.active_leaf());

    println!("\nEnter/exit log:");
    for line in machine.context() {
        println!("  {line}");
    }

    println!("\n=== Example Complete ===");
}
