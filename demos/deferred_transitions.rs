//! Deferred Transitions
//!
//! This example demonstrates the update loop and internal transitions.
//!
//! Key concepts:
//! - Update callbacks run once per step for every active node
//! - Transitions requested from a callback are deferred to end of step
//! - Deferred requests apply in submission order
//! - External code can queue transitions for the next step too
//!
//! Run with: cargo run --example deferred_transitions

use canopy::MachineBuilder;

fn main() {
    println!("=== Deferred Transitions Example ===\n");

    let mut machine = MachineBuilder::new()
        .state_with("Boot", |s| {
            s.on_update(|control| {
                // an internal transition: takes effect after the step
                control.change_to("Load");
            });
        })
        .state_with("Load", |s| {
            s.on_update(|control| control.change_to("Run"));
        })
        .state("Run")
        .build()
        .unwrap();

    println!("Step 0: {}", machine.active_leaf());

    machine.update().unwrap();
    println!("Step 1: {}", machine.active_leaf());

    machine.update().unwrap();
    println!("Step 2: {}", machine.active_leaf());

    // an externally queued request waits for the next update
    machine.change_to("Boot");
    println!("After queueing change_to(Boot): {}", machine.active_leaf());
    machine.update().unwrap();
    println!("After update: {}", machine.active_leaf());

    println!("\n=== Example Complete ===");
}
