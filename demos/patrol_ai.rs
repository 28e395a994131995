//! Patrol AI
//!
//! This example demonstrates utility-driven and randomized selection.
//!
//! Key concepts:
//! - Regions entered without an explicit target pick a child themselves
//! - Utility callbacks score candidates against live game context
//! - Rank callbacks filter candidates before the weighted random draw
//! - A seeded PRNG makes randomized behavior reproducible
//!
//! Run with: cargo run --example patrol_ai

use canopy::MachineBuilder;

#[derive(Debug)]
struct Blackboard {
    health: f32,
    ammo: u32,
}

fn main() {
    println!("=== Patrol AI Example ===\n");

    let mut machine = MachineBuilder::with_context(Blackboard {
        health: 0.9,
        ammo: 12,
    })
    .seed(2024)
    .state("Idle")
    .region("Engage", |r| {
        r.state_with("Attack", |s| {
            s.rank(|control| if control.context().ammo > 0 { 1 } else { 0 })
                .utility(|control| control.context().health * 2.0);
        });
        r.state_with("Retreat", |s| {
            s.utility(|control| 1.0 - control.context().health);
        });
        r.state_with("TakeCover", |s| {
            s.rank(|_| 1).utility(|_| 0.5);
        });
    })
    .build()
    .unwrap();

    println!("Machine starts in: {}", machine.active_leaf());

    // Healthy and armed: utility selection favors Attack
    machine.immediate_utilize("Engage").unwrap();
    println!("utilize(Engage) while healthy -> {}", machine.active_leaf());

    // Wounded: Retreat's utility overtakes Attack's
    machine.context_mut().health = 0.2;
    machine.immediate_utilize("Engage").unwrap();
    println!("utilize(Engage) while wounded -> {}", machine.active_leaf());

    // Out of ammo: Attack drops to rank 0 and is filtered out of the
    // random draw entirely
    machine.context_mut().ammo = 0;
    machine.immediate_randomize("Engage").unwrap();
    println!(
        "randomize(Engage) with no ammo -> {} (never Attack)",
        machine.active_leaf()
    );

    println!("\n=== Example Complete ===");
}
