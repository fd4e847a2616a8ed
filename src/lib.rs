//=========================================================================
// Stagecue — Library Root
//
// This crate defines the public API surface of stagecue.
//
// Responsibilities:
// - Expose the core primitives (`Signal`, `Fsm`) and the `Director`
//   facade that sequences states with them
// - Keep the coordinator module private while re-exporting its types
// - Provide clean separation between the generic event/state machinery
//   and whatever host drives it (render loop, test harness, ...)
//
// Typical usage:
// ```no_run
// use stagecue::prelude::*;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum Stage { Boot }
// impl StateKey for Stage {}
//
// struct BootStage;
// impl State<Stage> for BootStage {
//     fn update(&mut self, _ctx: &FsmContext<Stage>, _dt: f32) {}
// }
//
// fn main() {
//     let mut director = DirectorBuilder::new()
//         .with_state(Stage::Boot, BootStage)
//         .build();
//     director.start(Stage::Boot, None).expect("Boot is registered");
//     director.advance(1.0 / 60.0);
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the reusable primitives: the signal bus, the state
// machine, and the signal-driven input hub. It is exposed publicly so
// hosts can use `Signal` standalone (resize notifications, progress
// percentages, ...) without going through the `Director`.
//
pub mod core;

//--- Internal Modules ----------------------------------------------------
//
// `director` defines the driver facade that owns a state machine and
// honors its transition requests at frame boundaries. The module is
// private; its types are re-exported below.
//
mod director;

//--- Public Exports ------------------------------------------------------

pub mod prelude;

pub use director::{Director, DirectorBuilder};
