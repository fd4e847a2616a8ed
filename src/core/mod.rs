//=========================================================================
// Core Primitives
//=========================================================================
//
// The reusable machinery every other layer is built from.
//
// Architecture:
//   signal — multicast, priority-ordered publish/subscribe channel
//   fsm    — single-active-state machine sequenced through a Signal
//   input  — signal-driven input fan-out built on both
//
// Everything here runs on a single logical thread and performs no I/O;
// the host supplies the tick (see `Director::advance`).
//
//=========================================================================

//=== Module Declarations =================================================

pub mod fsm;
pub mod input;
pub mod signal;
