//! # Overview
//!
//! simsched is a lightweight engine for discrete-event simulations in which
//! every simulated entity keeps its own schedule. Rather than pushing all
//! events through one central queue, each participant owns a private sorted
//! collection of the events it will perform, and the [`Scheduler`] advances
//! the simulation by repeatedly polling every participant for its earliest
//! pending event, moving the logical clock to the globally soonest one, and
//! dispatching it to its owner:
//!
//! * A [`ScheduledEvent`] is an immutable record of one future occurrence -
//!   when it fires, what kind it is, and which participant performs it.
//!   Events carry process-unique ids so that simultaneous events always fire
//!   in creation order, making every run deterministic and reproducible.
//! * The [`SimObject`] trait is the participant contract: expose your
//!   earliest pending event, integrate elapsed simulation time, and react
//!   when one of your events fires. Reactions may schedule or cancel further
//!   events and may add or remove participants mid-simulation.
//! * The [`Scheduler`] owns the registered set and the clock. It has no
//!   internal run loop; the application drives it one event at a time with
//!   [`Scheduler::advance_to_next_event`], which makes it easy to interleave
//!   simulation progress with rendering, pacing, or other host concerns.
//!
//! Simulation time is logical - a real number of seconds since simulation
//! start - and is decoupled from the wall clock. A participant that wants
//! real-time pacing can sleep inside its own reaction; the engine neither
//! knows nor cares.
//!
//! # Example
//!
//! ```
//! use simsched::{Schedule, ScheduledEvent, Scheduler, SimObject, SimTime};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! struct Bell {
//!     schedule: Schedule,
//!     rings: u32,
//! }
//!
//! impl SimObject for Bell {
//!     fn schedule(&self) -> &Schedule {
//!         &self.schedule
//!     }
//!
//!     fn schedule_mut(&mut self) -> &mut Schedule {
//!         &mut self.schedule
//!     }
//!
//!     fn advance(&mut self, _delta_secs: f64) {}
//!
//!     fn on_event(&mut self, event: &ScheduledEvent, scheduler: &mut Scheduler) -> simsched::Result {
//!         if event.is_kind("ring")? {
//!             self.rings += 1;
//!             if self.rings < 3 {
//!                 self.schedule
//!                     .schedule_event(scheduler.current_time() + 60.0, "ring")?;
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> simsched::Result {
//!     let bell = Rc::new(RefCell::new(Bell {
//!         schedule: Schedule::new(),
//!         rings: 0,
//!     }));
//!
//!     let mut scheduler = Scheduler::new();
//!     scheduler.add_participant(bell.clone());
//!     bell.borrow_mut()
//!         .schedule_mut()
//!         .schedule_event(SimTime::from_secs(60.0), "ring")?;
//!
//!     while scheduler.advance_to_next_event()? {}
//!
//!     assert_eq!(bell.borrow().rings, 3);
//!     assert_eq!(scheduler.current_time(), SimTime::from_secs(180.0));
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The engine emits [`tracing`] events - registration changes at `debug`,
//! clock movement and dispatch at `trace`, tolerated inconsistencies at
//! `warn` - and installs no subscriber of its own.

mod error;
mod events;
mod participant;
mod scheduler;
mod time;

pub use error::{Error, Result};
pub use events::{EventId, ScheduledEvent};
pub use participant::{Schedule, SimHandle, SimObject};
pub use scheduler::Scheduler;
pub use time::SimTime;
