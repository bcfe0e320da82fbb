use crate::events::ScheduledEvent;
use crate::participant::SimHandle;
use crate::SimTime;

use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Coordinates all of the actions in a simulation.
///
/// A `Scheduler` owns the registered set of participants and the current
/// simulation time, which starts at zero and never moves backwards. It has
/// no run loop of its own: the application drives progress one event at a
/// time with [`advance_to_next_event`], typically as
///
/// ```ignore
/// while scheduler.advance_to_next_event()? {}
/// ```
///
/// which runs until every registered participant is out of pending events.
/// Reaching that point is not fatal - the application may register more
/// participants, seed more events, and resume driving.
///
/// Dispatch is cooperative and strictly serial: one event at a time,
/// executed to completion on the driving thread. Reaction code receives
/// `&mut Scheduler` and may add or remove participants mid-step, but must
/// not call [`advance_to_next_event`] re-entrantly.
///
/// [`advance_to_next_event`]: Scheduler::advance_to_next_event
#[derive(Default)]
pub struct Scheduler {
    participants: Vec<SimHandle>,
    current_time: SimTime,
}

impl Scheduler {
    /// Construct a scheduler with no participants and the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current simulation time, in seconds since simulation start.
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// The number of currently registered participants.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Register a participant with the simulation and attach its schedule,
    /// so the participant can begin scheduling events for itself.
    /// Registering a participant that is already present is a logged no-op.
    pub fn add_participant(&mut self, participant: SimHandle) {
        if self.participants.iter().any(|p| Rc::ptr_eq(p, &participant)) {
            warn!("participant is already registered; ignoring");
            return;
        }
        participant
            .borrow_mut()
            .schedule_mut()
            .attach(Rc::downgrade(&participant));
        self.participants.push(participant);
        debug!(participants = self.participants.len(), "registered participant");
    }

    /// Remove a participant from the simulation. The participant's pending
    /// events will no longer be considered for dispatch. Removing a
    /// participant that is not registered is a no-op. Safe to call from
    /// inside a reaction, including for the participant currently
    /// dispatching.
    pub fn remove_participant(&mut self, participant: &SimHandle) {
        let before = self.participants.len();
        self.participants.retain(|p| !Rc::ptr_eq(p, participant));
        if self.participants.len() < before {
            debug!(participants = self.participants.len(), "removed participant");
        }
    }

    /// Advance the simulation to the next scheduled event and perform it.
    ///
    /// One advance step:
    ///
    /// 1. Poll every registered participant for its earliest pending event
    ///    and select the global minimum by the scheduling order.
    /// 2. If every participant is idle, return `Ok(false)` with the clock
    ///    untouched - the simulation has no more work.
    /// 3. If the selected event lies in the future, notify every
    ///    participant of the elapsed time (in no particular order) and move
    ///    the clock to the event's time. An event at the current instant
    ///    skips the notifications; the clock does not move.
    /// 4. Dispatch the event to its owning participant: remove it from the
    ///    owner's schedule, then run the owner's reaction.
    ///
    /// The participant set is snapshotted at the start of each step, so
    /// reactions may freely add or remove participants: removals take
    /// effect for the *next* step's polling, as do any events a reaction
    /// schedules - even ones scheduled for the current instant.
    ///
    /// # Errors
    ///
    /// Forwards whatever a participant's reaction returns, unchanged.
    /// Engine state remains consistent (the clock has already advanced and
    /// the failed event is no longer pending), so after handling the error
    /// the caller may resume driving.
    pub fn advance_to_next_event(&mut self) -> crate::Result<bool> {
        // Fixed copy for this step; reactions mutate the live set only.
        let snapshot: Vec<SimHandle> = self.participants.clone();

        let mut selected: Option<(ScheduledEvent, SimHandle)> = None;
        for participant in &snapshot {
            let candidate = participant.borrow().schedule().next_event();
            if candidate.is_empty() {
                continue;
            }
            let is_closer = match &selected {
                Some((best, _)) => candidate < *best,
                None => true,
            };
            if is_closer {
                selected = Some((candidate, Rc::clone(participant)));
            }
        }

        let Some((event, owner)) = selected else {
            trace!(time = %self.current_time, "no pending events");
            return Ok(false);
        };

        let delta = event.time().seconds_since(self.current_time);
        if delta > 0.0 {
            for participant in &snapshot {
                participant.borrow_mut().advance(delta);
            }
            self.current_time = event.time();
            trace!(time = %self.current_time, delta, "advanced simulation clock");
        } else if delta < 0.0 {
            // Past-scheduled events are permitted and fire immediately; the
            // clock never rewinds.
            warn!(%event, time = %self.current_time, "dispatching past-scheduled event");
        }

        trace!(%event, "dispatching");
        owner.borrow_mut().dispatch(&event, self)?;
        Ok(true)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("participants", &self.participants.len())
            .field("current_time", &self.current_time)
            .finish()
    }
}

impl std::fmt::Display for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scheduler with {} participants at current time {}",
            self.participants.len(),
            self.current_time
        )
    }
}
