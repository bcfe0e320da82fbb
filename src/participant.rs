use crate::events::ScheduledEvent;
use crate::scheduler::Scheduler;
use crate::{Error, SimTime};

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

/// Shared handle to a registered participant.
///
/// The application and the [`Scheduler`] share ownership of participants
/// through [`Rc`]; events refer back to their owner only through [`Weak`],
/// so dropping every application handle and removing the participant from
/// the scheduler is enough to destroy it along with its pending events.
pub type SimHandle = Rc<RefCell<dyn SimObject>>;

/// A participant's private collection of pending events.
///
/// Every simulated entity owns exactly one `Schedule`. It keeps the
/// participant's future events sorted by the scheduling order (time
/// ascending, creation order breaking ties) and knows which participant it
/// belongs to once that participant has been registered with a
/// [`Scheduler`] - scheduling before registration is rejected, since a new
/// event must reference its live owner.
#[derive(Debug, Default)]
pub struct Schedule {
    owner: Option<Weak<RefCell<dyn SimObject>>>,
    pending: BTreeSet<ScheduledEvent>,
}

impl Schedule {
    /// An empty, unattached schedule.
    pub fn new() -> Self {
        Schedule {
            owner: None,
            pending: BTreeSet::new(),
        }
    }

    /// Record which participant this schedule belongs to. Called by
    /// [`Scheduler::add_participant`] so that freshly scheduled events can
    /// carry the owner back-reference.
    pub(crate) fn attach(&mut self, owner: Weak<RefCell<dyn SimObject>>) {
        self.owner = Some(owner);
    }

    /// Construct a new event owned by this schedule's participant and add
    /// it to the pending collection, returning the event so the caller can
    /// hold onto it for later cancellation.
    ///
    /// Scheduling at or before the scheduler's current time is permitted:
    /// such an event fires on the very next advance without moving
    /// simulation time forward. Beware of reactions that unconditionally
    /// reschedule at the current time - that loop never lets the clock move
    /// again, and the engine does not detect it.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKind`] if `kind` is the empty string;
    /// [`Error::DetachedParticipant`] if this schedule has never been
    /// registered with a scheduler or its participant has been dropped.
    pub fn schedule_event(&mut self, time: SimTime, kind: &'static str) -> crate::Result<ScheduledEvent> {
        let owner = self.owner.clone().ok_or(Error::DetachedParticipant)?;
        let event = ScheduledEvent::new(time, kind, owner)?;
        self.pending.insert(event.clone());
        Ok(event)
    }

    /// Remove one event from the pending collection. Removing an event that
    /// is not pending - because it already fired, was already unscheduled,
    /// or is the empty event - is a no-op.
    pub fn unschedule(&mut self, event: &ScheduledEvent) {
        self.pending.remove(event);
    }

    /// Remove every pending event.
    pub fn unschedule_all(&mut self) {
        self.pending.clear();
    }

    /// Remove every pending event of the given kind.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKind`] if `kind` is the empty string.
    pub fn unschedule_kind(&mut self, kind: &str) -> crate::Result {
        if kind.is_empty() {
            return Err(Error::EmptyKind);
        }
        self.pending.retain(|event| event.kind() != kind);
        Ok(())
    }

    /// Remove every pending event scheduled strictly after `latest_to_keep`.
    pub fn unschedule_after(&mut self, latest_to_keep: SimTime) {
        self.pending.retain(|event| event.time() <= latest_to_keep);
    }

    /// Remove every pending event of the given kind scheduled strictly
    /// after `latest_to_keep`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKind`] if `kind` is the empty string.
    pub fn unschedule_kind_after(&mut self, kind: &str, latest_to_keep: SimTime) -> crate::Result {
        if kind.is_empty() {
            return Err(Error::EmptyKind);
        }
        self.pending
            .retain(|event| event.kind() != kind || event.time() <= latest_to_keep);
        Ok(())
    }

    /// The earliest pending event, or the empty event if none are pending.
    pub fn next_event(&self) -> ScheduledEvent {
        self.pending
            .iter()
            .next()
            .cloned()
            .unwrap_or_else(ScheduledEvent::empty)
    }

    /// The number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// The contract every simulated entity implements to participate in a
/// simulation.
///
/// A participant owns a [`Schedule`] of its own future events and reacts to
/// two notifications from the [`Scheduler`]: the passage of simulation time
/// ([`advance`]) and the firing of one of its own events ([`on_event`]).
/// The scheduler only ever holds participants behind this trait; concrete
/// entity types belong entirely to the application.
///
/// [`advance`]: SimObject::advance
/// [`on_event`]: SimObject::on_event
pub trait SimObject {
    /// Shared access to this participant's pending events. The scheduler
    /// polls `schedule().next_event()` when selecting the globally next
    /// event.
    fn schedule(&self) -> &Schedule;

    /// Exclusive access to this participant's pending events, for
    /// scheduling and cancellation.
    fn schedule_mut(&mut self) -> &mut Schedule;

    /// Notification that simulation time is about to move forward by
    /// `delta_secs` seconds (always positive). Called on every registered
    /// participant before each dispatch that moves the clock, including
    /// participants with nothing pending, so continuous-time state such as
    /// positions or accumulated quantities can be integrated.
    ///
    /// The order in which participants receive this notification within one
    /// advance step is explicitly unspecified; implementations must not
    /// rely on observing a peer's advance before or after their own. This
    /// hook must not dispatch events.
    fn advance(&mut self, delta_secs: f64);

    /// Reaction logic for one of this participant's events. Invoked by
    /// [`dispatch`] after the event has been removed from the pending
    /// collection. The reaction may schedule new events (on itself through
    /// [`schedule_mut`], or on peers it holds handles to), cancel pending
    /// events, and register or remove participants on the scheduler; a new
    /// event created here becomes eligible for selection on the *next*
    /// advance call, never the current one.
    ///
    /// # Errors
    ///
    /// Any error returned here propagates unchanged out of
    /// [`Scheduler::advance_to_next_event`], halting that call. Wrap
    /// application errors with [`Error::dispatch`].
    ///
    /// [`dispatch`]: SimObject::dispatch
    /// [`schedule_mut`]: SimObject::schedule_mut
    /// [`Scheduler::advance_to_next_event`]: crate::Scheduler::advance_to_next_event
    fn on_event(&mut self, event: &ScheduledEvent, scheduler: &mut Scheduler) -> crate::Result;

    /// Perform a fired event: unconditionally remove it from the pending
    /// collection (a no-op if it is not there), then run the reaction
    /// logic. Called by the scheduler; implementations should not override
    /// this.
    fn dispatch(&mut self, event: &ScheduledEvent, scheduler: &mut Scheduler) -> crate::Result {
        self.schedule_mut().unschedule(event);
        self.on_event(event, scheduler)
    }
}
