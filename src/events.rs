use crate::participant::{SimHandle, SimObject};
use crate::{Error, SimTime};

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Weak;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Process-wide event-id allocator. Atomic so that participants constructed
/// on other threads may still mint ids safely; all other engine state is
/// owned by the single driving thread. Isolated behind [`next_event_id`] to
/// keep this the crate's only global.
static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(0);

fn next_event_id() -> EventId {
    EventId(NEXT_EVENT_ID.fetch_add(1, AtomicOrdering::Relaxed) + 1)
}

/// A unique identifier for a scheduled event.
///
/// Ids ascend in creation order across the whole process, which is what
/// breaks ties between events scheduled for the same instant: simultaneous
/// events fire in the order they were created, giving every run a
/// deterministic, reproducible sequence. The value `0` is reserved for the
/// [empty event].
///
/// [empty event]: ScheduledEvent::empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u64);

impl EventId {
    /// The reserved id of the empty event.
    pub const EMPTY: EventId = EventId(0);

    /// The raw id value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An event that is to be performed by a participant at a particular time in
/// the simulation.
///
/// A `ScheduledEvent` is an immutable value: once constructed, its id, time,
/// kind, and owner never change. Identity (and therefore equality) is the id
/// alone; a clone of an event *is* that event for the purposes of
/// [`Schedule::unschedule`].
///
/// The distinguished empty event, obtained from [`empty()`], marks the
/// absence of any pending work. It sorts after every non-empty event, so a
/// fully idle simulation naturally selects it as the "next" event, and a
/// [`Scheduler`] treats that selection as the end of the run.
///
/// Events hold only a [`Weak`] handle to their owner. An event never keeps a
/// participant alive; participant lifetime belongs to the application and
/// the registration set.
///
/// [`empty()`]: ScheduledEvent::empty
/// [`Schedule::unschedule`]: crate::Schedule::unschedule
/// [`Scheduler`]: crate::Scheduler
#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    id: EventId,
    time: SimTime,
    kind: &'static str,
    owner: Option<Weak<RefCell<dyn SimObject>>>,
}

impl ScheduledEvent {
    /// The empty event. Compares greater than every non-empty event and
    /// equal to any other empty event; its time and kind are meaningless.
    pub fn empty() -> Self {
        ScheduledEvent {
            id: EventId::EMPTY,
            time: SimTime::ZERO,
            kind: "",
            owner: None,
        }
    }

    /// Construct a new non-empty event, minting the next global id.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKind`] if `kind` is the empty string, and
    /// [`Error::DetachedParticipant`] if `owner` no longer points at a live
    /// participant.
    pub(crate) fn new(
        time: SimTime,
        kind: &'static str,
        owner: Weak<RefCell<dyn SimObject>>,
    ) -> crate::Result<Self> {
        if kind.is_empty() {
            return Err(Error::EmptyKind);
        }
        if owner.upgrade().is_none() {
            return Err(Error::DetachedParticipant);
        }
        Ok(ScheduledEvent {
            id: next_event_id(),
            time,
            kind,
            owner: Some(owner),
        })
    }

    /// Whether this is the empty event.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == EventId::EMPTY
    }

    /// Whether this is a non-empty event of the given kind.
    ///
    /// The empty event is of no kind at all, so this returns `Ok(false)`
    /// for it regardless of `kind`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKind`] if `kind` is the empty string.
    pub fn is_kind(&self, kind: &str) -> crate::Result<bool> {
        if kind.is_empty() {
            return Err(Error::EmptyKind);
        }
        Ok(!self.is_empty() && self.kind == kind)
    }

    /// This event's unique id.
    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// The instant at which the event is to fire. Meaningless for the empty
    /// event.
    #[inline]
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// The kind tag this event was scheduled with. Empty string for the
    /// empty event.
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The participant that will perform this event, if it is still alive.
    /// Always `None` for the empty event.
    pub fn owner(&self) -> Option<SimHandle> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    /// The scheduling-selection order: the empty event sorts after every
    /// non-empty event; non-empty events ascend by time, then by id, so
    /// simultaneous events fire in creation order.
    fn cmp(&self, other: &Self) -> Ordering {
        if self.id == other.id {
            // Ids are allocator-unique, so equal ids with differing times
            // mean an engine or contract bug, never valid input.
            debug_assert_eq!(
                self.time, other.time,
                "two events share id {} but disagree on time",
                self.id
            );
            if self.time != other.time {
                tracing::error!(id = %self.id, "events share an id but disagree on time");
            }
            return Ordering::Equal;
        }
        match (self.is_empty(), other.is_empty()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => self.time.cmp(&other.time).then(self.id.cmp(&other.id)),
        }
    }
}

impl std::fmt::Display for ScheduledEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "empty event")
        } else {
            write!(f, "event {} \"{}\" at {}", self.id, self.kind, self.time)
        }
    }
}
