/// Errors that may be encountered while building or driving a simulation.
///
/// The argument variants ([`EmptyKind`] and [`DetachedParticipant`]) are
/// reported synchronously at the offending call site and are always
/// recoverable: fix the arguments and retry.
///
/// The [`Dispatch`] variant originates from participant reaction code,
/// providing a wrapper that can pass through
/// [`Scheduler::advance_to_next_event()`] in a type-safe manner. The engine
/// never catches or suppresses a participant-raised failure; it halts the
/// current advance call and hands the error to the driver loop.
///
/// [`EmptyKind`]: Error::EmptyKind
/// [`DetachedParticipant`]: Error::DetachedParticipant
/// [`Dispatch`]: Error::Dispatch
/// [`Scheduler::advance_to_next_event()`]: crate::Scheduler::advance_to_next_event
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An event kind must be a non-empty type tag.
    #[error("event kind must be a non-empty string")]
    EmptyKind,

    /// An event was scheduled through a [`Schedule`] that has never been
    /// attached to a [`Scheduler`], or whose owning participant has been
    /// dropped. Register the participant first.
    ///
    /// [`Schedule`]: crate::Schedule
    /// [`Scheduler`]: crate::Scheduler
    #[error("participant is not registered with a scheduler")]
    DetachedParticipant,

    /// A participant's reaction code failed while dispatching an event.
    /// Unpack this value or call [`source()`] to handle the underlying
    /// error directly.
    ///
    /// [`source()`]: std::error::Error::source
    #[error("error while dispatching event: {0}")]
    Dispatch(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wrap an application-level failure so a reaction can return it from
    /// [`SimObject::on_event()`].
    ///
    /// [`SimObject::on_event()`]: crate::SimObject::on_event
    pub fn dispatch<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Dispatch(Box::new(source))
    }
}

/// [`std::result::Result`] specialized to [`enum@Error`], defaulting the
/// success type to `()` to keep reaction-hook signatures short.
pub type Result<T = ()> = std::result::Result<T, Error>;
