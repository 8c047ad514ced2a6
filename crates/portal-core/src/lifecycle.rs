//! Session lifecycle hooks.

/// Observer notified by the session manager.
///
/// This is how telemetry learns about logins without the session manager
/// knowing anything about telemetry state.
pub trait SessionObserver: Send + Sync {
    /// A login or registration succeeded.
    fn session_started(&self);

    /// The session was cleared by logout or invalidation.
    fn session_ended(&self);

    /// One outbound remote call is about to be made.
    fn remote_call(&self) {}
}
