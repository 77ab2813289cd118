//! `Notifier` port implementations.

pub mod outbox;
pub mod tracing_notifier;

pub use outbox::OutboxNotifier;
pub use tracing_notifier::TracingNotifier;
