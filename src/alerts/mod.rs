//! Failure reporting and the audible alert
//!
//! Status lines go through the [`Notifier`]. When the check batch fails, the
//! [`AlertDispatcher`] serves an audio file from this device and asks a
//! network speaker to play it.

pub mod dispatcher;
pub mod media_server;
pub mod notifier;
pub mod speaker;

pub use dispatcher::{AlertDispatcher, AlertError, AlertSettings};
pub use media_server::{MediaServer, ServerError};
pub use notifier::Notifier;
pub use speaker::{CastSpeaker, Speaker, SpeakerError};
