//! Shared message model for the ocgbridge adapter.
//!
//! Both codecs decode into, and encode from, the types defined here:
//! - [`MessageKind`], the discriminator of every engine message
//! - [`DecodedRequest`], the prompts that block the engine until answered
//! - [`Notification`], the state changes that need no answer
//! - [`Answer`], the caller's reply to exactly one request
//!
//! # Design Principles
//!
//! - **Closed unions** - Adding a message kind is a compile-time checked change.
//! - **Invalid answers are unrepresentable** - Every [`Answer`] can be encoded.
//! - **Immutable once decoded** - Types are plain data with no interior state.

mod answer;
mod kind;
pub mod location;
mod notification;
mod request;

pub use answer::{Answer, CardPosition, IdleAction, PhaseTransition, PlaceChoice};
pub use kind::{MessageKind, RequestKind};
pub use notification::{DrawnCard, Notification, Phase};
pub use request::{
    ActionableCard, CardLocation, CardSelectionRequest, ChainOption, ChainRequest,
    DecodedRequest, EffectYesNoRequest, IdleCommandRequest, OptionRequest, PlaceSelectionRequest,
    PositionSelectionRequest, SelectableCard, YesNoRequest,
};

/// Any message produced by one engine step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    Request(DecodedRequest),
    Notification(Notification),
}

impl Message {
    /// Returns the request if this message blocks the engine.
    #[must_use]
    pub const fn as_request(&self) -> Option<&DecodedRequest> {
        match self {
            Self::Request(request) => Some(request),
            Self::Notification(_) => None,
        }
    }

    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

impl From<DecodedRequest> for Message {
    fn from(request: DecodedRequest) -> Self {
        Self::Request(request)
    }
}

impl From<Notification> for Message {
    fn from(notification: Notification) -> Self {
        Self::Notification(notification)
    }
}
