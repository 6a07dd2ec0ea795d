//! Error kinds raised by provider construction.

/// Errors raised while building a provider.
///
/// Failures produced by a delegate are never wrapped in this type; fallible providers hand
/// them out unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValueError {
   /// A failure-replaying provider was requested without a failure to replay.
   #[error("supplied failure instance is absent")]
   MissingFailure,
}
