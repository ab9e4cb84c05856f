//! Binding regimes for curried wrappers.
//!
//! Every wrapper family runs under exactly one regime: no receiver, a fixed
//! receiver, or a receiver that is pending until the first call-site supplies
//! one. A pending wrapper never captures a receiver itself; each invocation
//! with a receiver derives wrappers that are bound to that receiver from then
//! on, exactly like wrappers built with an explicit binding.

use std::fmt;

use crate::error::{CurryError, CurryResult};
use crate::receiver::Receiver;

/// The observable binding regime of a curried wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextMode {
    /// The target runs without a receiver; call-site receivers are discarded.
    Null,
    /// The target always runs against this object.
    Bound(Receiver),
    /// The receiver is taken from the call-site of the first real invocation.
    Pending,
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextMode::Null => write!(f, "null context"),
            ContextMode::Bound(_) => write!(f, "bound object"),
            ContextMode::Pending => write!(f, "object-pending context"),
        }
    }
}

impl ContextMode {
    pub fn is_pending(&self) -> bool {
        matches!(self, ContextMode::Pending)
    }

    /// Resolves the receiver a call runs against, returning the regime that
    /// wrappers derived from this call must carry.
    ///
    /// Resolution never mutates `self`: a pending regime stays pending, and
    /// every call through it yields its own bound regime.
    pub(crate) fn resolve(
        &self,
        call_site: Option<&Receiver>,
    ) -> CurryResult<(ContextMode, Option<Receiver>)> {
        match self {
            ContextMode::Null => Ok((ContextMode::Null, None)),
            ContextMode::Bound(receiver) => Ok((self.clone(), Some(receiver.clone()))),
            ContextMode::Pending => {
                let receiver = call_site.ok_or(CurryError::UnestablishedContext)?;
                log::debug!("capturing receiver for object-curried chain");
                Ok((ContextMode::Bound(receiver.clone()), Some(receiver.clone())))
            }
        }
    }
}

/// Fails when a callable tagged with `existing` is wrapped under `requested`.
pub(crate) fn ensure_compatible(existing: &ContextMode, requested: &ContextMode) -> CurryResult<()> {
    if existing == requested {
        Ok(())
    } else {
        Err(CurryError::ContextMismatch {
            existing: existing.to_string(),
            found: requested.to_string(),
        })
    }
}
