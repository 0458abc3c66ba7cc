//! Ownership policy deciding whether a principal may act on a record.
//!
//! Reads are open to everyone. Writes need an authenticated principal, and
//! writes against an existing record additionally need that principal to be
//! the record's owning author.

use super::author::AuthorId;
use super::Error;

/// Identity attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    Authenticated(AuthorId),
}

impl Principal {
    /// Author behind the request, when authenticated.
    pub fn author_id(self) -> Option<AuthorId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(id),
        }
    }

    /// Author behind the request or an `unauthorized` error.
    pub fn require_author(self) -> Result<AuthorId, Error> {
        self.author_id()
            .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))
    }
}

/// Kind of operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Create,
    Update,
    Delete,
}

impl Access {
    /// Whether the operation leaves the store untouched.
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Read)
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    Unauthenticated,
    NotOwner,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenialReason),
}

impl Decision {
    /// Convert a denial into the matching domain error.
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(DenialReason::Unauthenticated) => Err(Error::unauthorized(
                "authentication credentials were not provided",
            )),
            Self::Deny(DenialReason::NotOwner) => Err(Error::forbidden(
                "you do not have permission to perform this action",
            )),
        }
    }
}

/// Records with a single immutable owning author.
pub trait Owned {
    fn owner(&self) -> AuthorId;
}

/// Authorisation decision function.
pub trait AccessPolicy: Send + Sync {
    /// Decide whether `principal` may perform `access`.
    ///
    /// `target_owner` is `None` when no record exists yet (creation).
    fn decide(
        &self,
        principal: Principal,
        access: Access,
        target_owner: Option<AuthorId>,
    ) -> Decision;

    /// Decide against an existing record.
    fn decide_on(&self, principal: Principal, access: Access, target: &dyn Owned) -> Decision {
        self.decide(principal, access, Some(target.owner()))
    }
}

/// Authenticated-or-read-only, with owner-only writes on existing records.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrReadOnly;

impl AccessPolicy for OwnerOrReadOnly {
    fn decide(
        &self,
        principal: Principal,
        access: Access,
        target_owner: Option<AuthorId>,
    ) -> Decision {
        if access.is_read_only() {
            return Decision::Allow;
        }
        let Some(author) = principal.author_id() else {
            return Decision::Deny(DenialReason::Unauthenticated);
        };
        match (access, target_owner) {
            (Access::Create, _) | (_, None) => Decision::Allow,
            (_, Some(owner)) if owner == author => Decision::Allow,
            _ => Decision::Deny(DenialReason::NotOwner),
        }
    }
}
