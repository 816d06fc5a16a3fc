//! Error types for the lifeline core library.
//!
//! Every fallible operation returns [`NetworkError`]. Unreachable routes and
//! partially satisfied path requests are ordinary results, not errors.

use std::fmt;

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error produced while building, mutating, or querying a road network.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetworkError {
    /// An edge was a self-loop or referenced a node that does not exist.
    #[error("invalid road {left}-{right}: {reason}")]
    InvalidEdge {
        /// First endpoint as supplied.
        left: NodeId,
        /// Second endpoint as supplied.
        right: NodeId,
        /// Why the edge was rejected.
        reason: InvalidEdgeReason,
    },
    /// A road between the same pair of cities already exists.
    #[error("road {left}-{right} already exists as edge {existing}")]
    DuplicateEdge {
        /// First endpoint as supplied.
        left: NodeId,
        /// Second endpoint as supplied.
        right: NodeId,
        /// Identifier of the road already joining the pair.
        existing: EdgeId,
    },
    /// A city with the same identifier was already added.
    #[error("city `{id}` already exists")]
    DuplicateNode {
        /// The repeated identifier.
        id: NodeId,
    },
    /// A road weight was zero, negative, or not finite.
    #[error("road {left}-{right} has invalid weight {weight}; weights must be positive and finite")]
    InvalidWeight {
        /// First endpoint as supplied.
        left: NodeId,
        /// Second endpoint as supplied.
        right: NodeId,
        /// The rejected weight.
        weight: f64,
    },
    /// The referenced city does not exist.
    #[error("no city with id `{id}`")]
    NoSuchNode {
        /// The unknown identifier.
        id: NodeId,
    },
    /// The referenced road does not exist.
    #[error("no road with id {edge}")]
    NoSuchEdge {
        /// The unknown identifier.
        edge: EdgeId,
    },
    /// The active subgraph has no cities left.
    #[error("the active network contains no cities")]
    EmptyGraph,
    /// A disjoint-path request asked for zero paths.
    #[error("at least one path must be requested (got {requested})")]
    InvalidPathCount {
        /// The rejected count.
        requested: usize,
    },
    /// A lock guarding shared network state was poisoned by a panic.
    #[error("lock for {resource} is poisoned")]
    LockPoisoned {
        /// Name of the poisoned resource.
        resource: &'static str,
    },
}

/// Why [`NetworkError::InvalidEdge`] was raised.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InvalidEdgeReason {
    /// Both endpoints are the same city.
    SelfLoop,
    /// The first endpoint is not a known city.
    UnknownLeft,
    /// The second endpoint is not a known city.
    UnknownRight,
}

impl fmt::Display for InvalidEdgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelfLoop => "a road cannot join a city to itself",
            Self::UnknownLeft => "first endpoint is not a known city",
            Self::UnknownRight => "second endpoint is not a known city",
        })
    }
}

define_error_codes! {
    /// Stable codes describing [`NetworkError`] variants.
    enum NetworkErrorCode for NetworkError {
        /// An edge was a self-loop or referenced a missing node.
        InvalidEdge => InvalidEdge { .. } => "LIFELINE_INVALID_EDGE",
        /// A road between the same pair already exists.
        DuplicateEdge => DuplicateEdge { .. } => "LIFELINE_DUPLICATE_EDGE",
        /// A city identifier was repeated.
        DuplicateNode => DuplicateNode { .. } => "LIFELINE_DUPLICATE_NODE",
        /// A road weight was not positive and finite.
        InvalidWeight => InvalidWeight { .. } => "LIFELINE_INVALID_WEIGHT",
        /// The referenced city does not exist.
        NoSuchNode => NoSuchNode { .. } => "LIFELINE_NO_SUCH_NODE",
        /// The referenced road does not exist.
        NoSuchEdge => NoSuchEdge { .. } => "LIFELINE_NO_SUCH_EDGE",
        /// The active subgraph has no cities.
        EmptyGraph => EmptyGraph => "LIFELINE_EMPTY_GRAPH",
        /// Zero disjoint paths were requested.
        InvalidPathCount => InvalidPathCount { .. } => "LIFELINE_INVALID_PATH_COUNT",
        /// A lock guarding shared state was poisoned.
        LockPoisoned => LockPoisoned { .. } => "LIFELINE_LOCK_POISONED",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, NetworkError>;
