//! Derived reachability class of a subnet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a subnet can reach the internet through an internet gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reachability {
    /// Route table has `0.0.0.0/0` via an internet gateway.
    Public,
    /// Route table has no internet gateway default route.
    Private,
    /// No explicit association and no main route table to fall back to.
    PrivateImplicit,
}

impl From<bool> for Reachability {
    fn from(is_public: bool) -> Self {
        if is_public {
            Reachability::Public
        } else {
            Reachability::Private
        }
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Reachability::Public => "Public",
            Reachability::Private => "Private",
            Reachability::PrivateImplicit => "Private (Implicit)",
        };
        write!(f, "{label}")
    }
}
