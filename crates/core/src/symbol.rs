// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-assigned identifiers.
//!
//! The remote API names everything with upper-case dash-separated symbols
//! (`X1-ZZ9-A1` is waypoint `A1` in system `X1-ZZ9`). Each kind of symbol
//! gets its own newtype so a system can never be passed where a waypoint is
//! expected.

/// Define a newtype over `String` for one kind of server symbol.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>`.
///
/// ```ignore
/// define_symbol! {
///     /// Identifier of a star system.
///     pub struct SystemSymbol;
/// }
/// ```
#[macro_export]
macro_rules! define_symbol {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(symbol: impl Into<String>) -> Self {
                Self(symbol.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_symbol! {
    /// Server reset identifier (the `resetDate` reported by the status endpoint).
    ///
    /// All snapshot data is scoped to exactly one epoch.
    pub struct Epoch;
}

define_symbol! {
    /// Agent call sign, unique within an epoch.
    pub struct AgentSymbol;
}

define_symbol! {
    /// Star system, e.g. `X1-ZZ9`.
    pub struct SystemSymbol;
}

define_symbol! {
    /// Waypoint within a system, e.g. `X1-ZZ9-I55`.
    pub struct WaypointSymbol;
}

impl SystemSymbol {
    /// Derive the home system from a headquarters waypoint.
    ///
    /// Takes the first two dash-separated parts: `X1-ZZ9-A1` becomes `X1-ZZ9`.
    /// Returns `None` when there are fewer than two non-empty parts.
    pub fn from_headquarters(headquarters: &str) -> Option<Self> {
        let mut parts = headquarters.split('-');
        let sector = parts.next().filter(|p| !p.is_empty())?;
        let system = parts.next().filter(|p| !p.is_empty())?;
        Some(Self(format!("{}-{}", sector, system)))
    }
}

#[cfg(test)]
#[path = "symbol_tests.rs"]
mod tests;
