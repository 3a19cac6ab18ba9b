// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Consumer demand.
//!
//! A [`Demand`] is the number of further deliveries a subscriber is willing to
//! accept. It is either a finite count or [`Demand::UNLIMITED`]. All arithmetic
//! saturates: adding past `u64::MAX` yields `UNLIMITED`, and consuming from an
//! exhausted demand leaves it at zero.
//!
//! # Example
//!
//! ```
//! use pushpull_core::Demand;
//!
//! let mut demand = Demand::max(1) + Demand::max(2);
//! assert_eq!(demand, Demand::max(3));
//!
//! assert!(demand.consume_one());
//! assert_eq!(demand.remaining(), Some(2));
//!
//! assert_eq!(Demand::max(u64::MAX - 1) + Demand::max(5), Demand::UNLIMITED);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign};

/// Outstanding permission to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demand {
    /// A finite number of further deliveries.
    Finite(u64),
    /// No limit on further deliveries.
    Unlimited,
}

impl Demand {
    /// No demand at all.
    pub const NONE: Self = Self::Finite(0);

    /// Unlimited demand.
    pub const UNLIMITED: Self = Self::Unlimited;

    /// A finite demand of `count` deliveries.
    ///
    /// `u64::MAX` is the unlimited sentinel and maps to [`Demand::UNLIMITED`].
    #[must_use]
    pub const fn max(count: u64) -> Self {
        if count == u64::MAX {
            Self::Unlimited
        } else {
            Self::Finite(count)
        }
    }

    /// Returns `true` for [`Demand::UNLIMITED`].
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Returns `true` if at least one more delivery is permitted.
    #[must_use]
    pub const fn has_demand(&self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Finite(count) => *count > 0,
        }
    }

    /// Returns the finite count, or `None` when unlimited.
    #[must_use]
    pub const fn remaining(&self) -> Option<u64> {
        match self {
            Self::Finite(count) => Some(*count),
            Self::Unlimited => None,
        }
    }

    /// Adds two demands, saturating to [`Demand::UNLIMITED`].
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => match a.checked_add(b) {
                Some(total) => Self::max(total),
                None => Self::Unlimited,
            },
            _ => Self::Unlimited,
        }
    }

    /// Takes one unit of demand if any is available.
    ///
    /// Unlimited demand stays unlimited.
    pub fn consume_one(&mut self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Finite(count) if *count > 0 => {
                *count -= 1;
                true
            }
            Self::Finite(_) => false,
        }
    }
}

impl Default for Demand {
    fn default() -> Self {
        Self::NONE
    }
}

impl Add for Demand {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl PartialOrd for Demand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Demand {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.cmp(b),
            (Self::Finite(_), Self::Unlimited) => Ordering::Less,
            (Self::Unlimited, Self::Finite(_)) => Ordering::Greater,
            (Self::Unlimited, Self::Unlimited) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(count) => write!(f, "max({count})"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}
