//! Signed accumulation.
//!
//! Every derived aggregate in this domain is a running total that starts at
//! zero and is pushed up or down by each historical row. Transactions are
//! translated into `Signed` contributions by the domain crates and folded here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Which way a contribution moves the running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// One contribution to a running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signed<T> {
    pub direction: Direction,
    pub magnitude: T,
}

impl<T> Signed<T> {
    pub fn increase(magnitude: T) -> Self {
        Self {
            direction: Direction::Increase,
            magnitude,
        }
    }

    pub fn decrease(magnitude: T) -> Self {
        Self {
            direction: Direction::Decrease,
            magnitude,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Signed<U> {
        Signed {
            direction: self.direction,
            magnitude: f(self.magnitude),
        }
    }
}

impl<T: Clone + PartialEq + core::fmt::Debug> ValueObject for Signed<T> {}

/// A numeric type a running total can be kept in.
pub trait Total: Default + Copy {
    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_total {
    ($($t:ty),*) => {
        $(impl Total for $t {
            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$t>::checked_add(self, rhs)
            }

            fn checked_sub(self, rhs: Self) -> Option<Self> {
                <$t>::checked_sub(self, rhs)
            }
        })*
    };
}

impl_total!(i64, i128, Decimal);

/// Fold contributions into a total, starting from `T::default()`.
///
/// Fails with `DomainError::Overflow` instead of wrapping or panicking when
/// the running total leaves the range of `T`.
pub fn accumulate<T, I>(contributions: I) -> DomainResult<T>
where
    T: Total,
    I: IntoIterator<Item = Signed<T>>,
{
    contributions
        .into_iter()
        .try_fold(T::default(), |total, c| match c.direction {
            Direction::Increase => total.checked_add(c.magnitude),
            Direction::Decrease => total.checked_sub(c.magnitude),
        })
        .ok_or(DomainError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_history_is_zero() {
        let total: i64 = accumulate(Vec::<Signed<i64>>::new()).unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn mixes_increases_and_decreases() {
        let total = accumulate([
            Signed::increase(100i64),
            Signed::increase(200),
            Signed::decrease(150),
        ])
        .unwrap();
        assert_eq!(total, 150);
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        let res = accumulate([Signed::increase(i64::MAX), Signed::increase(1)]);
        assert_eq!(res, Err(DomainError::Overflow));

        let res = accumulate([Signed::decrease(i64::MAX), Signed::decrease(2)]);
        assert_eq!(res, Err(DomainError::Overflow));
    }

    #[test]
    fn wider_total_absorbs_narrow_overflow() {
        let rows = [Signed::increase(i64::MAX), Signed::increase(1), Signed::decrease(5)];
        let total: i128 = accumulate(rows.map(|s| s.map(i128::from))).unwrap();
        assert_eq!(total, i128::from(i64::MAX) - 4);
    }

    proptest! {
        /// Order of replay never changes the total.
        #[test]
        fn total_is_order_independent(
            values in prop::collection::vec((any::<bool>(), 0i64..1_000_000), 0..50)
        ) {
            let contributions: Vec<Signed<i64>> = values
                .iter()
                .map(|(up, v)| if *up { Signed::increase(*v) } else { Signed::decrease(*v) })
                .collect();

            let forward = accumulate(contributions.clone());
            let backward = accumulate(contributions.into_iter().rev());
            prop_assert_eq!(forward, backward);
        }
    }
}
