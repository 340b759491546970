//! Associative combination, used wherever this crate merges accumulations.
//!
//! A semigroup is a type with an associative binary operation. Error
//! aggregation is the main consumer here: combining two
//! [`MultiError`](crate::MultiError)s appends the right-hand errors after the
//! left-hand ones, so batch operations can merge failure reports from
//! independent passes without losing order.
//!
//! # Examples
//!
//! ```
//! use headwater::Semigroup;
//!
//! let first = vec!["row 3 bad"];
//! let second = vec!["row 7 bad"];
//! assert_eq!(first.combine(second), vec!["row 3 bad", "row 7 bad"]);
//!
//! let greeting = "Hello, ".to_string().combine("World!".to_string());
//! assert_eq!(greeting, "Hello, World!");
//! ```

/// A type with an associative binary operation.
///
/// # Laws
///
/// Implementations must satisfy the associativity law:
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
///
/// `combine` takes both sides by value; clone first if the originals are
/// still needed.
pub trait Semigroup: Sized {
    /// Combine this value with another, left before right.
    ///
    /// # Examples
    ///
    /// ```
    /// use headwater::Semigroup;
    ///
    /// assert_eq!(vec![1, 2].combine(vec![3]), vec![1, 2, 3]);
    /// ```
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl Semigroup for String {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

macro_rules! impl_semigroup_tuple {
    ($($idx:tt $T:ident),+) => {
        impl<$($T: Semigroup),+> Semigroup for ($($T,)+) {
            #[inline]
            fn combine(self, other: Self) -> Self {
                (
                    $(self.$idx.combine(other.$idx)),+
                )
            }
        }
    };
}

impl_semigroup_tuple!(0 T1, 1 T2);
impl_semigroup_tuple!(0 T1, 1 T2, 2 T3);
impl_semigroup_tuple!(0 T1, 1 T2, 2 T3, 3 T4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_combine_appends() {
        assert_eq!(vec![1, 2].combine(vec![3, 4]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn vec_combine_with_empty_side() {
        let empty: Vec<i32> = vec![];
        assert_eq!(empty.combine(vec![1]), vec![1]);
        assert_eq!(vec![1].combine(Vec::new()), vec![1]);
    }

    #[test]
    fn string_combine_concatenates() {
        let joined = "retry".to_string().combine(" exhausted".to_string());
        assert_eq!(joined, "retry exhausted");
    }

    #[test]
    fn tuples_combine_componentwise() {
        let a = (vec![1], "a".to_string());
        let b = (vec![2], "b".to_string());
        assert_eq!(a.combine(b), (vec![1, 2], "ab".to_string()));
    }

    #[test]
    fn combine_is_associative() {
        let a = vec![1, 2];
        let b = vec![3];
        let c = vec![4, 5];

        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left, right);
    }
}
