use core::cmp::PartialOrd;

/// A pair of elements sorted in increasing order.
///
/// Used as the key of undirected relations (graph edges, face adjacency) so that
/// `(a, b)` and `(b, a)` collapse to the same entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SortedPair<T: PartialOrd>([T; 2]);

impl<T: PartialOrd> SortedPair<T> {
    /// Sorts two elements in increasing order into a new pair.
    pub fn new(element1: T, element2: T) -> Self {
        if element1 > element2 {
            SortedPair([element2, element1])
        } else {
            SortedPair([element1, element2])
        }
    }

    /// The smallest element of the pair.
    #[inline]
    pub fn first(&self) -> &T {
        &self.0[0]
    }

    /// The largest element of the pair.
    #[inline]
    pub fn second(&self) -> &T {
        &self.0[1]
    }
}

impl<T: PartialOrd + Copy> SortedPair<T> {
    /// The pair as a tuple, smallest element first.
    #[inline]
    pub fn as_tuple(&self) -> (T, T) {
        (self.0[0], self.0[1])
    }
}
