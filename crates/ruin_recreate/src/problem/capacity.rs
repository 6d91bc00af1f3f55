use std::ops::{Add, AddAssign, Index, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

type CapacityVector = SmallVec<[f64; 4]>;

/// Multi-dimensional amount, used both for vehicle capacities and job demands.
/// Missing dimensions count as zero.
#[derive(Default, Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Capacity(CapacityVector);

impl Capacity {
    pub const ZERO: Capacity = Capacity(CapacityVector::new_const());

    pub fn from_vec(vec: Vec<f64>) -> Self {
        Capacity(CapacityVector::from_vec(vec))
    }

    pub fn new(capacity: CapacityVector) -> Self {
        Capacity(capacity)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().cloned()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).cloned().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0.0)
    }

    /// `true` when every dimension of `demand` fits in `self`.
    pub fn satisfies_demand(&self, demand: &Capacity) -> bool {
        let dimensions = self.len().max(demand.len());
        (0..dimensions).all(|i| demand.get(i) <= self.get(i))
    }

    /// `true` when every dimension lies in `[0, capacity]`.
    pub fn is_within(&self, capacity: &Capacity) -> bool {
        self.0.iter().all(|&value| value >= 0.0) && capacity.satisfies_demand(self)
    }

    pub fn over_capacity_demand(&self, demand: &Capacity) -> f64 {
        let dimensions = self.len().max(demand.len());
        (0..dimensions)
            .map(|i| (demand.get(i) - self.get(i)).max(0.0))
            .sum()
    }

    /// Componentwise maximum.
    pub fn max(&self, other: &Capacity) -> Capacity {
        let dimensions = self.len().max(other.len());
        Capacity(
            (0..dimensions)
                .map(|i| self.get(i).max(other.get(i)))
                .collect(),
        )
    }

    /// Componentwise absolute value, used to turn unloading deltas into demands.
    pub fn abs(&self) -> Capacity {
        Capacity(self.0.iter().map(|value| value.abs()).collect())
    }

    pub fn scale(&self, factor: f64) -> Capacity {
        Capacity(self.0.iter().map(|value| value * factor).collect())
    }
}

impl AddAssign<&Capacity> for Capacity {
    fn add_assign(&mut self, rhs: &Capacity) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), 0.0);
        }

        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a += *b;
        }
    }
}

impl SubAssign<&Capacity> for Capacity {
    fn sub_assign(&mut self, rhs: &Capacity) {
        if self.0.len() < rhs.0.len() {
            self.0.resize(rhs.0.len(), 0.0);
        }

        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a -= *b;
        }
    }
}

impl Add<&Capacity> for &Capacity {
    type Output = Capacity;

    fn add(self, rhs: &Capacity) -> Self::Output {
        let mut output = self.clone();
        output += rhs;
        output
    }
}

impl Sub<&Capacity> for &Capacity {
    type Output = Capacity;

    fn sub(self, rhs: &Capacity) -> Self::Output {
        let mut output = self.clone();
        output -= rhs;
        output
    }
}

impl Neg for &Capacity {
    type Output = Capacity;

    fn neg(self) -> Self::Output {
        Capacity(self.0.iter().map(|value| -value).collect())
    }
}

impl Index<usize> for Capacity {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_mut() {
        let mut total_capacity = Capacity::default();

        total_capacity.add_assign(&Capacity::from_vec(vec![1.0, 2.0, 3.0]));
        assert_eq!(total_capacity, Capacity::from_vec(vec![1.0, 2.0, 3.0]));

        total_capacity.add_assign(&Capacity::from_vec(vec![1.0, 2.0, 3.0]));
        assert_eq!(total_capacity, Capacity::from_vec(vec![2.0, 4.0, 6.0]));
    }

    #[test]
    fn test_sub_mixed_dimensions() {
        let capacity = Capacity::from_vec(vec![10.0]);
        let result = &capacity - &Capacity::from_vec(vec![1.0, 2.0]);

        assert_eq!(result, Capacity::from_vec(vec![9.0, -2.0]));
    }

    #[test]
    fn test_satisfies_demand() {
        let total_capacity = Capacity::from_vec(vec![10.0, 5.0, 8.0]);

        assert!(total_capacity.satisfies_demand(&Capacity::from_vec(vec![5.0, 3.0, 2.0])));
        assert!(!total_capacity.satisfies_demand(&Capacity::from_vec(vec![11.0, 6.0, 2.0])));
        assert!(!total_capacity.satisfies_demand(&Capacity::from_vec(vec![1.0, 1.0, 1.0, 1.0])));
        assert!(total_capacity.satisfies_demand(&Capacity::ZERO));
    }

    #[test]
    fn test_is_within() {
        let capacity = Capacity::from_vec(vec![10.0, 5.0]);

        assert!(Capacity::from_vec(vec![10.0, 0.0]).is_within(&capacity));
        assert!(!Capacity::from_vec(vec![-1.0, 0.0]).is_within(&capacity));
        assert!(!Capacity::from_vec(vec![1.0, 6.0]).is_within(&capacity));
    }

    #[test]
    fn test_over_capacity_demand() {
        let total_capacity = Capacity::from_vec(vec![10.0, 5.0, 8.0, 5.0]);
        let demand = Capacity::from_vec(vec![5.0, 3.0, 2.0, 8.0]);

        assert_eq!(total_capacity.over_capacity_demand(&demand), 3.0);
        assert_eq!(demand.over_capacity_demand(&total_capacity), 13.0);
    }

    #[test]
    fn test_max_and_neg() {
        let a = Capacity::from_vec(vec![1.0, 7.0]);
        let b = Capacity::from_vec(vec![4.0, 2.0, 3.0]);

        assert_eq!(a.max(&b), Capacity::from_vec(vec![4.0, 7.0, 3.0]));
        assert_eq!(-&a, Capacity::from_vec(vec![-1.0, -7.0]));
        assert_eq!((-&a).abs(), a);
    }
}
