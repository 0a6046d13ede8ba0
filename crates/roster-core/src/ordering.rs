//! Board ordering: how moving one job shifts the others.
//!
//! Moving a job from `from` to `to` shifts every other job whose order lies
//! between the two by one step towards `from`, then places the moved job at
//! `to`. Applied to a duplicate-free set of orders, the result is again
//! duplicate-free, whether or not the orders are contiguous.

/// The inclusive range of orders that shift, and by how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftPlan {
  pub lo:    i64,
  pub hi:    i64,
  /// `-1` when moving down the board, `+1` when moving up.
  pub delta: i64,
}

impl ShiftPlan {
  /// `None` when the move is a no-op.
  pub fn new(from: i64, to: i64) -> Option<Self> {
    use std::cmp::Ordering::*;
    match from.cmp(&to) {
      Equal => None,
      Less => Some(Self { lo: from + 1, hi: to, delta: -1 }),
      Greater => Some(Self { lo: to, hi: from - 1, delta: 1 }),
    }
  }

  /// The new order of a job that is not the one being moved.
  pub fn shifted(&self, order: i64) -> i64 {
    if (self.lo..=self.hi).contains(&order) {
      order + self.delta
    } else {
      order
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Move the job at `from` to `to` within `orders`, returning the new set.
  fn apply(orders: &[i64], from: i64, to: i64) -> Vec<i64> {
    let Some(plan) = ShiftPlan::new(from, to) else {
      return orders.to_vec();
    };
    let mut out: Vec<i64> = orders
      .iter()
      .map(|&o| if o == from { to } else { plan.shifted(o) })
      .collect();
    out.sort_unstable();
    out
  }

  fn strictly_increasing(orders: &[i64]) -> bool {
    orders.windows(2).all(|w| w[0] < w[1])
  }

  #[test]
  fn moving_up_shifts_the_gap_down() {
    assert_eq!(
      ShiftPlan::new(3, 1),
      Some(ShiftPlan { lo: 1, hi: 2, delta: 1 })
    );
    let plan = ShiftPlan::new(3, 1).unwrap();
    // The jobs previously at 1 and 2 make room; 0 and 4 stay put.
    let others: Vec<_> = [0, 1, 2, 4].iter().map(|&o| plan.shifted(o)).collect();
    assert_eq!(others, [0, 2, 3, 4]);
    assert_eq!(apply(&[0, 1, 2, 3, 4], 3, 1), [0, 1, 2, 3, 4]);
  }

  #[test]
  fn moving_down_shifts_the_gap_up() {
    let plan = ShiftPlan::new(0, 3).unwrap();
    assert_eq!(plan.shifted(1), 0);
    assert_eq!(plan.shifted(3), 2);
    assert_eq!(plan.shifted(4), 4);
  }

  #[test]
  fn same_slot_is_a_no_op() {
    assert!(ShiftPlan::new(2, 2).is_none());
  }

  #[test]
  fn gaps_stay_duplicate_free() {
    // Order 2 was deleted.
    let before = [0, 1, 3, 4];
    for &from in &before {
      for &to in &before {
        let after = apply(&before, from, to);
        assert!(strictly_increasing(&after), "{from}->{to}: {after:?}");
      }
    }
  }
}
