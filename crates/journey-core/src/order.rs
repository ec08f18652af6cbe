use crate::error::{JourneyError, Result};

/// Remove the element at `from` and reinsert it at `to`, the way a
/// drag-and-drop list splices its backing array. Both indexes must be in range.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(JourneyError::InvalidOrder(format!(
            "cannot move index {from} to {to} in a list of {len}"
        )));
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_forward() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        reorder(&mut v, 0, 2).unwrap();
        assert_eq!(v, vec!['b', 'c', 'a', 'd']);
    }

    #[test]
    fn reorder_backward() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        reorder(&mut v, 3, 1).unwrap();
        assert_eq!(v, vec!['a', 'd', 'b', 'c']);
    }

    #[test]
    fn reorder_preserves_multiset_and_places_at_destination() {
        let original = vec![1, 2, 2, 3, 4, 5];
        for from in 0..original.len() {
            for to in 0..original.len() {
                let mut v = original.clone();
                reorder(&mut v, from, to).unwrap();
                assert_eq!(v[to], original[from], "from {from} to {to}");
                let mut sorted = v.clone();
                sorted.sort();
                assert_eq!(sorted, original);
            }
        }
    }

    #[test]
    fn reorder_out_of_range_fails() {
        let mut v = vec![1, 2];
        assert!(reorder(&mut v, 2, 0).is_err());
        assert!(reorder(&mut v, 0, 5).is_err());
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn empty_list_has_nothing_to_move() {
        let mut v: Vec<u8> = Vec::new();
        assert!(reorder(&mut v, 0, 0).is_err());
    }
}
