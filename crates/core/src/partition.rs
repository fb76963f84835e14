//! Balanced contiguous partitioning of the work list.

/// Split `items` into `parts` contiguous partitions.
///
/// Partition sizes differ by at most one; the first `items.len() % parts`
/// partitions carry the extra element. Concatenating the result in order
/// reproduces `items`. Returns an empty vec when `parts` is zero.
pub fn split_balanced<T: Clone>(items: &[T], parts: usize) -> Vec<Vec<T>> {
    if parts == 0 {
        return Vec::new();
    }

    let base = items.len() / parts;
    let extra = items.len() % parts;

    let mut out = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let len = base + usize::from(i < extra);
        out.push(items[start..start + len].to_vec());
        start += len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(parts: &[Vec<u32>]) -> Vec<usize> {
        parts.iter().map(Vec::len).collect()
    }

    #[test]
    fn remainder_goes_to_leading_partitions() {
        let items: Vec<u32> = (0..10).collect();
        let parts = split_balanced(&items, 3);
        assert_eq!(sizes(&parts), vec![4, 3, 3]);
        assert_eq!(parts[0], vec![0, 1, 2, 3]);
        assert_eq!(parts[2], vec![7, 8, 9]);
    }

    #[test]
    fn concatenation_reproduces_input() {
        for n in 0..25u32 {
            let items: Vec<u32> = (0..n).collect();
            for k in 1..7 {
                let parts = split_balanced(&items, k);
                assert_eq!(parts.len(), k);
                let max = parts.iter().map(Vec::len).max().unwrap();
                let min = parts.iter().map(Vec::len).min().unwrap();
                assert!(max - min <= 1, "n={n} k={k}");
                let joined: Vec<u32> = parts.into_iter().flatten().collect();
                assert_eq!(joined, items);
            }
        }
    }

    #[test]
    fn more_parts_than_items_leaves_empty_tail() {
        let parts = split_balanced(&[1u32, 2], 4);
        assert_eq!(sizes(&parts), vec![1, 1, 0, 0]);
    }

    #[test]
    fn zero_parts_is_empty() {
        assert!(split_balanced(&[1u32, 2, 3], 0).is_empty());
    }
}
