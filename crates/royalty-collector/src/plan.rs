//! Splitting a snapshot into contiguous batch requests.

use royalty_types::Leaf;

use crate::batch::BatchRequest;
use crate::{CollectorError, Result};

/// Plan the batches that distribute `epoch` over `leaves`.
///
/// Leaves are sorted by index and must cover `0..n` without gaps. Every
/// request carries `total = n`, and the last one ends at `n` so submitting
/// the plan in order closes the epoch. An empty leaf set plans nothing.
///
/// # Errors
///
/// - [`CollectorError::InvalidChunkSize`] if `chunk_size` is 0
/// - [`CollectorError::NonContiguousBatch`] if an index is missing or repeated
pub fn plan_batches(epoch: u32, leaves: &[Leaf], chunk_size: usize) -> Result<Vec<BatchRequest>> {
    if chunk_size == 0 {
        return Err(CollectorError::InvalidChunkSize);
    }

    let mut sorted = leaves.to_vec();
    sorted.sort();

    for (position, leaf) in sorted.iter().enumerate() {
        if u32::try_from(position) != Ok(leaf.index) {
            return Err(CollectorError::NonContiguousBatch {
                expected: u32::try_from(position).unwrap_or(u32::MAX),
                start: leaf.index,
            });
        }
    }

    // Contiguous from 0, so the count equals the last index plus one.
    let total = sorted.last().map_or(0, |leaf| leaf.index.saturating_add(1));

    let plan: Vec<BatchRequest> = sorted
        .chunks(chunk_size)
        .map(|chunk| {
            let start = chunk.first().map_or(0, |leaf| leaf.index);
            let end = chunk.last().map_or(0, |leaf| leaf.index.saturating_add(1));
            BatchRequest {
                epoch,
                start,
                end,
                total,
                owners: chunk.iter().map(|leaf| leaf.owner).collect(),
            }
        })
        .collect();

    tracing::debug!(epoch, total, batches = plan.len(), chunk_size, "collector: batches planned");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use royalty_types::Address;

    fn leaves(indices: &[u32]) -> Vec<Leaf> {
        indices
            .iter()
            .map(|&i| Leaf::new(i, Address::from_label(&format!("holder-{i}"))))
            .collect()
    }

    #[test]
    fn test_plan_chunks_in_order() {
        let plan = plan_batches(4, &leaves(&[3, 0, 4, 1, 2]), 3).expect("plan");
        assert_eq!(plan.len(), 2);
        assert_eq!((plan[0].start, plan[0].end, plan[0].total), (0, 3, 5));
        assert_eq!((plan[1].start, plan[1].end, plan[1].total), (3, 5, 5));
        assert_eq!(plan[1].owners[0], Address::from_label("holder-3"));
        assert!(plan.iter().all(|r| r.epoch == 4));
        assert!(plan.iter().all(|r| r.len() as usize == r.owners.len()));
    }

    #[test]
    fn test_plan_rejects_gap() {
        let result = plan_batches(1, &leaves(&[0, 1, 3]), 2);
        assert!(matches!(
            result,
            Err(CollectorError::NonContiguousBatch {
                expected: 2,
                start: 3
            })
        ));
    }

    #[test]
    fn test_plan_rejects_duplicate() {
        let result = plan_batches(1, &leaves(&[0, 1, 1]), 2);
        assert!(matches!(result, Err(CollectorError::NonContiguousBatch { .. })));
    }

    #[test]
    fn test_plan_rejects_zero_chunk() {
        assert!(matches!(
            plan_batches(1, &leaves(&[0]), 0),
            Err(CollectorError::InvalidChunkSize)
        ));
    }

    #[test]
    fn test_plan_empty() {
        assert!(plan_batches(1, &[], 3).expect("plan").is_empty());
    }
}
