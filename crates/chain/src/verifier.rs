//! Pure verification predicates.

use crate::{Block, Waypoint};
use alloy_consensus::{Header, Sealed, proofs};
use alloy_primitives::B256;
use thiserror::Error;

/// Errors produced by the verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// An empty batch where at least one item is required.
    #[error("empty batch")]
    EmptyBatch,
    /// The header range does not match the waypoint's asserted bounds.
    #[error("headers cover [{got_start}, {got_end}], waypoint asserts [{start}, {end}]")]
    RangeMismatch {
        /// Asserted first block.
        start: u64,
        /// Asserted last block.
        end: u64,
        /// First block actually supplied.
        got_start: u64,
        /// Last block actually supplied.
        got_end: u64,
    },
    /// Adjacent headers or blocks are not parent-linked with
    /// consecutive numbers.
    #[error("block {number} does not extend its predecessor")]
    BrokenLinkage {
        /// Number of the offending item.
        number: u64,
    },
    /// The computed range root does not match the attested root.
    #[error("range root {got} does not match the attested root {expected}")]
    RootMismatch {
        /// Root asserted by the waypoint.
        expected: B256,
        /// Root computed over the supplied headers.
        got: B256,
    },
    /// A block body does not match the roots committed in its header.
    #[error("body of block {number} does not match its header")]
    BodyMismatch {
        /// Number of the offending block.
        number: u64,
    },
}

/// Verifies that `headers` are exactly the contiguous range asserted by
/// `waypoint` and that the range resolves to the attested root.
///
/// The attested root of a finalizing waypoint is the hash of the
/// range's final header, so a chain that carries the whole range but
/// ends on a different branch fails here. Pure; no side effects.
pub fn verify_waypoint_headers(
    waypoint: &Waypoint,
    headers: &[Sealed<Header>],
) -> Result<(), VerificationError> {
    let (Some(first), Some(last)) = (headers.first(), headers.last()) else {
        return Err(VerificationError::EmptyBatch);
    };

    if first.number != waypoint.start_block || last.number != waypoint.end_block {
        return Err(VerificationError::RangeMismatch {
            start: waypoint.start_block,
            end: waypoint.end_block,
            got_start: first.number,
            got_end: last.number,
        });
    }

    for pair in headers.windows(2) {
        if pair[1].parent_hash != pair[0].hash() || pair[1].number != pair[0].number + 1 {
            return Err(VerificationError::BrokenLinkage { number: pair[1].number });
        }
    }

    let got = last.hash();
    if got != waypoint.root_hash {
        return Err(VerificationError::RootMismatch { expected: waypoint.root_hash, got });
    }

    Ok(())
}

/// Structural sanity checks for a downloaded block batch.
///
/// Rejects empty batches, non-monotonic numbers, broken parent linkage
/// and bodies that do not match the transaction and ommer roots
/// committed in their headers. Consensus validation is the execution
/// engine's job.
pub fn verify_blocks(blocks: &[Block]) -> Result<(), VerificationError> {
    if blocks.is_empty() {
        return Err(VerificationError::EmptyBatch);
    }

    for pair in blocks.windows(2) {
        if pair[1].parent_hash() != pair[0].hash() || pair[1].number() != pair[0].number() + 1 {
            return Err(VerificationError::BrokenLinkage { number: pair[1].number() });
        }
    }

    for block in blocks {
        let transactions_root = proofs::calculate_transaction_root(&block.body.transactions);
        let ommers_hash = proofs::calculate_ommers_root(&block.body.ommers);
        if transactions_root != block.header.transactions_root
            || ommers_hash != block.header.ommers_hash
        {
            return Err(VerificationError::BodyMismatch { number: block.number() });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockBody;
    use alloy_consensus::constants::{EMPTY_OMMER_ROOT_HASH, EMPTY_ROOT_HASH};
    use alloy_primitives::{Sealable, U256};

    fn sealed(parent: Option<&Sealed<Header>>, number: u64) -> Sealed<Header> {
        Header {
            parent_hash: parent.map(|p| p.hash()).unwrap_or_default(),
            number,
            difficulty: U256::from(1u64),
            transactions_root: EMPTY_ROOT_HASH,
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            ..Default::default()
        }
        .seal_slow()
    }

    fn range(start: u64, length: u64) -> Vec<Sealed<Header>> {
        let mut headers = vec![sealed(None, start)];
        for number in start + 1..start + length {
            let header = sealed(headers.last(), number);
            headers.push(header);
        }
        headers
    }

    fn waypoint_for(headers: &[Sealed<Header>]) -> Waypoint {
        let last = headers.last().unwrap();
        Waypoint::new(headers[0].number, last.number, last.hash())
    }

    #[test]
    fn accepts_a_matching_range() {
        let headers = range(100, 4);
        let waypoint = waypoint_for(&headers);
        assert_eq!(verify_waypoint_headers(&waypoint, &headers), Ok(()));
    }

    #[test]
    fn rejects_an_empty_range() {
        let waypoint = Waypoint::new(100, 103, B256::ZERO);
        assert_eq!(verify_waypoint_headers(&waypoint, &[]), Err(VerificationError::EmptyBatch));
    }

    #[test]
    fn rejects_misaligned_bounds() {
        let headers = range(100, 4);
        let mut waypoint = waypoint_for(&headers);
        waypoint.start_block = 101;
        assert!(matches!(
            verify_waypoint_headers(&waypoint, &headers),
            Err(VerificationError::RangeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_a_broken_hash_chain() {
        let mut headers = range(100, 4);
        let waypoint = waypoint_for(&headers);
        headers[2] = sealed(None, 102);
        assert!(matches!(
            verify_waypoint_headers(&waypoint, &headers),
            Err(VerificationError::BrokenLinkage { number: 102 })
                | Err(VerificationError::BrokenLinkage { number: 103 })
        ));
    }

    #[test]
    fn rejects_a_root_from_another_branch() {
        let headers = range(100, 4);
        let mut waypoint = waypoint_for(&headers);
        waypoint.root_hash = B256::repeat_byte(0xab);
        assert!(matches!(
            verify_waypoint_headers(&waypoint, &headers),
            Err(VerificationError::RootMismatch { .. })
        ));
    }

    #[test]
    fn accepts_a_linked_block_batch() {
        let blocks: Vec<_> =
            range(50, 3).into_iter().map(|h| Block::new(h, BlockBody::default())).collect();
        assert_eq!(verify_blocks(&blocks), Ok(()));
    }

    #[test]
    fn rejects_an_empty_block_batch() {
        assert_eq!(verify_blocks(&[]), Err(VerificationError::EmptyBatch));
    }

    #[test]
    fn rejects_a_gap_in_block_numbers() {
        let headers = range(50, 4);
        let blocks = vec![
            Block::new(headers[0].clone(), BlockBody::default()),
            Block::new(headers[2].clone(), BlockBody::default()),
        ];
        assert!(matches!(verify_blocks(&blocks), Err(VerificationError::BrokenLinkage { .. })));
    }

    #[test]
    fn rejects_a_body_that_contradicts_its_header() {
        let header = Header {
            number: 50,
            transactions_root: B256::repeat_byte(0x11),
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            ..Default::default()
        };
        let block = Block::new(header.seal_slow(), BlockBody::default());
        assert_eq!(verify_blocks(&[block]), Err(VerificationError::BodyMismatch { number: 50 }));
    }
}
