//! The catch-up and live synchronization driver.

use crate::{
    Metrics,
    client::{
        AttestationClient, BlockDownloader, BridgeClient, ExecutionClient, P2pClient, PeerId, Store,
    },
    error::SyncError,
    event::{BlockHashAnnouncement, TipEvent},
};
use alloy_consensus::{Header, Sealed};
use sabal_chain::{Block, CanonicalChainBuilder, Waypoint, verify_blocks, verify_waypoint_headers};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Which waypoint kind anchors a catch-up pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaypointKind {
    Checkpoints,
    Milestones,
}

/// Drives the local execution state to the network tip and keeps it
/// there.
///
/// Catch-up happens in two bulk passes, the first anchored by advisory
/// checkpoints, the second by finalizing milestones; every jump is made
/// externally visible through the commit barrier. The driver then
/// builds a [`CanonicalChainBuilder`] rooted at the caught-up header
/// and processes tip events one at a time, in arrival order, until
/// cancelled.
///
/// The driver is single-threaded cooperative: the chain builder is only
/// touched between awaits on the collaborators, so it is consistent at
/// every suspension point.
#[derive(Debug)]
pub struct SyncDriver<E, D, A, B, P, S>
where
    E: ExecutionClient,
    D: BlockDownloader,
    A: AttestationClient,
    B: BridgeClient,
    P: P2pClient,
    S: Store,
{
    /// Execution engine client.
    execution: E,
    /// Waypoint-anchored bulk block downloader.
    downloader: D,
    /// Attestation service client.
    attestation: A,
    /// Cross-chain event bridge client.
    bridge: B,
    /// Peer-to-peer service used for gossip backfill and penalization.
    p2p: P,
    /// Store flushed at each commit barrier.
    store: S,
    /// Inbound tip events, processed strictly in arrival order.
    events: mpsc::Receiver<TipEvent>,
    /// The cancellation token, shared between all tasks.
    cancellation: CancellationToken,
}

impl<E, D, A, B, P, S> SyncDriver<E, D, A, B, P, S>
where
    E: ExecutionClient,
    D: BlockDownloader,
    A: AttestationClient,
    B: BridgeClient,
    P: P2pClient,
    S: Store,
{
    /// Creates a new driver over the injected collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        execution: E,
        downloader: D,
        attestation: A,
        bridge: B,
        p2p: P,
        store: S,
        events: mpsc::Receiver<TipEvent>,
        cancellation: CancellationToken,
    ) -> Self {
        Self { execution, downloader, attestation, bridge, p2p, store, events, cancellation }
    }

    /// Runs catch-up followed by the live event loop.
    ///
    /// Returns [`SyncError::Cancelled`] when the cancellation token
    /// fires; every other return is a fatal error. The loop never exits
    /// on its own.
    pub async fn run(mut self) -> Result<(), SyncError> {
        info!(target: "sync", "starting chain synchronization");

        let tip = self.sync_to_tip().await?;
        info!(
            target: "sync",
            number = tip.number,
            hash = %tip.hash(),
            "caught up with the network tip, switching to live sync"
        );

        let mut chain = CanonicalChainBuilder::new(tip);

        loop {
            tokio::select! {
                _ = self.cancellation.cancelled() => {
                    info!(target: "sync", "received shutdown signal, exiting sync driver");
                    return Err(SyncError::Cancelled);
                }
                event = self.events.recv() => {
                    let Some(event) = event else {
                        return Err(SyncError::EventChannelClosed);
                    };
                    self.on_tip_event(event, &mut chain).await?;
                }
            }
        }
    }

    async fn on_tip_event(
        &self,
        event: TipEvent,
        chain: &mut CanonicalChainBuilder,
    ) -> Result<(), SyncError> {
        match event {
            TipEvent::NewMilestone(milestone) => self.on_milestone_event(milestone, chain).await,
            TipEvent::NewBlock { block, peer_id } => {
                self.on_new_block_event(block, peer_id, chain).await
            }
            TipEvent::NewBlockHashes { announcements, peer_id } => {
                self.on_new_block_hashes_event(announcements, peer_id, chain).await
            }
        }
    }

    /// Advances the execution tip in bulk, first via checkpoints, then
    /// via milestones, and returns the caught-up header.
    async fn sync_to_tip(&self) -> Result<Sealed<Header>, SyncError> {
        let tip = self.execution.current_header().await?;
        let tip = self.sync_pass(tip, WaypointKind::Checkpoints).await?;
        self.sync_pass(tip, WaypointKind::Milestones).await
    }

    /// One catch-up pass: download waypoint-bounded jumps until the
    /// downloader reports no further waypoint, committing after each
    /// jump with the new tip as the finalized header.
    async fn sync_pass(
        &self,
        mut tip: Sealed<Header>,
        kind: WaypointKind,
    ) -> Result<Sealed<Header>, SyncError> {
        loop {
            if self.cancellation.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let start_block_num = tip.number + 1;
            let new_tip = match kind {
                WaypointKind::Checkpoints => {
                    self.attestation.synchronize_checkpoints().await?;
                    self.downloader.download_blocks_using_checkpoints(start_block_num).await?
                }
                WaypointKind::Milestones => {
                    self.attestation.synchronize_milestones().await?;
                    self.downloader.download_blocks_using_milestones(start_block_num).await?
                }
            };

            let Some(new_tip) = new_tip else {
                // No further waypoint, this pass is caught up.
                return Ok(tip);
            };

            debug!(
                target: "sync",
                ?kind,
                number = new_tip.number,
                "downloaded blocks up to the next waypoint"
            );
            tip = new_tip;
            self.commit(tip.clone(), tip.clone()).await?;
        }
    }

    /// The commit barrier: makes a tip advance externally visible.
    ///
    /// The store is flushed before the external snapshots so that any
    /// header downstream services observe is already durably referenced
    /// locally; span and bridge snapshots precede the fork-choice
    /// because execution may immediately answer queries that presuppose
    /// them. Each step is idempotent for non-decreasing block numbers,
    /// so partial completion is tolerable.
    async fn commit(
        &self,
        new_tip: Sealed<Header>,
        finalized: Sealed<Header>,
    ) -> Result<(), SyncError> {
        self.store.flush().await?;

        let block_num = new_tip.number;
        self.attestation.synchronize_spans(block_num).await?;
        self.bridge.synchronize(block_num).await?;

        let finalized_num = finalized.number;
        self.execution.update_fork_choice(new_tip, finalized).await?;

        metrics::gauge!(Metrics::TIP_BLOCK_HEIGHT).set(block_num as f64);
        metrics::gauge!(Metrics::FINALIZED_BLOCK_HEIGHT).set(finalized_num as f64);
        Ok(())
    }

    /// Reconciles the local chain against a newly attested milestone.
    ///
    /// A verified milestone advances finality by pruning the chain
    /// builder up to its end block. A milestone the local chain cannot
    /// carry or verify means the local tip sits on the wrong branch and
    /// triggers mismatch recovery.
    async fn on_milestone_event(
        &self,
        milestone: Waypoint,
        chain: &mut CanonicalChainBuilder,
    ) -> Result<(), SyncError> {
        if milestone.end_block <= chain.root().number {
            // Already finalized past this milestone.
            return Ok(());
        }

        let verification = chain
            .headers_in_range(milestone.start_block, milestone.length())
            .map_err(|err| err.to_string())
            .and_then(|headers| {
                verify_waypoint_headers(&milestone, &headers).map_err(|err| err.to_string())
            });

        if let Err(reason) = verification {
            debug!(
                target: "sync",
                %reason,
                end_block = milestone.end_block,
                "local chain tip does not match the new milestone, unwinding to the last finalized header"
            );
            return self.handle_milestone_mismatch(chain).await;
        }

        chain.prune(milestone.end_block)?;
        metrics::gauge!(Metrics::FINALIZED_BLOCK_HEIGHT).set(milestone.end_block as f64);
        Ok(())
    }

    /// Unwinds to the last finalized header and re-downloads the
    /// milestone-anchored chain after a milestone the local tip does
    /// not match.
    async fn handle_milestone_mismatch(
        &self,
        chain: &mut CanonicalChainBuilder,
    ) -> Result<(), SyncError> {
        metrics::counter!(Metrics::MILESTONE_MISMATCHES).increment(1);

        let old_tip = chain.root().clone();
        self.execution.update_fork_choice(old_tip.clone(), old_tip.clone()).await?;

        // A milestone event just arrived, so the download must find
        // headers past the last finalized block; anything else violates
        // the attestation protocol.
        let new_tip = self
            .downloader
            .download_blocks_using_milestones(old_tip.number)
            .await?
            .ok_or(SyncError::MilestoneVoidAfterEvent)?;

        self.commit(new_tip.clone(), new_tip.clone()).await?;
        chain.reset(new_tip);
        Ok(())
    }

    /// Extends the local chain with a gossiped block, backfilling from
    /// the announcing peer when the block does not attach to a known
    /// branch.
    async fn on_new_block_event(
        &self,
        block: Block,
        peer_id: PeerId,
        chain: &mut CanonicalChainBuilder,
    ) -> Result<(), SyncError> {
        let block_num = block.number();
        let root_num = chain.root().number;
        if block_num <= root_num {
            return Ok(());
        }

        let new_blocks = if chain.contains_hash(block.parent_hash()) {
            vec![block]
        } else {
            match self.p2p.fetch_blocks(root_num, block_num + 1, peer_id).await {
                Ok(blocks) => blocks,
                Err(err) if err.is_incomplete_response() => {
                    // The peer may simply lack history; not a punishable
                    // offence.
                    debug!(
                        target: "sync",
                        %err,
                        %peer_id,
                        block_num,
                        "failed to fetch complete blocks, ignoring new block event"
                    );
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            }
        };

        if let Err(err) = verify_blocks(&new_blocks) {
            debug!(
                target: "sync",
                %err,
                %peer_id,
                "invalid new block batch from peer, penalizing and ignoring"
            );
            metrics::counter!(Metrics::PEER_PENALIZATIONS).increment(1);
            if let Err(err) = self.p2p.penalize(peer_id).await {
                debug!(target: "sync", %err, %peer_id, "failed to penalize peer");
            }
            return Ok(());
        }

        let new_headers = new_blocks.iter().map(|block| block.header.clone()).collect();

        let old_tip_hash = chain.tip().hash();
        if let Err(err) = chain.connect(new_headers) {
            // The local tree may have advanced past the branch point
            // during a prior event.
            debug!(
                target: "sync",
                %err,
                "could not connect headers to the local chain, ignoring new block event"
            );
            return Ok(());
        }

        let new_tip = chain.tip().clone();
        if new_tip.hash() != old_tip_hash {
            // Live block reception advances the head only; finality
            // moves with milestones, so no full commit barrier here.
            self.execution.insert_blocks(new_blocks).await?;
            self.execution.update_fork_choice(new_tip.clone(), chain.root().clone()).await?;
            metrics::gauge!(Metrics::TIP_BLOCK_HEIGHT).set(new_tip.number as f64);
        }

        Ok(())
    }

    /// Resolves block hash announcements into blocks and feeds them
    /// through the new-block path.
    async fn on_new_block_hashes_event(
        &self,
        announcements: Vec<BlockHashAnnouncement>,
        peer_id: PeerId,
        chain: &mut CanonicalChainBuilder,
    ) -> Result<(), SyncError> {
        for announcement in announcements {
            if announcement.number <= chain.root().number || chain.contains_hash(announcement.hash)
            {
                continue;
            }

            let blocks = match self
                .p2p
                .fetch_blocks(announcement.number, announcement.number + 1, peer_id)
                .await
            {
                Ok(blocks) => blocks,
                Err(err) if err.is_incomplete_response() => {
                    debug!(
                        target: "sync",
                        %err,
                        %peer_id,
                        number = announcement.number,
                        "failed to fetch announced block, ignoring announcement"
                    );
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let Some(block) = blocks.into_iter().next() else {
                debug!(
                    target: "sync",
                    %peer_id,
                    number = announcement.number,
                    "peer returned no blocks for announcement, ignoring"
                );
                continue;
            };

            self.on_new_block_event(block, peer_id, chain).await?;
        }

        Ok(())
    }
}
