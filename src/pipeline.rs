//! Per-run orchestration of asset flows.
//!
//! A distribution is described as a set of [`AssetFlow`]s, one per
//! token/recipient pair. Each flow runs acquisition, validation, and
//! aggregation in strict sequence; independent flows run concurrently and
//! their ledgers are merged by address once every flow has finished. The
//! [`Pipeline`] struct is the run's only context: it owns the configuration
//! and borrows the event source, so nothing lives in module-level state.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, B256, U256};
use futures::future::try_join_all;
use tracing::info;

use crate::config::ClaimscanConfig;
use crate::errors::ClaimscanError;
use crate::events::{EventValidator, NoRangeHint, RangeFetcher, RangeHint};
use crate::ledger::{AmountTransform, Ledger};
use crate::merkle::{assemble_ledger, ClaimDocument};
use crate::source::{EventSource, TransferFilter};

/// One token/recipient pair contributing to a distribution.
///
/// # Examples
///
/// ```rust,ignore
/// use claimscan::{AmountTransform, AssetFlow};
/// use std::num::NonZeroU64;
///
/// // LEND sent to the migrator is credited in AAVE at 100:1, excluding
/// // transfers already recorded by the migration event itself.
/// let flow = AssetFlow::new("LEND-MIGRATOR", lend_token, migrator)
///     .with_transform(AmountTransform::DivideBy(NonZeroU64::new(100).unwrap()))
///     .with_disqualifying_topic(migration_topic);
/// ```
#[derive(Debug, Clone)]
pub struct AssetFlow {
    /// Human-readable flow name, used in logs and summaries
    pub name: String,
    /// Chain the flow scans
    pub chain: NamedChain,
    /// Token contract emitting the transfers
    pub token: Address,
    /// Recipient the transfers were sent to
    pub recipient: Address,
    /// Per-event amount transform
    pub transform: AmountTransform,
    /// Log topic whose presence in a receipt disqualifies the transfer
    pub disqualifying_topic: Option<B256>,
}

impl AssetFlow {
    /// Creates a mainnet flow crediting raw amounts with no validation.
    pub fn new(name: impl Into<String>, token: Address, recipient: Address) -> Self {
        Self {
            name: name.into(),
            chain: NamedChain::Mainnet,
            token,
            recipient,
            transform: AmountTransform::Identity,
            disqualifying_topic: None,
        }
    }

    /// Sets the chain this flow scans.
    pub fn with_chain(mut self, chain: NamedChain) -> Self {
        self.chain = chain;
        self
    }

    /// Sets the per-event amount transform.
    pub fn with_transform(mut self, transform: AmountTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Excludes transfers whose receipt contains the given log topic.
    pub fn with_disqualifying_topic(mut self, topic: B256) -> Self {
        self.disqualifying_topic = Some(topic);
        self
    }
}

/// What one flow saw and kept, for operator logs and audit notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSummary {
    /// Flow name
    pub name: String,
    /// Events fetched before validation
    pub fetched: usize,
    /// Events that survived validation
    pub validated: usize,
    /// Highest block number among the kept events (0 if none)
    pub latest_block: u64,
    /// Post-transform total credited by this flow
    pub total_amount: U256,
}

/// Output of one completed flow.
#[derive(Debug, Clone)]
pub struct FlowOutput {
    /// Per-address amounts for this flow alone
    pub ledger: Ledger,
    /// Run statistics
    pub summary: FlowSummary,
}

/// The per-run context: event source, configuration, and range-hint parser.
pub struct Pipeline<'a, S: EventSource + ?Sized> {
    source: &'a S,
    config: ClaimscanConfig,
    hint: Box<dyn RangeHint>,
}

impl<'a, S: EventSource + ?Sized> Pipeline<'a, S> {
    /// Creates a pipeline that always bisects on failed log queries.
    pub fn new(source: &'a S, config: ClaimscanConfig) -> Self {
        Self {
            source,
            config,
            hint: Box::new(NoRangeHint),
        }
    }

    /// Installs a provider-specific range-hint parser.
    pub fn with_range_hint(mut self, hint: impl RangeHint + 'static) -> Self {
        self.hint = Box::new(hint);
        self
    }

    /// Runs one flow end to end over `[from_block, to_block]`:
    /// acquisition, then validation (skipped when the flow has no
    /// disqualifying topic), then aggregation.
    pub async fn run_flow(
        &self,
        flow: &AssetFlow,
        from_block: u64,
        to_block: u64,
    ) -> Result<FlowOutput, ClaimscanError> {
        info!(
            flow = %flow.name,
            chain = %flow.chain,
            token = %flow.token,
            recipient = %flow.recipient,
            from_block,
            to_block,
            "Running asset flow"
        );

        let filter = TransferFilter {
            token: flow.token,
            recipient: flow.recipient,
        };

        let fetcher = RangeFetcher::new(self.source, self.hint.as_ref());
        let events = fetcher.fetch_all(&filter, from_block, to_block).await?;
        let fetched = events.len();

        let events = match flow.disqualifying_topic {
            Some(topic) => {
                let validator = EventValidator::new(self.source, &self.config);
                validator
                    .validate(events, |receipt| receipt.has_topic(topic))
                    .await?
            }
            None => events,
        };
        let validated = events.len();
        let latest_block = events.iter().map(|e| e.block_number).max().unwrap_or(0);

        let ledger = Ledger::aggregate(&events, flow.transform);
        let summary = FlowSummary {
            name: flow.name.clone(),
            fetched,
            validated,
            latest_block,
            total_amount: ledger.total(),
        };

        info!(
            flow = %summary.name,
            fetched = summary.fetched,
            validated = summary.validated,
            latest_block = summary.latest_block,
            total_amount = %summary.total_amount,
            "Asset flow finished"
        );

        Ok(FlowOutput { ledger, summary })
    }

    /// Runs one flow over `[from_block, chain tip]`.
    pub async fn run_flow_to_tip(&self, flow: &AssetFlow, from_block: u64) -> Result<FlowOutput, ClaimscanError> {
        let tip = self.source.block_number().await?;
        self.run_flow(flow, from_block, tip).await
    }

    /// Runs all flows concurrently over the same block range and merges
    /// their ledgers by address. Any flow failure fails the whole run.
    pub async fn run_flows(
        &self,
        flows: &[AssetFlow],
        from_block: u64,
        to_block: u64,
    ) -> Result<(Ledger, Vec<FlowSummary>), ClaimscanError> {
        let outputs = try_join_all(
            flows
                .iter()
                .map(|flow| self.run_flow(flow, from_block, to_block)),
        )
        .await?;

        let mut merged = Ledger::new();
        let mut summaries = Vec::with_capacity(outputs.len());
        for output in outputs {
            merged.merge(output.ledger);
            summaries.push(output.summary);
        }

        info!(
            flows = summaries.len(),
            addresses = merged.len(),
            total_amount = %merged.total(),
            "Merged flow ledgers"
        );

        Ok((merged, summaries))
    }

    /// Runs all flows and assembles the merged ledger into the final claim
    /// document. All-or-nothing: any stage failure produces no document.
    pub async fn build_claim_document(
        &self,
        flows: &[AssetFlow],
        from_block: u64,
        to_block: u64,
    ) -> Result<ClaimDocument, ClaimscanError> {
        let (ledger, _) = self.run_flows(flows, from_block, to_block).await?;
        Ok(assemble_ledger(&ledger)?)
    }
}
