//! The in-flight transaction handle.
//!
//! A [`Txn`] progresses through build, send and wait. Build resolves fees,
//! gas and nonce through the provider; send signs and broadcasts; wait
//! polls for the receipt with a bounded, cancellable retry loop. Each
//! handle owns its mutable state exclusively; callers issuing concurrent
//! transactions from one key must sequence nonces themselves.

use crate::{Error, Result};
use alloy_primitives::U256;
use bytes::Bytes;
use etherlite_provider::Provider;
use etherlite_types::{
    Address, BlockTag, CallMsg, DynamicFeeTx, LegacyTx, Receipt, SignedTransaction, Transaction,
    H256,
};
use etherlite_wallet::{sign_transaction, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Caller-supplied overrides for transaction construction.
///
/// Unset fields are resolved through the provider during build.
#[derive(Debug, Clone, Default)]
pub struct TxnOpts {
    /// Value in wei attached to the transaction
    pub value: Option<U256>,
    /// Gas price in wei; for dynamic-fee transactions this pins both fee
    /// fields instead of consulting the estimator
    pub gas_price: Option<u128>,
    /// Gas limit; skips the provider's estimate when set
    pub gas_limit: Option<u64>,
    /// Sender nonce; skips the provider's account query when set
    pub nonce: Option<u64>,
}

/// Bounds on the receipt-confirmation wait.
#[derive(Debug, Clone)]
pub struct WaitOpts {
    /// Total time to keep polling before giving up
    pub timeout: Duration,
    /// Delay between receipt queries
    pub poll_interval: Duration,
    /// Caller-triggered abort signal
    pub cancel: Option<CancelToken>,
}

impl Default for WaitOpts {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            cancel: None,
        }
    }
}

/// A shareable abort signal for [`Txn::wait`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Checks if cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Derives the two dynamic-fee fields for an EIP-1559 transaction.
///
/// The policy is pluggable: the default [`GasPriceFee`] mirrors the
/// node's gas price into both fields, which overpays the tip; a real
/// deployment can substitute a fee-market estimator.
pub trait FeeEstimator: Send + Sync {
    /// Returns `(max_fee_per_gas, max_priority_fee_per_gas)` in wei.
    fn estimate(&self, provider: &dyn Provider) -> Result<(u128, u128)>;
}

/// The default fee policy: both fields set to the current gas price.
#[derive(Debug, Clone, Copy, Default)]
pub struct GasPriceFee;

impl FeeEstimator for GasPriceFee {
    fn estimate(&self, provider: &dyn Provider) -> Result<(u128, u128)> {
        let gas_price = provider.gas_price()?;
        Ok((gas_price, gas_price))
    }
}

/// An in-flight transaction owned by the caller that created it.
pub struct Txn {
    provider: Arc<dyn Provider>,
    key: Arc<dyn Key>,
    to: Option<Address>,
    input: Vec<u8>,
    eip1559: bool,
    opts: TxnOpts,
    fee_estimator: Box<dyn FeeEstimator>,
    built: Option<Transaction>,
    sent: Option<(SignedTransaction, H256)>,
}

impl Txn {
    pub(crate) fn new(
        provider: Arc<dyn Provider>,
        key: Arc<dyn Key>,
        to: Option<Address>,
        input: Vec<u8>,
        eip1559: bool,
    ) -> Self {
        Self {
            provider,
            key,
            to,
            input,
            eip1559,
            opts: TxnOpts::default(),
            fee_estimator: Box::new(GasPriceFee),
            built: None,
            sent: None,
        }
    }

    /// Mutable access to the construction overrides.
    ///
    /// Only meaningful before [`Txn::build`]; later changes are ignored.
    pub fn opts_mut(&mut self) -> &mut TxnOpts {
        &mut self.opts
    }

    /// Replaces the dynamic-fee policy.
    pub fn with_fee_estimator(mut self, estimator: Box<dyn FeeEstimator>) -> Self {
        self.fee_estimator = estimator;
        self
    }

    /// The transaction as resolved by build, if build has run.
    pub fn transaction(&self) -> Option<&Transaction> {
        self.built.as_ref()
    }

    /// The broadcast hash, if send has run.
    pub fn hash(&self) -> Option<H256> {
        self.sent.as_ref().map(|(_, hash)| *hash)
    }

    /// Resolves fees, gas limit, nonce and chain id through the provider
    /// and assembles the transaction.
    ///
    /// Idempotent: a second call returns without re-querying. Any provider
    /// failure is fatal and surfaced immediately.
    pub fn build(&mut self) -> Result<()> {
        if self.built.is_some() {
            return Ok(());
        }

        let from = self.key.address();
        let chain_id = self.provider.chain_id()?;
        let value = self.opts.value.unwrap_or(U256::ZERO);

        let gas_limit = match self.opts.gas_limit {
            Some(gas) => gas,
            None => self.provider.estimate_gas(&CallMsg {
                from: Some(from),
                to: self.to,
                value: self.opts.value,
                data: self.input.clone().into(),
                ..Default::default()
            })?,
        };

        let nonce = match self.opts.nonce {
            Some(nonce) => nonce,
            None => self.provider.nonce(from, BlockTag::Latest)?,
        };

        let data = Bytes::from(self.input.clone());
        let transaction = if self.eip1559 {
            let (max_fee, max_priority) = match self.opts.gas_price {
                Some(price) => (price, price),
                None => self.fee_estimator.estimate(self.provider.as_ref())?,
            };
            Transaction::DynamicFee(DynamicFeeTx {
                chain_id,
                nonce,
                max_priority_fee_per_gas: max_priority,
                max_fee_per_gas: max_fee,
                gas_limit,
                to: self.to,
                value,
                data,
                access_list: Vec::new(),
            })
        } else {
            let gas_price = match self.opts.gas_price {
                Some(price) => price,
                None => self.provider.gas_price()?,
            };
            Transaction::Legacy(LegacyTx {
                chain_id: Some(chain_id),
                nonce,
                gas_price,
                gas_limit,
                to: self.to,
                value,
                data,
            })
        };

        debug!(nonce, gas_limit, chain_id, "transaction built");
        self.built = Some(transaction);
        Ok(())
    }

    /// Signs and broadcasts the transaction, returning its hash.
    ///
    /// Builds first if [`Txn::build`] has not run. Re-sending an already
    /// sent transaction is an [`Error::InvalidState`].
    pub fn send(&mut self) -> Result<H256> {
        if self.sent.is_some() {
            return Err(Error::InvalidState("transaction already sent"));
        }
        self.build()?;

        // built is always present after build succeeds
        let transaction = self
            .built
            .clone()
            .ok_or(Error::InvalidState("transaction not built"))?;

        let signed = sign_transaction(transaction, self.key.as_ref())?;
        let hash = self.provider.send_raw_transaction(&signed.rlp_encode())?;

        debug!(%hash, "transaction broadcast");
        self.sent = Some((signed, hash));
        Ok(hash)
    }

    /// Polls for the receipt until it appears, the timeout elapses or the
    /// caller cancels.
    ///
    /// A missing receipt is a retry signal, never a failure; polls are
    /// spaced by the configured interval to avoid flooding the node. Fails
    /// with [`Error::InvalidState`] before [`Txn::send`] has run.
    pub fn wait(&self, opts: &WaitOpts) -> Result<Receipt> {
        let (_, hash) = self
            .sent
            .as_ref()
            .ok_or(Error::InvalidState("transaction not sent"))?;

        let deadline = Instant::now() + opts.timeout;
        loop {
            if let Some(cancel) = &opts.cancel {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
            }

            if let Some(receipt) = self.provider.receipt(*hash)? {
                debug!(%hash, block = receipt.block_number.0, "transaction confirmed");
                return Ok(receipt);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::Timeout(opts.timeout));
            }
            std::thread::sleep(opts.poll_interval.min(deadline - now));
        }
    }

    /// Convenience for send followed by wait with default bounds.
    pub fn send_and_wait(&mut self) -> Result<Receipt> {
        self.send()?;
        self.wait(&WaitOpts::default())
    }
}

impl std::fmt::Debug for Txn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.sent.is_some() {
            "sent"
        } else if self.built.is_some() {
            "built"
        } else {
            "unbuilt"
        };
        f.debug_struct("Txn")
            .field("state", &state)
            .field("to", &self.to)
            .field("input_len", &self.input.len())
            .finish()
    }
}
