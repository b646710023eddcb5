//! The contract client: a bound (address, interface, provider) triple.

use crate::txn::Txn;
use crate::{Error, Result};
use alloy_primitives::U256;
use etherlite_abi::{Abi, Artifact, Value};
use etherlite_provider::Provider;
use etherlite_types::{Address, BlockTag, CallMsg, H256};
use etherlite_wallet::Key;
use std::collections::HashMap;
use std::sync::Arc;

/// Construction-time options for a [`Contract`].
#[derive(Debug, Clone, Default)]
pub struct ContractOptions {
    /// Build dynamic-fee (EIP-1559) transactions instead of legacy ones
    pub eip1559: bool,
}

/// A deployed contract bound to an interface and a provider.
///
/// Read calls work without a key; state-changing transactions require one
/// to be attached with [`Contract::with_key`]. The client holds no
/// connection state of its own; everything network-facing goes through
/// the provider.
#[derive(Clone)]
pub struct Contract {
    address: Address,
    abi: Abi,
    provider: Arc<dyn Provider>,
    key: Option<Arc<dyn Key>>,
    bytecode: Vec<u8>,
    opts: ContractOptions,
}

impl Contract {
    /// Binds an interface to a deployed address.
    pub fn new(address: Address, abi: Abi, provider: Arc<dyn Provider>) -> Self {
        Self {
            address,
            abi,
            provider,
            key: None,
            bytecode: Vec::new(),
            opts: ContractOptions::default(),
        }
    }

    /// Creates an undeployed contract from a compiled artifact.
    ///
    /// The returned client targets no address yet; use
    /// [`Contract::deploy`] to build the creation transaction, then
    /// re-bind to the address reported by its receipt.
    pub fn from_artifact(artifact: Artifact, provider: Arc<dyn Provider>) -> Self {
        Self {
            address: Address::ZERO,
            abi: artifact.abi,
            provider,
            key: None,
            bytecode: artifact.bytecode,
            opts: ContractOptions::default(),
        }
    }

    /// Attaches a signing key for state-changing transactions.
    pub fn with_key(mut self, key: Arc<dyn Key>) -> Self {
        self.key = Some(key);
        self
    }

    /// Attaches deployment bytecode for constructor transactions.
    pub fn with_bytecode(mut self, bytecode: Vec<u8>) -> Self {
        self.bytecode = bytecode;
        self
    }

    /// Switches transaction construction to the dynamic-fee variant.
    pub fn with_eip1559(mut self, eip1559: bool) -> Self {
        self.opts.eip1559 = eip1559;
        self
    }

    /// The bound contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The parsed interface.
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Re-binds the client to a different address. Used after deployment,
    /// once the receipt reports where the contract landed.
    pub fn at(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Executes a read-only method call at the given block.
    ///
    /// Returns the decoded outputs addressable both positionally (`"0"`,
    /// `"1"`, ...) and by declared output name. The bound key's address,
    /// if any, is passed as the caller.
    pub fn call(
        &self,
        method: &str,
        block: BlockTag,
        args: &[Value],
    ) -> Result<HashMap<String, Value>> {
        let method = self
            .abi
            .method(method)
            .ok_or_else(|| Error::MethodNotFound(method.to_string()))?;

        let msg = CallMsg {
            from: self.key.as_ref().map(|k| k.address()),
            to: Some(self.address),
            data: method.encode_call(args)?.into(),
            ..Default::default()
        };

        let output = self.provider.call(&msg, block)?;
        Ok(method.decode_output(&output)?)
    }

    /// Builds a state-changing transaction for a method.
    ///
    /// The returned [`Txn`] is unbuilt: gas, nonce and chain id are
    /// resolved lazily on [`Txn::build`]. Fails with
    /// [`Error::NoSigningKey`] if no key is attached.
    pub fn txn(&self, method: &str, args: &[Value]) -> Result<Txn> {
        if method == "constructor" {
            return self.deploy(args);
        }

        let key = self.key.clone().ok_or(Error::NoSigningKey)?;
        let method = self
            .abi
            .method(method)
            .ok_or_else(|| Error::MethodNotFound(method.to_string()))?;

        Ok(Txn::new(
            Arc::clone(&self.provider),
            key,
            Some(self.address),
            method.encode_call(args)?,
            self.opts.eip1559,
        ))
    }

    /// Builds the contract-creation transaction.
    ///
    /// The input is the deployment bytecode followed by the encoded
    /// constructor arguments, and the recipient is absent.
    pub fn deploy(&self, args: &[Value]) -> Result<Txn> {
        let key = self.key.clone().ok_or(Error::NoSigningKey)?;

        let mut input = self.bytecode.clone();
        match self.abi.constructor.as_ref() {
            Some(constructor) => input.extend_from_slice(&constructor.encode_args(args)?),
            None if args.is_empty() => {}
            None => return Err(Error::MethodNotFound("constructor".to_string())),
        }

        Ok(Txn::new(
            Arc::clone(&self.provider),
            key,
            None,
            input,
            self.opts.eip1559,
        ))
    }

    /// Executes a value transfer with no call data to an arbitrary
    /// recipient.
    pub fn transfer(&self, to: Address, value: U256) -> Result<Txn> {
        let key = self.key.clone().ok_or(Error::NoSigningKey)?;
        let mut txn = Txn::new(
            Arc::clone(&self.provider),
            key,
            Some(to),
            Vec::new(),
            self.opts.eip1559,
        );
        txn.opts_mut().value = Some(value);
        Ok(txn)
    }

    /// Predicts the address a creation transaction lands at, given the
    /// deployer's current nonce.
    pub fn deployment_address(deployer: Address, nonce: u64) -> Address {
        deployer.create_contract_address(nonce)
    }

    /// Looks up a receipt through the bound provider.
    pub fn receipt(&self, hash: H256) -> Result<Option<etherlite_types::Receipt>> {
        Ok(self.provider.receipt(hash)?)
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("address", &self.address)
            .field("methods", &self.abi.len())
            .field("has_key", &self.key.is_some())
            .finish()
    }
}
