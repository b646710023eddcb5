//! Well-known interfaces and deployed addresses.
//!
//! These are process-wide read-only constants: the singleton name-service
//! registry deployed at the same address across the public networks, and
//! the standard token interface.

use crate::contract::Contract;
use crate::txn::Txn;
use crate::Result;
use alloy_primitives::U256;
use etherlite_abi::{Abi, Value};
use etherlite_provider::Provider;
use etherlite_types::{Address, BlockTag};
use etherlite_wallet::Key;
use std::sync::Arc;

/// The name-service registry address shared by mainnet and the public
/// test networks.
pub const NAME_REGISTRY: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97,
    0xba, 0x6c, 0x7d, 0x2e, 0x1e,
]);

/// Chain ids the registry is deployed on: mainnet, ropsten, rinkeby, goerli.
const NAME_REGISTRY_CHAINS: [u64; 4] = [1, 3, 4, 5];

/// Looks up the name-service registry address for a chain.
///
/// Returns `None` for chains without a known deployment.
pub fn name_registry(chain_id: u64) -> Option<Address> {
    NAME_REGISTRY_CHAINS
        .contains(&chain_id)
        .then_some(NAME_REGISTRY)
}

/// Builds the standard ERC-20 token interface.
pub fn erc20_abi() -> Abi {
    // static signatures parse infallibly
    Abi::parse(&[
        "function name() view returns (string)",
        "function symbol() view returns (string)",
        "function decimals() view returns (uint8)",
        "function totalSupply() view returns (uint256)",
        "function balanceOf(address owner) view returns (uint256 balance)",
        "function transfer(address to, uint256 amount) returns (bool)",
        "function transferFrom(address from, address to, uint256 amount) returns (bool)",
        "function approve(address spender, uint256 amount) returns (bool)",
        "function allowance(address owner, address spender) view returns (uint256)",
    ])
    .unwrap_or_default()
}

/// A typed client for a standard ERC-20 token.
#[derive(Debug, Clone)]
pub struct Erc20 {
    contract: Contract,
}

impl Erc20 {
    /// Binds the token at the given address.
    pub fn new(address: Address, provider: Arc<dyn Provider>) -> Self {
        Self {
            contract: Contract::new(address, erc20_abi(), provider),
        }
    }

    /// Attaches a signing key for transfers and approvals.
    pub fn with_key(mut self, key: Arc<dyn Key>) -> Self {
        self.contract = self.contract.with_key(key);
        self
    }

    /// The underlying contract client.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// The token's name.
    pub fn name(&self) -> Result<String> {
        let out = self.contract.call("name", BlockTag::Latest, &[])?;
        Ok(out["0"].as_str().unwrap_or_default().to_string())
    }

    /// The token's ticker symbol.
    pub fn symbol(&self) -> Result<String> {
        let out = self.contract.call("symbol", BlockTag::Latest, &[])?;
        Ok(out["0"].as_str().unwrap_or_default().to_string())
    }

    /// The token's display decimals.
    pub fn decimals(&self) -> Result<u8> {
        let out = self.contract.call("decimals", BlockTag::Latest, &[])?;
        Ok(out["0"].as_uint().unwrap_or_default().to::<u8>())
    }

    /// Total token supply.
    pub fn total_supply(&self) -> Result<U256> {
        let out = self.contract.call("totalSupply", BlockTag::Latest, &[])?;
        Ok(out["0"].as_uint().unwrap_or_default())
    }

    /// Balance of a holder.
    pub fn balance_of(&self, owner: Address) -> Result<U256> {
        let out = self
            .contract
            .call("balanceOf", BlockTag::Latest, &[Value::Address(owner)])?;
        Ok(out["0"].as_uint().unwrap_or_default())
    }

    /// Remaining allowance from an owner to a spender.
    pub fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let out = self.contract.call(
            "allowance",
            BlockTag::Latest,
            &[Value::Address(owner), Value::Address(spender)],
        )?;
        Ok(out["0"].as_uint().unwrap_or_default())
    }

    /// Builds a transfer transaction.
    pub fn transfer(&self, to: Address, amount: U256) -> Result<Txn> {
        self.contract
            .txn("transfer", &[Value::Address(to), Value::Uint(amount)])
    }

    /// Builds an approval transaction.
    pub fn approve(&self, spender: Address, amount: U256) -> Result<Txn> {
        self.contract
            .txn("approve", &[Value::Address(spender), Value::Uint(amount)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_chain_coverage() {
        for chain in [1u64, 3, 4, 5] {
            assert_eq!(name_registry(chain), Some(NAME_REGISTRY));
        }
        assert_eq!(name_registry(1337), None);
        assert_eq!(name_registry(42161), None);
    }

    #[test]
    fn test_registry_address_value() {
        assert_eq!(
            NAME_REGISTRY.to_checksum_string(),
            "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e",
        );
    }

    #[test]
    fn test_erc20_abi_selectors() {
        let abi = erc20_abi();
        assert_eq!(
            abi.method("transfer").unwrap().selector(),
            [0xa9, 0x05, 0x9c, 0xbb],
        );
        assert_eq!(
            abi.method("balanceOf").unwrap().selector(),
            [0x70, 0xa0, 0x82, 0x31],
        );
    }
}
