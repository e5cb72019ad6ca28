//! Approval state and approval transactions of NFT collections and ERC-20
//! currencies.

use {
    crate::{AtBlock, ContractCall, Overrides, Sdk, error::Result},
    alloy::primitives::{Address, U256},
    contracts::{ERC20, ERC721},
    tracing::instrument,
};

impl Sdk {
    #[instrument(skip(self))]
    pub async fn is_approved_for_all(
        &self,
        collection: Address,
        owner: Address,
        operator: Address,
    ) -> Result<bool> {
        Ok(ERC721::Instance::new(collection, self.provider().clone())
            .isApprovedForAll(owner, operator)
            .at(self.block())
            .call()
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn allowance(
        &self,
        currency: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        Ok(ERC20::Instance::new(currency, self.provider().clone())
            .allowance(owner, spender)
            .at(self.block())
            .call()
            .await?)
    }

    /// Approves (or revokes) the ERC-721 transfer manager for every item of
    /// the signer in `collection`.
    pub fn approve_all_collection_items(
        &self,
        collection: Address,
        approved: bool,
        overrides: Overrides,
    ) -> Result<ContractCall<()>> {
        let call = ERC721::setApprovalForAllCall {
            operator: self.addresses().transfer_manager_erc721,
            approved,
        };
        Ok(self
            .contract_call(collection, call, overrides)?
            .discard_return())
    }

    /// Lets the exchange spend `amount` of the signer's `currency`, unlimited
    /// when no amount is given.
    pub fn approve_erc20(
        &self,
        currency: Address,
        amount: Option<U256>,
        overrides: Overrides,
    ) -> Result<ContractCall<bool>> {
        let call = ERC20::approveCall {
            spender: self.addresses().exchange,
            amount: amount.unwrap_or(U256::MAX),
        };
        self.contract_call(currency, call, overrides)
    }
}
