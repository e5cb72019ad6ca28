use {
    crate::{AtBlock, Sdk, error::Result},
    alloy::primitives::{Address, U256},
    contracts::{ExecutionStrategy, RoyaltyFeeManager},
    tracing::instrument,
};

impl Sdk {
    /// Protocol fee of an execution strategy in basis points.
    #[instrument(skip(self))]
    pub async fn protocol_fee(&self, strategy: Address) -> Result<U256> {
        Ok(ExecutionStrategy::Instance::new(strategy, self.provider().clone())
            .viewProtocolFee()
            .at(self.block())
            .call()
            .await?)
    }

    /// Royalty receiver and the royalty owed when `token_id` of `collection`
    /// sells for `amount`.
    #[instrument(skip(self))]
    pub async fn royalty_fee_and_recipient(
        &self,
        collection: Address,
        token_id: U256,
        amount: U256,
    ) -> Result<(Address, U256)> {
        let manager = self.addresses().royalty_fee_manager()?;
        let royalty = RoyaltyFeeManager::Instance::new(manager, self.provider().clone())
            .calculateRoyaltyFeeAndGetRecipient(collection, token_id, amount)
            .at(self.block())
            .call()
            .await?;
        Ok((royalty.receiver, royalty.royaltyAmount))
    }
}
