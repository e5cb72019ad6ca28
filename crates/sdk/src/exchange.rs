//! Trade execution, order cancellation and nonce reads on the exchange.

use {
    crate::{
        AtBlock,
        ContractCall,
        Overrides,
        Sdk,
        conversions::{signed_maker_order, taker_order},
        error::Result,
    },
    alloy::primitives::{Address, U256},
    contracts::LooksRareExchange,
    model::{
        order::{MakerOrder, TakerOrder},
        signature::EcdsaSignature,
    },
    tracing::instrument,
};

/// The exchange function that settles a maker order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryPoint {
    /// Maker ask priced in WETH. The taker may pay with any mix of native
    /// currency (sent as value) and WETH.
    MatchAskWithTakerBidUsingEthAndWeth,
    /// Maker ask priced in any other currency.
    MatchAskWithTakerBid,
    /// Maker bid, filled by a taker ask.
    MatchBidWithTakerAsk,
}

impl EntryPoint {
    pub fn select(maker: &MakerOrder, weth: Address) -> Self {
        match (maker.is_order_ask, maker.currency == weth) {
            (true, true) => Self::MatchAskWithTakerBidUsingEthAndWeth,
            (true, false) => Self::MatchAskWithTakerBid,
            (false, _) => Self::MatchBidWithTakerAsk,
        }
    }
}

impl Sdk {
    fn exchange(&self) -> LooksRareExchange::Instance {
        LooksRareExchange::Instance::new(self.addresses().exchange, self.provider().clone())
    }

    /// Prepares the match of a signed maker order with a taker order. Any
    /// native currency to send along goes in the overrides.
    #[instrument(skip_all, fields(maker = ?maker.signer, nonce = %maker.nonce))]
    pub fn execute_order(
        &self,
        maker: &MakerOrder,
        taker: &TakerOrder,
        signature: &str,
        overrides: Overrides,
    ) -> Result<ContractCall<()>> {
        let signature: EcdsaSignature = signature.parse()?;
        let maker_order = signed_maker_order(maker, &signature);
        let taker_order = taker_order(taker);
        let to = self.addresses().exchange;

        let entry_point = EntryPoint::select(maker, self.addresses().weth);
        tracing::debug!(?entry_point, "executing order");
        let call = match entry_point {
            EntryPoint::MatchAskWithTakerBidUsingEthAndWeth => self
                .contract_call(
                    to,
                    LooksRareExchange::matchAskWithTakerBidUsingETHAndWETHCall {
                        takerBid: taker_order,
                        makerAsk: maker_order,
                    },
                    overrides,
                )?
                .discard_return(),
            EntryPoint::MatchAskWithTakerBid => self
                .contract_call(
                    to,
                    LooksRareExchange::matchAskWithTakerBidCall {
                        takerBid: taker_order,
                        makerAsk: maker_order,
                    },
                    overrides,
                )?
                .discard_return(),
            EntryPoint::MatchBidWithTakerAsk => self
                .contract_call(
                    to,
                    LooksRareExchange::matchBidWithTakerAskCall {
                        takerAsk: taker_order,
                        makerBid: maker_order,
                    },
                    overrides,
                )?
                .discard_return(),
        };
        Ok(call)
    }

    /// Invalidates every order of the signer with a nonce below `min_nonce`.
    pub fn cancel_all_orders_for_sender(
        &self,
        min_nonce: U256,
        overrides: Overrides,
    ) -> Result<ContractCall<()>> {
        let call = LooksRareExchange::cancelAllOrdersForSenderCall {
            minNonce: min_nonce,
        };
        Ok(self
            .contract_call(self.addresses().exchange, call, overrides)?
            .discard_return())
    }

    pub fn cancel_multiple_maker_orders(
        &self,
        nonces: Vec<U256>,
        overrides: Overrides,
    ) -> Result<ContractCall<()>> {
        let call = LooksRareExchange::cancelMultipleMakerOrdersCall {
            orderNonces: nonces,
        };
        Ok(self
            .contract_call(self.addresses().exchange, call, overrides)?
            .discard_return())
    }

    /// Orders of `user` with a lower nonce can no longer be executed.
    #[instrument(skip(self))]
    pub async fn user_min_order_nonce(&self, user: Address) -> Result<U256> {
        Ok(self
            .exchange()
            .userMinOrderNonce(user)
            .at(self.block())
            .call()
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn is_user_order_nonce_executed_or_cancelled(
        &self,
        user: Address,
        nonce: U256,
    ) -> Result<bool> {
        Ok(self
            .exchange()
            .isUserOrderNonceExecutedOrCancelled(user, nonce)
            .at(self.block())
            .call()
            .await?)
    }
}
