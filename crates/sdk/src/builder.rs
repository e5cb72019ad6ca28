//! Assembly of maker and taker orders with the exchange's defaults.

use {
    crate::{Sdk, error::Result},
    alloy::primitives::{Address, U256},
    model::order::{MakerOrder, OrderParams, TakerOrder},
    time::OffsetDateTime,
    tracing::instrument,
};

/// What a maker has to decide about an ask or a bid. Unset optional fields
/// get the exchange's defaults.
#[derive(Clone, Debug, Default)]
pub struct MakerOrderInput {
    pub collection: Address,
    pub price: U256,
    pub token_id: U256,
    pub nonce: U256,
    pub end_time: U256,
    /// Defaults to 1.
    pub amount: Option<U256>,
    pub strategy: Option<Address>,
    /// Defaults to the wrapped native token.
    pub currency: Option<Address>,
    /// Defaults to now.
    pub start_time: Option<U256>,
    /// Defaults to 0.
    pub min_percentage_to_ask: Option<U256>,
    pub params: OrderParams,
}

/// A bid for any item of a collection.
#[derive(Clone, Debug, Default)]
pub struct CollectionOfferInput {
    pub collection: Address,
    pub price: U256,
    pub nonce: U256,
    pub end_time: U256,
    pub amount: Option<U256>,
    /// Defaults to the collection sale strategy.
    pub strategy: Option<Address>,
    pub currency: Option<Address>,
    pub start_time: Option<U256>,
    pub min_percentage_to_ask: Option<U256>,
    pub params: OrderParams,
}

impl From<CollectionOfferInput> for MakerOrderInput {
    fn from(input: CollectionOfferInput) -> Self {
        Self {
            collection: input.collection,
            price: input.price,
            token_id: U256::ZERO,
            nonce: input.nonce,
            end_time: input.end_time,
            amount: input.amount,
            strategy: input.strategy,
            currency: input.currency,
            start_time: input.start_time,
            min_percentage_to_ask: input.min_percentage_to_ask,
            params: input.params,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TakerOrderInput {
    pub taker: Address,
    /// The item a taker fills a collection offer with. Defaults to the
    /// maker's token id.
    pub token_id: Option<U256>,
    pub min_percentage_to_ask: Option<U256>,
    pub params: OrderParams,
}

impl Sdk {
    /// Builds an ask of the bound signer and reports whether the collection
    /// already approved the ERC-721 transfer manager to move the signer's
    /// items.
    #[instrument(skip_all, fields(collection = ?input.collection, token_id = %input.token_id))]
    pub async fn create_maker_ask(&self, input: MakerOrderInput) -> Result<(MakerOrder, bool)> {
        let signer = self.signer_address()?;
        let strategy = self.addresses().strategy_standard_sale;
        let order = self.assemble_maker_order(true, signer, strategy, input)?;
        let approved = self
            .is_approved_for_all(
                order.collection,
                signer,
                self.addresses().transfer_manager_erc721,
            )
            .await?;
        tracing::debug!(approved, "built maker ask");
        Ok((order, approved))
    }

    /// Builds a bid of the bound signer and reports whether the signer's
    /// currency allowance to the exchange covers the price.
    #[instrument(skip_all, fields(collection = ?input.collection, token_id = %input.token_id))]
    pub async fn create_maker_bid(&self, input: MakerOrderInput) -> Result<(MakerOrder, bool)> {
        let signer = self.signer_address()?;
        let strategy = self.addresses().standard_bid_strategy();
        let order = self.assemble_maker_order(false, signer, strategy, input)?;
        self.with_currency_approval(order).await
    }

    /// Builds a bid for any item of a collection. Takers pick the item when
    /// they fill it.
    #[instrument(skip_all, fields(collection = ?input.collection))]
    pub async fn create_maker_collection_offer(
        &self,
        input: CollectionOfferInput,
    ) -> Result<(MakerOrder, bool)> {
        let signer = self.signer_address()?;
        let strategy = self.addresses().strategy_collection_sale;
        let order = self.assemble_maker_order(false, signer, strategy, input.into())?;
        self.with_currency_approval(order).await
    }

    async fn with_currency_approval(&self, order: MakerOrder) -> Result<(MakerOrder, bool)> {
        let allowance = self
            .allowance(order.currency, order.signer, self.addresses().exchange)
            .await?;
        let approved = allowance >= order.price;
        tracing::debug!(%allowance, approved, "built maker bid");
        Ok((order, approved))
    }

    fn assemble_maker_order(
        &self,
        is_order_ask: bool,
        signer: Address,
        default_strategy: Address,
        input: MakerOrderInput,
    ) -> Result<MakerOrder> {
        let order = MakerOrder {
            is_order_ask,
            signer,
            collection: input.collection,
            price: input.price,
            token_id: input.token_id,
            amount: input.amount.unwrap_or(U256::from(1)),
            strategy: input.strategy.unwrap_or(default_strategy),
            currency: input.currency.unwrap_or(self.addresses().weth),
            nonce: input.nonce,
            start_time: input.start_time.unwrap_or_else(now),
            end_time: input.end_time,
            min_percentage_to_ask: input.min_percentage_to_ask.unwrap_or_default(),
            params: input.params.into_encoded(),
        };
        order.validate_timestamps().inspect_err(|err| {
            tracing::warn!(?err, "rejected maker order");
        })?;
        Ok(order)
    }
}

/// Builds the counter order filling `maker`.
pub fn create_taker(maker: &MakerOrder, input: TakerOrderInput) -> TakerOrder {
    TakerOrder {
        is_order_ask: !maker.is_order_ask,
        taker: input.taker,
        price: maker.price,
        token_id: input.token_id.unwrap_or(maker.token_id),
        min_percentage_to_ask: input.min_percentage_to_ask.unwrap_or_default(),
        params: input.params.encoded(),
    }
}

fn now() -> U256 {
    let seconds = OffsetDateTime::now_utc().unix_timestamp();
    U256::from(seconds.max(0).unsigned_abs())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{Deployment, Error, Sdk, testing},
        alloy::{
            primitives::{Bytes, address, bytes},
            signers::local::PrivateKeySigner,
            sol_types::SolValue,
        },
        model::params::Param,
    };

    fn ask_input() -> MakerOrderInput {
        MakerOrderInput {
            collection: testing::COLLECTION,
            price: U256::from(10).pow(U256::from(18)),
            token_id: U256::from(1),
            nonce: U256::from(0),
            end_time: U256::from(1_900_000_000u64),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn maker_ask_defaults() {
        let (sdk, asserter) = testing::sdk_with_wallet();
        asserter.push_success(&Bytes::from(false.abi_encode()));

        let before = now();
        let (order, approved) = sdk.create_maker_ask(ask_input()).await.unwrap();
        assert!(!approved);
        assert!(order.is_order_ask);
        assert_eq!(order.signer, sdk.signer_address().unwrap());
        assert_eq!(order.amount, U256::from(1));
        assert_eq!(order.strategy, testing::STRATEGY_STANDARD_SALE);
        assert_eq!(order.currency, testing::WETH);
        assert_eq!(order.min_percentage_to_ask, U256::ZERO);
        assert_eq!(order.params.encoded(), Bytes::new());
        assert!(order.start_time >= before && order.start_time <= now());
    }

    #[tokio::test]
    async fn maker_ask_reports_approval() {
        let (sdk, asserter) = testing::sdk_with_wallet();
        asserter.push_success(&Bytes::from(true.abi_encode()));
        let (_, approved) = sdk.create_maker_ask(ask_input()).await.unwrap();
        assert!(approved);
    }

    #[tokio::test]
    async fn maker_bid_defaults() {
        let strategy = address!("a51c1fc2f0d1a1b8494ed1fe312d7c3a78ed91c0");
        let mut addresses = testing::addresses();
        addresses.strategy_standard_bid = Some(strategy);
        let (sdk, asserter) = testing::sdk();
        let sdk = Sdk::new(sdk.provider().clone(), Deployment::new(31337, addresses))
            .with_wallet(PrivateKeySigner::random());
        asserter.push_success(&Bytes::from(U256::ZERO.abi_encode()));

        let before = now();
        let (order, approved) = sdk.create_maker_bid(ask_input()).await.unwrap();
        assert!(!approved);
        assert!(!order.is_order_ask);
        assert_eq!(order.signer, sdk.signer_address().unwrap());
        assert_eq!(order.amount, U256::from(1));
        assert_eq!(order.strategy, strategy);
        assert_eq!(order.currency, testing::WETH);
        assert_eq!(order.min_percentage_to_ask, U256::ZERO);
        assert_eq!(order.params.encoded(), Bytes::new());
        assert!(order.start_time >= before && order.start_time <= now());
    }

    #[tokio::test]
    async fn maker_bid_compares_allowance_with_price() {
        let (sdk, asserter) = testing::sdk_with_wallet();
        let input = MakerOrderInput {
            currency: Some(testing::USDC),
            price: U256::from(500),
            ..ask_input()
        };

        asserter.push_success(&Bytes::from(U256::from(500).abi_encode()));
        let (order, approved) = sdk.create_maker_bid(input.clone()).await.unwrap();
        assert!(approved);
        assert!(!order.is_order_ask);
        assert_eq!(order.currency, testing::USDC);
        assert_eq!(order.strategy, testing::STRATEGY_STANDARD_SALE);

        asserter.push_success(&Bytes::from(U256::from(499).abi_encode()));
        let (_, approved) = sdk.create_maker_bid(input).await.unwrap();
        assert!(!approved);
    }

    #[tokio::test]
    async fn collection_offer_has_no_token_id() {
        let (sdk, asserter) = testing::sdk_with_wallet();
        asserter.push_success(&Bytes::from(U256::MAX.abi_encode()));

        let (order, approved) = sdk
            .create_maker_collection_offer(CollectionOfferInput {
                collection: testing::COLLECTION,
                price: U256::from(7),
                nonce: U256::from(3),
                end_time: U256::from(1_900_000_000u64),
                params: vec![Param::Uint256(U256::from(9800))].into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(approved);
        assert_eq!(order.token_id, U256::ZERO);
        assert_eq!(order.strategy, testing::STRATEGY_COLLECTION_SALE);
        assert_eq!(order.currency, testing::WETH);
        assert_eq!(
            order.params,
            OrderParams::Encoded(bytes!(
                "0000000000000000000000000000000000000000000000000000000000002648"
            ))
        );
    }

    #[tokio::test]
    async fn millisecond_timestamps_are_rejected_before_any_call() {
        let (sdk, _asserter) = testing::sdk_with_wallet();
        let millis = U256::from(1_700_000_000_000u64);

        let result = sdk
            .create_maker_ask(MakerOrderInput {
                start_time: Some(millis),
                ..ask_input()
            })
            .await;
        assert!(matches!(result, Err(Error::InvalidTimestamp(_))));

        let result = sdk
            .create_maker_bid(MakerOrderInput {
                end_time: millis,
                ..ask_input()
            })
            .await;
        assert!(matches!(result, Err(Error::InvalidTimestamp(_))));
    }

    #[tokio::test]
    async fn ten_digit_timestamps_are_accepted() {
        let (sdk, asserter) = testing::sdk_with_wallet();
        asserter.push_success(&Bytes::from(true.abi_encode()));
        let (order, _) = sdk
            .create_maker_ask(MakerOrderInput {
                start_time: Some(U256::from(9_999_999_999u64)),
                end_time: U256::from(9_999_999_999u64),
                ..ask_input()
            })
            .await
            .unwrap();
        assert_eq!(order.start_time, U256::from(9_999_999_999u64));
    }

    #[tokio::test]
    async fn building_requires_a_signer() {
        let (sdk, _asserter) = testing::sdk();
        assert!(matches!(
            sdk.create_maker_ask(ask_input()).await,
            Err(Error::SignerNotConfigured)
        ));
        assert!(matches!(
            sdk.create_maker_bid(ask_input()).await,
            Err(Error::SignerNotConfigured)
        ));
    }

    #[test]
    fn taker_mirrors_maker() {
        let maker = MakerOrder {
            is_order_ask: true,
            price: U256::from(42),
            token_id: U256::from(7),
            ..Default::default()
        };
        let taker = create_taker(
            &maker,
            TakerOrderInput {
                taker: Address::repeat_byte(9),
                ..Default::default()
            },
        );
        assert!(!taker.is_order_ask);
        assert_eq!(taker.taker, Address::repeat_byte(9));
        assert_eq!(taker.price, maker.price);
        assert_eq!(taker.token_id, maker.token_id);
        assert_eq!(taker.min_percentage_to_ask, U256::ZERO);
        assert!(taker.params.is_empty());
    }

    #[test]
    fn taker_picks_item_of_collection_offer() {
        let offer = MakerOrder {
            is_order_ask: false,
            price: U256::from(42),
            ..Default::default()
        };
        let taker = create_taker(
            &offer,
            TakerOrderInput {
                taker: Address::repeat_byte(9),
                token_id: Some(U256::from(1234)),
                min_percentage_to_ask: Some(U256::from(9800)),
                params: vec![Param::Bool(true)].into(),
            },
        );
        assert!(taker.is_order_ask);
        assert_eq!(taker.token_id, U256::from(1234));
        assert_eq!(taker.min_percentage_to_ask, U256::from(9800));
        assert_eq!(taker.params.len(), 32);
    }
}
