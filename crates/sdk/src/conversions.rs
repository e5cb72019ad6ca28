//! Conversions from the order model into the calldata structs of the
//! exchange.

use {
    contracts::OrderTypes,
    model::{
        order::{MakerOrder, TakerOrder},
        signature::EcdsaSignature,
    },
};

/// The maker order with its signature components inlined, as the exchange
/// and the validator expect it.
pub(crate) fn signed_maker_order(
    order: &MakerOrder,
    signature: &EcdsaSignature,
) -> OrderTypes::MakerOrder {
    OrderTypes::MakerOrder {
        isOrderAsk: order.is_order_ask,
        signer: order.signer,
        collection: order.collection,
        price: order.price,
        tokenId: order.token_id,
        amount: order.amount,
        strategy: order.strategy,
        currency: order.currency,
        nonce: order.nonce,
        startTime: order.start_time,
        endTime: order.end_time,
        minPercentageToAsk: order.min_percentage_to_ask,
        params: order.params.encoded(),
        v: signature.v,
        r: signature.r,
        s: signature.s,
    }
}

pub(crate) fn taker_order(order: &TakerOrder) -> OrderTypes::TakerOrder {
    OrderTypes::TakerOrder {
        isOrderAsk: order.is_order_ask,
        taker: order.taker,
        price: order.price,
        tokenId: order.token_id,
        minPercentageToAsk: order.min_percentage_to_ask,
        params: order.params.clone(),
    }
}
