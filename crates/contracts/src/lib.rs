//! ABI bindings of the marketplace exchange and the contracts the SDK talks
//! to around it.
//!
//! Every contract module re-exports the `sol!` generated items and adds an
//! `Instance` alias bound to the type erased provider used across the
//! workspace.

pub use alloy::providers::DynProvider as Provider;

#[allow(non_snake_case, clippy::too_many_arguments)]
mod generated {
    alloy::sol! {
        /// Order structs exactly as the exchange lays them out in calldata.
        library OrderTypes {
            struct MakerOrder {
                bool isOrderAsk;
                address signer;
                address collection;
                uint256 price;
                uint256 tokenId;
                uint256 amount;
                address strategy;
                address currency;
                uint256 nonce;
                uint256 startTime;
                uint256 endTime;
                uint256 minPercentageToAsk;
                bytes params;
                uint8 v;
                bytes32 r;
                bytes32 s;
            }

            struct TakerOrder {
                bool isOrderAsk;
                address taker;
                uint256 price;
                uint256 tokenId;
                uint256 minPercentageToAsk;
                bytes params;
            }
        }

        #[allow(missing_docs)]
        #[sol(rpc)]
        interface LooksRareExchange {
            function matchAskWithTakerBidUsingETHAndWETH(
                OrderTypes.TakerOrder calldata takerBid,
                OrderTypes.MakerOrder calldata makerAsk
            ) external payable;
            function matchAskWithTakerBid(
                OrderTypes.TakerOrder calldata takerBid,
                OrderTypes.MakerOrder calldata makerAsk
            ) external;
            function matchBidWithTakerAsk(
                OrderTypes.TakerOrder calldata takerAsk,
                OrderTypes.MakerOrder calldata makerBid
            ) external;
            function cancelAllOrdersForSender(uint256 minNonce) external;
            function cancelMultipleMakerOrders(uint256[] calldata orderNonces) external;
            function userMinOrderNonce(address user) external view returns (uint256);
            function isUserOrderNonceExecutedOrCancelled(address user, uint256 orderNonce)
                external
                view
                returns (bool);
            function DOMAIN_SEPARATOR() external view returns (bytes32);
        }

        #[allow(missing_docs)]
        #[sol(rpc)]
        interface OrderValidatorV1 {
            function checkOrderValidity(OrderTypes.MakerOrder calldata makerOrder)
                external
                view
                returns (uint256[] memory validationCodes);
            function checkMultipleOrderValidities(OrderTypes.MakerOrder[] calldata makerOrders)
                external
                view
                returns (uint256[][] memory validationCodes);
            function checkValiditySignature(OrderTypes.MakerOrder calldata makerOrder)
                external
                view
                returns (uint256 validationCode);
        }

        #[allow(missing_docs)]
        #[sol(rpc)]
        interface ERC20 {
            function allowance(address owner, address spender) external view returns (uint256);
            function approve(address spender, uint256 amount) external returns (bool);
            function balanceOf(address account) external view returns (uint256);
        }

        #[allow(missing_docs)]
        #[sol(rpc)]
        interface ERC721 {
            function isApprovedForAll(address owner, address operator) external view returns (bool);
            function setApprovalForAll(address operator, bool approved) external;
        }

        #[allow(missing_docs)]
        #[sol(rpc)]
        interface ExecutionStrategy {
            function viewProtocolFee() external view returns (uint256);
        }

        #[allow(missing_docs)]
        #[sol(rpc)]
        interface RoyaltyFeeManager {
            function calculateRoyaltyFeeAndGetRecipient(
                address collection,
                uint256 tokenId,
                uint256 amount
            ) external view returns (address receiver, uint256 royaltyAmount);
        }
    }
}

pub use generated::OrderTypes;

macro_rules! bindings {
    ($($contract:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[allow(non_snake_case)]
                pub mod $contract {
                    pub use super::generated::$contract::*;
                    pub type Instance = [<$contract Instance>]<super::Provider>;
                }
            )*
        }
    };
}

bindings!(
    LooksRareExchange,
    OrderValidatorV1,
    ERC20,
    ERC721,
    ExecutionStrategy,
    RoyaltyFeeManager,
);
