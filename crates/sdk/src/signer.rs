//! EIP-712 typed data of maker orders.

use {
    crate::{Sdk, error::Result},
    alloy::{
        primitives::{Address, B256, U256},
        sol_types::Eip712Domain,
    },
    model::{DomainSeparator, EIP712_VERSION, order::MakerOrder, signature::EcdsaSignature},
    tracing::instrument,
};

impl Sdk {
    /// The EIP-712 domain maker orders are signed under.
    pub fn typed_data_domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(self.deployment().protocol.domain_name().into()),
            Some(EIP712_VERSION.into()),
            Some(U256::from(self.chain_id())),
            Some(self.addresses().exchange),
            None,
        )
    }

    pub fn domain_separator(&self) -> DomainSeparator {
        DomainSeparator::new(
            self.deployment().protocol.domain_name(),
            self.chain_id(),
            self.addresses().exchange,
        )
    }

    /// The digest a maker signs. Raw params are encoded before hashing.
    pub fn maker_order_signing_hash(&self, order: &MakerOrder) -> B256 {
        B256::from(order.signing_hash(&self.domain_separator()))
    }

    /// Signs a maker order with the bound signer and returns the 65 byte
    /// signature as a `0x` prefixed hex string.
    #[instrument(skip_all, fields(signer = ?order.signer, nonce = %order.nonce))]
    pub async fn sign_maker_order(&self, order: &MakerOrder) -> Result<String> {
        let wallet = self.wallet()?;
        let hash = order.signing_hash(&self.domain_separator());
        let signature = EcdsaSignature::sign(&hash, wallet.signer()).await?;
        tracing::debug!("signed maker order");
        Ok(signature.to_string())
    }

    /// Recovers the address that produced `signature` for `order`.
    pub fn recover_maker_order_signer(
        &self,
        order: &MakerOrder,
        signature: &str,
    ) -> Result<Address> {
        let signature: EcdsaSignature = signature.parse()?;
        Ok(signature.recover(&order.signing_hash(&self.domain_separator()))?)
    }
}
