//! Pre-flight checks of signed maker orders against the order validator
//! contract. Results are snapshots of the chain state and can be outdated by
//! the time an order is executed.

use {
    crate::{
        AtBlock,
        Sdk,
        conversions::signed_maker_order,
        error::{Error, Result},
    },
    contracts::OrderValidatorV1,
    model::{
        order::MakerOrder,
        signature::EcdsaSignature,
        validity::{ValidityCode, ValidityReport},
    },
    tracing::instrument,
};

impl Sdk {
    fn order_validator(&self) -> OrderValidatorV1::Instance {
        OrderValidatorV1::Instance::new(self.addresses().order_validator, self.provider().clone())
    }

    /// Runs every validator rule on a signed maker order.
    #[instrument(skip_all, fields(signer = ?order.signer, nonce = %order.nonce))]
    pub async fn verify_maker_order(
        &self,
        order: &MakerOrder,
        signature: &str,
    ) -> Result<ValidityReport> {
        let signature: EcdsaSignature = signature.parse()?;
        let codes = self
            .order_validator()
            .checkOrderValidity(signed_maker_order(order, &signature))
            .at(self.block())
            .call()
            .await?;
        let report = ValidityReport::from(codes);
        tracing::debug!(valid = report.is_valid(), ?report, "verified maker order");
        Ok(report)
    }

    /// Like [`Self::verify_maker_order`] for many orders in one call. The
    /// reports are in the order of the input.
    #[instrument(skip_all, fields(orders = orders.len()))]
    pub async fn verify_maker_orders<S>(
        &self,
        orders: &[MakerOrder],
        signatures: &[S],
    ) -> Result<Vec<ValidityReport>>
    where
        S: AsRef<str>,
    {
        if orders.len() != signatures.len() {
            tracing::warn!(signatures = signatures.len(), "mismatched batch");
            return Err(Error::BatchLengthMismatch {
                orders: orders.len(),
                signatures: signatures.len(),
            });
        }
        let signed = orders
            .iter()
            .zip(signatures)
            .map(|(order, signature)| {
                let signature: EcdsaSignature = signature.as_ref().parse()?;
                Ok(signed_maker_order(order, &signature))
            })
            .collect::<Result<Vec<_>>>()?;
        let codes = self
            .order_validator()
            .checkMultipleOrderValidities(signed)
            .at(self.block())
            .call()
            .await?;
        Ok(codes.into_iter().map(ValidityReport::from).collect())
    }

    /// Runs only the signature rule of the validator.
    #[instrument(skip_all, fields(signer = ?order.signer, nonce = %order.nonce))]
    pub async fn check_signature_validity(
        &self,
        order: &MakerOrder,
        signature: &str,
    ) -> Result<ValidityCode> {
        let signature: EcdsaSignature = signature.parse()?;
        let code = self
            .order_validator()
            .checkValiditySignature(signed_maker_order(order, &signature))
            .at(self.block())
            .call()
            .await?;
        Ok(code.into())
    }
}
