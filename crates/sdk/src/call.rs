//! A prepared state changing contract call that can be submitted, simulated
//! or gas estimated with the same arguments.

use {
    crate::error::Result,
    alloy::{
        network::Ethereum,
        primitives::{Address, Bytes, U256},
        providers::{DynProvider, PendingTransactionBuilder, Provider},
        rpc::types::{TransactionInput, TransactionRequest},
        sol_types::SolCall,
    },
};

/// Transaction parameters a caller may override. Unset fields are filled by
/// the provider.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Overrides {
    pub value: Option<U256>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
}

impl Overrides {
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Fields set in `other` take precedence.
    pub fn merge(&self, other: &Overrides) -> Overrides {
        Overrides {
            value: other.value.or(self.value),
            gas: other.gas.or(self.gas),
            gas_price: other.gas_price.or(self.gas_price),
            max_fee_per_gas: other.max_fee_per_gas.or(self.max_fee_per_gas),
            max_priority_fee_per_gas: other
                .max_priority_fee_per_gas
                .or(self.max_priority_fee_per_gas),
            nonce: other.nonce.or(self.nonce),
        }
    }

    fn apply(&self, mut tx: TransactionRequest) -> TransactionRequest {
        if self.value.is_some() {
            tx.value = self.value;
        }
        if self.gas.is_some() {
            tx.gas = self.gas;
        }
        if self.gas_price.is_some() {
            tx.gas_price = self.gas_price;
        }
        if self.max_fee_per_gas.is_some() {
            tx.max_fee_per_gas = self.max_fee_per_gas;
        }
        if self.max_priority_fee_per_gas.is_some() {
            tx.max_priority_fee_per_gas = self.max_priority_fee_per_gas;
        }
        if self.nonce.is_some() {
            tx.nonce = self.nonce;
        }
        tx
    }
}

/// A contract call sent from the SDK's signer.
///
/// Submission goes through the signing provider while simulation and gas
/// estimation use the read provider with `from` set to the signer, so all
/// three see the same transaction.
#[derive(Clone)]
pub struct ContractCall<R> {
    reader: DynProvider,
    sender: DynProvider,
    from: Address,
    to: Address,
    method: &'static str,
    calldata: Bytes,
    overrides: Overrides,
    decode: fn(&[u8]) -> Result<R, alloy::sol_types::Error>,
}

impl<R> ContractCall<R> {
    pub(crate) fn new<C>(
        wallet: &crate::Wallet,
        reader: &DynProvider,
        to: Address,
        call: C,
        overrides: Overrides,
    ) -> Self
    where
        C: SolCall<Return = R>,
    {
        Self {
            reader: reader.clone(),
            sender: wallet.provider.clone(),
            from: wallet.address(),
            to,
            method: C::SIGNATURE,
            calldata: call.abi_encode().into(),
            overrides,
            decode: C::abi_decode_returns,
        }
    }

    /// Forgets the return type of the call. Used for calls without return
    /// values so that different entry points share one type.
    pub(crate) fn discard_return(self) -> ContractCall<()> {
        ContractCall {
            reader: self.reader,
            sender: self.sender,
            from: self.from,
            to: self.to,
            method: self.method,
            calldata: self.calldata,
            overrides: self.overrides,
            decode: |_| Ok(()),
        }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn to(&self) -> Address {
        self.to
    }

    pub fn calldata(&self) -> &Bytes {
        &self.calldata
    }

    /// The transaction this call sends with `additional` merged over the base
    /// overrides.
    pub fn transaction(&self, additional: Option<&Overrides>) -> TransactionRequest {
        let overrides = match additional {
            Some(additional) => self.overrides.merge(additional),
            None => self.overrides.clone(),
        };
        overrides.apply(
            TransactionRequest::default()
                .from(self.from)
                .to(self.to)
                .input(TransactionInput::new(self.calldata.clone())),
        )
    }

    /// Signs and submits the transaction.
    pub async fn send(
        &self,
        additional: Option<&Overrides>,
    ) -> Result<PendingTransactionBuilder<Ethereum>> {
        let tx = self.transaction(additional);
        tracing::info!(method = self.method, to = ?self.to, "sending transaction");
        Ok(self.sender.send_transaction(tx).await?)
    }

    /// Executes the call against the latest block without changing state and
    /// returns its decoded result.
    pub async fn simulate(&self, additional: Option<&Overrides>) -> Result<R> {
        let tx = self.transaction(additional);
        tracing::debug!(method = self.method, to = ?self.to, "simulating transaction");
        let output = self.reader.call(tx).await?;
        Ok((self.decode)(&output)?)
    }

    pub async fn estimate_gas(&self, additional: Option<&Overrides>) -> Result<u64> {
        let tx = self.transaction(additional);
        tracing::debug!(method = self.method, to = ?self.to, "estimating gas");
        Ok(self.reader.estimate_gas(tx).await?)
    }
}
