//! Invocation payloads sent to a contract, either for simulation or as part
//! of a signed transaction.

use stellar_xdr::curr::{HostFunction, InvokeContractArgs, ScSymbol, ScVal, StringM};

use crate::error::ErrorKind;
use crate::result::Result;
use crate::types::ContractId;

/// A call into one function of a contract, with the function name and the
/// ordered list of typed arguments. Building it does not touch the network.
#[derive(Clone, Debug)]
pub struct Invocation {
    contract_id: ContractId,
    function: String,
    args: Vec<ScVal>,
}

impl Invocation {
    pub fn new(contract_id: ContractId, function: impl Into<String>) -> Self {
        Self {
            contract_id,
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument to the call.
    pub fn arg(mut self, value: ScVal) -> Self {
        self.args.push(value);
        self
    }

    /// Replace all arguments of the call.
    pub fn args(mut self, values: Vec<ScVal>) -> Self {
        self.args = values;
        self
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn contract_id(&self) -> &ContractId {
        &self.contract_id
    }

    /// Produce the host function that invokes the contract. Fails only when the
    /// function name does not fit in a symbol (32 bytes).
    pub fn host_function(&self) -> Result<HostFunction> {
        let function_name: StringM<32> =
            self.function.as_bytes().to_vec().try_into().map_err(|e| {
                ErrorKind::DataConversion
                    .full(format!("invalid function name {:?}", self.function), e)
            })?;

        Ok(HostFunction::InvokeContract(InvokeContractArgs {
            contract_address: self.contract_id.address(),
            function_name: ScSymbol(function_name),
            args: self.args.clone().try_into()?,
        }))
    }
}
