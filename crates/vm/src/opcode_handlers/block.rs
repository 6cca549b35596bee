use ethereum_types::U256;

use crate::{
    errors::{InternalError, OpcodeResult, VMError},
    gas_cost,
    utils::{address_to_word, h256_to_u256},
    vm::Vm,
};

// Block Information (11)
// Opcodes: BLOCKHASH, COINBASE, TIMESTAMP, NUMBER, PREVRANDAO, GASLIMIT,
// CHAINID, SELFBALANCE, BASEFEE, BLOBHASH, BLOBBASEFEE

impl<'a> Vm<'a> {
    // BLOCKHASH operation
    pub fn op_blockhash(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::BLOCKHASH)?;
        let block_number = frame.stack.pop1()?;

        // Only the 256 blocks preceding the current one have a hash.
        let current_block = self.host.tx_context().block_number;
        let lower_bound = current_block.saturating_sub(256);
        let in_window =
            block_number < U256::from(current_block) && block_number >= U256::from(lower_bound);

        let hash = if in_window {
            let number = u64::try_from(block_number).map_err(|_| InternalError::TypeConversion)?;
            h256_to_u256(self.host.get_block_hash(number))
        } else {
            U256::zero()
        };
        self.context.current_frame()?.stack.push(hash)?;

        Ok(OpcodeResult::Continue)
    }

    // COINBASE operation
    pub fn op_coinbase(&mut self) -> Result<OpcodeResult, VMError> {
        let coinbase = self.host.tx_context().coinbase;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::COINBASE)?;

        frame.stack.push(address_to_word(coinbase))?;

        Ok(OpcodeResult::Continue)
    }

    // TIMESTAMP operation
    pub fn op_timestamp(&mut self) -> Result<OpcodeResult, VMError> {
        let timestamp = self.host.tx_context().block_timestamp;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::TIMESTAMP)?;

        frame.stack.push(U256::from(timestamp))?;

        Ok(OpcodeResult::Continue)
    }

    // NUMBER operation
    pub fn op_number(&mut self) -> Result<OpcodeResult, VMError> {
        let block_number = self.host.tx_context().block_number;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::NUMBER)?;

        frame.stack.push(U256::from(block_number))?;

        Ok(OpcodeResult::Continue)
    }

    // PREVRANDAO operation
    pub fn op_prevrandao(&mut self) -> Result<OpcodeResult, VMError> {
        let prev_randao = self.host.tx_context().prev_randao;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::PREVRANDAO)?;

        frame.stack.push(h256_to_u256(prev_randao))?;

        Ok(OpcodeResult::Continue)
    }

    // GASLIMIT operation
    pub fn op_gaslimit(&mut self) -> Result<OpcodeResult, VMError> {
        let block_gas_limit = self.host.tx_context().block_gas_limit;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::GASLIMIT)?;

        frame.stack.push(U256::from(block_gas_limit))?;

        Ok(OpcodeResult::Continue)
    }

    // CHAINID operation
    pub fn op_chainid(&mut self) -> Result<OpcodeResult, VMError> {
        let chain_id = self.host.tx_context().chain_id;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::CHAINID)?;

        frame.stack.push(chain_id)?;

        Ok(OpcodeResult::Continue)
    }

    // SELFBALANCE operation
    pub fn op_selfbalance(&mut self) -> Result<OpcodeResult, VMError> {
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::SELFBALANCE)?;

        let address = frame.msg.recipient;
        let balance = self.host.get_balance(address);
        self.context.current_frame()?.stack.push(balance)?;

        Ok(OpcodeResult::Continue)
    }

    // BASEFEE operation
    pub fn op_basefee(&mut self) -> Result<OpcodeResult, VMError> {
        let base_fee = self.host.tx_context().base_fee;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::BASEFEE)?;

        frame.stack.push(base_fee)?;

        Ok(OpcodeResult::Continue)
    }

    // BLOBHASH operation
    pub fn op_blobhash(&mut self) -> Result<OpcodeResult, VMError> {
        let blob_hashes = self.host.tx_context().blob_hashes;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::BLOBHASH)?;

        let index = frame.stack.pop1()?;

        // An index past the end of the versioned hashes yields zero.
        let hash = usize::try_from(index)
            .ok()
            .and_then(|index| blob_hashes.get(index))
            .map(|hash| h256_to_u256(*hash))
            .unwrap_or_default();
        frame.stack.push(hash)?;

        Ok(OpcodeResult::Continue)
    }

    // BLOBBASEFEE operation
    pub fn op_blobbasefee(&mut self) -> Result<OpcodeResult, VMError> {
        let blob_base_fee = self.host.tx_context().blob_base_fee;
        let frame = self.context.current_frame()?;
        frame.increase_consumed_gas(gas_cost::BLOBBASEFEE)?;

        frame.stack.push(blob_base_fee)?;

        Ok(OpcodeResult::Continue)
    }
}
