use anchor_lang::prelude::*;

/// Emitted once the deposit account is in custody and the terms are recorded
#[event]
pub struct EscrowInitialized {
    pub escrow: Pubkey,
    pub initializer: Pubkey,
    pub deposit_token_account: Pubkey,
    pub initializer_amount: u64,
    pub taker_amount: u64,
}

/// Emitted after both legs of the swap have settled and the record is closed
#[event]
pub struct EscrowExchanged {
    pub escrow: Pubkey,
    pub initializer: Pubkey,
    pub taker: Pubkey,
    pub initializer_amount: u64,
    pub taker_amount: u64,
}

#[event]
pub struct EscrowCanceled {
    pub escrow: Pubkey,
    pub initializer: Pubkey,
    pub initializer_amount: u64,
}
