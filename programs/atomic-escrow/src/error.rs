use anchor_lang::prelude::*;

#[error_code]
pub enum EscrowError {
    #[msg("Invalid amount: amounts must be greater than zero")]
    InvalidAmount,
    #[msg("Insufficient balance: source account holds less than the required amount")]
    InsufficientBalance,
    #[msg("Unauthorized: signer is not the escrow initializer")]
    Unauthorized,
    #[msg("Account mismatch: account does not match the one recorded at initialize")]
    AccountMismatch,
    /// On-chain a closed record already fails when Anchor loads the account,
    /// so clients see that load error rather than this code for a finished escrow
    #[msg("Escrow is not active")]
    AlreadyTerminated,
}
