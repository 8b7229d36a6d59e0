use anchor_lang::prelude::*;

declare_id!("8rQz5xkTyEXqAw6AhYVNHDcMmWGAhgiT6XufG4pdsmjv");

pub mod authority;
pub use authority::*;
pub mod constants;
pub use constants::*;
pub mod contexts;
pub use contexts::*;
pub mod error;
pub use error::*;
pub mod events;
pub use events::*;
pub mod state;
pub use state::*;


#[program]
pub mod atomic_escrow {
    use super::*;

    /// Opens an escrow: the initializer's token A account passes into the
    /// custody of the program derived authority and the requested token B
    /// amount is recorded
    pub fn initialize(
        ctx: Context<Initialize>,
        initializer_amount: u64,
        taker_amount: u64,
    ) -> Result<()> {
        ctx.accounts.save_escrow(initializer_amount, taker_amount)?;
        ctx.accounts.take_custody(ctx.program_id)
    }

    /// Swaps both legs at once: `taker_amount` of token B to the initializer,
    /// the deposit of token A to the taker
    ///
    /// The record names no taker. Any signer presenting the requested amount
    /// may fulfill it and the first transaction to land wins; adding a taker
    /// check here would change the contract offered at initialize.
    pub fn exchange(ctx: Context<Exchange>) -> Result<()> {
        let settlement = ctx.accounts.settlement()?;
        ctx.accounts.pay_initializer(&settlement)?;
        ctx.accounts.release_and_close(&settlement, ctx.bumps.escrow_authority)
    }

    /// Withdraws the offer, returning the custody account to the initializer
    pub fn cancel_escrow(ctx: Context<Cancel>) -> Result<()> {
        let settlement = ctx.accounts.settlement()?;
        ctx.accounts.return_custody_and_close(&settlement, ctx.bumps.escrow_authority)
    }
}
