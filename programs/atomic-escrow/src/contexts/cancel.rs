use anchor_lang::prelude::*;
use anchor_spl::token::{
    set_authority, spl_token::instruction::AuthorityType, SetAuthority, Token, TokenAccount,
};

use crate::{escrow_authority_seeds, EscrowAccount, EscrowCanceled, Settlement, ESCROW_PDA_SEED};

#[derive(Accounts)]
pub struct Cancel<'info> {
    /// Must be the initializer stored in the record; receives the record's rent
    #[account(mut)]
    pub initializer: Signer<'info>,

    /// Custody account recorded at initialize
    #[account(mut)]
    pub deposit_token_account: Account<'info, TokenAccount>,

    /// CHECK: keyless signer of the custody account, verified by its seeds
    #[account(seeds = [ESCROW_PDA_SEED], bump)]
    pub escrow_authority: UncheckedAccount<'info>,

    #[account(mut, close = initializer)]
    pub escrow_account: Account<'info, EscrowAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Cancel<'info> {
    pub fn settlement(&self) -> Result<Settlement> {
        self.escrow_account
            .cancel_settlement(&self.initializer.key(), &self.deposit_token_account.key())
    }

    /// Hands the custody account, deposit included, back to the initializer
    pub fn return_custody_and_close(&mut self, settlement: &Settlement, bump: u8) -> Result<()> {
        let bump = [bump];
        let seeds = escrow_authority_seeds(&bump);
        let signer_seeds = [&seeds[..]];

        let accounts = SetAuthority {
            current_authority: self.escrow_authority.to_account_info(),
            account_or_mint: self.deposit_token_account.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            accounts,
            &signer_seeds,
        );
        set_authority(
            ctx,
            AuthorityType::AccountOwner,
            Some(settlement.custody_owner),
        )?;

        self.escrow_account.terminate()?;

        msg!("escrow {} canceled", self.escrow_account.key());
        emit!(EscrowCanceled {
            escrow: self.escrow_account.key(),
            initializer: self.initializer.key(),
            initializer_amount: self.escrow_account.initializer_amount,
        });
        Ok(())
    }
}
