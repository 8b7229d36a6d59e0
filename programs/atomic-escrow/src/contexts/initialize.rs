use anchor_lang::prelude::*;
use anchor_spl::token::{
    set_authority, spl_token::instruction::AuthorityType, SetAuthority, Token, TokenAccount,
};

use crate::{find_escrow_authority, EscrowAccount, EscrowError, EscrowInitialized};

/// Accounts for `initialize`: the initializer hands its token A account over to
/// the escrow authority and records what it wants in return
#[derive(Accounts)]
#[instruction(initializer_amount: u64)]
pub struct Initialize<'info> {
    /// Creator of the escrow, pays for the record
    #[account(mut)]
    pub initializer: Signer<'info>,

    /// Token A account that becomes the custody account
    /// Must belong to the initializer and already hold the deposit
    #[account(
        mut,
        constraint = deposit_token_account.owner == initializer.key() @ EscrowError::Unauthorized,
        constraint = deposit_token_account.amount >= initializer_amount
            @ EscrowError::InsufficientBalance
    )]
    pub deposit_token_account: Account<'info, TokenAccount>,

    /// Token B account the counter-payment is sent to
    pub receive_token_account: Account<'info, TokenAccount>,

    /// Fresh record slot, signed for by the client that generated its keypair
    #[account(
        init,
        payer = initializer,
        space = 8 + EscrowAccount::INIT_SPACE
    )]
    pub escrow_account: Account<'info, EscrowAccount>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn save_escrow(&mut self, initializer_amount: u64, taker_amount: u64) -> Result<()> {
        self.escrow_account.set_inner(EscrowAccount::open(
            self.initializer.key(),
            self.deposit_token_account.key(),
            self.receive_token_account.key(),
            initializer_amount,
            taker_amount,
        )?);
        Ok(())
    }

    /// Reassigns ownership of the deposit account to the escrow authority.
    /// The balance stays where it is; only control changes hands.
    pub fn take_custody(&mut self, program_id: &Pubkey) -> Result<()> {
        let (escrow_authority, _) = find_escrow_authority(program_id);

        let accounts = SetAuthority {
            current_authority: self.initializer.to_account_info(),
            account_or_mint: self.deposit_token_account.to_account_info(),
        };
        let ctx = CpiContext::new(self.token_program.to_account_info(), accounts);
        set_authority(ctx, AuthorityType::AccountOwner, Some(escrow_authority))?;

        msg!(
            "escrow {} initialized: {} deposited, {} requested",
            self.escrow_account.key(),
            self.escrow_account.initializer_amount,
            self.escrow_account.taker_amount
        );
        emit!(EscrowInitialized {
            escrow: self.escrow_account.key(),
            initializer: self.initializer.key(),
            deposit_token_account: self.deposit_token_account.key(),
            initializer_amount: self.escrow_account.initializer_amount,
            taker_amount: self.escrow_account.taker_amount,
        });
        Ok(())
    }
}
