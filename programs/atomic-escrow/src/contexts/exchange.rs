use anchor_lang::prelude::*;
use anchor_spl::token::{
    set_authority, spl_token::instruction::AuthorityType, transfer_checked, Mint, SetAuthority,
    Token, TokenAccount, TransferChecked,
};

use crate::{
    escrow_authority_seeds, EscrowAccount, EscrowExchanged, ExchangeAccounts, Settlement,
    TokenAccountRef, ESCROW_PDA_SEED,
};

/// Accounts for `exchange`. Every account the record names is checked against
/// it by `EscrowAccount::check_exchange_accounts`, so a taker cannot redirect
/// either leg of the swap.
#[derive(Accounts)]
pub struct Exchange<'info> {
    /// Whoever fulfills the offer; not recorded anywhere beforehand
    pub taker: Signer<'info>,

    /// The initializer named in the record, credited with the record's rent
    #[account(mut)]
    pub initializer: SystemAccount<'info>,

    /// Token A, held in custody
    pub mint_a: Box<Account<'info, Mint>>,
    /// Token B, requested by the initializer
    pub mint_b: Box<Account<'info, Mint>>,

    /// Taker's token B account paying the initializer
    #[account(mut)]
    pub taker_deposit_token_account: Box<Account<'info, TokenAccount>>,

    /// Taker's token A account receiving the custody release
    #[account(mut)]
    pub taker_receive_token_account: Box<Account<'info, TokenAccount>>,

    /// Custody account recorded at initialize
    #[account(mut)]
    pub deposit_token_account: Box<Account<'info, TokenAccount>>,

    /// Initializer's token B account recorded at initialize
    #[account(mut)]
    pub receive_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut, close = initializer)]
    pub escrow_account: Box<Account<'info, EscrowAccount>>,

    /// CHECK: keyless signer of the custody account, verified by its seeds
    #[account(seeds = [ESCROW_PDA_SEED], bump)]
    pub escrow_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

fn token_ref(account: &Account<TokenAccount>) -> TokenAccountRef {
    TokenAccountRef {
        key: account.key(),
        mint: account.mint,
    }
}

impl<'info> Exchange<'info> {
    /// Checks every account against the record, then plans both legs
    pub fn settlement(&self) -> Result<Settlement> {
        self.escrow_account
            .check_exchange_accounts(&ExchangeAccounts {
                initializer: self.initializer.key(),
                mint_a: self.mint_a.key(),
                mint_b: self.mint_b.key(),
                taker_deposit: token_ref(&self.taker_deposit_token_account),
                taker_receive: token_ref(&self.taker_receive_token_account),
                custody: token_ref(&self.deposit_token_account),
                receive: token_ref(&self.receive_token_account),
            })?;
        self.escrow_account.exchange_settlement(
            self.taker_deposit_token_account.amount,
            self.deposit_token_account.amount,
        )
    }

    /// Taker pays the requested token B straight into the recorded receive account
    pub fn pay_initializer(&mut self, settlement: &Settlement) -> Result<()> {
        let accounts = TransferChecked {
            from: self.taker_deposit_token_account.to_account_info(),
            mint: self.mint_b.to_account_info(),
            to: self.receive_token_account.to_account_info(),
            authority: self.taker.to_account_info(),
        };
        let ctx = CpiContext::new(self.token_program.to_account_info(), accounts);
        transfer_checked(ctx, settlement.to_initializer, self.mint_b.decimals)
    }

    /// Releases the deposit to the taker, hands the custody account back to the
    /// initializer and terminates the record
    pub fn release_and_close(&mut self, settlement: &Settlement, bump: u8) -> Result<()> {
        let bump = [bump];
        let seeds = escrow_authority_seeds(&bump);
        let signer_seeds = [&seeds[..]];

        let accounts = TransferChecked {
            from: self.deposit_token_account.to_account_info(),
            mint: self.mint_a.to_account_info(),
            to: self.taker_receive_token_account.to_account_info(),
            authority: self.escrow_authority.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            accounts,
            &signer_seeds,
        );
        transfer_checked(ctx, settlement.to_taker, self.mint_a.decimals)?;

        // any surplus above the deposit goes back with the account
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

        msg!(
            "escrow {} exchanged by {}",
            self.escrow_account.key(),
            self.taker.key()
        );
        emit!(EscrowExchanged {
            escrow: self.escrow_account.key(),
            initializer: self.initializer.key(),
            taker: self.taker.key(),
            initializer_amount: settlement.to_taker,
            taker_amount: settlement.to_initializer,
        });
        Ok(())
    }
}
