use anchor_lang::prelude::*;

use crate::EscrowError;

/// Lifecycle of an escrow record: `Uninitialized -> Active -> Terminated`.
///
/// Only `initialize` enters `Active`, only `exchange` and `cancel` enter
/// `Terminated`, and `Terminated` is absorbing.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace,
)]
pub enum EscrowStatus {
    #[default]
    Uninitialized,
    Active,
    Terminated,
}

/// Terms of one outstanding offer:
/// - the initializer, who may cancel and receives the counter-payment,
/// - the deposit account now owned by the escrow authority,
/// - the account token B is paid into,
/// - the deposited and requested amounts.
///
/// Terms are written once by `initialize` and never edited afterwards.
#[account]
#[derive(InitSpace, Debug, Default, PartialEq)]
pub struct EscrowAccount {
    pub initializer: Pubkey,           // party entitled to cancel
    pub deposit_token_account: Pubkey, // token A custody account
    pub receive_token_account: Pubkey, // token B destination
    pub initializer_amount: u64,       // token A held in custody
    pub taker_amount: u64,             // token B the initializer asks for
    pub status: EscrowStatus,
}

/// Token movements a terminating instruction performs.
///
/// Computed from the record before the first CPI so that every precondition
/// has been checked by the time funds move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Token B paid by the taker into the initializer's receive account
    pub to_initializer: u64,
    /// Token A released from custody to the taker
    pub to_taker: u64,
    /// Owner the custody account reverts to
    pub custody_owner: Pubkey,
}

/// Key and mint of a token account handed to `exchange`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountRef {
    pub key: Pubkey,
    pub mint: Pubkey,
}

/// Every account `exchange` reads or pays into, checked against the record
/// before any funds move
#[derive(Clone, Copy, Debug)]
pub struct ExchangeAccounts {
    pub initializer: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub taker_deposit: TokenAccountRef,
    pub taker_receive: TokenAccountRef,
    pub custody: TokenAccountRef,
    pub receive: TokenAccountRef,
}

impl EscrowAccount {
    /// Builds the terms of a fresh escrow, rejecting zero amounts and a
    /// receive account that is the deposit account itself.
    pub fn open(
        initializer: Pubkey,
        deposit_token_account: Pubkey,
        receive_token_account: Pubkey,
        initializer_amount: u64,
        taker_amount: u64,
    ) -> Result<Self> {
        require_gt!(initializer_amount, 0, EscrowError::InvalidAmount);
        require_gt!(taker_amount, 0, EscrowError::InvalidAmount);
        require_keys_neq!(
            deposit_token_account,
            receive_token_account,
            EscrowError::AccountMismatch
        );

        Ok(Self {
            initializer,
            deposit_token_account,
            receive_token_account,
            initializer_amount,
            taker_amount,
            status: EscrowStatus::Active,
        })
    }

    pub fn require_active(&self) -> Result<()> {
        require!(
            self.status == EscrowStatus::Active,
            EscrowError::AlreadyTerminated
        );
        Ok(())
    }

    /// Rejects any account that differs from the recorded ones, sits on the
    /// wrong mint, or would turn one leg of the swap into a self-transfer.
    pub fn check_exchange_accounts(&self, accounts: &ExchangeAccounts) -> Result<()> {
        self.require_active()?;
        require_keys_eq!(
            accounts.initializer,
            self.initializer,
            EscrowError::AccountMismatch
        );
        require_keys_eq!(
            accounts.custody.key,
            self.deposit_token_account,
            EscrowError::AccountMismatch
        );
        require_keys_eq!(
            accounts.receive.key,
            self.receive_token_account,
            EscrowError::AccountMismatch
        );

        for (token, mint) in [
            (accounts.custody, accounts.mint_a),
            (accounts.taker_receive, accounts.mint_a),
            (accounts.receive, accounts.mint_b),
            (accounts.taker_deposit, accounts.mint_b),
        ] {
            require_keys_eq!(token.mint, mint, EscrowError::AccountMismatch);
        }

        require_keys_neq!(
            accounts.taker_deposit.key,
            accounts.receive.key,
            EscrowError::AccountMismatch
        );
        require_keys_neq!(
            accounts.taker_receive.key,
            accounts.custody.key,
            EscrowError::AccountMismatch
        );
        Ok(())
    }

    /// Settlement for a taker holding `taker_balance` of token B against a
    /// custody account holding `custody_balance` of token A.
    ///
    /// No taker identity is part of the terms: whoever presents
    /// `taker_amount` first fulfills the escrow.
    pub fn exchange_settlement(
        &self,
        taker_balance: u64,
        custody_balance: u64,
    ) -> Result<Settlement> {
        self.require_active()?;
        require_gte!(
            taker_balance,
            self.taker_amount,
            EscrowError::InsufficientBalance
        );
        require_gte!(
            custody_balance,
            self.initializer_amount,
            EscrowError::InsufficientBalance
        );

        Ok(Settlement {
            to_initializer: self.taker_amount,
            to_taker: self.initializer_amount,
            custody_owner: self.initializer,
        })
    }

    /// Settlement for `signer` withdrawing the offer through `custody`. The
    /// custody account is the initializer's own deposit account, so handing
    /// ownership back returns the full deposit without a transfer.
    pub fn cancel_settlement(&self, signer: &Pubkey, custody: &Pubkey) -> Result<Settlement> {
        self.require_active()?;
        require_keys_eq!(
            *custody,
            self.deposit_token_account,
            EscrowError::AccountMismatch
        );
        require_keys_eq!(*signer, self.initializer, EscrowError::Unauthorized);

        Ok(Settlement {
            to_initializer: 0,
            to_taker: 0,
            custody_owner: self.initializer,
        })
    }

    pub fn terminate(&mut self) -> Result<()> {
        self.require_active()?;
        self.status = EscrowStatus::Terminated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anchor_lang::error::Error;

    use super::*;

    fn token(mint: Pubkey) -> TokenAccountRef {
        TokenAccountRef {
            key: Pubkey::new_unique(),
            mint,
        }
    }

    /// Escrow plus a correct set of exchange accounts for it
    fn exchange_fixture() -> (EscrowAccount, ExchangeAccounts) {
        let (mint_a, mint_b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let accounts = ExchangeAccounts {
            initializer: Pubkey::new_unique(),
            mint_a,
            mint_b,
            taker_deposit: token(mint_b),
            taker_receive: token(mint_a),
            custody: token(mint_a),
            receive: token(mint_b),
        };
        let escrow = EscrowAccount::open(
            accounts.initializer,
            accounts.custody.key,
            accounts.receive.key,
            500,
            1000,
        )
        .unwrap();
        (escrow, accounts)
    }

    fn active_escrow() -> EscrowAccount {
        EscrowAccount::open(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            500,
            1000,
        )
        .unwrap()
    }

    #[test]
    fn record_layout_is_fixed_size() {
        assert_eq!(EscrowAccount::INIT_SPACE, 32 * 3 + 8 + 8 + 1);
    }

    #[test]
    fn fresh_record_is_uninitialized() {
        let escrow = EscrowAccount::default();

        assert_eq!(escrow.status, EscrowStatus::Uninitialized);
        assert_eq!(
            escrow.require_active().unwrap_err(),
            Error::from(EscrowError::AlreadyTerminated)
        );
    }

    #[test]
    fn open_rejects_zero_amounts() {
        let (initializer, deposit, receive) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());

        assert_eq!(
            EscrowAccount::open(initializer, deposit, receive, 0, 1000).unwrap_err(),
            Error::from(EscrowError::InvalidAmount)
        );
        assert_eq!(
            EscrowAccount::open(initializer, deposit, receive, 500, 0).unwrap_err(),
            Error::from(EscrowError::InvalidAmount)
        );
    }

    #[test]
    fn open_rejects_receive_into_deposit_account() {
        let deposit = Pubkey::new_unique();

        assert_eq!(
            EscrowAccount::open(Pubkey::new_unique(), deposit, deposit, 500, 1000)
                .unwrap_err(),
            Error::from(EscrowError::AccountMismatch)
        );
    }

    #[test]
    fn exchange_settlement_swaps_recorded_amounts() {
        let escrow = active_escrow();

        assert_eq!(
            escrow.exchange_settlement(1000, 500).unwrap(),
            Settlement {
                to_initializer: 1000,
                to_taker: 500,
                custody_owner: escrow.initializer,
            }
        );
    }

    #[test]
    fn exchange_settlement_requires_taker_balance() {
        let escrow = active_escrow();

        assert_eq!(
            escrow.exchange_settlement(999, 500).unwrap_err(),
            Error::from(EscrowError::InsufficientBalance)
        );
    }

    #[test]
    fn exchange_settlement_requires_custody_balance() {
        let escrow = active_escrow();

        assert_eq!(
            escrow.exchange_settlement(1000, 499).unwrap_err(),
            Error::from(EscrowError::InsufficientBalance)
        );
    }

    #[test]
    fn cancel_settlement_is_reserved_for_the_initializer() {
        let escrow = active_escrow();

        let custody = escrow.deposit_token_account;

        assert_eq!(
            escrow
                .cancel_settlement(&Pubkey::new_unique(), &custody)
                .unwrap_err(),
            Error::from(EscrowError::Unauthorized)
        );
        assert_eq!(
            escrow
                .cancel_settlement(&escrow.initializer, &custody)
                .unwrap()
                .custody_owner,
            escrow.initializer
        );
    }

    #[test]
    fn cancel_settlement_requires_recorded_custody() {
        let escrow = active_escrow();

        assert_eq!(
            escrow
                .cancel_settlement(&escrow.initializer, &Pubkey::new_unique())
                .unwrap_err(),
            Error::from(EscrowError::AccountMismatch)
        );
    }

    #[test]
    fn exchange_accounts_match_the_record() {
        let (escrow, accounts) = exchange_fixture();

        escrow.check_exchange_accounts(&accounts).unwrap();
    }

    #[test]
    fn exchange_accounts_reject_substitution() {
        let (escrow, accounts) = exchange_fixture();
        let substitutions = [
            ExchangeAccounts {
                initializer: Pubkey::new_unique(),
                ..accounts
            },
            ExchangeAccounts {
                custody: token(accounts.mint_a),
                ..accounts
            },
            ExchangeAccounts {
                receive: token(accounts.mint_b),
                ..accounts
            },
        ];

        for accounts in substitutions {
            assert_eq!(
                escrow.check_exchange_accounts(&accounts).unwrap_err(),
                Error::from(EscrowError::AccountMismatch)
            );
        }
    }

    #[test]
    fn exchange_accounts_reject_wrong_mints() {
        let (escrow, accounts) = exchange_fixture();
        let other_mint = Pubkey::new_unique();
        let wrong_mints = [
            ExchangeAccounts {
                taker_receive: token(other_mint),
                ..accounts
            },
            ExchangeAccounts {
                taker_deposit: token(accounts.mint_a),
                ..accounts
            },
            ExchangeAccounts {
                mint_a: other_mint,
                ..accounts
            },
            ExchangeAccounts {
                mint_b: other_mint,
                ..accounts
            },
        ];

        for accounts in wrong_mints {
            assert_eq!(
                escrow.check_exchange_accounts(&accounts).unwrap_err(),
                Error::from(EscrowError::AccountMismatch)
            );
        }
    }

    #[test]
    fn exchange_accounts_reject_self_transfers() {
        let (escrow, accounts) = exchange_fixture();
        let self_transfers = [
            ExchangeAccounts {
                taker_deposit: accounts.receive,
                ..accounts
            },
            ExchangeAccounts {
                taker_receive: accounts.custody,
                ..accounts
            },
        ];

        for accounts in self_transfers {
            assert_eq!(
                escrow.check_exchange_accounts(&accounts).unwrap_err(),
                Error::from(EscrowError::AccountMismatch)
            );
        }
    }

    #[test]
    fn terminated_is_absorbing() {
        let mut escrow = active_escrow();
        escrow.terminate().unwrap();

        assert_eq!(escrow.status, EscrowStatus::Terminated);
        assert_eq!(
            escrow
                .check_exchange_accounts(&exchange_fixture().1)
                .unwrap_err(),
            Error::from(EscrowError::AlreadyTerminated)
        );
        assert_eq!(
            escrow.terminate().unwrap_err(),
            Error::from(EscrowError::AlreadyTerminated)
        );
        assert_eq!(
            escrow.exchange_settlement(1000, 500).unwrap_err(),
            Error::from(EscrowError::AlreadyTerminated)
        );
        assert_eq!(
            escrow
                .cancel_settlement(&escrow.initializer, &escrow.deposit_token_account)
                .unwrap_err(),
            Error::from(EscrowError::AlreadyTerminated)
        );
    }
}
