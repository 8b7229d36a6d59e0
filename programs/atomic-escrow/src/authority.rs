use anchor_lang::prelude::*;

use crate::ESCROW_PDA_SEED;

/// Finds the keyless authority that owns custody accounts for `program_id`.
///
/// The address has no private key. The token program accepts it as a signer
/// only when this program invokes it with the seeds from
/// [`escrow_authority_seeds`], so anyone can recompute it offline but only the
/// escrow instructions can move funds it owns.
pub fn find_escrow_authority(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ESCROW_PDA_SEED], program_id)
}

/// Signer seeds for CPIs issued on behalf of the escrow authority
pub fn escrow_authority_seeds(bump: &[u8; 1]) -> [&[u8]; 2] {
    [ESCROW_PDA_SEED, bump]
}
