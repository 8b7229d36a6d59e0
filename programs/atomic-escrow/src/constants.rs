use anchor_lang::prelude::*;

/// Seed of the program derived address that owns every custody account
#[constant]
pub const ESCROW_PDA_SEED: &[u8] = b"escrow";
