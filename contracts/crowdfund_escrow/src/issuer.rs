//! Receipt/claim issuer boundary.
//!
//! The escrow consumes an external issuer contract through this interface
//! and never implements it. The generated [`IssuerClient`] is invoked only
//! after local bookkeeping for the current action has been written; a
//! failure inside the issuer aborts the whole invocation, so receipt or
//! claim issuance and the matching ledger update land together or not at
//! all.

use soroban_sdk::{contractclient, Address, Env};

/// External contract that mints proof-of-contribution receipts and, on
/// successful completion, proportional claim tokens.
#[contractclient(name = "IssuerClient")]
pub trait ReceiptIssuer {
    /// Mint `count` receipt units to `to`.
    fn mint_receipts(env: Env, to: Address, count: u32);

    /// Total receipt units issued so far.
    fn total_receipts(env: Env) -> u32;

    /// Mint `amount` claim tokens to `to`.
    fn mint_claims(env: Env, to: Address, amount: i128);
}
