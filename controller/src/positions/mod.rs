multiversx_sc::imports!();

pub mod account;
pub mod borrow;
pub mod deposit;
pub mod emode;
pub mod liquidation;
pub mod repay;
pub mod withdraw;

/// Hot-potato solvency obligation.
///
/// Returned by every profile mutation that can reduce collateral or increase
/// debt. It is deliberately not encodable and not cloneable: the only way to
/// discharge it is `ValidationModule::require_solvent`, which consumes it, so
/// an endpoint cannot observe success without the final solvency check. A
/// profile may dip underwater between the mutation and the check, but never
/// past it.
#[must_use]
pub struct CheckEquity<M: ManagedTypeApi> {
    owner: ManagedAddress<M>,
    subaccount: u8,
}

impl<M: ManagedTypeApi> CheckEquity<M> {
    pub(crate) fn new(owner: ManagedAddress<M>, subaccount: u8) -> Self {
        CheckEquity { owner, subaccount }
    }

    pub fn account(&self) -> (&ManagedAddress<M>, u8) {
        (&self.owner, self.subaccount)
    }
}
