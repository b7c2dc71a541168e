#![no_std]

use common_constants::BPS;

multiversx_sc::imports!();

/// Repayment margin the well-behaved endpoint adds on top of the loan, bps.
pub const FLASH_REPAY_MARGIN: u128 = 100; // 1%

/// Flash-loan counterparty used by the controller tests.
#[multiversx_sc::contract]
pub trait FlashMock {
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    /// Well-behaved target: repays the loan plus a margin covering any fee.
    #[payable("*")]
    #[endpoint(flash)]
    fn flash(&self) {
        let mut payment = self.call_value().egld_or_single_esdt();
        let caller = self.blockchain().get_caller();

        payment.amount += payment
            .amount
            .clone()
            .mul(BigUint::from(FLASH_REPAY_MARGIN))
            .div(BigUint::from(BPS));

        self.tx().to(&caller).payment(payment).transfer();
    }

    /// Misbehaving target: repays the principal short of the fee.
    #[payable("*")]
    #[endpoint(flashRepaySome)]
    fn flash_repay_some(&self) {
        let mut payment = self.call_value().egld_or_single_esdt();
        let caller = self.blockchain().get_caller();

        payment.amount -= payment
            .amount
            .clone()
            .mul(BigUint::from(FLASH_REPAY_MARGIN))
            .div(BigUint::from(BPS));

        self.tx().to(&caller).payment(payment).transfer();
    }

    /// Misbehaving target: keeps the loan entirely.
    #[payable("*")]
    #[endpoint(flashNoRepay)]
    fn flash_no_repay(&self) {}
}
