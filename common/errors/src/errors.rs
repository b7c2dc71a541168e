#![no_std]

pub static ERROR_ASSET_NOT_SUPPORTED: &[u8] = b"Asset not supported.";

pub static ERROR_ASSET_ALREADY_SUPPORTED: &[u8] = b"Asset already supported.";

pub static ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO: &[u8] = b"Amount must be greater than zero.";

pub static ERROR_ADDRESS_IS_ZERO: &[u8] = b"Address is zero.";

pub static ERROR_INVALID_ASSET: &[u8] = b"Invalid asset provided.";

/// Ledger totals no longer match the assets actually held in custody. Fatal.
pub static ERROR_BOOKKEEPING_DRIFT: &[u8] = b"Reserve bookkeeping drift detected.";

pub static ERROR_CLOCK_WENT_BACKWARD: &[u8] = b"Interest accrual clock moved backward.";

pub static ERROR_DEPOSIT_LIMIT: &[u8] = b"Deposit limit reached for this reserve.";

pub static ERROR_BORROW_LIMIT: &[u8] = b"Borrow limit reached for this reserve.";

pub static ERROR_INSUFFICIENT_CASH: &[u8] = b"Not enough cash available in the reserve.";

pub static ERROR_INSUFFICIENT_LP_SUPPLY: &[u8] = b"Not enough LP supply to redeem.";

pub static ERROR_REDEEM_DISABLED: &[u8] = b"Redeeming is disabled for this reserve.";

pub static ERROR_COLLATERAL_DISABLED: &[u8] = b"Asset not supported as collateral.";

pub static ERROR_INSUFFICIENT_COLLATERAL: &[u8] =
    b"Not enough collateral available for this loan.";

pub static ERROR_INSUFFICIENT_DEPOSIT: &[u8] = b"Not enough tokens deposited for this account.";

pub static ERROR_NO_COLLATERAL_TOKEN: &[u8] =
    b"Liquidated account doesn't have this token as collateral.";

pub static ERROR_POSITION_NOT_FOUND: &[u8] = b"Position not found.";

pub static ERROR_HEALTHY_ACCOUNT: &[u8] = b"Account is healthy, nothing to liquidate.";

pub static ERROR_NO_DEBT_TO_REPAY: &[u8] = b"Account has no debt in this asset.";

pub static ERROR_EMODE_CATEGORY_NOT_FOUND: &[u8] = b"E-mode category not found.";

pub static ERROR_EMODE_CATEGORY_DEPRECATED: &[u8] = b"E-mode category deprecated.";

pub static ERROR_EMODE_BORROWS_OUTSIDE_CATEGORY: &[u8] =
    b"All borrowed assets must belong to the e-mode category.";

pub static ERROR_ASSET_ALREADY_SUPPORTED_IN_EMODE: &[u8] = b"Asset already supported in E-mode.";

pub static ERROR_ASSET_NOT_SUPPORTED_IN_EMODE: &[u8] = b"Asset not supported in E-mode.";

pub static ERROR_ASSET_NOT_BORROWABLE_IN_EMODE: &[u8] = b"Asset not borrowable in E-mode.";

pub static ERROR_INVALID_LIQUIDATION_THRESHOLD: &[u8] =
    b"Invalid liquidation threshold has to be higher than the loan-to-value.";

pub static ERROR_PRICE_FEED_NOT_FOUND: &[u8] = b"No price feed found for this asset.";

pub static ERROR_FARM_NOT_FOUND: &[u8] = b"No farm found for this asset and farming type.";

pub static ERROR_REWARD_NOT_FOUND: &[u8] = b"Reward token not registered in this farm.";

pub static ERROR_TOO_MANY_REWARDS: &[u8] = b"Too many reward tokens in this farm.";

pub static ERROR_INVALID_FLASHLOAN_REPAYMENT: &[u8] = b"Invalid flashloan re-payment.";

pub static ERROR_FLASHLOAN_RESERVE_ASSET: &[u8] = b"Flashloan reserve asset is insufficient.";

pub static ERROR_CONTRACT_PAUSED: &[u8] = b"Contract is paused.";
