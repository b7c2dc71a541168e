#![no_std]

multiversx_sc::imports!();

pub mod cache;
pub mod farm;
pub mod ledger;
pub mod storage;
pub mod view;

pub use cache::ReserveCache;
