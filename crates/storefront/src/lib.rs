//! Oud Cart storefront library.
//!
//! Cart persistence, product catalogs, totals, coupons, the recommendation
//! wizard, and rendering of checkout fragments. Front ends drive everything
//! through a [`session::Session`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod coupon;
pub mod error;
pub mod render;
pub mod session;
pub mod storage;
pub mod view;
pub mod wizard;
