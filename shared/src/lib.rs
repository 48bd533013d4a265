pub mod conversions;
pub mod tracing_setup;
pub mod transactions;
pub mod transport;

pub type Web3 = web3::Web3<web3::transports::Http>;

/// Shorthand for `H160` literals in tests.
#[macro_export]
macro_rules! addr {
    ($hex:literal) => {
        ::primitive_types::H160(::hex_literal::hex!($hex))
    };
}
