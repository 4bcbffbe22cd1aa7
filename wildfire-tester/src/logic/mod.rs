pub mod balance;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod strategies;

pub use balance::{BalanceConfig, run_balance};
pub use policy::Strategy;
pub use seeds::parse_seed;
pub use strategies::{StrategyConfig, run_strategies};
