pub mod momentum;

pub use momentum::{
    previous_month, prior_month_momentum, Momentum, StrategyResult, StrategySelector,
    AGGREGATE_NAME,
};
