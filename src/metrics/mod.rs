pub mod comparison;
pub mod summary;
pub mod timeseries;

pub use comparison::{
    common_positions, AmountTransform, BenchmarkComparator, ComparisonError, ComparisonView,
    Scaling,
};
pub use summary::{ComparisonSummary, CurveStats};
pub use timeseries::{max_drawdown, period_changes};
