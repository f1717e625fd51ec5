//! Stats module - group-by aggregation

mod aggregator;

pub use aggregator::{
    Aggregate, AggregateError, CategoryAggregate, DailyAggregate, RatingAggregate,
    SalesAggregator,
};
