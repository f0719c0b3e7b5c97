//! Shared data types
//!
//! Tickets flow through the pipeline as [`NormalizedTicket`] and
//! [`ClassifiedTicket`]; the report tables are plain serializable rows.

mod enums;
mod month;
mod report;
mod ticket;

pub use enums::{BucketBy, Dimension, FetchState, SlaVerdict};
pub use month::MonthBucket;
pub use report::{
    AggregateRow, AvailableValues, DimensionCount, FetchStatus, FlowRow, Report, Section, Summary,
};
pub use ticket::{ClassifiedTicket, NormalizedTicket, TicketRow};

#[cfg(test)]
pub(crate) use ticket::fixtures;
