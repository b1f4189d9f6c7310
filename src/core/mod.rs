pub mod data_source;
pub mod factory;
pub mod repository;

pub use data_source::FileDataSource;
pub use factory::DataSourceFactory;
pub use repository::{map_order, LookupStrategy, SourceOrderRepository};
