pub mod owner_type_filter;
pub mod query_pipeline;
pub mod selection_pipeline;
pub mod switch_latest;
pub mod view_state;
