pub mod billing;
pub mod month_date;
pub mod service_name;
pub mod subscription;
pub mod summary_query;
