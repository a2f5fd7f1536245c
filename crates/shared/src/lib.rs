pub mod bounds;
pub mod info;
pub mod mode;
pub mod models;
pub mod search;
pub mod sync;
pub mod viewport;
