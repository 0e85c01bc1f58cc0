pub mod database;
pub mod external;
pub mod logging;
