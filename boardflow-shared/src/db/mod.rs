/// Database utilities
///
/// - `pool`: connection pool creation and health checks
/// - `migrations`: embedded schema migration runner

pub mod migrations;
pub mod pool;
