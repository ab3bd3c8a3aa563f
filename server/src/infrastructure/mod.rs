mod helpers;
mod tracing;

pub use crate::infrastructure::tracing::*;
pub use helpers::*;

pub fn init_infrastructure() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing()
}
