pub mod boardgames;
pub mod rank_history;
pub mod users;

use chrono::Duration;
use saboga_kernel::ModuleRegistry;

use crate::dataset::Dataset;

/// Register all seed modules with the registry. Order matters: the user is
/// provisioned first, and games are written before their rank history.
pub fn register_all(registry: &mut ModuleRegistry, dataset: Dataset, date_tolerance: Duration) {
    registry.register(users::create_module());
    registry.register(boardgames::create_module(dataset.boardgames));
    registry.register(rank_history::create_module(
        dataset.rank_history,
        date_tolerance,
    ));
}
