pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, GameData, load_balance, load_game_data, load_sim_config};
