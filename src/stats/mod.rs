//! Stats module - resource pools, stamina and survival needs.

mod needs;
mod plugin;
mod pool;
mod stamina;
mod systems;

pub use needs::{NeedConfig, NeedSignal, NeedTrack, Needs, NeedsConfig, MIN_DECAY_INTERVAL};
pub use plugin::StatsPlugin;
pub use pool::{Hysteresis, PoolSignal, ResourcePool, CHANGE_EPSILON};
pub use stamina::{Stamina, StaminaConfig, StaminaDrainReason, DRAIN_TICK_INTERVAL};
pub use systems::{broadcast_need_signals, broadcast_stamina_signals};
