pub mod clock;
pub mod ids;
pub mod module;
pub mod registry;
pub mod settings;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
