pub mod types;
pub mod context;
pub mod macro_cmd;
pub mod model;
pub use types::{
    Command, CommandType, Verbosity, TIME_FORMAT, format_system_time, parse_system_time,
    format_timestamp, parse_timestamp, now_timestamp,
};
pub use context::{ExecContext, ExecState, LeafOutcome, run_leaf};
pub use macro_cmd::MacroCommand;
pub use model::CommandModel;
