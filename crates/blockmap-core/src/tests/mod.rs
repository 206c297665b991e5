
use crate::{ClassRecord, ClassRegistry};

/// `env` holding a scoreboard and an agent, as a verification environment usually starts out.
pub(crate) fn small_env() -> ClassRegistry {
    ClassRegistry::from_records([
        ClassRecord::new("env", "uvm_env")
            .with_property("scoreboard", "sb")
            .with_property("agent", "ag"),
        ClassRecord::new("scoreboard", "uvm_scoreboard"),
        ClassRecord::new("agent", "uvm_agent"),
    ])
    .unwrap()
}
