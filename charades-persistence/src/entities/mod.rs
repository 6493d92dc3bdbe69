pub mod prelude;

pub mod saved_states;
