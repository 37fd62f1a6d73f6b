pub mod causal_chain;
pub mod custom_type;
pub mod leaked_timer;
pub mod oneshot_sender_lost_in_map;
