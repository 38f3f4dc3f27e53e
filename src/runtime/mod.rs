//! Host-side scheduling: the timer/frame contract, a deterministic virtual-time loop
//! implementing it, and the page that routes deliveries to widgets.

pub mod event_loop;
pub mod page;
pub mod scheduler;
