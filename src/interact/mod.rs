pub mod pointer;
pub mod tooltip;
