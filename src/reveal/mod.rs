pub mod bars;
