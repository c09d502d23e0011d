pub mod cycle_fmt;
