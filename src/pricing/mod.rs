//! Contract pricing formulas.

pub mod cost_of_carry;
