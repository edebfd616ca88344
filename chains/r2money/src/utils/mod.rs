pub mod amount;
pub mod tx;
