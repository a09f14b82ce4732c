pub mod adapters;
pub mod lm75bd;
pub mod services;
