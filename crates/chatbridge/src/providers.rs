pub mod base;
pub mod configs;
pub mod openrouter;

#[cfg(test)]
pub mod mock;
