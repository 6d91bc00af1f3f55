pub mod acceptor;
pub mod error;
pub mod problem;
pub mod selector;
pub mod solver;
pub mod utils;

#[cfg(test)]
mod test_utils;
