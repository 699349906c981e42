pub mod errors;
pub mod db;
pub mod goods;
pub mod shop;

#[cfg(test)]
mod tests;
