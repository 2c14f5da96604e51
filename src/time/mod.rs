pub mod mytime;
pub mod window;

#[cfg(test)]
pub mod test_utils;
