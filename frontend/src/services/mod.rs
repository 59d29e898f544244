pub mod api;
pub mod date_utils;
pub mod lifetime;
pub mod logging;

#[cfg(test)]
pub mod test_server;
