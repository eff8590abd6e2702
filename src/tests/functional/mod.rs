// Licensed under the Apache-2.0 license

#[cfg(feature = "i2c_target")]
pub mod i2c_test;
