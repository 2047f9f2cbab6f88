
#[cfg(feature = "collisions")]
mod test_validation_scenario;


#[cfg(all(feature = "allow_filesystem", feature = "collisions"))]
mod test_from_yaml;
