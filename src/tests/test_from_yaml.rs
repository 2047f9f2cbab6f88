#[cfg(test)]
mod tests {
    use crate::basis::PolynomeBasis;
    use crate::collision_object::{CollisionAlgorithm, CollisionRequest};
    use crate::config_from_file::PlannerConfig;
    use crate::error::ConfigError;
    use crate::tests::test_utils::{create_sliders, Sliders};

    const READ_ERROR: &str = "Failed to load planner configuration from file";

    #[test]
    fn test_planner_config_from_yaml() {
        let loaded = PlannerConfig::from_yaml_file("src/tests/data/planner_full.yaml").expect(READ_ERROR);
        let expected = PlannerConfig {
            collision_request: CollisionRequest {
                num_max_contacts: 3,
                exhaustive: true,
                security_margin: 0.01,
                algorithm: CollisionAlgorithm::Exact,
            },
            check_parameterized: true,
            basis: PolynomeBasis::CanonicalPolynome,
            spline_order: 5,
        };
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_missing_entries_take_defaults() {
        let loaded = PlannerConfig::from_yaml_file("src/tests/data/planner_partial.yaml").expect(READ_ERROR);
        assert_eq!(loaded.collision_request.algorithm, CollisionAlgorithm::BoundingVolume);
        assert_eq!(loaded.collision_request.num_max_contacts, 1);
        assert!(!loaded.collision_request.exhaustive);
        assert!(!loaded.check_parameterized);
        assert_eq!(loaded.basis, PolynomeBasis::Bernstein);
        assert_eq!(loaded.spline_order, 7);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = PlannerConfig::from_yaml_file("src/tests/data/planner_bad_basis.yaml");
        assert!(matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "basis"));

        let result = PlannerConfig::from_yaml_file("src/tests/data/planner_negative_margin.yaml");
        assert!(matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "security_margin"));

        let result = PlannerConfig::from_yaml_file("src/tests/data/no_such_file.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));

        let result = PlannerConfig::from_yaml_str("spline: [unclosed");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_builds_validation_and_steering() {
        let config = PlannerConfig::from_yaml_file("src/tests/data/planner_full.yaml").expect(READ_ERROR);
        let Sliders { robot, .. } = create_sliders();

        let validation = config.collision_validation(&robot);
        assert!(validation.check_parameterized());
        assert_eq!(validation.request(), &config.collision_request);
        assert_eq!(validation.collision_pairs().len(), 2);

        let steering = config.steering(crate::device::Device::configuration_space(&robot));
        assert_eq!(steering.order(), 5);
        assert_eq!(steering.basis(), PolynomeBasis::CanonicalPolynome);
        assert_eq!(steering.derivative_constraints_per_side(), 2);
    }
}
