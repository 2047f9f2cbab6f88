#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::collision_object::{CollisionAlgorithm, CollisionObjectPtr, CollisionPair, CollisionRequest, UNIVERSE};
    use crate::collision_validation::{CollisionValidation, Validation};
    use crate::device::Device;
    use crate::error::ValidationError;
    use crate::relative_motion::{RelativeMotionMatrix, RelativeMotionType};
    use crate::tests::test_utils::{config, create_sliders, create_wall, random_configurations, Sliders};

    /// Names of the colliding objects, None if the configuration is valid.
    fn culprits(validation: &Validation) -> Option<(String, String)> {
        validation
            .report()
            .map(|report| (report.object1.name().to_string(), report.object2.name().to_string()))
    }

    fn same_object(a: &CollisionObjectPtr, b: &CollisionObjectPtr) -> bool {
        Arc::ptr_eq(a, b)
    }

    #[test]
    fn test_scenario_first_colliding_pair_reported() {
        let Sliders { mut robot, cubes } = create_sliders();
        let mut validation = CollisionValidation::new(&robot);
        // Cube 1 where the wall will be, the others compensate back to x = 0
        let cube_1_at_wall = config(&[1.0, -1.0, 0.0]);
        assert!(validation.validate(&mut robot, &cube_1_at_wall).is_valid());

        let wall = create_wall(1.0);
        validation.add_obstacle(&robot, &wall);
        assert_eq!(validation.collision_pairs().len(), 5);

        let outcome = validation.validate(&mut robot, &cube_1_at_wall);
        let report = outcome.report().expect("Cube 1 must hit the wall");
        assert!(same_object(&report.object1, &cubes[0]));
        assert!(same_object(&report.object2, &wall));

        assert!(validation.validate(&mut robot, &config(&[0.0, 0.0, 0.0])).is_valid());

        // Cubes 2 and 3 both at the wall, cube 2 is registered first
        let outcome = validation.validate(&mut robot, &config(&[0.0, 1.0, 0.0]));
        assert_eq!(culprits(&outcome), Some(("cube_2".to_string(), "wall".to_string())));

        let outcome = validation.validate(&mut robot, &config(&[0.0, 0.0, 1.0]));
        assert_eq!(culprits(&outcome), Some(("cube_3".to_string(), "wall".to_string())));

        // Validation moves the robot
        assert_eq!(robot.current_configuration(), &config(&[0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_scenario_filtering() {
        let Sliders { mut robot, cubes } = create_sliders();
        let mut validation = CollisionValidation::new(&robot);
        let wall = create_wall(1.0);
        validation.add_obstacle(&robot, &wall);

        let mut motion = RelativeMotionMatrix::new(robot.joints().len());
        motion.set(1, UNIVERSE, RelativeMotionType::Constrained);
        motion.set(1, 2, RelativeMotionType::Constrained);
        motion.set(2, UNIVERSE, RelativeMotionType::Parameterized);
        validation.filter_collision_pairs(&motion);

        assert_eq!(
            validation.disabled_pairs(),
            &[
                CollisionPair::new(cubes[0].clone(), cubes[1].clone()),
                CollisionPair::new(cubes[0].clone(), wall.clone()),
            ]
        );
        assert_eq!(validation.parameterized_pairs(), &[CollisionPair::new(cubes[1].clone(), wall.clone())]);
        assert_eq!(
            validation.collision_pairs(),
            &[
                CollisionPair::new(cubes[0].clone(), cubes[2].clone()),
                CollisionPair::new(cubes[2].clone(), wall.clone()),
            ]
        );

        // Disabled pair is never checked
        assert!(validation.validate(&mut robot, &config(&[1.0, -1.0, 0.0])).is_valid());

        // Parameterized pair only on demand
        let cube_2_at_wall = config(&[0.0, 1.0, -1.0]);
        assert!(validation.validate(&mut robot, &cube_2_at_wall).is_valid());
        validation.set_check_parameterized(true);
        let outcome = validation.validate(&mut robot, &cube_2_at_wall);
        assert_eq!(culprits(&outcome), Some(("cube_2".to_string(), "wall".to_string())));

        // Active pairs are checked before parameterized ones
        let outcome = validation.validate(&mut robot, &config(&[0.0, 1.0, 0.0]));
        assert_eq!(culprits(&outcome), Some(("cube_3".to_string(), "wall".to_string())));
    }

    #[test]
    fn test_disabling_colliding_pair_only_warns() {
        let Sliders { mut robot, cubes } = create_sliders();
        let mut validation = CollisionValidation::new(&robot);
        // All cubes start at x = 0, inside the wall
        let wall = create_wall(0.0);
        validation.add_obstacle(&robot, &wall);
        let outcome = validation.validate(&mut robot, &config(&[0.0, 0.0, 0.0]));
        assert_eq!(culprits(&outcome), Some(("cube_1".to_string(), "wall".to_string())));

        let mut motion = RelativeMotionMatrix::new(robot.joints().len());
        motion.set(1, UNIVERSE, RelativeMotionType::Constrained);
        motion.set(2, UNIVERSE, RelativeMotionType::Parameterized);
        validation.filter_collision_pairs(&motion);

        assert_eq!(validation.disabled_pairs(), &[CollisionPair::new(cubes[0].clone(), wall.clone())]);
        assert_eq!(validation.parameterized_pairs(), &[CollisionPair::new(cubes[1].clone(), wall.clone())]);
        assert_eq!(
            validation.collision_pairs(),
            &[
                CollisionPair::new(cubes[0].clone(), cubes[1].clone()),
                CollisionPair::new(cubes[0].clone(), cubes[2].clone()),
                CollisionPair::new(cubes[2].clone(), wall.clone()),
            ]
        );

        // Cube 1 still inside the wall, cubes 2 and 3 moved away
        assert!(validation.validate(&mut robot, &config(&[0.0, 5.0, 0.0])).is_valid());
    }

    #[test]
    fn test_unrecognized_motion_keeps_pair_active() {
        let Sliders { robot, .. } = create_sliders();
        let mut validation = CollisionValidation::new(&robot);
        // 2 x 2 matrix does not know joints 2 and 3
        let motion = RelativeMotionMatrix::from_codes(2, &[0, 0, 0, 0]).expect("Four codes");
        validation.filter_collision_pairs(&motion);
        assert_eq!(validation.collision_pairs().len(), 2);
        assert!(validation.disabled_pairs().is_empty());
        assert!(validation.parameterized_pairs().is_empty());
    }

    #[test]
    fn test_repeated_filtering_partitions_pairs() {
        let Sliders { robot, .. } = create_sliders();
        let mut validation = CollisionValidation::new(&robot);
        let wall = create_wall(1.0);
        validation.add_obstacle(&robot, &wall);
        validation.add_obstacle(&robot, &create_wall(-1.0));
        let all_pairs: Vec<CollisionPair> = validation.collision_pairs().to_vec();

        let mut rng = StdRng::seed_from_u64(7);
        let size = robot.joints().len() + 1;
        for _ in 0..20 {
            let codes: Vec<i32> = (0..size * size).map(|_| rng.gen_range(0..=3)).collect();
            let motion = RelativeMotionMatrix::from_codes(size, &codes).expect("Square matrix");

            let disabled_before = validation.disabled_pairs().to_vec();
            let parameterized_before = validation.parameterized_pairs().to_vec();
            validation.filter_collision_pairs(&motion);

            // Lists only grow at their end
            assert!(validation.disabled_pairs().starts_with(&disabled_before));
            assert!(validation.parameterized_pairs().starts_with(&parameterized_before));

            let mut union: Vec<CollisionPair> = validation.collision_pairs().to_vec();
            union.extend_from_slice(validation.parameterized_pairs());
            union.extend_from_slice(validation.disabled_pairs());
            assert_eq!(union.len(), all_pairs.len());
            for pair in &all_pairs {
                assert_eq!(
                    union.iter().filter(|p| *p == pair).count(),
                    all_pairs.iter().filter(|p| *p == pair).count(),
                    "pair {:?} must be in exactly one list",
                    pair
                );
            }
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let Sliders { mut robot, .. } = create_sliders();
        let build = |robot: &dyn Device| {
            let mut validation = CollisionValidation::new(robot);
            validation.add_obstacle(robot, &create_wall(0.5));
            validation
        };
        let first = build(&robot);
        let second = build(&robot);

        let mut invalid = 0;
        for q in random_configurations(11, 3, 200, 1.0) {
            let a = culprits(&first.validate(&mut robot, &q));
            let b = culprits(&first.validate(&mut robot, &q));
            let c = culprits(&second.validate(&mut robot, &q));
            assert_eq!(a, b);
            assert_eq!(a, c);
            if a.is_some() {
                invalid += 1;
            }
        }
        assert!(invalid > 0, "Some random configurations must hit the wall");
    }

    #[test]
    fn test_bounding_volume_rejects_whatever_exact_rejects() {
        let Sliders { mut robot, .. } = create_sliders();
        let wall = create_wall(0.5);
        let mut exact = CollisionValidation::new(&robot);
        exact.add_obstacle(&robot, &wall);
        let request = CollisionRequest {
            algorithm: CollisionAlgorithm::BoundingVolume,
            ..CollisionRequest::default()
        };
        let mut coarse = CollisionValidation::with_request(&robot, request);
        coarse.add_obstacle(&robot, &wall);

        for q in random_configurations(3, 3, 200, 1.0) {
            if !exact.validate(&mut robot, &q).is_valid() {
                assert!(!coarse.validate(&mut robot, &q).is_valid(), "{:?}", q.as_slice());
            }
        }
    }

    #[test]
    fn test_add_then_remove_obstacle_restores_pairs() {
        let Sliders { mut robot, .. } = create_sliders();
        let mut validation = CollisionValidation::new(&robot);
        let initial = validation.collision_pairs().to_vec();
        let samples = random_configurations(5, 3, 50, 1.0);
        let before: Vec<_> = samples.iter().map(|q| culprits(&validation.validate(&mut robot, q))).collect();

        let wall = create_wall(0.0);
        validation.add_obstacle(&robot, &wall);
        for index in 1..=3 {
            let joint = robot.joint(index).expect("Joint exists").clone();
            validation.remove_obstacle_from_joint(&joint, &wall).expect("Wall was added");
        }
        assert_eq!(validation.collision_pairs(), initial.as_slice());

        let after: Vec<_> = samples.iter().map(|q| culprits(&validation.validate(&mut robot, q))).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_unknown_obstacle_fails() {
        let Sliders { robot, .. } = create_sliders();
        let mut validation = CollisionValidation::new(&robot);
        let wall = create_wall(0.0);
        let joint = robot.joint(2).expect("Joint exists");

        let error = validation.remove_obstacle_from_joint(joint, &wall).expect_err("Never added");
        let ValidationError::NotRegistered { obstacle, joint: joint_name } = error;
        assert_eq!(obstacle, "wall");
        assert_eq!(joint_name, "slider_2");
        assert_eq!(validation.collision_pairs().len(), 2);
    }

    #[test]
    fn test_joint_without_body() {
        let Sliders { mut robot, .. } = create_sliders();
        let bare = robot.add_joint(
            "bare",
            crate::configuration::JointKind::Revolute,
            nalgebra::Isometry3::identity(),
            nalgebra::Vector3::z_axis(),
        );
        let mut validation = CollisionValidation::new(&robot);
        let wall = create_wall(0.0);
        validation.add_obstacle(&robot, &wall);
        // Only the three cubes get paired
        assert_eq!(validation.collision_pairs().len(), 5);

        let joint = robot.joint(bare).expect("Joint exists").clone();
        assert!(validation.remove_obstacle_from_joint(&joint, &wall).is_ok());
        assert_eq!(validation.collision_pairs().len(), 5);
    }
}
