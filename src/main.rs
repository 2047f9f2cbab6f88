use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::{DMatrix, Isometry3, Vector3};
use parry3d::shape::SharedShape;
use tracing::info;

use rs_motion_feasibility::collision_object::CollisionObject;
use rs_motion_feasibility::config_from_file::PlannerConfig;
use rs_motion_feasibility::configuration::{Configuration, JointKind};
use rs_motion_feasibility::device::{Device, SerialRobot};
use rs_motion_feasibility::relative_motion::{RelativeMotionMatrix, RelativeMotionType};
use rs_motion_feasibility::utils::{dump_configuration, dump_path};

/// Planar arm with three revolute joints, each link a capsule of 0.5 m along X.
fn create_arm() -> Result<SerialRobot> {
    let mut robot = SerialRobot::new("planar_arm");
    let mut origin = Isometry3::identity();
    for i in 0..3 {
        let joint = robot.add_joint(format!("joint_{}", i + 1), JointKind::Revolute, origin, Vector3::z_axis());
        let link = SharedShape::capsule_x(0.25, 0.05);
        robot
            .attach_object(joint, format!("link_{}", i + 1), link, Isometry3::translation(0.25, 0.0, 0.0))
            .with_context(|| format!("No joint {} to attach link to", joint))?;
        origin = Isometry3::translation(0.5, 0.0, 0.0);
    }
    robot.add_self_collision_pairs();
    Ok(robot)
}

/// Usage example.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rs_motion_feasibility=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = if args.len() > 1 {
        let path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", path);
        PlannerConfig::from_yaml_file(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        PlannerConfig::default()
    };
    println!("Configuration:\n{}", config.to_yaml());

    let mut robot = create_arm()?;
    let mut validation = config.collision_validation(&robot);

    // Box standing in front of the arm, reachable by the last link only.
    let obstacle = CollisionObject::obstacle(
        "box",
        SharedShape::cuboid(0.1, 0.1, 0.5),
        Isometry3::translation(1.2, 0.6, 0.0),
    );
    validation.add_obstacle(&robot, &obstacle);
    println!("{} collision pairs checked", validation.collision_pairs().len());

    // The first joint is fixed to the base in this setup.
    let mut motion = RelativeMotionMatrix::new(robot.joints().len());
    motion.set(0, 1, RelativeMotionType::Constrained);
    validation.filter_collision_pairs(&motion);
    println!(
        "{} active, {} parameterized, {} disabled after filtering",
        validation.collision_pairs().len(),
        validation.parameterized_pairs().len(),
        validation.disabled_pairs().len()
    );

    let stretched = Configuration::from_column_slice(&[0.0, 0.0, 0.0]);
    let folded = Configuration::from_column_slice(&[0.0, 0.5 * PI, 0.5 * PI]);
    for q in [&stretched, &folded] {
        dump_configuration(q);
        match validation.validate(&mut robot, q).report() {
            None => println!("  collision free"),
            Some(report) => println!(
                "  collision between {} and {}, {} contacts",
                report.object1.name(),
                report.object2.name(),
                report.result.contacts.len()
            ),
        }
    }

    let steering = config.steering(robot.configuration_space());
    println!("Smoothest path of degree {}:", steering.order());
    let path = steering.steer_default(&stretched, &folded)?;
    dump_path(&path, 5);

    // Start with a velocity along the first joint.
    let dof = robot.configuration_space().number_dof();
    let mut velocity = DMatrix::<f64>::zeros(1, dof);
    velocity[(0, 0)] = 1.0;
    let at_rest = DMatrix::<f64>::zeros(1, dof);
    let path = steering.steer(&stretched, &[1], &velocity, &folded, &[1], &at_rest)?;
    println!("Path leaving with velocity {:?}:", path.derivative(0.0, 1).as_slice());
    dump_path(&path, 5);
    Ok(())
}
