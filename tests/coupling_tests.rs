use soft_grab::{
    DragConfig, IntentOutcome, MotionConfig, MotionIntent, PlanarAxes, RigidBody, Transform,
    Vec3, VelocityCoupler,
};

/// Small deterministic generator so the sweeps are reproducible.
struct XorShift(u32);

impl XorShift {
    fn next_unit(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    fn vec3(&mut self, scale: f32) -> Vec3 {
        Vec3::new(self.next_unit(), self.next_unit(), self.next_unit()) * scale
    }
}

#[test]
fn desired_velocity_never_exceeds_max_move_speed() {
    let mut rng = XorShift(0x9e37_79b9);
    let drag = DragConfig::default();
    let motion = MotionConfig::default();
    let mut body = RigidBody::default();
    let mut intent = MotionIntent::new();

    for _ in 0..2000 {
        let anchor = rng.vec3(5.0);
        let current = anchor + rng.vec3(10.0);
        let smoothed = rng.vec3(200.0);
        let dt = 0.001 + (rng.next_unit() + 1.0) * 0.05;

        intent.update(
            &mut body,
            PlanarAxes::XY,
            anchor,
            current,
            smoothed,
            &drag,
            &motion,
            dt,
            0.02,
        );
        let desired = intent.desired_velocity();
        assert!(desired.length() <= motion.max_move_speed + 1e-4);
        assert_eq!(desired.z, 0.0);
    }
}

#[test]
fn coupled_velocity_never_exceeds_hard_cap() {
    let mut rng = XorShift(0x1234_5678);
    let mut coupler = VelocityCoupler::new(PlanarAxes::XY);
    let motion = MotionConfig::default();
    let mut body = RigidBody::default();
    // Start well above the cap.
    body.linear_velocity = Vec3::new(40.0, -25.0, 1.5);

    for _ in 0..2000 {
        let desired = rng.vec3(30.0);
        let written = coupler
            .apply(&mut body, desired, &motion, 0.02)
            .expect("dynamic body accepts coupled drive");
        assert!(written.length() <= motion.hard_max_speed + 1e-4);
        assert!(PlanarAxes::XY.flatten(body.linear_velocity).length() <= motion.hard_max_speed + 1e-4);
        assert_eq!(body.linear_velocity.z, 1.5);
    }
}

#[test]
fn velocity_change_per_step_is_bounded() {
    let mut rng = XorShift(42);
    let mut coupler = VelocityCoupler::new(PlanarAxes::XY);
    let motion = MotionConfig {
        hard_max_speed: 1000.0,
        ..MotionConfig::default()
    };
    let mut body = RigidBody::default();
    let max_change = motion.drag_acceleration * 0.02;

    for _ in 0..500 {
        let before = body.linear_velocity;
        coupler.apply(&mut body, rng.vec3(10.0), &motion, 0.02);
        assert!((body.linear_velocity - before).length() <= max_change + 1e-4);
    }
}

#[test]
fn coupler_converges_on_steady_target() {
    let mut coupler = VelocityCoupler::new(PlanarAxes::XY);
    let motion = MotionConfig::default();
    let mut body = RigidBody::default();
    let desired = Vec3::new(2.0, -1.0, 0.0);

    for _ in 0..20 {
        coupler.apply(&mut body, desired, &motion, 0.02);
    }
    assert!((body.linear_velocity - desired).length() < 1e-5);
}

#[test]
fn kinematic_bodies_take_direct_steps() {
    let mut body = RigidBody::kinematic(Transform::default());
    let mut intent = MotionIntent::new();
    let drag = DragConfig::default();
    let motion = MotionConfig::default();

    let outcome = intent.update(
        &mut body,
        PlanarAxes::XY,
        Vec3::ZERO,
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::ZERO,
        &drag,
        &motion,
        0.02,
        0.02,
    );

    let IntentOutcome::Direct { step } = outcome else {
        panic!("expected a direct step, got {outcome:?}");
    };
    assert!(step.x > 0.0);
    assert_eq!(body.transform.position, step);
    assert_eq!(body.linear_velocity, Vec3::ZERO);
    assert_eq!(intent.desired_velocity(), Vec3::ZERO);

    let mut coupler = VelocityCoupler::new(PlanarAxes::XY);
    assert!(coupler.apply(&mut body, Vec3::X, &motion, 0.02).is_none());
}

#[test]
fn other_constrained_axes_are_honoured() {
    let axes = PlanarAxes::new(soft_grab::Axis::Y);
    let mut coupler = VelocityCoupler::new(axes);
    let mut body = RigidBody::default();
    body.linear_velocity = Vec3::new(0.0, -2.0, 0.0);

    coupler.apply(&mut body, Vec3::new(1.0, 5.0, 1.0), &MotionConfig::default(), 0.02);
    assert_eq!(body.linear_velocity.y, -2.0);
    assert!(body.linear_velocity.x > 0.0);
    assert!(body.linear_velocity.z > 0.0);
}
