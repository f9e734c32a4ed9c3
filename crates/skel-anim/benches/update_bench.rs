use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Quat, Vec3};
use skel_anim::{
    AnimationController, BoneHierarchy, ControllerConfig, Keyframe, MemoryRig, NoInput,
    RecordingRenderer,
};
use std::hint::black_box;

const BONES: usize = 64;
const KEYS: usize = 30;

fn create_test_rig() -> MemoryRig {
    // Two long chains hanging off one root, roughly humanoid sized
    let mut rig = MemoryRig::new();
    let root = rig.add_bone("root", None, Vec3::ZERO, Quat::IDENTITY);
    let mut tails = [root, root];
    for index in 1..BONES {
        let side = index % 2;
        let name = format!("bone_{index}");
        let offset = Vec3::new(0.1 * side as f32, 0.2, 0.0);
        tails[side] = rig.add_bone(name, Some(tails[side]), offset, Quat::from_rotation_y(0.05));
    }

    for name in ["walk", "run"] {
        let clip = rig.add_clip(name, KEYS);
        for bone in 0..BONES {
            for frame in 0..KEYS {
                let angle = frame as f32 / KEYS as f32 * std::f32::consts::TAU;
                let keyframe = Keyframe::new(
                    Vec3::new(0.0, angle.sin() * 0.01, 0.0),
                    Quat::from_rotation_x(angle.cos() * 0.3),
                );
                clip.set_sample(bone, frame, keyframe);
            }
        }
    }
    rig
}

fn config() -> ControllerConfig {
    ControllerConfig {
        walk_clip: "walk".into(),
        run_clip: "run".into(),
        ..ControllerConfig::default()
    }
}

fn bench_build_hierarchy(c: &mut Criterion) {
    let rig = create_test_rig();

    c.bench_function("build_and_link_hierarchy", |b| {
        b.iter(|| {
            let mut hierarchy = BoneHierarchy::build(black_box(&rig), "ik").unwrap();
            hierarchy.link();
            hierarchy
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let rig = create_test_rig();
    let mut controller = AnimationController::new(config());
    controller.init(&rig, &rig).unwrap();
    let mut renderer = RecordingRenderer::new();

    c.bench_function("controller_update", |b| {
        b.iter(|| {
            renderer.clear();
            controller
                .update(black_box(1.0 / 60.0), &mut NoInput, &mut renderer)
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_build_hierarchy, bench_update);
criterion_main!(benches);
