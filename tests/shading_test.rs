use rand::SeedableRng;
use sketch_ngin::{
    InnerSpace, Vector3,
    color::Color,
    data_structures::material::{Material, MaterialUniform, Shading, Side, Uniform},
    noise::SimplexNoise,
    random::Rng,
    shading::{
        DisplaceAlong, NoiseDisplacement, NoiseSource, SKETCH_SHADER, gradient_color,
        gradient_factor,
    },
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn gradient_curve_endpoints() {
    for power in [1.0, 2.5, 7.0, 20.0] {
        assert_eq!(gradient_factor(0.0, power), 0.0);
        assert_close(gradient_factor(1.0, power), 1.0, 1e-6);
    }
}

#[test]
fn gradient_curve_rises_after_its_minimum() {
    // u^(p*u) dips to its minimum at u = 1/e and climbs to 1 from there.
    let start = std::f32::consts::E.recip();
    for power in [1.0, 5.0, 10.0, 20.0] {
        let mut last = gradient_factor(start, power);
        for step in 0..=200 {
            let u = start + (1.0 - start) * step as f32 / 200.0;
            let f = gradient_factor(u, power);
            assert!(f + 1e-6 >= last, "f({}) = {} < {} for power {}", u, f, last, power);
            assert!((0.0..=1.0).contains(&f));
            last = f;
        }
    }
}

#[test]
fn gradient_stays_in_unit_range() {
    for power in [1.0, 20.0] {
        for step in 0..=100 {
            let f = gradient_factor(step as f32 / 100.0, power);
            assert!((0.0..=1.0).contains(&f), "{}", f);
        }
    }
}

#[test]
fn gradient_clamps_outside_unit_range() {
    assert_eq!(gradient_factor(-0.5, 3.0), 0.0);
    assert_close(gradient_factor(1.5, 3.0), 1.0, 1e-6);
}

#[test]
fn gradient_is_deterministic() {
    let background = Color::rgb(0.9, 0.9, 0.8);
    let color = Color::rgb(0.1, 0.2, 0.7);
    for u in [0.0, 0.3, 0.77, 1.0] {
        assert_eq!(
            gradient_color(u, 4.0, background, color),
            gradient_color(u, 4.0, background, color)
        );
    }
    assert_eq!(gradient_color(0.0, 4.0, background, color), background);
    let top = gradient_color(1.0, 4.0, background, color);
    assert_close(top.r, color.r, 1e-6);
    assert_close(top.g, color.g, 1e-6);
    assert_close(top.b, color.b, 1e-6);
}

fn noise() -> SimplexNoise {
    SimplexNoise::new(&mut Rng::seed_from_u64(3))
}

#[test]
fn noise_displacement_never_exceeds_amplitude() {
    let noise = noise();
    for amplitude in [0.1, 1.0, 3.0] {
        for unsigned in [false, true] {
            let displacement = NoiseDisplacement {
                amplitude,
                unsigned,
                ..Default::default()
            };
            for i in 0..500 {
                let p = Vector3::new(i as f32 * 0.37, (i % 17) as f32 * 0.11, (i % 5) as f32);
                let offset = displacement.offset(&noise, p, i as f32 * 0.05);
                assert!(offset.abs() <= amplitude + 1e-6, "{} > {}", offset, amplitude);
                if unsigned {
                    assert!(offset >= 0.0);
                }
            }
        }
    }
}

#[test]
fn displacement_follows_normal_or_axis() {
    let noise = noise();
    let position = Vector3::new(0.3, 0.2, 0.1);
    let normal = Vector3::new(0.0, 2.0, 0.0);

    let along_normal = NoiseDisplacement::default();
    let moved = along_normal.displace(&noise, position, normal, position, 0.5);
    let delta = moved - position;
    assert_close(delta.x, 0.0, 1e-6);
    assert_close(delta.z, 0.0, 1e-6);

    let along_z = NoiseDisplacement {
        along: DisplaceAlong::AxisZ,
        ..Default::default()
    };
    let moved = along_z.displace(&noise, position, normal, position, 0.5);
    let delta = moved - position;
    assert_close(delta.x, 0.0, 1e-6);
    assert_close(delta.y, 0.0, 1e-6);
    assert!(delta.magnitude() <= 1.0 + 1e-6);
}

#[test]
fn base_position_drives_the_lookup() {
    let noise = noise();
    let displacement = NoiseDisplacement {
        along: DisplaceAlong::AxisZ,
        source: NoiseSource::BasePosition,
        ..Default::default()
    };
    let base = Vector3::new(0.4, -0.2, 0.0);
    let normal = Vector3::unit_z();
    let a = displacement.displace(&noise, Vector3::new(1.0, 0.0, 0.0), normal, base, 1.0);
    let b = displacement.displace(&noise, Vector3::new(-3.0, 2.0, 0.0), normal, base, 1.0);
    // Two vertices sharing a base position move by the same offset.
    assert_close(a.z, b.z, 1e-6);
}

#[test]
fn uniforms_are_addressed_by_name() -> anyhow::Result<()> {
    let mut material = Material::gradient(Color::BLACK, Color::WHITE, 3.0);
    material.set_uniform("time", 2.5f32)?;
    material.set_uniform("power", 12.0f32)?;
    material.set_uniform("background", Color::rgb(1.0, 0.0, 0.0))?;
    assert_eq!(material.uniform("time"), Some(Uniform::Float(2.5)));
    assert_eq!(material.uniform("power"), Some(Uniform::Float(12.0)));
    assert_eq!(
        material.uniform("background"),
        Some(Uniform::Color(Color::rgb(1.0, 0.0, 0.0)))
    );

    assert!(material.set_uniform("frequency", 1.0f32).is_err());
    assert!(material.set_uniform("power", Color::WHITE).is_err());
    assert_eq!(material.uniform("speed"), None);
    Ok(())
}

#[test]
fn vertex_color_materials_have_no_color() {
    let mut material = Material::vertex_colors();
    assert!(material.set_uniform("color", Color::WHITE).is_err());
    assert_eq!(material.shading, Shading::VertexColors);
}

#[test]
fn uniform_block_carries_kind_and_flags() {
    let material = Material::gradient(Color::BLACK, Color::WHITE, 7.0).double_sided();
    let uniform = material.to_uniform();
    assert_eq!(material.side, Side::Double);
    assert_eq!(uniform.params[0], 7.0);
    assert_eq!(uniform.params[2], MaterialUniform::KIND_GRADIENT);

    let noisy = Material::noise_displace(
        Color::WHITE,
        NoiseDisplacement {
            frequency: 0.5,
            speed: 0.25,
            amplitude: 2.0,
            unsigned: true,
            along: DisplaceAlong::AxisZ,
            source: NoiseSource::BasePosition,
        },
    )
    .transparent(0.5);
    let uniform = noisy.to_uniform();
    assert_eq!(uniform.params[2], MaterialUniform::KIND_NOISE);
    assert_eq!(uniform.params[3], 1.0);
    assert_eq!(uniform.noise, [0.5, 0.25, 2.0, 3.0]);
    assert_eq!(uniform.color[3], 0.5);
}

#[test]
fn shader_declares_both_entry_points() {
    assert!(SKETCH_SHADER.contains("fn vs_main"));
    assert!(SKETCH_SHADER.contains("fn fs_main"));
}
