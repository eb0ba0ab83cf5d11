// Host-side tests for the wave field kernel.

use wave_core::field::vertical_factor;
use wave_core::constants::LATTICE_SPACING;
use wave_core::noise::{lattice_value, LatticeNoise};
use wave_core::lut::SineTable;
use wave_core::{Dimensions, WaveField, WaveProfile, WaveShape, WaveSource};

const STRIDE: f32 = 3.0;

fn field(width: f32, height: f32) -> (WaveField, WaveProfile) {
    let p = WaveProfile::normal();
    let mut f = WaveField::new(&p, STRIDE);
    f.resize(Dimensions::new(width, height));
    (f, p)
}

fn source(x: f32, y: f32) -> WaveSource {
    WaveSource {
        x,
        y,
        created_at: 0.0,
        initial_intensity: 0.5,
        strength: 1.0,
    }
}

fn ambient(x: f32, p: &WaveProfile, cy: f32, phase: f64) -> f32 {
    cy + ((x * p.global_frequency) as f64 + phase).sin() as f32 * p.global_amplitude
}

#[test]
fn no_sources_yields_the_ambient_sinusoid() {
    let (mut f, p) = field(900.0, 600.0);
    let shape = WaveShape::default();
    for phase in [0.0f64, 1.3, -4.0, 250.0, 1_048_576.25, 3.0e9] {
        let ys = f.compute(&[], &p, &shape, phase).to_vec();
        assert_eq!(ys.len(), f.sample_count());
        for (j, y) in ys.iter().enumerate() {
            let x = j as f32 * STRIDE;
            let want = ambient(x, &p, 300.0, phase);
            assert!((y - want).abs() < 1e-3, "j={j} phase={phase}: {y} vs {want}");
        }
    }
}

#[test]
fn source_displacement_is_exact_at_a_large_phase() {
    let (mut f, p) = field(900.0, 600.0);
    let shape = WaveShape {
        freq: 0.04,
        speed: 0.5,
        amp: 0.3,
    };
    let s = source(450.0, 200.0);
    let vf = vertical_factor(s.y, f.dims(), p.amplitude_dampening);
    let phase = 1_048_576.75f64;
    f.compute(&[s], &p, &shape, phase);
    let spacing = LATTICE_SPACING as f64;
    let sp = phase * shape.speed as f64;
    let mut touched = 0;
    for (j, (&d, &fo)) in f.displacement().iter().zip(f.max_falloff()).enumerate() {
        if fo == 0.0 {
            continue;
        }
        touched += 1;
        let wph = (j as f32 * STRIDE * shape.freq) as f64 + sp;
        let pos = wph / spacing;
        let cell = pos.floor();
        let (a1, a2) = (lattice_value(cell as i64) as f64, lattice_value(cell as i64 + 1) as f64);
        let sf = (1.0 - ((pos - cell) * std::f64::consts::PI).cos()) * 0.5;
        let ia = a1 + (a2 - a1) * sf;
        let want = wph.sin() * (vf * fo * shape.amp) as f64 * ia;
        assert!((d as f64 - want).abs() < 5e-3, "j={j}: {d} vs {want}");
    }
    assert!(touched > 0);
}

#[test]
fn output_keeps_moving_with_small_steps_at_a_large_phase() {
    let (mut f, p) = field(600.0, 400.0);
    let shape = WaveShape::default();
    let a = f.compute(&[], &p, &shape, 1_048_576.0).to_vec();
    let b = f.compute(&[], &p, &shape, 1_048_576.02).to_vec();
    assert!(a.iter().zip(&b).any(|(x, y)| (x - y).abs() > 1e-3));
}

#[test]
fn falloff_envelope_shrinks_with_distance_and_ends_at_influence() {
    let (mut f, p) = field(1200.0, 600.0);
    let x0 = 450.0;
    let shape = WaveShape::default();
    f.compute(&[source(x0, 300.0)], &p, &shape, 0.7);
    let fall = f.max_falloff().to_vec();
    let disp = f.displacement().to_vec();

    let center = (x0 / STRIDE) as usize;
    assert!((fall[center] - 1.0).abs() < 1e-5);
    for dir in [1i64, -1] {
        let mut prev = fall[center];
        let mut j = center as i64 + dir;
        while j >= 0 && (j as usize) < fall.len() {
            let d = (j as f32 * STRIDE - x0).abs();
            let fo = fall[j as usize];
            if d >= p.horizontal_influence {
                assert_eq!(fo, 0.0, "falloff at d={d}");
                assert_eq!(disp[j as usize], 0.0, "displacement at d={d}");
            } else {
                assert!(fo < prev, "not decreasing at d={d}: {prev} -> {fo}");
                assert!(fo > 0.0);
            }
            prev = fo;
            j += dir;
        }
    }
}

#[test]
fn displacement_stays_inside_its_envelope() {
    let (mut f, p) = field(1200.0, 600.0);
    let shape = WaveShape {
        freq: 0.05,
        speed: 0.8,
        amp: 0.3,
    };
    let s = source(600.0, 200.0);
    let dims = *f.dims();
    let vf = vertical_factor(s.y, &dims, p.amplitude_dampening);
    f.compute(&[s], &p, &shape, 3.0);
    for (d, fo) in f.displacement().iter().zip(f.max_falloff()) {
        assert!(d.abs() <= vf * fo * shape.amp + 1e-4);
    }
}

#[test]
fn weaker_sources_reduce_the_ambient_less() {
    let (mut f, p) = field(900.0, 600.0);
    let shape = WaveShape::default();
    let mut s = source(450.0, 300.0);
    s.strength = 0.25;
    f.compute(&[s], &p, &shape, 0.0);
    assert!((f.max_falloff()[150] - 0.25).abs() < 1e-5);
}

#[test]
fn sample_count_follows_width() {
    let (mut f, p) = field(1000.0, 400.0);
    assert_eq!(f.sample_count(), 335);
    f.resize(Dimensions::new(999.0, 400.0));
    assert_eq!(f.sample_count(), 334);
    let ys = f.compute(&[source(10.0, 10.0)], &p, &WaveShape::default(), 0.0);
    assert_eq!(ys.len(), 334);
    assert_eq!(f.max_falloff().len(), 334);
    assert_eq!(f.displacement().len(), 334);
}

#[test]
fn zero_width_has_no_samples() {
    let (mut f, p) = field(0.0, 400.0);
    assert_eq!(f.sample_count(), 0);
    assert!(f.compute(&[source(1.0, 1.0)], &p, &WaveShape::default(), 0.0).is_empty());
}

#[test]
fn sources_off_the_left_edge_are_clipped() {
    let (mut f, p) = field(300.0, 300.0);
    let ys = f.compute(&[source(-1000.0, 150.0)], &p, &WaveShape::default(), 0.0);
    assert_eq!(ys.len(), 101);
    assert!(f.max_falloff().iter().all(|&v| v == 0.0));
}

#[test]
fn vertical_factor_peaks_at_center_and_vanishes_at_edges() {
    let dims = Dimensions::new(800.0, 600.0);
    let damp = 0.069;
    assert!((vertical_factor(300.0, &dims, damp) - 300.0 * damp).abs() < 1e-5);
    assert!(vertical_factor(0.0, &dims, damp).abs() < 1e-5);
    assert!(vertical_factor(600.0, &dims, damp).abs() < 1e-5);
    assert_eq!(vertical_factor(10.0, &Dimensions::new(800.0, 0.0), damp), 0.0);
}

#[test]
fn lattice_noise_stays_in_range() {
    let sine = SineTable::new();
    let mut noise = LatticeNoise::new();
    for i in -2000..2000 {
        let v = noise.sample(i as f32 * 0.37, &sine);
        assert!((0.4 - 1e-4..=1.0 + 1e-4).contains(&v), "noise {v} at {i}");
    }
    for n in -50..50 {
        let v = lattice_value(n);
        assert!((0.4..=1.0).contains(&v));
    }
}
