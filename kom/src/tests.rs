use crate::{sim::*, *};
use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

// Ground 6, crank 5, coupler 1.5, follower 4: two closing ranges
const SPLIT: FourBar = FourBar { crank: 5., coupler: 1.5, follower: 4., ground: 6. };
// Ground 5, crank 4, coupler 6, follower 3: one closing range
const RANGE: FourBar = FourBar { crank: 4., coupler: 6., follower: 3., ground: 5. };
const TRIPLE_ROCKER: FourBar = FourBar { crank: 5., coupler: 5., follower: 5., ground: 8. };
const UNASSEMBLED: FourBar = FourBar { crank: 1., coupler: 1., follower: 1., ground: 10. };

#[test]
fn four_bar_at_zero() {
    let fb = FourBar::example();
    let FourBarState::Closed { crank_end, coupler_end } = fb.solve(0.) else {
        panic!("the example must close at zero");
    };
    assert_abs_diff_eq!(crank_end[0], 2., epsilon = 1e-12);
    assert_abs_diff_eq!(crank_end[1], 0., epsilon = 1e-12);
    assert_abs_diff_eq!(coupler_end[0], 5.4, epsilon = 1e-9);
    assert_abs_diff_eq!(coupler_end[1], 13.44f64.sqrt(), epsilon = 1e-9);
    assert_abs_diff_eq!(crank_end.dist(&coupler_end), fb.coupler, epsilon = 1e-9);
    assert_abs_diff_eq!(coupler_end.dist(&fb.follower_pivot()), fb.follower, epsilon = 1e-9);
}

#[test]
fn four_bar_open() {
    let state = UNASSEMBLED.solve(0.);
    assert!(!state.valid());
    assert_eq!(state.closed(), None);
    assert_eq!(state.coupler_end(), state.crank_end());
    assert_eq!(state.coupler_point(&CouplerPoint::new(1., 0.)), None);
    assert!(UNASSEMBLED.curve(36).is_empty());
}

#[test]
fn four_bar_tangent_no_nan() {
    // |A - C| = coupler + follower at zero
    let fb = FourBar { crank: 1., coupler: 2., follower: 3., ground: 6. };
    for angle in [0., 1e-9, -1e-9, 1e-7] {
        let state = fb.solve(angle);
        let [x, y] = state.coupler_end();
        assert!(x.is_finite() && y.is_finite(), "{state:?}");
    }
}

#[test]
fn four_bar_invalid_lengths() {
    assert!(matches!(
        FourBar::new(0., 5., 4., 7.),
        Err(Error::Length { link: "crank", .. })
    ));
    assert!(matches!(
        FourBar::new(2., 5., 4., f64::NAN),
        Err(Error::Length { link: "ground", .. })
    ));
    assert!(matches!(
        FourBar::new(2., -5., 4., 7.),
        Err(Error::Length { link: "coupler", .. })
    ));
    assert_eq!(FourBar::new(2., 5., 4., 7.), Ok(FourBar::example()));
    let fb = FourBar { follower: f64::INFINITY, ..FourBar::example() };
    assert!(fb.validate().is_err());
}

#[test]
fn four_bar_types() {
    assert_eq!(FourBar::example().ty(), FourBarTy::CrankRocker);
    assert!(FourBar::example().is_change_point());
    let fb = FourBar { crank: 1., ..FourBar::example() };
    assert_eq!(fb.ty(), FourBarTy::CrankRocker);
    assert!(!fb.is_change_point());
    let fb = FourBar { crank: 4., coupler: 5., follower: 4.5, ground: 2. };
    assert_eq!(fb.ty(), FourBarTy::DoubleCrank);
    assert!(fb.ty().is_full_rotation());
    assert_eq!(SPLIT.ty(), FourBarTy::DoubleRocker);
    assert_eq!(TRIPLE_ROCKER.ty(), FourBarTy::TripleRocker(Link::Ground));
    assert!(!TRIPLE_ROCKER.ty().is_grashof());
    assert_eq!(UNASSEMBLED.ty(), FourBarTy::Invalid);
    assert_eq!(FourBarTy::CrankRocker.to_string(), "Grashof crank rocker");
    assert!(TRIPLE_ROCKER.ty().is_valid());
    assert!(!UNASSEMBLED.ty().is_valid());
    let names = Link::ALL.map(|link| link.name());
    assert_eq!(names, ["ground", "crank", "coupler", "follower"]);
}

#[test]
fn angle_bounds() {
    assert_eq!(FourBar::example().angle_bound(), AngleBound::Full);
    assert!(matches!(RANGE.angle_bound(), AngleBound::Range(_)));
    assert!(matches!(TRIPLE_ROCKER.angle_bound(), AngleBound::Range(_)));
    assert!(matches!(SPLIT.angle_bound(), AngleBound::Split(_)));
    assert_eq!(UNASSEMBLED.angle_bound(), AngleBound::Invalid);
    assert!(!UNASSEMBLED.angle_bound().contains(0.));
    assert!(!UNASSEMBLED.angle_bound().is_valid());
    assert!(SPLIT.angle_bound().is_valid());
    assert_eq!(FourBar::example().curve(360).len(), 360);
}

#[test]
fn angle_bound_agrees_with_solve() {
    for fb in [FourBar::example(), RANGE, TRIPLE_ROCKER, SPLIT, UNASSEMBLED] {
        let bound = fb.angle_bound();
        let d_min = (fb.coupler - fb.follower).abs();
        let d_max = fb.coupler + fb.follower;
        for i in 0..720 {
            let angle = i as f64 * TAU / 720.;
            let state = fb.solve(angle);
            let d = state.crank_end().dist(&fb.follower_pivot());
            // Skip the limit positions
            if (d - d_min).abs() < 1e-6 || (d - d_max).abs() < 1e-6 {
                continue;
            }
            assert_eq!(bound.contains(angle), state.valid(), "{fb:?} at {angle}");
        }
    }
}

#[test]
fn coupler_point() {
    let fb = FourBar::example();
    let state = fb.solve(1.);
    let [crank_end, coupler_end] = state.closed().unwrap();
    let p = state.coupler_point(&CouplerPoint::new(3., 0.5)).unwrap();
    assert_abs_diff_eq!(crank_end.dist(&p), 3., epsilon = 1e-9);
    let p = state.coupler_point(&CouplerPoint::coupler_end(&fb)).unwrap();
    assert_abs_diff_eq!(p[0], coupler_end[0], epsilon = 1e-9);
    assert_abs_diff_eq!(p[1], coupler_end[1], epsilon = 1e-9);
    assert_eq!(fb.curve_with(90, &CouplerPoint::new(3., 0.5)).len(), 90);
}

#[test]
fn coincident_centers() {
    assert_eq!([1f64, 1.].pllp(1., 1., &[1., 1.]), None);
}

#[test]
fn circles_with_nan_radius() {
    assert_eq!([0f64, 0.].pllp(f64::NAN, 4., &[5., 0.]), None);
    assert_eq!([0f64, 0.].pllp(3., f64::NAN, &[5., 0.]), None);
    assert_eq!([f64::NAN, 0.].pllp(3., 4., &[5., 0.]), None);
}

#[test]
fn four_bar_invalid_fields_never_close() {
    let nan = f64::NAN;
    for fb in [
        FourBar { crank: nan, ..FourBar::example() },
        FourBar { coupler: nan, ..FourBar::example() },
        FourBar { follower: -4., ..FourBar::example() },
        FourBar { ground: 0., ..FourBar::example() },
    ] {
        for angle in [0., 1., PI] {
            let state = fb.solve(angle);
            assert!(!state.valid(), "{fb:?} at {angle}: {state:?}");
        }
        assert!(fb.curve(36).is_empty());
    }
}

proptest! {
    #[test]
    fn four_bar_closure(
        crank in 0.1..10f64,
        coupler in 0.1..10f64,
        follower in 0.1..10f64,
        ground in 0.1..10f64,
        angle in -TAU..TAU,
    ) {
        let fb = FourBar::new(crank, coupler, follower, ground).unwrap();
        let state = fb.solve(angle);
        let d = state.crank_end().dist(&fb.follower_pivot());
        let closes = d <= coupler + follower && d >= (coupler - follower).abs() && d >= f64::EPSILON;
        prop_assert_eq!(state.valid(), closes);
        if let Some([crank_end, coupler_end]) = state.closed() {
            prop_assert!(coupler_end[0].is_finite() && coupler_end[1].is_finite());
            let tol = 1e-6 * (coupler + follower);
            prop_assert!((crank_end.dist(&coupler_end) - coupler).abs() < tol);
            prop_assert!((coupler_end.dist(&fb.follower_pivot()) - follower).abs() < tol);
        }
    }
}

#[test]
fn slider_crank() {
    let sc = SliderCrank::example();
    let s = sc.solve(0.).unwrap();
    assert_abs_diff_eq!(s.slider_x, 8., epsilon = 1e-12);
    assert_abs_diff_eq!(s.velocity, 0., epsilon = 1e-12);
    let s = sc.solve(PI).unwrap();
    assert_abs_diff_eq!(s.slider_x, 4., epsilon = 1e-9);
    assert_abs_diff_eq!(sc.stroke(), 4.);
    // w = PI at 30 rpm
    let s = sc.solve(FRAC_PI_2).unwrap();
    let cos_beta = 32f64.sqrt() / 6.;
    assert_abs_diff_eq!(s.slider_x, 32f64.sqrt(), epsilon = 1e-9);
    assert_abs_diff_eq!(s.velocity, -2. * PI / cos_beta, epsilon = 1e-9);
    assert_abs_diff_eq!(s.acceleration, 2. * PI * PI * 2. / 6., epsilon = 1e-9);
}

#[test]
fn slider_crank_rod_too_short() {
    assert_eq!(
        SliderCrank::new(7., 6., 30.),
        Err(Error::RodTooShort { crank: 7., rod: 6. })
    );
    let sc = SliderCrank { crank: 7., rod: 6., rpm: 30. };
    assert_eq!(sc.solve(0.), Err(Error::RodTooShort { crank: 7., rod: 6. }));
    assert!(SliderCrank::new(2., 6., f64::NAN).is_err());
}

#[test]
fn slider_crank_invalid_fields() {
    let sc = SliderCrank { crank: f64::NAN, ..SliderCrank::example() };
    assert!(matches!(sc.solve(0.), Err(Error::Length { link: "crank", .. })));
    let sc = SliderCrank { rod: f64::NAN, ..SliderCrank::example() };
    assert!(matches!(sc.solve(0.), Err(Error::Length { link: "rod", .. })));
    let sc = SliderCrank { crank: -7., rod: 6., rpm: 30. };
    assert!(matches!(sc.solve(1.2), Err(Error::Length { link: "crank", .. })));
    let sc = SliderCrank { rpm: f64::INFINITY, ..SliderCrank::example() };
    assert!(matches!(sc.solve(0.), Err(Error::Speed(_))));
    let sim = Sim::new(SliderCrank { crank: f64::NAN, ..SliderCrank::example() }, 30.).step(0.1);
    assert!(sim.history.is_empty());
}

#[test]
fn slider_crank_dead_center() {
    let sc = SliderCrank::new(2., 2., 30.).unwrap();
    assert_abs_diff_eq!(sc.solve(0.).unwrap().slider_x, 4., epsilon = 1e-12);
    assert_eq!(sc.solve(FRAC_PI_2), Err(Error::DeadCenter(FRAC_PI_2)));
}

#[test]
fn gear_train() {
    let gt = GearTrain::from_teeth(&[20, 40]).unwrap();
    assert_eq!(gt.speeds(30.), [30., 15.]);
    assert_abs_diff_eq!(gt.ratio(), 0.5);
    assert_eq!(gt.angles(1.), [1., -0.5]);
    let gt = GearTrain::from_teeth(&[20, 40, 10]).unwrap();
    assert_eq!(gt.speeds(30.), [30., 15., 60.]);
    assert_eq!(gt.angles(1.), [1., -0.5, 2.]);
    assert_eq!(GearTrain::example().centers(), [[0., 0.], [6., 0.]]);
    assert_eq!(Gear::from_radius(2.5), Ok(Gear::new(25, 2.5)));
}

#[test]
fn gear_train_ratios() {
    let gt = GearTrain::from_teeth(&[20, 40, 10]).unwrap();
    assert_eq!(gt.mesh_ratios(), [0.5, 4.]);
    assert_abs_diff_eq!(gt.ratio(), 2.);
    assert_abs_diff_eq!(gt.torque_ratio(), 0.5);
    assert_abs_diff_eq!(gt.efficiency(), 0.98 * 0.98, epsilon = 1e-12);
    let gt = GearTrain::example();
    assert_abs_diff_eq!(gt.torque_ratio(), 2.);
    assert_abs_diff_eq!(gt.efficiency(), 0.98);
}

#[test]
fn gear_train_limits() {
    let count = |len| Error::GearCount { min: 2, max: 5, len };
    assert_eq!(GearTrain::from_teeth(&[20]), Err(count(1)));
    assert_eq!(GearTrain::from_teeth(&[20; 6]), Err(count(6)));
    assert_eq!(GearTrain::from_teeth(&[20, 0]), Err(Error::NoTeeth(1)));
    let mut gt = GearTrain::example();
    assert_eq!(gt.remove_gear(), Err(count(1)));
    assert_eq!(gt.len(), 2);
    for _ in 0..3 {
        gt.add_gear(Gear::new(30, 3.)).unwrap();
    }
    assert_eq!(gt.add_gear(Gear::new(30, 3.)), Err(count(6)));
    assert_eq!(gt.len(), 5);
    assert_eq!(gt.remove_gear(), Ok(Gear::new(30, 3.)));
    assert_eq!(gt.add_gear(Gear::new(0, 3.)), Err(Error::NoTeeth(4)));
}

proptest! {
    #[test]
    fn gear_speeds_keep_pitch_line(
        teeth in prop::collection::vec(1..200u32, 2..=5),
        rpm in -600f64..600.,
    ) {
        let gt = GearTrain::from_teeth(&teeth).unwrap();
        let speeds = gt.speeds(rpm);
        prop_assert_eq!(speeds.len(), teeth.len());
        for (n, t) in speeds.iter().zip(&teeth) {
            let tol = 1e-9 * rpm.abs().max(1.) * teeth[0] as f64;
            prop_assert!((n * *t as f64 - rpm * teeth[0] as f64).abs() < tol);
        }
    }
}

#[test]
fn history_window() {
    let mut h = History::new();
    for i in 0..150 {
        let evicted = if i >= HISTORY_CAP { Some(i - HISTORY_CAP) } else { None };
        assert_eq!(h.push(i), evicted);
    }
    assert_eq!(h.len(), HISTORY_CAP);
    assert_eq!(h.first(), Some(&50));
    assert_eq!(h.last(), Some(&149));
    assert!(h.iter().zip(h.iter().skip(1)).all(|(a, b)| a < b));
    assert_eq!(h.to_vec(), (50..150).collect::<Vec<_>>());
    assert_eq!(History::<u8>::with_capacity(0).capacity(), 1);
    h.clear();
    assert!(h.is_empty());
}

#[test]
fn driver_advance() {
    let d = Driver::new(60.).advance(0.5);
    assert_abs_diff_eq!(d.angle, PI, epsilon = 1e-12);
    assert_abs_diff_eq!(d.time, 0.5);
    assert_eq!(d.advance(-1.), d);
    assert_eq!(d.advance(f64::NAN), d);
    // No re-stabilization on a long frame
    let d = Driver::new(30.).advance(10.);
    assert_abs_diff_eq!(d.angle, 10. * PI, epsilon = 1e-9);
}

#[test]
fn step_is_deterministic() {
    let dts = [1. / 60., 1. / 30., 0., 0.1, 1. / 60.];
    let run = || {
        dts.iter()
            .fold(Sim::new(FourBar::example(), 30.), |sim, &dt| step(sim, dt))
    };
    let (a, b) = (run(), run());
    assert_eq!(a.history, b.history);
    assert_eq!(a.driver, b.driver);
    assert_eq!(a.history.len(), dts.len());
}

#[test]
fn step_records_velocity() {
    let sim = Sim::new(FourBar::example(), 30.).step(0.1);
    let first = *sim.history.last().unwrap();
    assert_eq!([first.vx, first.vy], [0., 0.]);
    let sim = sim.step(0.1);
    let second = *sim.history.last().unwrap();
    assert_abs_diff_eq!(second.vx, (second.x - first.x) / 0.1, epsilon = 1e-9);
    assert_abs_diff_eq!(second.vy, (second.y - first.y) / 0.1, epsilon = 1e-9);
    // A zero step repeats the position without a velocity
    let third = *sim.step(0.).history.last().unwrap();
    assert_eq!([third.vx, third.vy], [0., 0.]);
}

#[test]
fn step_skips_open_frames() {
    let sim = (0..10).fold(Sim::new(UNASSEMBLED, 30.), |sim, _| sim.step(0.1));
    assert!(sim.history.is_empty());
    assert_abs_diff_eq!(sim.driver.time, 1., epsilon = 1e-12);
    assert_eq!(sim.current(), None);
}

#[test]
fn step_slider_crank_and_gears() {
    let sc = SliderCrank::example();
    let sim = Sim::slider_crank(sc).step(0.25);
    assert_eq!(sim.driver.rpm, 30.);
    let sample = sim.history.last().unwrap();
    let state = sc.solve(sim.driver.angle).unwrap();
    assert_eq!(sample.x, state.slider_x);
    assert_eq!(sample.v, state.velocity);
    let sim = Sim::new(GearTrain::example(), 30.).step(0.1);
    let sample = sim.history.last().unwrap();
    assert_eq!([sample.input, sample.output], [30., 15.]);
    assert_eq!(sample.fields(), [("input", 30.), ("output", 15.)]);
}

#[test]
fn history_cap_in_simulation() {
    let sim = (0..250).fold(Sim::new(FourBar::example(), 30.), |sim, _| sim.step(1. / 60.));
    assert_eq!(sim.history.len(), HISTORY_CAP);
    let times = sim.history.iter().map(Record::time).collect::<Vec<_>>();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    assert_abs_diff_eq!(times[HISTORY_CAP - 1], 250. / 60., epsilon = 1e-9);
}

#[cfg(feature = "csv")]
#[test]
fn history_to_csv() {
    let sim = (0..5).fold(Sim::new(FourBar::example(), 30.), |sim, _| sim.step(0.1));
    let s = sim.history.to_csv().unwrap();
    let mut lines = s.lines();
    assert_eq!(lines.next(), Some("time,x,y,vx,vy"));
    assert_eq!(lines.count(), 5);
}

#[cfg(feature = "plot")]
#[test]
fn plot_coupler_curve() {
    use crate::plot::{bounding_box, plot_curve, SVGBackend};
    let fb = FourBar::example();
    let curve = fb.curve(90);
    let mut buf = String::new();
    let svg = SVGBackend::with_string(&mut buf, (400, 400));
    plot_curve(svg, "Coupler curve", &fb, &[("coupler end", &curve[..])]).unwrap();
    assert!(buf.contains("<svg"));
    // The ground pivots are inside the chart
    let [x_min, x_max, y_min, y_max] = bounding_box(&[("ground", &[[0., 0.], [7., 0.]][..])]);
    assert!(x_min <= 0. && x_max >= 7. && y_min <= 0. && y_max >= 0.);
}
