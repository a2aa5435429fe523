use mandelview_core::{EscapeTime, IterationLimit, Mandelbrot, View};

/// Evaluate every pixel of a window and collect the counts row by row.
fn render_grid<E: EscapeTime>(kernel: &E, view: &View, width: u32, height: u32) -> Vec<u32> {
    let mut counts = Vec::with_capacity((width * height) as usize);
    for py in 0..height {
        for px in 0..width {
            let point = if kernel.uses_delta_coordinates() {
                view.pixel_delta(px as f64, py as f64, width, height)
            } else {
                view.screen_to_fractal(px as f64, py as f64, width, height)
            };
            counts.push(kernel.escape_time(point));
        }
    }
    counts
}

#[test]
fn default_view_centre_is_interior() {
    let kernel = Mandelbrot::new(IterationLimit::new(200).unwrap());
    let view = View::new(200.0, -0.5, 0.0).unwrap();
    let counts = render_grid(&kernel, &view, 100, 100);

    assert_eq!(counts.len(), 100 * 100);
    assert_eq!(counts[50 * 100 + 50], 200);
}

#[test]
fn headless_render_has_interior_and_exterior() {
    let kernel = Mandelbrot::new(IterationLimit::new(256).unwrap());
    let view = View::new(30.0, -0.5, 0.0).unwrap();
    let counts = render_grid(&kernel, &view, 120, 100);

    let interior = counts.iter().filter(|&&n| n == 256).count();
    let escaped = counts.len() - interior;
    assert!(interior > 0, "should have some interior points");
    assert!(escaped > 0, "should have some escaped points");
    assert!(counts.iter().all(|&n| (1..=256).contains(&n)));
}

#[test]
fn headless_render_is_deterministic() {
    let kernel = Mandelbrot::default();
    let view = View::default();

    let run1 = render_grid(&kernel, &view, 80, 60);
    let run2 = render_grid(&kernel, &view, 80, 60);

    assert_eq!(
        run1, run2,
        "two identical renders must produce identical results"
    );
}

#[test]
fn raising_the_cap_never_lowers_counts() {
    let view = View::new(120.0, -0.75, 0.1).unwrap();
    let low = render_grid(&Mandelbrot::new(IterationLimit::new(50).unwrap()), &view, 40, 30);
    let high = render_grid(&Mandelbrot::new(IterationLimit::new(500).unwrap()), &view, 40, 30);
    for (a, b) in low.iter().zip(&high) {
        assert!(b >= a);
        if *a < 50 {
            assert_eq!(a, b, "escaped points must not depend on the cap");
        }
    }
}

#[cfg(feature = "arbitrary-precision")]
#[test]
fn arbitrary_kernel_agrees_with_standard() {
    use mandelview_core::MandelbrotArbitrary;

    let limit = IterationLimit::new(32).unwrap();
    let view = View::new(64.0, -0.5, 0.0).unwrap();
    let standard = render_grid(&Mandelbrot::new(limit), &view, 40, 40);
    let arbitrary_kernel = MandelbrotArbitrary::new(view.offset(), limit, 128).unwrap();
    let arbitrary = render_grid(&arbitrary_kernel, &view, 40, 40);

    let agree = standard
        .iter()
        .zip(&arbitrary)
        .filter(|(a, b)| a == b)
        .count();
    // Only orbits that graze the bailout circle may round differently.
    assert!(agree * 100 >= standard.len() * 98, "only {agree} pixels agree");
}

#[cfg(feature = "arbitrary-precision")]
#[test]
fn arbitrary_kernel_resolves_detail_below_f64_spacing() {
    use std::collections::HashSet;

    use mandelview_core::MandelbrotArbitrary;

    // Pixel spacing 1e-17 is below the f64 ulp at this centre.
    let view = View::new(1e17, -0.10109636384562, 0.95628651080914).unwrap();
    let limit = IterationLimit::default();
    let standard = render_grid(&Mandelbrot::new(limit), &view, 32, 32);
    let arbitrary_kernel = MandelbrotArbitrary::for_view(&view, limit).unwrap();
    let arbitrary = render_grid(&arbitrary_kernel, &view, 32, 32);

    let distinct = |counts: &[u32]| counts.iter().collect::<HashSet<_>>().len();
    let (std_distinct, arb_distinct) = (distinct(&standard), distinct(&arbitrary));
    assert!(
        arb_distinct > std_distinct,
        "arbitrary {arb_distinct} distinct counts vs standard {std_distinct}"
    );
}
