use projlet::benchmark::{BenchmarkHarness, FrameMetrics};
use projlet::core::config::{AnimationConfig, BenchmarkConfig, SelectorConfig, TissotConfig};
use projlet::rendering::{RecordingSurface, SceneRenderer};
use projlet::selector::create_projection;
use projlet::tissot::compute_distortion_grid_with;
use projlet::{
    compute_distortion_grid, AnimationEngine, LatLng, ManualScheduler, Projection,
    ProjectionKind, ProjectionSelector, ViewClass, ViewportState,
};

/// Distortion, selection and benchmark behaviour through the public API
#[cfg(test)]
mod analysis_tests {
    use super::*;

    #[test]
    fn test_conformal_projections_are_circular_at_the_equator() {
        for kind in [ProjectionKind::Mercator, ProjectionKind::Stereographic] {
            let projection = Projection::new(kind);
            let samples = compute_distortion_grid(&projection, 15.0, 500_000.0);
            let equator = samples
                .iter()
                .find(|sample| sample.latitude == 0.0 && sample.longitude == 0.0)
                .expect("equatorial sample");
            let ratio = equator.major_axis / equator.minor_axis;
            assert!((ratio - 1.0).abs() < 1e-4, "{} ratio {}", kind, ratio);
        }
    }

    #[test]
    fn test_grid_never_emits_degenerate_samples() {
        for kind in ProjectionKind::ALL {
            let projection = Projection::new(kind);
            let samples = compute_distortion_grid_with(&projection, &TissotConfig::default());
            for sample in &samples {
                assert!(sample.major_axis.is_finite() && sample.minor_axis.is_finite());
                assert!(sample.minor_axis > 0.0);
                assert!(sample.major_axis >= sample.minor_axis);
                assert!(sample.latitude.abs() < 90.0);
            }
        }
    }

    #[test]
    fn test_orthographic_grid_skips_the_far_side() {
        let projection = Projection::new(ProjectionKind::Orthographic);
        let samples = compute_distortion_grid(&projection, 15.0, 500_000.0);
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|sample| sample.longitude.abs() <= 90.0));
    }

    #[test]
    fn test_benchmark_aggregation_of_known_frames() {
        let mut harness = BenchmarkHarness::new(&BenchmarkConfig::default());
        harness.start(0.0);
        for i in 1..=10 {
            let now = i as f64 * 1000.0 / 30.0;
            harness.record(FrameMetrics::new(1000.0 / 30.0, 5.0, now));
        }
        let result = harness.stop("synthetic", (512, 512), 1000.0 / 3.0);

        assert!((result.avg_fps - 30.0).abs() < 1e-9);
        assert!(result.passes_target);
        assert!((result.avg_reprojection_time - 5.0).abs() < 1e-12);
        assert_eq!(result.frame_count, 10);
        assert_eq!(result.total_pixels, 262_144);
    }

    #[test]
    fn test_selector_holds_steady_near_a_threshold() {
        let config = SelectorConfig::default();
        let mut selector = ProjectionSelector::new(ProjectionKind::Orthographic, config.clone());
        let mut switches = 0;
        for i in 0..20 {
            let scale = if i % 2 == 0 { 1.45 } else { 1.55 };
            let viewport = ViewportState::new(LatLng::new(10.0, 0.0), scale, 960.0, 600.0);
            if let Some(recommendation) = selector.classify(&viewport) {
                switches += 1;
                selector.confirm(&recommendation);
            }
        }
        assert_eq!(switches, 1);
        assert_eq!(selector.active(), ProjectionKind::NaturalEarth);
    }

    #[test]
    fn test_settled_view_switches_projection_without_jump() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (width, height) = (960.0, 600.0);
        let projection = create_projection(ProjectionKind::NaturalEarth, width, height, None);
        let config = AnimationConfig {
            dynamic_projection: true,
            ..AnimationConfig::default()
        };
        let mut engine = AnimationEngine::new(projection, width, height, config);
        let mut selector = ProjectionSelector::default();
        let mut scheduler = ManualScheduler::new();
        let mut now = 0.0;

        engine.set_target_rotation([0.0, -45.0, 0.0], &mut scheduler);
        engine.zoom_by(3.0, &mut scheduler);
        while scheduler.fire_next().is_some() {
            now += 16.0;
            engine.frame(now, &mut scheduler);
        }

        assert!(engine.poll_settle_check(now).is_none());
        let viewport = engine
            .poll_settle_check(now + engine.config().settle_debounce_ms)
            .expect("settle check after debounce");
        assert!((viewport.scale - 3.0).abs() < 1e-6);

        let recommendation = selector.classify(&viewport).expect("regional view");
        assert_eq!(recommendation.class, ViewClass::Regional);
        assert_eq!(recommendation.kind, ProjectionKind::ConicEqualArea);

        selector.switch_engine(&recommendation, &mut engine, Some(300.0), now, &mut scheduler, None);
        assert_eq!(selector.active(), ProjectionKind::ConicEqualArea);
        assert_eq!(Some(engine.initial_scale()), selector.baseline_scale());
        while scheduler.fire_next().is_some() {
            now += 16.0;
            engine.frame(now, &mut scheduler);
        }

        assert_eq!(engine.projection().kind(), ProjectionKind::ConicEqualArea);
        assert!((engine.relative_scale() - 3.0).abs() < 1e-6);
        assert!((engine.projection().view_center().lat - 45.0).abs() < 1e-6);

        let mut surface = RecordingSurface::ready(960, 600).expect("2d context");
        let mut renderer = SceneRenderer::default();
        renderer
            .render(&mut surface, engine.projection(), engine.cross_fade(), &[])
            .expect("render");
        assert!(surface.layer("sphere").is_some());
    }
}
