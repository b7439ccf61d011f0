//! Renderer integration tests.
//!
//! Frames are composed as plain strings from read-only snapshots, so every
//! style can be exercised headlessly against a live episode: no terminal,
//! no side effects on the simulation.

use ramsim::{EnvConfig, Observation, RamSimEnv, RenderSnapshot, Renderer, RendererStyle};

fn live_snapshot(k: usize, ticks: usize) -> RenderSnapshot {
    let mut env = RamSimEnv::new(EnvConfig::with_k(k)).unwrap();
    env.reset(Some(17));
    let mut obs = None;
    for _ in 0..ticks {
        obs = Some(env.step(&vec![7; k]).unwrap().observation);
    }
    RenderSnapshot::from_observation(&obs.unwrap_or_else(|| {
        Observation::from_state(env.engine().state())
    }))
}

#[test]
fn test_every_style_renders_a_live_episode() {
    let snapshot = live_snapshot(4, 10);
    for style in [
        RendererStyle::Cyberpunk,
        RendererStyle::Retro,
        RendererStyle::Anime,
    ] {
        let renderer = style.build(None, 4);
        let frame = renderer.frame(&snapshot);
        assert!(!frame.is_empty(), "{style:?} produced an empty frame");
        assert!(
            frame.contains(&format!("{}", snapshot.step)),
            "{style:?} frame does not show the tick counter"
        );
    }
}

#[test]
fn test_frames_scale_with_process_count() {
    for k in [1, 3, 8] {
        let snapshot = live_snapshot(k, 2);
        assert_eq!(snapshot.process_table.len(), k);
        for style in [
            RendererStyle::Cyberpunk,
            RendererStyle::Retro,
            RendererStyle::Anime,
        ] {
            let frame = style.build(None, k).frame(&snapshot);
            // Every slot must appear in the frame by index.
            for i in 0..k {
                assert!(
                    frame.contains(&format!("{i}")),
                    "{style:?} frame at k={k} is missing slot {i}"
                );
            }
        }
    }
}

#[test]
fn test_rendering_does_not_disturb_the_episode() {
    let mut env = RamSimEnv::new(EnvConfig::with_k(3)).unwrap();
    env.reset(Some(5));
    let result = env.step(&[7, 7, 7]).unwrap();
    let snapshot = RenderSnapshot::from_observation(&result.observation);

    for style in [
        RendererStyle::Cyberpunk,
        RendererStyle::Retro,
        RendererStyle::Anime,
    ] {
        let _ = style.build(None, 3).frame(&snapshot);
    }

    // The engine state still matches the last observation.
    let current = Observation::from_state(env.engine().state());
    assert_eq!(current, result.observation);
}

#[test]
fn test_style_names_roundtrip() {
    for style in [
        RendererStyle::Cyberpunk,
        RendererStyle::Retro,
        RendererStyle::Anime,
    ] {
        assert_eq!(RendererStyle::parse(style.as_str()).unwrap(), style);
    }
    assert!(RendererStyle::parse("vaporwave").is_err());
}

#[test]
fn test_explicit_window_size_overrides_default() {
    let snapshot = live_snapshot(2, 1);
    let wide = RendererStyle::Retro.build(Some((120, 40)), 2).frame(&snapshot);
    let narrow = RendererStyle::Retro.build(Some((60, 20)), 2).frame(&snapshot);
    assert_ne!(wide, narrow);
}
