use std::time::Duration;

use loopstrip_core::{
    AdvanceMode, Anchors, CarouselConfig, CarouselEngine, Command, Direction,
    Environment, Event, Key, Layout, NavCommand, PointerInput, SimHost,
    TimerKind, mount,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// 180px cards with a 20px gap: step 200, four cards visible.
fn layout() -> Layout {
    Layout::new(180.0, 20.0, 800.0)
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn host_with(
    originals: usize,
    env: Environment,
    config: CarouselConfig,
) -> SimHost {
    let (engine, init) =
        CarouselEngine::start(originals, layout(), env, config)
            .expect("engine starts");
    SimHost::new(engine, init)
}

fn host(originals: usize) -> SimHost {
    host_with(originals, Environment::default(), CarouselConfig::default())
}

fn assert_home(host: &SimHost) {
    let n = host.engine().originals();
    let index = host.engine().index();
    assert!(
        (n..2 * n).contains(&index),
        "index {index} rests outside the originals {n}..{}",
        2 * n
    );
}

fn drag(host: &mut SimHost, from: f32, to: f32) {
    host.send(Event::PointerDown(PointerInput::touch(1, from)));
    host.send(Event::PointerMove(PointerInput::touch(1, (from + to) / 2.0)));
    host.send(Event::PointerMove(PointerInput::touch(1, to)));
    host.send(Event::PointerUp(PointerInput::touch(1, to)));
}

#[test]
fn initial_state_rests_on_first_original_without_animation() {
    let host = host(5);
    assert_eq!(host.engine().index(), 5);
    assert_eq!(host.engine().step(), 200.0);
    assert_eq!(host.engine().visible_count(), 4);
    assert_eq!(host.surface().offset, -1000.0);
    assert!(!host.surface().animated);
    assert_eq!(host.surface().transition, Some(ms(350)));
    assert_eq!(host.surface().direction.as_attr(), "");
    assert!(host.is_armed(TimerKind::Autoplay));
}

#[test]
fn loop_invariant_holds_after_every_settle() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for n in [1usize, 2, 3, 5, 8] {
        let mut host = host(n).manual_settle();
        for _ in 0..400 {
            let by = rng.random_range(-(n as i64)..=(n as i64));
            host.advance_by(by);
            let index = host.engine().index();
            assert!(index < 3 * n, "index {index} left the strip of {n}");
            if rng.random_bool(0.4) {
                host.send(Event::TransitionSettled);
                assert!(host.engine().is_settled());
                assert_home(&host);
            }
        }
        host.send(Event::TransitionSettled);
        assert_home(&host);
    }
}

#[test]
fn normalization_is_invisible() {
    let anchors = Anchors::new(layout(), vec!["a", "b", "c"]);
    let (mut carousel, _) =
        mount(Some(anchors), Environment::default(), Default::default())
            .expect("mounts");

    // Walk into the right clone run, then back into the left one.
    for _ in 0..3 {
        carousel.handle(Event::Navigate(NavCommand::Next));
    }
    assert_eq!(carousel.engine().index(), 6);
    let before = carousel.current_slide().copied();
    let commands = carousel.handle(Event::TransitionSettled);
    assert_eq!(carousel.engine().index(), 3);
    assert_eq!(carousel.current_slide().copied(), before);
    assert_eq!(
        commands,
        vec![Command::SetOffset {
            px: -600.0,
            animate: false
        }]
    );

    carousel.handle(Event::Navigate(NavCommand::Prev));
    assert_eq!(carousel.engine().index(), 2);
    let before = carousel.current_slide().copied();
    carousel.handle(Event::TransitionSettled);
    assert_eq!(carousel.engine().index(), 5);
    assert_eq!(carousel.current_slide().copied(), before);
    assert_eq!(before, Some("c"));
}

#[test]
fn settle_in_home_segment_writes_nothing() {
    let mut host = host(5).manual_settle();
    host.advance_by(1);
    let writes = host.surface().writes.len();
    host.send(Event::TransitionSettled);
    assert_eq!(host.surface().writes.len(), writes);
    assert_eq!(host.engine().index(), 6);
}

#[test]
fn remeasure_is_idempotent_and_keeps_index() {
    let mut host = host(5);
    host.advance_by(2);
    host.advance_time(ms(400));
    let index = host.engine().index();

    let wide = Layout::new(280.0, 20.0, 1200.0);
    host.send(Event::Resize(wide));
    let once = host.surface().offset;
    assert_eq!(once, -(index as f32) * 300.0);
    assert!(!host.surface().animated);
    assert_eq!(host.engine().visible_count(), 4);

    for _ in 0..3 {
        host.send(Event::Resize(wide));
    }
    assert_eq!(host.engine().index(), index);
    assert_eq!(host.surface().offset, once);
}

#[test]
fn remeasure_mid_transition_cancels_and_normalizes() {
    let mut host = host(3).manual_settle();
    host.advance_by(3);
    assert_eq!(host.engine().index(), 6);
    host.send(Event::Resize(layout()));
    assert_home(&host);
    assert!(host.engine().is_settled());
    assert_eq!(host.surface().offset, -600.0);
}

#[test]
fn drag_threshold_boundary() {
    // step 200 -> threshold max(40, 66.67)
    let mut host = host(5).manual_settle();
    drag(&mut host, 500.0, 433.0);
    assert_eq!(host.engine().index(), 6);
    assert_eq!(host.surface().direction, Direction::Right);
    host.send(Event::TransitionSettled);

    let mut host = self::host(5).manual_settle();
    drag(&mut host, 500.0, 434.0);
    assert_eq!(host.engine().index(), 5);
    assert_eq!(host.surface().offset, -1000.0);
    assert!(host.surface().animated);
    assert_eq!(host.surface().direction.as_attr(), "");
}

#[test]
fn swipe_direction_selects_neighbour() {
    let mut host = host(5).manual_settle();
    drag(&mut host, 500.0, 430.0);
    assert_eq!(host.engine().index(), 6);

    let mut host = self::host(5).manual_settle();
    drag(&mut host, 500.0, 570.0);
    assert_eq!(host.engine().index(), 4);
    assert_eq!(host.surface().direction, Direction::Left);
    host.send(Event::TransitionSettled);
    assert_eq!(host.engine().index(), 9);
}

#[test]
fn drag_follows_pointer_without_animation() {
    let mut host = host(5);
    host.send(Event::PointerDown(PointerInput::touch(3, 400.0)));
    assert!(host.engine().is_dragging());
    assert!(!host.surface().transition_enabled);
    assert_eq!(host.surface().captured_pointer, Some(3));

    host.send(Event::PointerMove(PointerInput::touch(3, 350.0)));
    assert_eq!(host.surface().offset, -1050.0);
    assert!(!host.surface().animated);

    // A second finger does not hijack the session.
    host.send(Event::PointerMove(PointerInput::touch(9, 100.0)));
    assert_eq!(host.surface().offset, -1050.0);
    host.send(Event::PointerUp(PointerInput::touch(9, 100.0)));
    assert!(host.engine().is_dragging());

    host.send(Event::PointerCancel(PointerInput::touch(3, 380.0)));
    assert!(!host.engine().is_dragging());
    assert!(host.surface().transition_enabled);
    assert_eq!(host.surface().captured_pointer, None);
    assert_eq!(host.engine().index(), 5);
    assert_eq!(host.surface().offset, -1000.0);
}

#[test]
fn pointer_events_without_a_session_are_ignored() {
    let mut host = host(4);
    let writes = host.surface().writes.len();
    host.send(Event::PointerMove(PointerInput::touch(1, 10.0)));
    host.send(Event::PointerUp(PointerInput::touch(1, 500.0)));
    host.send(Event::PointerCancel(PointerInput::touch(1, 500.0)));
    assert_eq!(host.surface().writes.len(), writes);
    assert_eq!(host.engine().index(), 4);
}

#[test]
fn secondary_mouse_button_only_counts_as_interaction() {
    let mut host = host(4);
    let right_click = PointerInput::mouse(1, 200.0).with_button(2);
    host.send(Event::PointerDown(right_click));
    assert!(!host.engine().is_dragging());
    assert!(!host.is_armed(TimerKind::Autoplay));
    assert!(host.is_armed(TimerKind::Resume));
}

#[test]
fn pointer_down_mid_transition_normalizes_first() {
    let mut host = host(5).manual_settle();
    host.advance_by(5);
    assert_eq!(host.engine().index(), 10);
    host.send(Event::PointerDown(PointerInput::touch(1, 300.0)));
    assert_eq!(host.engine().index(), 5);
    assert_eq!(host.surface().offset, -1000.0);
    host.send(Event::PointerMove(PointerInput::touch(1, 280.0)));
    assert_eq!(host.surface().offset, -1020.0);
}

#[test]
fn rapid_input_never_leaves_the_strip() {
    let mut host = host(3).manual_settle();
    for _ in 0..20 {
        host.send(Event::Navigate(NavCommand::Next));
        assert!(host.engine().index() < 9);
    }
    for _ in 0..40 {
        host.send(Event::Key(Key::ArrowLeft));
        assert!(host.engine().index() < 9);
    }
    host.send(Event::TransitionSettled);
    assert_home(&host);
}

#[test]
fn autoplay_advances_one_card_per_interval() {
    let mut host = host(5);
    host.advance_time(ms(3_499));
    assert_eq!(host.ticks(), 0);
    host.advance_time(ms(1));
    assert_eq!(host.ticks(), 1);
    assert_eq!(host.engine().index(), 6);
    assert_eq!(host.surface().direction.as_attr(), "right");

    host.advance_time(ms(3_500 * 4 + 400));
    assert_eq!(host.ticks(), 5);
    // Five ticks from slot 5 land on slot 10, folded back to 5.
    assert_eq!(host.engine().index(), 5);
    assert_home(&host);
}

#[test]
fn autoplay_pages_by_visible_count() {
    let config = CarouselConfig {
        autoplay_step: AdvanceMode::Page,
        ..CarouselConfig::default()
    };
    let mut host = host_with(5, Environment::default(), config);
    host.advance_time(ms(3_500));
    assert_eq!(host.engine().index(), 9);
    host.advance_time(ms(3_500 + 350));
    assert_eq!(host.engine().index(), 8);
}

#[test]
fn interactions_debounce_autoplay() {
    let mut host = host(5);
    host.advance_time(ms(1_000));
    host.send(Event::PointerEnter);
    assert!(!host.is_armed(TimerKind::Autoplay));

    host.advance_time(ms(1_500));
    host.send(Event::Key(Key::from("Tab")));
    host.advance_time(ms(1_500));
    host.send(Event::FocusIn);
    host.advance_time(ms(1_999));
    assert_eq!(host.ticks(), 0);
    assert!(!host.is_armed(TimerKind::Autoplay));

    // Cooldown after the last interaction (t=4000) ends at t=6000.
    host.advance_time(ms(1));
    assert!(host.is_armed(TimerKind::Autoplay));
    host.advance_time(ms(3_499));
    assert_eq!(host.ticks(), 0);
    host.advance_time(ms(1));
    assert_eq!(host.ticks(), 1);
    assert_eq!(host.now(), ms(9_500));
}

#[test]
fn navigation_counts_as_interaction() {
    let mut host = host(5);
    host.send(Event::Navigate(NavCommand::Next));
    assert_eq!(host.engine().index(), 6);
    assert!(host.is_armed(TimerKind::Resume));
    assert!(!host.is_armed(TimerKind::Autoplay));

    host.send(Event::Key(Key::ArrowRight));
    assert_eq!(host.engine().index(), 7);
    host.advance_time(ms(2_000));
    assert!(host.is_armed(TimerKind::Autoplay));
}

#[test]
fn long_drag_holds_autoplay_until_release() {
    let mut host = host(5);
    host.send(Event::PointerEnter);
    host.send(Event::PointerDown(PointerInput::touch(1, 500.0)));
    assert!(!host.is_armed(TimerKind::Resume));

    for step in 0..10 {
        host.advance_time(ms(1_000));
        let x = 500.0 - step as f32;
        host.send(Event::PointerMove(PointerInput::touch(1, x)));
    }
    assert_eq!(host.ticks(), 0);

    host.send(Event::PointerUp(PointerInput::touch(1, 490.0)));
    assert!(host.is_armed(TimerKind::Resume));
    host.advance_time(ms(2_000 + 3_500));
    assert_eq!(host.ticks(), 1);
}

#[test]
fn navigation_is_ignored_while_dragging() {
    let mut host = host(5);
    host.send(Event::PointerDown(PointerInput::mouse(1, 500.0)));
    host.send(Event::Key(Key::ArrowRight));
    host.send(Event::Navigate(NavCommand::Next));
    host.send(Event::FocusIn);
    assert_eq!(host.engine().index(), 5);
    assert!(!host.is_armed(TimerKind::Resume));

    host.send(Event::PointerMove(PointerInput::mouse(1, 490.0)));
    assert_eq!(host.surface().offset, -1010.0);
    assert_eq!(host.engine().index(), 5);

    host.send(Event::PointerUp(PointerInput::mouse(1, 490.0)));
    assert_eq!(host.engine().index(), 5);
    assert_eq!(host.surface().offset, -1000.0);
    assert!(host.is_armed(TimerKind::Resume));
}

#[test]
fn reduced_motion_never_arms_autoplay() {
    let env = Environment {
        visible: true,
        reduced_motion: true,
    };
    let mut host = host_with(5, env, CarouselConfig::default());
    host.send(Event::Navigate(NavCommand::Next));
    host.advance_time(ms(10_000));
    host.send(Event::VisibilityChanged(false));
    host.send(Event::VisibilityChanged(true));
    drag(&mut host, 300.0, 100.0);
    host.advance_time(ms(10_000));

    assert!(
        !host
            .started()
            .iter()
            .any(|(_, kind)| *kind == TimerKind::Autoplay)
    );
    assert_eq!(host.ticks(), 0);
}

#[test]
fn reduced_motion_is_checked_at_start_time() {
    let mut host = host(5);
    host.send(Event::ReducedMotionChanged(true));
    assert!(!host.is_armed(TimerKind::Autoplay));
    host.send(Event::ReducedMotionChanged(false));
    assert!(!host.is_armed(TimerKind::Autoplay));

    // The next explicit start picks up the new preference.
    host.send(Event::PointerEnter);
    host.advance_time(ms(2_000));
    assert!(host.is_armed(TimerKind::Autoplay));
}

#[test]
fn visibility_stops_and_starts_autoplay() {
    let mut host = host(5);
    host.send(Event::VisibilityChanged(false));
    assert!(!host.is_armed(TimerKind::Autoplay));
    host.advance_time(ms(10_000));
    assert_eq!(host.ticks(), 0);

    host.send(Event::VisibilityChanged(true));
    assert!(host.is_armed(TimerKind::Autoplay));
}

#[test]
fn visibility_restarts_autoplay_and_leaves_cooldown_alone() {
    let mut host = host(5);
    host.send(Event::PointerEnter);
    host.send(Event::VisibilityChanged(false));
    assert!(host.is_armed(TimerKind::Resume));
    host.send(Event::VisibilityChanged(true));
    assert!(host.is_armed(TimerKind::Autoplay));
    assert!(host.is_armed(TimerKind::Resume));

    // The cooldown ends at 2s and restarts the tick from there.
    host.advance_time(ms(4_000));
    assert!(!host.is_armed(TimerKind::Resume));
    assert_eq!(host.ticks(), 0);
    host.advance_time(ms(1_600));
    assert_eq!(host.ticks(), 1);
}

#[test]
fn cooldown_elapsing_while_hidden_does_not_start_autoplay() {
    let mut host = host(5);
    host.send(Event::FocusIn);
    host.send(Event::VisibilityChanged(false));
    host.advance_time(ms(5_000));
    assert!(!host.is_armed(TimerKind::Autoplay));
    assert_eq!(host.ticks(), 0);
}

#[test]
fn disabled_autoplay_arms_nothing() {
    let config = CarouselConfig {
        autoplay: false,
        ..CarouselConfig::default()
    };
    let mut host = host_with(5, Environment::default(), config);
    host.send(Event::Navigate(NavCommand::Prev));
    host.advance_time(ms(20_000));
    assert!(host.started().is_empty());
}

#[test]
fn stale_timer_firings_are_ignored() {
    let (mut engine, _) = CarouselEngine::start(
        5,
        layout(),
        Environment::default(),
        CarouselConfig::default(),
    )
    .expect("starts");
    let tick = engine.live_timer(TimerKind::Autoplay).expect("autoplay armed");

    engine.handle(Event::PointerEnter);
    assert!(engine.handle(Event::Tick(tick)).is_empty());
    assert_eq!(engine.index(), 5);

    let resume = engine.live_timer(TimerKind::Resume).expect("cooldown armed");
    engine.handle(Event::FocusIn);
    assert!(engine.handle(Event::ResumeElapsed(resume)).is_empty());
    assert!(engine.resume_pending());
}

#[test]
fn dispose_clears_timers_and_silences_events() {
    let mut host = host(5);
    host.send(Event::PointerEnter);
    host.send(Event::PointerDown(PointerInput::touch(1, 100.0)));
    host.send(Event::FocusIn);
    host.dispose();

    assert!(!host.is_armed(TimerKind::Autoplay));
    assert!(!host.is_armed(TimerKind::Resume));
    assert_eq!(host.surface().captured_pointer, None);
    assert!(host.engine().is_disposed());

    let writes = host.surface().writes.len();
    host.send(Event::Navigate(NavCommand::Next));
    host.send(Event::VisibilityChanged(true));
    host.advance_time(ms(30_000));
    assert_eq!(host.surface().writes.len(), writes);
    assert!(host.started().iter().all(|(at, _)| *at == Duration::ZERO));
}

#[test]
fn zero_slides_stay_inert() {
    assert!(
        CarouselEngine::start(
            0,
            layout(),
            Environment::default(),
            CarouselConfig::default()
        )
        .is_none()
    );
    let anchors = Anchors::new(layout(), Vec::<u32>::new());
    assert!(
        mount(Some(anchors), Environment::default(), Default::default())
            .is_none()
    );
}

#[test]
fn single_slide_loops_onto_itself() {
    let mut host = host(1);
    for _ in 0..5 {
        host.send(Event::Navigate(NavCommand::Next));
        host.advance_time(ms(350));
        assert_eq!(host.engine().index(), 1);
    }
}
