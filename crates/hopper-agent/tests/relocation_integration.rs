//! Integration tests for the relocation pipeline.
//!
//! These tests exercise the application layer end-to-end:
//! `MonitorRegistry` + `RelocateWindowUseCase` + `PlacementExecutor` driving
//! the in-memory `FakeDesktop`.

use std::sync::Arc;
use std::time::Duration;

use hopper_agent::application::desktop::{ShowCommand, WindowSystem};
use hopper_agent::application::monitor_registry::{MonitorRegistry, DEFAULT_CACHE_TTL};
use hopper_agent::application::placement::{PlacementExecutor, PlacementOptions};
use hopper_agent::application::relocate::RelocateWindowUseCase;
use hopper_agent::infrastructure::desktop::mock::{DesktopCall, FakeDesktop, FakeWindow};
use hopper_core::{Dpi, ExclusionPolicy, Rect, ShowState, TargetRect};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// 1920x1080 at 100% with a 40 px taskbar, and a 2560x1440 at 150% to its
/// right.
fn mixed_scale_desktop() -> FakeDesktop {
    let desktop = FakeDesktop::new();
    desktop.add_monitor(Rect::new(0, 0, 1920, 1080), Rect::new(0, 0, 1920, 1040), Some(96));
    let right = Rect::new(1920, 0, 4480, 1440);
    desktop.add_monitor(right, right, Some(144));
    desktop
}

fn fast_options() -> PlacementOptions {
    PlacementOptions {
        settle_timeout: Duration::from_millis(50),
        settle_poll: Duration::from_millis(1),
        ..PlacementOptions::default()
    }
}

fn use_case_with(desktop: &FakeDesktop, policy: ExclusionPolicy) -> RelocateWindowUseCase {
    let registry = Arc::new(MonitorRegistry::new(
        Arc::new(desktop.clone()),
        desktop.dpi_resolver(),
        DEFAULT_CACHE_TTL,
    ));
    let windows: Arc<dyn WindowSystem> = Arc::new(desktop.clone());
    let executor = PlacementExecutor::new(Arc::clone(&windows), fast_options());
    RelocateWindowUseCase::new(registry, windows, executor, policy)
}

fn use_case(desktop: &FakeDesktop) -> RelocateWindowUseCase {
    use_case_with(desktop, ExclusionPolicy::default())
}

/// A window covering 10%..60% of the left monitor's work area.
fn editor_rect() -> Rect {
    Rect::new(192, 104, 1152, 624)
}

fn set_window_pos_count(desktop: &FakeDesktop) -> usize {
    desktop
        .calls()
        .iter()
        .filter(|c| matches!(c, DesktopCall::SetWindowPos(..)))
        .count()
}

// ── Normal windows ────────────────────────────────────────────────────────────

#[test]
fn test_normal_window_keeps_relative_placement_across_scales() {
    // Arrange
    let desktop = mixed_scale_desktop();
    let window = desktop.add_window(FakeWindow::new(editor_rect(), "Editor"));

    // Act
    let moved = use_case(&desktop).move_active_window_to_next_monitor();

    // Assert: 10% offset and 50% size of the destination work area.
    assert!(moved);
    let fake = desktop.window(window).expect("window still exists");
    assert_eq!(fake.rect, Rect::from_origin_size(2176, 144, 1280, 720));
    assert_eq!(fake.state, ShowState::Normal);
}

#[test]
fn test_two_presses_bring_window_back_to_its_original_rect() {
    let desktop = mixed_scale_desktop();
    let window = desktop.add_window(FakeWindow::new(editor_rect(), "Editor"));
    let use_case = use_case(&desktop);

    assert!(use_case.move_active_window_to_next_monitor());
    assert!(use_case.move_active_window_to_next_monitor());

    assert_eq!(desktop.window(window).map(|w| w.rect), Some(editor_rect()));
}

#[test]
fn test_single_monitor_moves_nothing() {
    // Arrange
    let desktop = FakeDesktop::new();
    desktop.add_monitor(Rect::new(0, 0, 1920, 1080), Rect::new(0, 0, 1920, 1040), Some(96));
    desktop.add_window(FakeWindow::new(editor_rect(), "Editor"));

    // Act / Assert
    assert!(!use_case(&desktop).move_active_window_to_next_monitor());
    assert!(desktop.calls().is_empty());
}

#[test]
fn test_no_foreground_window_moves_nothing() {
    let desktop = mixed_scale_desktop();
    desktop.add_window(FakeWindow::new(editor_rect(), "Editor"));
    desktop.set_foreground(None);

    assert!(!use_case(&desktop).move_active_window_to_next_monitor());
    assert!(desktop.calls().is_empty());
}

#[test]
fn test_shell_window_is_never_touched() {
    let desktop = mixed_scale_desktop();
    desktop.add_window(FakeWindow::new(Rect::new(0, 1040, 1920, 1080), "Taskbar").with_class("Shell_TrayWnd"));

    assert!(!use_case(&desktop).move_active_window_to_next_monitor());
    assert!(desktop.calls().is_empty());
}

#[test]
fn test_fullscreen_window_respects_the_exclusion_setting() {
    // Arrange: a borderless window covering the whole left monitor.
    let desktop = mixed_scale_desktop();
    desktop.add_window(FakeWindow::new(Rect::new(0, 0, 1920, 1080), "Game"));

    // Act / Assert
    assert!(!use_case_with(&desktop, ExclusionPolicy::new(true)).move_active_window_to_next_monitor());
    assert!(desktop.calls().is_empty());

    assert!(use_case_with(&desktop, ExclusionPolicy::new(false)).move_active_window_to_next_monitor());
}

#[test]
fn test_misplaced_move_is_reported_as_failure() {
    let desktop = mixed_scale_desktop();
    desktop.add_window(FakeWindow::new(editor_rect(), "Editor"));
    desktop.offset_moves(50, 0);

    assert!(!use_case(&desktop).move_active_window_to_next_monitor());
    assert_eq!(set_window_pos_count(&desktop), 1);
}

#[test]
fn test_os_size_override_gets_one_corrective_resize() {
    // Arrange
    let desktop = mixed_scale_desktop();
    let window = desktop.add_window(FakeWindow::new(editor_rect(), "Editor"));
    desktop.override_next_size(500, 400);

    // Act
    let moved = use_case(&desktop).move_active_window_to_next_monitor();

    // Assert
    assert!(moved);
    assert_eq!(
        desktop.calls(),
        vec![
            DesktopCall::SetWindowPos(window, TargetRect::new(2176, 144, 1280, 720)),
            DesktopCall::SetWindowPos(window, TargetRect::new(2176, 144, 1280, 720)),
        ]
    );
    assert_eq!(
        desktop.window(window).map(|w| w.rect),
        Some(Rect::from_origin_size(2176, 144, 1280, 720))
    );
}

// ── Maximized windows ─────────────────────────────────────────────────────────

#[test]
fn test_maximized_window_ends_maximized_on_next_monitor() {
    // Arrange
    let desktop = mixed_scale_desktop();
    let window = desktop.add_maximized_window(editor_rect(), "Browser");

    // Act
    let moved = use_case(&desktop).move_active_window_to_next_monitor();

    // Assert
    assert!(moved);
    let fake = desktop.window(window).expect("window still exists");
    assert_eq!(fake.state, ShowState::Maximized);
    assert_eq!(fake.rect, Rect::new(1912, -8, 4488, 1448));
    assert_eq!(fake.normal_rect, Rect::from_origin_size(2176, 144, 1280, 720));
    assert_eq!(
        desktop.calls(),
        vec![
            DesktopCall::ShowWindow(window, ShowCommand::Restore),
            DesktopCall::SetWindowPos(window, TargetRect::new(2176, 144, 1280, 720)),
            DesktopCall::ShowWindow(window, ShowCommand::Maximize),
        ]
    );
}

#[test]
fn test_failed_intermediate_move_remaximizes_on_original_monitor() {
    // Arrange
    let desktop = mixed_scale_desktop();
    let window = desktop.add_maximized_window(editor_rect(), "Browser");
    desktop.fail_moves(true);

    // Act
    let moved = use_case(&desktop).move_active_window_to_next_monitor();

    // Assert
    assert!(!moved);
    let fake = desktop.window(window).expect("window still exists");
    assert_eq!(fake.state, ShowState::Maximized);
    assert_eq!(fake.rect, Rect::new(-8, -8, 1928, 1048));
    assert_eq!(
        desktop.calls(),
        vec![
            DesktopCall::ShowWindow(window, ShowCommand::Restore),
            DesktopCall::SetWindowPos(window, TargetRect::new(2176, 144, 1280, 720)),
            DesktopCall::SetWindowPos(window, editor_rect().to_target()),
            DesktopCall::ShowWindow(window, ShowCommand::Maximize),
        ]
    );
}

#[test]
fn test_restore_that_never_settles_rolls_back_without_moving() {
    let desktop = mixed_scale_desktop();
    let window = desktop.add_maximized_window(editor_rect(), "Browser");
    desktop.ignore_restore(true);

    assert!(!use_case(&desktop).move_active_window_to_next_monitor());

    assert_eq!(set_window_pos_count(&desktop), 0);
    let fake = desktop.window(window).expect("window still exists");
    assert_eq!(fake.state, ShowState::Maximized);
    assert_eq!(fake.rect, Rect::new(-8, -8, 1928, 1048));
}

#[test]
fn test_capture_failure_after_restore_remaximizes_on_original_monitor() {
    // Arrange: the first rect read (the initial capture) succeeds, the
    // read after restore fails.
    let desktop = mixed_scale_desktop();
    let window = desktop.add_maximized_window(editor_rect(), "Browser");
    desktop.fail_window_rect_after(1);

    // Act
    let moved = use_case(&desktop).move_active_window_to_next_monitor();

    // Assert
    assert!(!moved);
    let fake = desktop.window(window).expect("window still exists");
    assert_eq!(fake.state, ShowState::Maximized);
    assert_eq!(fake.rect, Rect::new(-8, -8, 1928, 1048));
    assert_eq!(
        desktop.calls(),
        vec![
            DesktopCall::ShowWindow(window, ShowCommand::Restore),
            DesktopCall::ShowWindow(window, ShowCommand::Maximize),
        ]
    );
}

#[test]
fn test_failing_show_window_leaves_window_in_place() {
    let desktop = mixed_scale_desktop();
    let window = desktop.add_maximized_window(editor_rect(), "Browser");
    desktop.fail_show_window(true);

    assert!(!use_case(&desktop).move_active_window_to_next_monitor());

    let fake = desktop.window(window).expect("window still exists");
    assert_eq!(fake.rect, Rect::new(-8, -8, 1928, 1048));
    assert_eq!(set_window_pos_count(&desktop), 0);
}

// ── Monitor registry ──────────────────────────────────────────────────────────

#[test]
fn test_registry_serves_cached_monitors_until_invalidated() {
    // Arrange
    let desktop = mixed_scale_desktop();
    let registry = MonitorRegistry::new(Arc::new(desktop.clone()), desktop.dpi_resolver(), DEFAULT_CACHE_TTL);

    // Act
    let first = registry.list_monitors();
    desktop.add_monitor(Rect::new(-1280, 0, 0, 1024), Rect::new(-1280, 0, 0, 1024), None);
    let cached = registry.list_monitors();
    registry.invalidate();
    let fresh = registry.list_monitors();

    // Assert
    assert_eq!(first.len(), 2);
    assert_eq!(cached, first);
    assert_eq!(fresh.len(), 3);
    assert_eq!(desktop.enumeration_count(), 2);
}

#[test]
fn test_registry_resolves_dpi_through_the_cascade() {
    let desktop = mixed_scale_desktop();
    // No reported DPI: the resolution heuristic decides.
    desktop.add_monitor(Rect::new(-1366, 0, 0, 768), Rect::new(-1366, 0, 0, 728), None);
    let registry = MonitorRegistry::new(Arc::new(desktop.clone()), desktop.dpi_resolver(), DEFAULT_CACHE_TTL);

    let monitors = registry.list_monitors();

    assert_eq!(monitors[0].dpi, Dpi::uniform(96));
    assert_eq!(monitors[1].dpi, Dpi::uniform(144));
    assert_eq!(monitors[2].dpi, Dpi::uniform(168));
    assert_eq!(monitors.iter().filter(|m| m.is_primary).count(), 1);
    assert!(monitors[0].is_primary);
}

#[test]
fn test_registry_does_not_cache_a_failed_enumeration() {
    let desktop = mixed_scale_desktop();
    let registry = MonitorRegistry::new(Arc::new(desktop.clone()), desktop.dpi_resolver(), DEFAULT_CACHE_TTL);

    desktop.fail_enumeration(true);
    assert!(registry.list_monitors().is_empty());

    desktop.fail_enumeration(false);
    assert_eq!(registry.list_monitors().len(), 2);
}

#[test]
fn test_registry_enumerates_again_after_ttl() {
    let desktop = mixed_scale_desktop();
    let registry = MonitorRegistry::new(
        Arc::new(desktop.clone()),
        desktop.dpi_resolver(),
        Duration::from_millis(20),
    );

    registry.list_monitors();
    std::thread::sleep(Duration::from_millis(40));
    assert!(registry.is_stale());
    registry.list_monitors();

    assert_eq!(desktop.enumeration_count(), 2);
}
