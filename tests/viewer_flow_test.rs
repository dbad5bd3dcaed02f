use std::sync::Arc;
use std::time::{Duration, Instant};

use folio::catalog::{Catalog, CatalogEntry};
use folio::event_source::{EventSource, SimulatedEventSource};
use folio::system_command::MockSystemCommandExecutor;
use folio::test_utils::fake_pdf::{FakeDocumentSpec, FakeLoader};
use folio::test_utils::test_helpers::{
    TestScenarioBuilder, capture_terminal_state, create_test_terminal,
};
use folio::viewer::ViewerConfig;
use folio::{App, run_app_with_event_source};

fn instant_config() -> ViewerConfig {
    ViewerConfig {
        transition: Duration::ZERO,
        resize_debounce: Duration::ZERO,
        ..ViewerConfig::default()
    }
}

fn loader() -> FakeLoader {
    FakeLoader::new()
        .with_document("short.pdf", FakeDocumentSpec::uniform(1, 600.0, 800.0))
        .with_document("three.pdf", FakeDocumentSpec::uniform(3, 600.0, 800.0))
}

fn catalog() -> Catalog {
    Catalog::new(vec![
        CatalogEntry::new("Short", "short.pdf"),
        CatalogEntry::new("Three Pages", "three.pdf"),
    ])
    .with_base_dir("/srv/docs")
}

fn create_app(loader: &FakeLoader, executor: &MockSystemCommandExecutor) -> App {
    App::new_with_executor(
        catalog(),
        Arc::new(loader.clone()),
        instant_config(),
        1,
        Box::new(executor.clone()),
    )
}

/// Feed every event of `source` to the app, ticking after each one
fn drive(app: &mut App, source: &mut SimulatedEventSource) {
    while source.poll(Duration::ZERO).unwrap() {
        let event = source.read().unwrap();
        app.handle_event(&event, Instant::now());
    }
    app.tick(Instant::now());
}

#[test]
fn three_page_scenario() {
    let loader = loader();
    let executor = MockSystemCommandExecutor::new();
    let mut app = create_app(&loader, &executor);
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|f| app.draw(f, Instant::now())).unwrap();

    let mut steps = [
        (TestScenarioBuilder::new().navigate_down(1).press_enter(), 1),
        (TestScenarioBuilder::new().next_page(), 2),
        (TestScenarioBuilder::new().next_page(), 3),
        (TestScenarioBuilder::new().next_page(), 3),
        (TestScenarioBuilder::new().prev_page(), 2),
    ]
    .map(|(builder, page)| (builder.build(), page));

    for (source, expected) in steps.iter_mut() {
        drive(&mut app, source);
        assert_eq!(app.viewer().current_page(), *expected);
        assert_eq!(app.viewer().total_pages(), 3);
    }

    terminal.draw(|f| app.draw(f, Instant::now())).unwrap();
    let screen = capture_terminal_state(&terminal);
    assert!(screen.contains("2 / 3"), "{screen}");
    assert!(screen.contains("Three Pages"), "{screen}");
}

#[test]
fn closing_resets_session() {
    let loader = loader();
    let executor = MockSystemCommandExecutor::new();
    let mut app = create_app(&loader, &executor);
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|f| app.draw(f, Instant::now())).unwrap();

    let mut source = TestScenarioBuilder::new()
        .navigate_down(1)
        .press_enter()
        .next_page()
        .press_esc()
        .build();
    drive(&mut app, &mut source);

    assert!(!app.viewer().is_open());
    assert_eq!(app.viewer().current_page(), 1);
    assert_eq!(app.viewer().total_pages(), 1);
    assert_eq!(app.selected(), Some(1));

    terminal.draw(|f| app.draw(f, Instant::now())).unwrap();
    let screen = capture_terminal_state(&terminal);
    assert!(!screen.contains("Download PDF"), "{screen}");
}

#[test]
fn single_page_document_disables_both_buttons() {
    let loader = loader();
    let executor = MockSystemCommandExecutor::new();
    let mut app = create_app(&loader, &executor);
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|f| app.draw(f, Instant::now())).unwrap();

    let mut source = TestScenarioBuilder::new()
        .press_enter()
        .next_page()
        .prev_page()
        .build();
    drive(&mut app, &mut source);

    let controls = app.viewer().controls();
    assert_eq!(controls.indicator(), "1 / 1");
    assert!(!controls.prev_enabled);
    assert!(!controls.next_enabled);
}

#[test]
fn full_event_loop_flips_downloads_and_quits() {
    let loader = loader();
    let executor = MockSystemCommandExecutor::new();
    let mut app = create_app(&loader, &executor);
    let mut terminal = create_test_terminal(80, 24);

    let mut source = TestScenarioBuilder::new()
        .navigate_down(1)
        .press_enter()
        .next_page()
        .next_page()
        .prev_page()
        .download()
        .scroll_down()
        .resize(100, 30)
        .press_esc()
        .quit()
        .build();

    run_app_with_event_source(&mut terminal, &mut app, &mut source).unwrap();

    assert_eq!(source.remaining(), 0);
    assert!(!app.viewer().is_open());
    assert_eq!(
        executor.get_executed_commands(),
        vec!["/srv/docs/three.pdf".to_string()]
    );

    // Going back to page 2 reused the cached render
    let viewer_renders: Vec<usize> = loader
        .renders()
        .into_iter()
        .filter(|call| call.url == "three.pdf" && call.page > 1)
        .map(|call| call.page)
        .collect();
    assert_eq!(viewer_renders, vec![2, 3]);
}

#[test]
fn hidpi_renders_more_pixels_than_displayed() {
    let loader = loader();
    let mut app = App::new_with_executor(
        catalog(),
        Arc::new(loader.clone()),
        ViewerConfig {
            device_pixel_ratio: 2.0,
            ..instant_config()
        },
        1,
        Box::new(MockSystemCommandExecutor::new()),
    );
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|f| app.draw(f, Instant::now())).unwrap();

    let mut source = TestScenarioBuilder::new().press_enter().build();
    drive(&mut app, &mut source);

    let primary = app.viewer().primary();
    let (pixel_w, pixel_h) = primary.size();
    let (display_w, display_h) = primary.display_size();
    assert_eq!(pixel_w, display_w * 2);
    assert!(pixel_h.abs_diff(display_h * 2) <= 1);
}
