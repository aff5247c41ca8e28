//! Application - App Initialization and Window Management
//!
//! Main entry point for the GPUI application.

use gpui::{
    AnyView, App, AppContext, Application, Bounds, SharedString, TitlebarOptions, WindowBounds,
    WindowOptions, actions, px,
};
use gpui_component::Root;

use crate::app::demo::{DemoPage, DemoParts};
use crate::settings::TableSettings;

actions!(common_table, [Quit]);

/// Run the demo application
pub fn run_app(settings: TableSettings) {
    Application::new().run(move |cx: &mut App| {
        gpui_component::init(cx);

        cx.on_action(|_: &Quit, cx: &mut App| cx.quit());

        // Quit the app when all windows are closed
        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        let bounds = Bounds::centered(None, gpui::size(px(1200.0), px(800.0)), cx);
        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some(SharedString::from("Common Table")),
                appears_transparent: true,
                traffic_light_position: Some(gpui::point(px(9.0), px(9.0))),
            }),
            ..Default::default()
        };

        let parts = match DemoParts::new(&settings) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!("Failed to build demo page: {}", e);
                cx.quit();
                return;
            }
        };

        let opened = cx.open_window(window_options, |window, cx| {
            let page = cx.new(|cx| DemoPage::new(parts, cx));
            cx.new(|cx| Root::new(AnyView::from(page), window, cx))
        });
        if let Err(e) = opened {
            tracing::error!("Failed to open window: {}", e);
            cx.quit();
            return;
        }

        cx.activate(true);
    });
}
