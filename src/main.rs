mod app;
mod config;
#[cfg(test)]
mod testing;
mod theme;
mod ui;
mod wallet;

use anyhow::Result;
use app::ClientRuntime;
use config::Config;
use gpui::*;
use gpui_component::Root;
use theme::ThemeStore;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::MainWindow;
use wallet::FilePreferenceStore;

actions!(wave_portal, [Quit]);

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wave_portal=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Wave Portal");

    let config = Config::load()?;
    let storage_dir = match config.storage_dir() {
        Some(dir) => dir,
        None => FilePreferenceStore::default_path()?,
    };
    let theme = ThemeStore::load(FilePreferenceStore::new(&storage_dir)?);

    let ClientRuntime {
        handle,
        updates,
        thread,
    } = ClientRuntime::spawn(config)?;

    let window_client = handle.clone();
    let app = Application::new();

    app.run(move |cx: &mut App| {
        gpui_component::init(cx);

        cx.on_action(|_: &Quit, cx| cx.quit());
        cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);
        cx.on_window_closed(|cx| cx.quit()).detach();
        cx.activate(true);

        let opened = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                    None,
                    size(px(720.0), px(820.0)),
                    cx,
                ))),
                titlebar: Some(TitlebarOptions {
                    title: Some("Wave Portal".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            |window, cx| {
                let view =
                    cx.new(|cx| MainWindow::new(window, cx, window_client, updates, theme));
                cx.new(|cx| Root::new(view.into(), window, cx))
            },
        );

        if let Err(e) = opened {
            error!(error = %e, "Failed to open window");
            cx.quit();
        }
    });

    handle.shutdown();
    if thread.join().is_err() {
        error!("Wave client thread panicked");
    }
    Ok(())
}
