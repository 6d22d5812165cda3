//! Card display and contact export.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use bizcard_core::FetchState;
use bizcard_viewer::assets::{Logo, load_logo};
use bizcard_viewer::config::ViewerConfig;
use bizcard_viewer::error::{AppError, Result, add_breadcrumb};
use bizcard_viewer::export::export_contact;
use bizcard_viewer::fetcher::FirebaseFetcher;
use bizcard_viewer::preferences::PreferenceStore;
use bizcard_viewer::routes;
use bizcard_viewer::view::{
    self, Face, LOAD_FAILURE_MESSAGE, NOT_FOUND_MESSAGE, Palette, Tab, ViewOptions,
};

/// Fetch the card at `target` and print it.
///
/// Not-found and failure pages are output like any other view.
pub async fn show(
    config: &ViewerConfig,
    target: &str,
    tab: Tab,
    back: bool,
    color: bool,
) -> Result<()> {
    let face = if back { Face::Back } else { Face::Front };
    add_breadcrumb(
        "card",
        "Show card",
        Some(&[("tab", tab.as_str()), ("face", face.as_str())]),
    );

    let theme =
        PreferenceStore::at_default_location(config.preferences_path.as_deref())?.load_theme();
    let options = ViewOptions {
        face,
        tab,
        theme,
        palette: Palette::for_theme(theme, color),
        organization: config.organization.clone(),
        logo: if face == Face::Back {
            load_logo(config.logo_path.as_deref())
        } else {
            Logo::Fallback
        },
    };

    let fetcher = FirebaseFetcher::connect(&config.firebase)?;
    let id = routes::follow(target, &config.demo_record_id);

    // Skeleton on an interactive screen, erased once the lookup settles
    let skeleton = if id.is_some() && io::stderr().is_terminal() {
        let text = view::render(&FetchState::Loading, &options)?;
        writeln!(io::stderr(), "{text}")?;
        text.lines().count()
    } else {
        0
    };

    let state = fetcher.load(id.as_deref()).await;

    if skeleton > 0 {
        write!(io::stderr(), "\x1b[{skeleton}F\x1b[J")?;
    }
    writeln!(io::stdout(), "{}", view::render(&state, &options)?)?;
    Ok(())
}

/// Fetch the card at `target` and save its contact into `out`.
pub async fn export(config: &ViewerConfig, target: &str, out: &Path) -> Result<()> {
    let fetcher = FirebaseFetcher::connect(&config.firebase)?;
    let id = routes::follow(target, &config.demo_record_id);

    let record = match fetcher.load(id.as_deref()).await {
        FetchState::Ready(record) => record,
        FetchState::NotFound => return Err(AppError::Unavailable(NOT_FOUND_MESSAGE.to_string())),
        FetchState::Loading | FetchState::Failed(_) => {
            return Err(AppError::Unavailable(LOAD_FAILURE_MESSAGE.to_string()));
        }
    };

    add_breadcrumb(
        "contact",
        "Add to contacts",
        Some(&[("id", id.as_deref().unwrap_or_default())]),
    );

    let path = export_contact(&record, out)?;
    writeln!(io::stdout(), "¡Contacto agregado! {}", path.display())?;
    Ok(())
}
